//! Command implementations

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::app::container::AppContainer;
use crate::app::ExportRequest;
use crate::cli::args::{ExportArgs, ProbeArgs, SettingsAction, ShortcutAction};
use crate::domain::errors::ExportError;
use crate::domain::model::*;
use crate::domain::rules::{ExportOverrides, ToolValidator};
use crate::utils::time::{format_clock, TimeParser};

/// Execute the export command
pub fn export(container: &dyn AppContainer, args: ExportArgs) -> Result<ExportReport> {
    // Configuration errors come before probing or any file work
    let settings = container.settings_interactor().load()?;
    if !ToolValidator::is_present(&settings.transcoder_path) {
        return Err(ExportError::MissingTool {
            tool: ToolKind::Transcoder,
            path: settings.transcoder_path,
        }
        .into());
    }

    let media = container
        .probe()
        .probe(&args.input)
        .with_context(|| format!("Failed to inspect {}", args.input.display()))?;
    info!(duration = %format_clock(media.duration), fps = media.frame_rate, "Probed input");

    let range = trim_range(&media, args.start.as_deref(), args.end.as_deref())?;
    let frame_rate = args.fps.filter(|fps| *fps > 0).unwrap_or_else(|| media.export_frame_rate());

    let overrides = ExportOverrides {
        strategy: args.strategy,
        optimize: args.optimize_override(),
        colors: args.colors,
    };
    let mut request = ExportRequest::new(&args.input, range, frame_rate).with_overrides(overrides);
    request.output = args.output.clone();

    let report = container.export_interactor().execute(&request)?;
    print_report(&report, args.json)?;
    Ok(report)
}

/// Clamp the requested points the same way the player does
fn trim_range(media: &MediaInfo, start: Option<&str>, end: Option<&str>) -> Result<TrimRange> {
    let mut selector = TrimSelector::new(media.duration);
    if let Some(end) = end {
        let requested = TimeParser::parse(end)?;
        let actual = selector.set_end(requested);
        if actual != requested {
            warn!(requested = %format_clock(requested), actual = %format_clock(actual), "Trim end adjusted");
        }
    }
    if let Some(start) = start {
        let requested = TimeParser::parse(start)?;
        let actual = selector.set_start(requested);
        if actual != requested {
            warn!(requested = %format_clock(requested), actual = %format_clock(actual), "Trim start adjusted");
        }
    }
    Ok(selector.range())
}

fn print_report(report: &ExportReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!("Exported {}", report.output.display());
    println!("  Range:     {}", report.range);
    println!("  Strategy:  {:?}", report.strategy);
    println!("  Optimized: {}", if report.optimized { "yes" } else { "no" });
    for warning in &report.warnings {
        println!("  Warning:   {}", warning);
    }
    Ok(())
}

/// Execute the probe command
pub fn probe(container: &dyn AppContainer, args: ProbeArgs) -> Result<MediaInfo> {
    let media = container
        .probe()
        .probe(&args.input)
        .with_context(|| format!("Failed to inspect {}", args.input.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&media)?);
    } else {
        println!("File:       {}", media.path.display());
        println!("Duration:   {}", format_clock(media.duration));
        println!(
            "Frame rate: {:.3} fps (exports at {})",
            media.frame_rate,
            media.export_frame_rate()
        );
        println!("Size:       {}x{}", media.width, media.height);
        println!("Codec:      {}", media.codec);
    }
    Ok(media)
}

/// Execute a settings action
pub fn settings(container: &dyn AppContainer, action: SettingsAction) -> Result<()> {
    let interactor = container.settings_interactor();
    match action {
        SettingsAction::Show { json } => {
            let settings = interactor.load()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&settings)?);
            } else {
                print_settings(&settings);
            }
        }
        SettingsAction::Path => println!("{}", interactor.location().display()),
        SettingsAction::Set { key, value } => {
            interactor.set(&key, &value)?;
            println!("Saved {} in {}", key, interactor.location().display());
        }
        SettingsAction::ClearExportDir => {
            interactor.set_export_directory(None)?;
            println!("GIFs will be exported next to their source video");
        }
    }
    Ok(())
}

pub fn print_settings(settings: &ExportSettings) {
    let show = |path: &Path| {
        if path.as_os_str().is_empty() {
            "(not set)".to_string()
        } else {
            path.display().to_string()
        }
    };
    println!("ffmpeg:               {}", show(&settings.transcoder_path));
    println!("convert:              {}", show(&settings.frame_sequence_tool_path));
    println!("gifsicle:             {}", show(&settings.optimizer_path));
    println!("Use convert:          {}", settings.use_frame_sequence);
    println!("Use gifsicle:         {}", settings.use_optimizer);
    println!("Colors:               {}", settings.optimizer_colors);
    println!(
        "Export directory:     {}",
        settings
            .export_directory
            .as_deref()
            .map(show)
            .unwrap_or_else(|| "(next to source)".to_string())
    );
    println!("Auto close:           {}", settings.auto_close);
    println!("Last opened:          {}", show(&settings.last_opened_directory));
}

/// Execute a shortcut action
pub fn shortcut(container: &dyn AppContainer, action: ShortcutAction) -> Result<()> {
    let interactor = container.settings_interactor();
    match action {
        ShortcutAction::Install { exe } => {
            let exe = match exe {
                Some(exe) => exe,
                None => current_exe()?,
            };
            interactor.install_shortcut(&exe)?;
            println!("Installed \"Open with Giffer\" for {}", exe.display());
        }
        ShortcutAction::Remove => {
            interactor.remove_shortcut()?;
            println!("Removed \"Open with Giffer\"");
        }
        ShortcutAction::Status => {
            let installed = interactor.shortcut_installed()?;
            println!(
                "\"Open with Giffer\" is {}",
                if installed { "installed" } else { "not installed" }
            );
        }
    }
    Ok(())
}

fn current_exe() -> Result<PathBuf> {
    std::env::current_exe().context("Could not determine the giffer executable path")
}
