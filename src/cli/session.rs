//! Interactive session loop
//!
//! Reads one command per line. Exports run on this thread and block input
//! until the tools finish; the status-clear timer runs on the same runtime
//! while the loop waits for the next line.

use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::app::container::AppContainer;
use crate::app::{Session, SessionKey};
use crate::cli::commands::print_settings;
use crate::domain::model::ExportSettings;
use crate::ports::SettingsListener;
use crate::utils::path::PathUtils;
use crate::utils::time::{format_clock, TimeParser};

const HELP: &str = "\
Commands:
  open <video>        load a video
  play | pause | d    start, stop or toggle playback
  e | rewind          jump to the beginning
  left | right        skip back / forward (a tenth of the video, at most 5 s)
  , | .               step one frame back / forward (pauses)
  seek <time>         jump to a time (HH:MM:SS.ms, MM:SS.ms or seconds)
  start [time]        set the trim start (default: playhead)
  end [time]          set the trim end (default: playhead)
  status              show playhead, trim range and status line
  export              export next to the video or to the export directory
  save <path>         export to a chosen path (.gif is appended)
  settings            show settings
  set <key> <value>   change a setting
  quit                leave the session";

/// What the loop should do after a command
#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Run the session until `quit`, end of input or auto close
pub async fn run(container: &dyn AppContainer, video: Option<&Path>) -> Result<()> {
    let mut session = container.new_session();
    session.startup_check();

    let settings = container.settings_interactor();
    let initial = settings
        .load()
        .map(|s| export_summary(&s))
        .unwrap_or_default();
    settings.on_change(summary_listener(initial, |summary| println!("{}", summary)));

    if let Some(video) = video {
        // Failure is already on the status line
        let _ = session.open(video);
    }

    println!("giffer session. Type 'help' for commands.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("giffer> ");
        std::io::stdout().flush()?;

        let line = match lines.next_line().await? {
            Some(line) => line,
            None => break,
        };
        if execute(container, &mut session, &line) == Flow::Quit {
            break;
        }
        if session.should_close() {
            break;
        }
    }
    Ok(())
}

/// Execute one session command line
pub fn execute(container: &dyn AppContainer, session: &mut Session, line: &str) -> Flow {
    let line = line.trim();
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };
    debug!(command, "Session command");

    let single_key = command.chars().next().filter(|_| command.chars().count() == 1);
    if let Some(key) = single_key.and_then(SessionKey::from_char) {
        session.handle_key(key);
        print_position(session);
        return Flow::Continue;
    }

    match command.to_lowercase().as_str() {
        "" => {}
        "help" | "?" => println!("{}", HELP),
        "quit" | "exit" | "q" => return Flow::Quit,
        "open" => {
            if rest.is_empty() {
                println!("usage: open <video>");
            } else if let Ok(media) = session.open(&PathUtils::clean_user_path(rest)) {
                println!(
                    "{} ({}, {:.3} fps)",
                    media.path.display(),
                    format_clock(media.duration),
                    media.frame_rate
                );
            }
        }
        "play" => session.player_mut().play(),
        "pause" => session.player_mut().pause(),
        "toggle" => session.handle_key(SessionKey::TogglePlay),
        "rewind" => session.handle_key(SessionKey::Rewind),
        "left" | "back" => session.handle_key(SessionKey::SkipBackward),
        "right" | "forward" => session.handle_key(SessionKey::SkipForward),
        "prev" => session.handle_key(SessionKey::FrameBackward),
        "next" => session.handle_key(SessionKey::FrameForward),
        "seek" => match TimeParser::parse(rest) {
            Ok(position) => {
                session.player_mut().seek(position);
                print_position(session);
            }
            Err(e) => println!("{}", e),
        },
        "start" | "end" => mark(session, command.eq_ignore_ascii_case("start"), rest),
        "status" => print_status(container, session),
        "export" => {
            if let Ok(report) = session.export() {
                println!("Exported {}", report.output.display());
            }
        }
        "save" => {
            if rest.is_empty() {
                println!("usage: save <path>");
            } else if let Ok(report) = session.export_to(&PathUtils::clean_user_path(rest)) {
                println!("Exported {}", report.output.display());
            }
        }
        "settings" => match container.settings_interactor().load() {
            Ok(settings) => print_settings(&settings),
            Err(e) => println!("{}", e),
        },
        "set" => match rest.split_once(char::is_whitespace) {
            Some((key, value)) => match container.settings_interactor().set(key, value.trim()) {
                Ok(_) => println!("Saved {}", key),
                Err(e) => println!("{}", e),
            },
            None => println!("usage: set <key> <value>"),
        },
        other => println!("Unknown command '{}'. Type 'help' for commands.", other),
    }
    Flow::Continue
}

/// How the next export will run
pub fn export_summary(settings: &ExportSettings) -> String {
    format!(
        "Export: {}, gifsicle {} ({} colors), {}",
        if settings.use_frame_sequence {
            "ffmpeg + convert"
        } else {
            "ffmpeg"
        },
        if settings.use_optimizer { "on" } else { "off" },
        settings.optimizer_colors,
        settings
            .export_directory
            .as_deref()
            .map(|dir| format!("into {}", dir.display()))
            .unwrap_or_else(|| "next to the video".to_string())
    )
}

/// Emits the export summary after a save that changes it
fn summary_listener<F>(initial: String, emit: F) -> SettingsListener
where
    F: Fn(&str) + Send + Sync + 'static,
{
    let last = Mutex::new(initial);
    Box::new(move |settings: &ExportSettings| {
        let summary = export_summary(settings);
        let mut last = last.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if *last != summary {
            emit(&summary);
            *last = summary;
        }
    })
}

fn mark(session: &mut Session, is_start: bool, rest: &str) {
    if session.media().is_none() {
        println!("Open a video first");
        return;
    }

    let candidate = if rest.is_empty() {
        session.player().position()
    } else {
        match TimeParser::parse(rest) {
            Ok(time) => time,
            Err(e) => {
                println!("{}", e);
                return;
            }
        }
    };

    if is_start {
        session.set_start(candidate);
    } else {
        session.set_end(candidate);
    }
    println!("Trim: {}", session.trim().range());
}

fn print_position(session: &Session) {
    let player = session.player();
    println!(
        "{} / {}{}",
        format_clock(player.position()),
        format_clock(player.duration()),
        if player.is_playing() { " (playing)" } else { "" }
    );
}

fn print_status(container: &dyn AppContainer, session: &Session) {
    match session.media() {
        Some(media) => {
            println!("Video:  {}", media.path.display());
            print_position(session);
            println!("Trim:   {}", session.trim().range());
        }
        None => println!("No video loaded"),
    }
    let status = container.status();
    if let Some(busy) = status.busy() {
        println!("Busy:   {}", busy);
    }
    if let Some(line) = status.current() {
        println!("Status: {}", line.message);
    }
}
