//! giffer
//!
//! Trim a video and export the selection as an optimized animated GIF.
//!
//! # Usage
//!
//! ```bash
//! giffer video.mp4
//! giffer export --input video.mp4 --start 00:02 --end 00:08
//! giffer settings set ffmpeg "C:\ffmpeg\bin\ffmpeg.exe"
//! giffer shortcut install
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::{debug, info};

use giffer::app::container::DefaultAppContainer;
use giffer::cli::{args::SessionArgs, commands, session, Cli, Commands};
use giffer::config_initialization::resolve_settings_path;
use giffer::utils::logging::LoggingConfig;

/// Main entry point for the giffer CLI application
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let logging = LoggingConfig {
        level: cli.log_level.clone(),
        format: cli.log_format,
    };
    if let Err(e) = logging.init() {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let settings_path = resolve_settings_path(cli.settings.as_deref());
    let interactive = matches!(cli.command, None | Some(Commands::Session(_)));
    let container = DefaultAppContainer::new(&settings_path, interactive);
    debug!(settings = %settings_path.display(), "Starting giffer");

    let command = cli
        .command
        .unwrap_or(Commands::Session(SessionArgs { video: cli.video }));

    match command {
        Commands::Export(args) => {
            info!("Executing export command");
            commands::export(&container, args)?;
        }
        Commands::Probe(args) => {
            commands::probe(&container, args)?;
        }
        Commands::Session(args) => {
            session::run(&container, args.video.as_deref()).await?;
        }
        Commands::Settings { action } => commands::settings(&container, action)?,
        Commands::Shortcut { action } => commands::shortcut(&container, action)?,
    }

    Ok(())
}
