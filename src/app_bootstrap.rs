//! Startup assembly
//!
//! Merges the CLI over persisted settings, validates the resulting
//! recording configuration, and builds the application state.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Context;

use screenreel_core::capture;
use screenreel_core::config;
use screenreel_core::encoder::DefaultSinkFactory;
use screenreel_core::recording::{RecordingConfig, SessionController};

use crate::app_state::AppState;
use crate::logging::{self, LogLevel};
use crate::settings::Settings;
use crate::visibility;
use crate::Cli;

pub fn init_logging_for(cli: &Cli, settings: &Settings) -> anyhow::Result<()> {
    let level: LogLevel = cli
        .log_level
        .as_deref()
        .unwrap_or(settings.log_level.as_str())
        .parse()
        .map_err(anyhow::Error::msg)
        .context("invalid log level")?;
    logging::init_logging(level, settings.log_to_file)?;
    logging::auto_cleanup_old_logs(settings.log_retention_days);
    Ok(())
}

/// CLI flag > persisted setting > built-in default. The output path is
/// synthesized from the current timestamp when not given.
pub fn build_recording_config(cli: &Cli, settings: &Settings) -> anyhow::Result<RecordingConfig> {
    let output_path = match &cli.out {
        Some(path) => path.clone(),
        None => {
            let stamp = chrono::Local::now().format(config::capture::TIMESTAMP_FORMAT);
            PathBuf::from(format!("{}.{}", stamp, settings.format.extension()))
        }
    };

    let region = capture::primary_display_rect()?;
    RecordingConfig::new(
        output_path,
        region,
        cli.fps.unwrap_or(settings.fps),
        cli.frames.unwrap_or(settings.frame_limit),
        cli.loop_count.unwrap_or(settings.loop_count),
    )
}

pub fn build_app_state(recording_config: RecordingConfig) -> anyhow::Result<AppState> {
    let shared_config = Arc::new(Mutex::new(recording_config));
    let grabber = capture::create_screen_grabber()?;
    let controller = SessionController::new(
        Arc::clone(&shared_config),
        grabber,
        Arc::new(DefaultSinkFactory),
    );
    Ok(AppState::new(
        shared_config,
        controller,
        visibility::create_window_visibility(),
    ))
}

/// Write hotkey-adjusted defaults back for the next run.
pub fn persist_runtime_settings(state: &AppState, mut settings: Settings) {
    {
        let config = state.config.lock().unwrap();
        settings.fps = config.fps();
        settings.format = config.format();
    }
    if let Err(e) = crate::settings_io::persist_settings_to_disk(&settings) {
        log::warn!("failed to persist settings: {}", e);
    }
}
