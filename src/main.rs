// screenreel - record a screen region to GIF or video, driven by global
// hotkeys. The console window is the app's only surface.

// Import modules
mod app_bootstrap;
mod app_state;
mod dispatch;
mod input;
mod logging;
mod settings;
mod settings_io;
mod status;
mod visibility;

use std::path::PathBuf;

use clap::Parser;

use screenreel_core::hotkeys::CommandMap;

use crate::dispatch::Flow;

#[derive(Parser)]
#[command(name = "screenreel")]
#[command(about = "Record a screen region to GIF or video, driven by global hotkeys")]
#[command(version)]
pub struct Cli {
    /// Output file (.gif, .mp4, .avi or .wmv); synthesized from the
    /// current timestamp when omitted
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Frame rate in frames per second (1-40)
    #[arg(short, long)]
    fps: Option<u32>,

    /// Maximum frames per recording session
    #[arg(short = 'n', long)]
    frames: Option<u32>,

    /// Loop count for GIF output (0 = loop forever)
    #[arg(short = 'l', long = "loop")]
    loop_count: Option<u16>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,
}

// ============================================================================
// Main
// ============================================================================

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = settings_io::load_settings();
    app_bootstrap::init_logging_for(&cli, &settings)?;

    let recording_config = app_bootstrap::build_recording_config(&cli, &settings)?;
    let mut state = app_bootstrap::build_app_state(recording_config)?;

    status::print_help();
    state.render_status();

    let (event_tx, event_rx) = crossbeam_channel::unbounded();
    let mut hook = input::create_input_hook()?;
    hook.start(event_tx)?;
    tracing::info!("global input hooks installed, waiting for hotkeys");

    let mut command_map = CommandMap::new();
    for event in event_rx.iter() {
        let Some(command) = command_map.interpret(event) else {
            continue;
        };
        if dispatch::apply_command(command, &mut state) == Flow::Quit {
            break;
        }
    }

    // Orderly teardown: stop listening, finalize any in-flight session,
    // reveal the window, persist hotkey-adjusted defaults.
    hook.stop();
    state.controller.shutdown();
    if state.hidden {
        state.visibility.show();
    }
    app_bootstrap::persist_runtime_settings(&state, settings);

    println!();
    println!("stopped");
    Ok(())
}
