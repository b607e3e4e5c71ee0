//! Command application
//!
//! Applies interpreted hotkey commands against the application state:
//! configuration mutations, session toggling, and the window-visibility
//! side effects. Every mutating command re-renders the status line.

use screenreel_core::encoder::CycleDirection;
use screenreel_core::hotkeys::Command;

use crate::app_state::AppState;

/// Whether the dispatch loop should keep running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub fn apply_command(command: Command, state: &mut AppState) -> Flow {
    match command {
        Command::ToggleRecording => {
            if state.controller.is_recording() {
                state.controller.stop();
                if state.hidden {
                    state.visibility.show();
                    state.hidden = false;
                }
            } else if let Err(e) = state.controller.start() {
                tracing::error!(error = %e, "failed to start recording session");
            } else if !state.hidden {
                state.visibility.hide();
                state.hidden = true;
            }
            state.render_status();
        }
        Command::ToggleVisibility => {
            if state.hidden {
                state.visibility.show();
            } else {
                state.visibility.hide();
            }
            state.hidden = !state.hidden;
            state.render_status();
        }
        Command::CycleFormatForward => {
            state
                .config
                .lock()
                .unwrap()
                .cycle_format(CycleDirection::Forward);
            state.render_status();
        }
        Command::CycleFormatBackward => {
            state
                .config
                .lock()
                .unwrap()
                .cycle_format(CycleDirection::Backward);
            state.render_status();
        }
        Command::RateDown => {
            state.config.lock().unwrap().adjust_fps(-1);
            state.render_status();
        }
        Command::RateUp => {
            state.config.lock().unwrap().adjust_fps(1);
            state.render_status();
        }
        Command::SelectRegion(rect) => {
            state.config.lock().unwrap().set_region(rect);
            state.render_status();
        }
        Command::Quit => return Flow::Quit,
    }
    Flow::Continue
}
