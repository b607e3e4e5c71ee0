//! Console help and status output
//!
//! The status line is re-rendered in place (carriage return, padded to
//! cover the previous render) after every mutating command.

use std::io::Write;

use screenreel_core::recording::{RecordingConfig, SessionState};

/// Print the hotkey reference once at startup.
pub fn print_help() {
    println!("---------------------------------------------");
    println!("Ctrl + Space:            start/stop recording");
    println!("Ctrl + Enter:            hide/show the window");
    println!("Ctrl + mouse drag:       select the capture region");
    println!("Ctrl + PageDown/PageUp:  cycle the output format");
    println!("Ctrl + Left/Right:       adjust the frame rate");
    println!("Esc:                     quit");
    println!();
}

#[derive(Default)]
pub struct StatusLine {
    last_len: usize,
}

impl StatusLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, config: &RecordingConfig, state: SessionState) {
        let loop_text = if config.format().is_looping() {
            match config.loop_count() {
                0 => "loop forever".to_string(),
                n => format!("loop {}x", n),
            }
        } else {
            "no loop".to_string()
        };
        let state_text = match state {
            SessionState::Recording => "recording",
            SessionState::Idle => "ready",
        };

        let line = format!(
            "output: {} | fps: {} | region: {} | {} | {}",
            config.output_path().display(),
            config.fps(),
            config.region(),
            loop_text,
            state_text
        );
        let padding = self.last_len.saturating_sub(line.len());
        print!("\r{}{}", line, " ".repeat(padding));
        let _ = std::io::stdout().flush();
        self.last_len = line.len();
    }
}
