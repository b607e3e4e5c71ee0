use std::sync::{Arc, Mutex};

use screenreel_core::recording::{RecordingConfig, SessionController};

use crate::status::StatusLine;
use crate::visibility::WindowVisibility;

/// Application state driven by the dispatch loop. Only the input-dispatch
/// thread touches `hidden` and the status line; the configuration and the
/// controller are shared with the capture and encode threads.
pub struct AppState {
    pub config: Arc<Mutex<RecordingConfig>>,
    pub controller: SessionController,
    pub visibility: Box<dyn WindowVisibility>,
    pub hidden: bool,
    pub status: StatusLine,
}

impl AppState {
    pub fn new(
        config: Arc<Mutex<RecordingConfig>>,
        controller: SessionController,
        visibility: Box<dyn WindowVisibility>,
    ) -> Self {
        Self {
            config,
            controller,
            visibility,
            hidden: false,
            status: StatusLine::new(),
        }
    }

    pub fn render_status(&mut self) {
        let config = self.config.lock().unwrap();
        self.status.render(&config, self.controller.state());
    }
}
