//! screenreel - Region Screen Recorder Engine
//!
//! This library provides the core recording pipeline: the capture timer,
//! the bounded frame channel, the encoder sinks, and the session state
//! machine that ties them together. The binary in `main.rs` adds the
//! hotkey listener, CLI, and status output on top.

// Configuration constants
pub mod config;

// Capture region, frame buffers, and the screen-grab boundary
pub mod capture;

// Output formats and encoder sinks
pub mod encoder;

// Deadline-advancing interval timer
pub mod timer;

// Producer/consumer frame hand-off
pub mod frame_channel;

// Shared recording configuration and session lifecycle
pub mod recording;

// Raw input events and the hotkey command table
pub mod hotkeys;

// Re-export commonly used types
pub use capture::{CaptureRect, FrameBuffer, ScreenGrabber};
pub use encoder::{EncoderOptions, EncoderSink, OutputFormat, SinkFactory};
pub use recording::{RecordingConfig, SessionController, SessionState};
pub use timer::{IntervalTimer, TimerHandle};
