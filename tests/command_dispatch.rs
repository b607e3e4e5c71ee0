#![allow(dead_code)]

use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[path = "../src/app_state.rs"]
mod app_state;
#[path = "../src/dispatch.rs"]
mod dispatch;
#[path = "../src/status.rs"]
mod status;
#[path = "../src/visibility.rs"]
mod visibility;

use screenreel_core::capture::{CaptureRect, FrameBuffer, ScreenGrabber};
use screenreel_core::encoder::{EncoderOptions, EncoderSink, OutputFormat, SinkFactory};
use screenreel_core::hotkeys::Command;
use screenreel_core::recording::{RecordingConfig, SessionController};

use crate::dispatch::Flow;
use crate::visibility::WindowVisibility;

#[derive(Clone, Default)]
struct MockVisibility {
    calls: Arc<Mutex<Vec<&'static str>>>,
}

impl MockVisibility {
    fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }
}

impl WindowVisibility for MockVisibility {
    fn show(&self) {
        self.calls.lock().unwrap().push("show");
    }

    fn hide(&self) {
        self.calls.lock().unwrap().push("hide");
    }
}

struct StubGrabber;

impl ScreenGrabber for StubGrabber {
    fn grab(&self, region: CaptureRect) -> anyhow::Result<FrameBuffer> {
        Ok(FrameBuffer {
            data: vec![0u8; (region.width * region.height * 4) as usize],
            width: region.width,
            height: region.height,
            stride: region.width * 4,
        })
    }
}

#[derive(Default)]
struct NullSinkState {
    closes: AtomicU32,
}

struct NullSink {
    state: Arc<NullSinkState>,
}

impl EncoderSink for NullSink {
    fn append(&mut self, _frame: &FrameBuffer) -> anyhow::Result<()> {
        Ok(())
    }

    fn close(&mut self) -> anyhow::Result<()> {
        self.state.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Default)]
struct NullSinkFactory {
    state: Arc<NullSinkState>,
}

impl SinkFactory for NullSinkFactory {
    fn open(
        &self,
        _path: &Path,
        _format: OutputFormat,
        _options: EncoderOptions,
    ) -> anyhow::Result<Box<dyn EncoderSink>> {
        Ok(Box::new(NullSink {
            state: Arc::clone(&self.state),
        }))
    }
}

fn build_state() -> (app_state::AppState, MockVisibility) {
    let config = RecordingConfig::new(
        "capture.mp4".into(),
        CaptureRect::new(0, 0, 64, 48),
        10,
        100_000,
        0,
    )
    .unwrap();
    let shared = Arc::new(Mutex::new(config));
    let controller = SessionController::new(
        Arc::clone(&shared),
        Arc::new(StubGrabber),
        Arc::new(NullSinkFactory::default()),
    );
    let visibility = MockVisibility::default();
    let state = app_state::AppState::new(shared, controller, Box::new(visibility.clone()));
    (state, visibility)
}

#[test]
fn toggle_recording_starts_session_and_hides_window() {
    let (mut state, visibility) = build_state();

    let flow = dispatch::apply_command(Command::ToggleRecording, &mut state);
    assert_eq!(flow, Flow::Continue);
    assert!(state.controller.is_recording());
    assert!(state.hidden);
    assert_eq!(visibility.calls(), vec!["hide"]);

    dispatch::apply_command(Command::ToggleRecording, &mut state);
    assert!(!state.hidden);
    assert_eq!(visibility.calls(), vec!["hide", "show"]);
    state.controller.shutdown();
    assert!(!state.controller.is_recording());
}

#[test]
fn toggle_visibility_is_independent_of_recording() {
    let (mut state, visibility) = build_state();

    dispatch::apply_command(Command::ToggleVisibility, &mut state);
    assert!(state.hidden);
    dispatch::apply_command(Command::ToggleVisibility, &mut state);
    assert!(!state.hidden);
    assert_eq!(visibility.calls(), vec!["hide", "show"]);
    assert!(!state.controller.is_recording());
}

#[test]
fn rate_commands_clamp_to_bounds() {
    let (mut state, _visibility) = build_state();

    for _ in 0..60 {
        dispatch::apply_command(Command::RateUp, &mut state);
    }
    assert_eq!(state.config.lock().unwrap().fps(), 40);

    for _ in 0..60 {
        dispatch::apply_command(Command::RateDown, &mut state);
    }
    assert_eq!(state.config.lock().unwrap().fps(), 1);
}

#[test]
fn cycle_commands_walk_the_format_set() {
    let (mut state, _visibility) = build_state();
    assert_eq!(state.config.lock().unwrap().format(), OutputFormat::Mp4);

    dispatch::apply_command(Command::CycleFormatForward, &mut state);
    assert_eq!(state.config.lock().unwrap().format(), OutputFormat::Avi);

    dispatch::apply_command(Command::CycleFormatBackward, &mut state);
    dispatch::apply_command(Command::CycleFormatBackward, &mut state);
    assert_eq!(state.config.lock().unwrap().format(), OutputFormat::Gif);

    let path = state.config.lock().unwrap().output_path().to_path_buf();
    assert_eq!(path.extension().and_then(|e| e.to_str()), Some("gif"));
}

#[test]
fn select_region_applies_alignment() {
    let (mut state, _visibility) = build_state();

    dispatch::apply_command(
        Command::SelectRegion(CaptureRect::from_corners((100, 100), (50, 40))),
        &mut state,
    );
    let region = state.config.lock().unwrap().region();
    assert_eq!(region.width % 16, 0);
    assert_eq!(region.height % 16, 0);
    assert_eq!(region, CaptureRect::new(51, 46, 48, 48));
}

#[test]
fn quit_breaks_the_dispatch_loop() {
    let (mut state, _visibility) = build_state();
    assert_eq!(
        dispatch::apply_command(Command::Quit, &mut state),
        Flow::Quit
    );
}

#[test]
fn fps_change_while_recording_applies_on_next_start() {
    let (mut state, _visibility) = build_state();

    dispatch::apply_command(Command::ToggleRecording, &mut state);
    let fps_before = state.config.lock().unwrap().fps();
    dispatch::apply_command(Command::RateUp, &mut state);
    assert_eq!(state.config.lock().unwrap().fps(), fps_before + 1);

    // Still recording with the original cadence; the new rate takes
    // effect when the next session starts.
    assert!(state.controller.is_recording());
    std::thread::sleep(Duration::from_millis(50));
    dispatch::apply_command(Command::ToggleRecording, &mut state);
    state.controller.shutdown();
}
