//! Shared recording configuration and the session lifecycle
//!
//! `RecordingConfig` is the single shared state mutated by hotkeys and
//! read by the capture and encode threads; the whole struct sits behind
//! one mutex so composite fields like the region are never torn.
//! `SessionController` owns the Idle/Recording state machine: starting a
//! session wires the interval timer to the capture producer and spawns
//! the encode consumer; stopping (or exhausting the frame limit) tears
//! the triple down.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context};

use crate::capture::{CaptureRect, ScreenGrabber};
use crate::config;
use crate::encoder::{CycleDirection, EncoderOptions, OutputFormat, SinkFactory};
use crate::frame_channel::{self, FrameReceiver};
use crate::timer::IntervalTimer;

/// Recording session lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Recording,
}

/// Shared recording configuration
///
/// Created once at startup and mutated in place for the life of the
/// process. Invariants: the region is 16-pixel aligned, the format is a
/// member of the supported set, and fps stays within [1,40].
#[derive(Debug, Clone)]
pub struct RecordingConfig {
    region: CaptureRect,
    format: OutputFormat,
    output_path: PathBuf,
    fps: u32,
    frame_limit: u32,
    loop_count: u16,
}

impl RecordingConfig {
    /// Build and validate the startup configuration. The output extension
    /// must name a supported format and the target directory must exist;
    /// both are checked here, before any capture begins.
    pub fn new(
        output_path: PathBuf,
        region: CaptureRect,
        fps: u32,
        frame_limit: u32,
        loop_count: u16,
    ) -> anyhow::Result<Self> {
        let format = OutputFormat::from_path(&output_path).with_context(|| {
            format!(
                "unsupported output format: {} (expected one of {})",
                output_path.display(),
                OutputFormat::ALL.map(|f| f.extension()).join(", ")
            )
        })?;

        if let Some(folder) = output_path.parent() {
            if !folder.as_os_str().is_empty() && !folder.is_dir() {
                bail!("output directory does not exist: {}", folder.display());
            }
        }
        if frame_limit == 0 {
            bail!("frame limit must be positive");
        }

        Ok(Self {
            region: region.aligned(),
            format,
            output_path,
            fps: fps.clamp(config::capture::MIN_FPS, config::capture::MAX_FPS),
            frame_limit,
            loop_count,
        })
    }

    pub fn region(&self) -> CaptureRect {
        self.region
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn frame_limit(&self) -> u32 {
        self.frame_limit
    }

    pub fn loop_count(&self) -> u16 {
        self.loop_count
    }

    pub fn encoder_options(&self) -> EncoderOptions {
        EncoderOptions {
            fps: self.fps,
            loop_count: self.loop_count,
        }
    }

    /// Replace the capture region, enforcing the alignment invariant.
    pub fn set_region(&mut self, region: CaptureRect) {
        self.region = region.aligned();
    }

    /// Step to the neighboring format and regenerate the output path from
    /// the current timestamp in the same directory.
    pub fn cycle_format(&mut self, direction: CycleDirection) {
        self.format = self.format.cycled(direction);
        let folder = self
            .output_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let stamp = chrono::Local::now().format(config::capture::TIMESTAMP_FORMAT);
        self.output_path = folder.join(format!("{}.{}", stamp, self.format.extension()));
    }

    /// Adjust the frame rate by `delta`, clamped to the supported range.
    /// A running session keeps its period; the change applies to the next
    /// start.
    pub fn adjust_fps(&mut self, delta: i32) {
        let fps = self.fps as i32 + delta;
        self.fps = fps.clamp(
            config::capture::MIN_FPS as i32,
            config::capture::MAX_FPS as i32,
        ) as u32;
    }
}

struct ActiveSession {
    running: Arc<AtomicBool>,
    timer: IntervalTimer,
    consumer: Option<thread::JoinHandle<()>>,
}

/// Orchestrates recording sessions: at most one active at a time, each
/// with its own timer, frame channel, and encode consumer.
pub struct SessionController {
    config: Arc<Mutex<RecordingConfig>>,
    grabber: Arc<dyn ScreenGrabber>,
    sinks: Arc<dyn SinkFactory>,
    active: Mutex<Option<ActiveSession>>,
}

impl SessionController {
    pub fn new(
        config: Arc<Mutex<RecordingConfig>>,
        grabber: Arc<dyn ScreenGrabber>,
        sinks: Arc<dyn SinkFactory>,
    ) -> Self {
        Self {
            config,
            grabber,
            sinks,
            active: Mutex::new(None),
        }
    }

    pub fn state(&self) -> SessionState {
        if self.is_recording() {
            SessionState::Recording
        } else {
            SessionState::Idle
        }
    }

    pub fn is_recording(&self) -> bool {
        self.active
            .lock()
            .unwrap()
            .as_ref()
            .is_some_and(|session| session.running.load(Ordering::SeqCst))
    }

    /// Start a session. A no-op while one is already recording.
    pub fn start(&self) -> anyhow::Result<()> {
        let mut active = self.active.lock().unwrap();
        if active
            .as_ref()
            .is_some_and(|session| session.running.load(Ordering::SeqCst))
        {
            log::debug!("start ignored, session already recording");
            return Ok(());
        }

        // Reap a session that ended on its own (frame limit or encoder
        // failure) before wiring up the new one.
        if let Some(mut finished) = active.take() {
            if let Some(handle) = finished.consumer.take() {
                let _ = handle.join();
            }
        }

        let (path, format, fps, frame_limit, options) = {
            let cfg = self.config.lock().unwrap();
            (
                cfg.output_path().to_path_buf(),
                cfg.format(),
                cfg.fps(),
                cfg.frame_limit(),
                cfg.encoder_options(),
            )
        };

        let (sender, receiver) = frame_channel::bounded(config::channel::FRAME_CAPACITY);
        let running = Arc::new(AtomicBool::new(true));

        // Capture producer: one grab per tick, reading the region fresh
        // each time; a full channel drops the frame and keeps the cadence.
        let grabber = Arc::clone(&self.grabber);
        let shared_config = Arc::clone(&self.config);
        let timer = IntervalTimer::start(
            Duration::from_secs_f64(1.0 / fps as f64),
            false,
            move || {
                let region = shared_config.lock().unwrap().region();
                match grabber.grab(region) {
                    Ok(frame) => {
                        if !sender.try_put(frame) {
                            tracing::trace!("frame channel full, frame dropped");
                        }
                    }
                    Err(e) => tracing::warn!(error = %e, "screen grab failed"),
                }
            },
        )?;

        let timer_handle = timer.handle();
        let sinks = Arc::clone(&self.sinks);
        let flag = Arc::clone(&running);
        let consumer = thread::Builder::new()
            .name("encode-consumer".into())
            .spawn(move || {
                consume_frames(&receiver, &*sinks, &path, format, options, frame_limit, &flag);
                // Any consumer exit is an implicit stop: halt capture
                // ticks and return the session to Idle.
                timer_handle.stop();
                flag.store(false, Ordering::SeqCst);
            });
        let consumer = match consumer {
            Ok(handle) => handle,
            Err(e) => {
                timer.stop();
                return Err(e).context("failed to spawn encode consumer");
            }
        };

        tracing::info!(fps, frame_limit, "recording session started");
        *active = Some(ActiveSession {
            running,
            timer,
            consumer: Some(consumer),
        });
        Ok(())
    }

    /// Stop the active session. A no-op while idle. The consumer observes
    /// the cleared flag at its next loop check; in-flight work is not
    /// interrupted.
    pub fn stop(&self) {
        let mut active = self.active.lock().unwrap();
        match active.as_mut() {
            Some(session) if session.running.swap(false, Ordering::SeqCst) => {
                session.timer.stop();
                tracing::info!("recording session stopped");
            }
            _ => log::debug!("stop ignored, no session recording"),
        }
    }

    /// Stop and wait for the consumer to finalize the output. Used on
    /// process shutdown.
    pub fn shutdown(&self) {
        self.stop();
        let mut active = self.active.lock().unwrap();
        if let Some(mut session) = active.take() {
            if let Some(handle) = session.consumer.take() {
                let _ = handle.join();
            }
        }
    }
}

/// Drain the channel into a freshly opened sink until the frame limit is
/// reached or the running flag clears, then close the sink exactly once.
/// Frames still buffered when a stop arrives are not drained.
fn consume_frames(
    frames: &FrameReceiver,
    sinks: &dyn SinkFactory,
    path: &Path,
    format: OutputFormat,
    options: EncoderOptions,
    frame_limit: u32,
    running: &AtomicBool,
) {
    let mut sink = match sinks.open(path, format, options) {
        Ok(sink) => sink,
        Err(e) => {
            tracing::error!(error = %e, path = %path.display(), "failed to open encoder sink");
            return;
        }
    };

    let mut appended = 0u32;
    while running.load(Ordering::SeqCst) && appended < frame_limit {
        match frames.try_take() {
            None => thread::sleep(Duration::from_millis(config::channel::EMPTY_WAIT_MS)),
            Some(frame) => {
                if let Err(e) = sink.append(&frame) {
                    tracing::error!(error = %e, "encoder append failed, ending session");
                    break;
                }
                appended += 1;
            }
        }
    }

    if let Err(e) = sink.close() {
        tracing::error!(error = %e, path = %path.display(), "failed to finalize output");
    } else {
        tracing::info!(frames = appended, path = %path.display(), "output finalized");
    }
}
