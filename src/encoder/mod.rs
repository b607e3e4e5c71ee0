// encoder/mod.rs - Encoder Sink Boundary
//
// Container/codec internals are external capabilities. This module defines
// the format set, the `EncoderSink` trait, and the factory that picks the
// GIF or ffmpeg adapter for a given format.

pub mod ffmpeg;
pub mod gif;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::capture::FrameBuffer;

/// Supported output containers, in hotkey cycling order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Gif,
    Mp4,
    Avi,
    Wmv,
}

/// Direction for cycling through the format set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleDirection {
    Forward,
    Backward,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 4] = [
        OutputFormat::Gif,
        OutputFormat::Mp4,
        OutputFormat::Avi,
        OutputFormat::Wmv,
    ];

    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Gif => "gif",
            OutputFormat::Mp4 => "mp4",
            OutputFormat::Avi => "avi",
            OutputFormat::Wmv => "wmv",
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|format| format.extension().eq_ignore_ascii_case(ext))
    }

    /// Infer the format from a file extension, if supported.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Neighbor in the fixed ordered set, wrapping at both ends.
    pub fn cycled(self, direction: CycleDirection) -> Self {
        let len = Self::ALL.len();
        let index = Self::ALL
            .iter()
            .position(|format| *format == self)
            .unwrap_or(0);
        let next = match direction {
            CycleDirection::Forward => (index + 1) % len,
            CycleDirection::Backward => (index + len - 1) % len,
        };
        Self::ALL[next]
    }

    /// Whether the container supports looped playback.
    pub fn is_looping(self) -> bool {
        matches!(self, OutputFormat::Gif)
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// Options handed to a sink when it opens.
#[derive(Debug, Clone, Copy)]
pub struct EncoderOptions {
    pub fps: u32,
    /// Loop count for looping formats (0 = infinite)
    pub loop_count: u16,
}

/// Trait for the external encoder capability.
///
/// A sink is opened per session, appended to once per consumed frame, and
/// closed exactly once to flush and finalize the container.
pub trait EncoderSink: Send {
    fn append(&mut self, frame: &FrameBuffer) -> anyhow::Result<()>;
    fn close(&mut self) -> anyhow::Result<()>;
}

/// Opens encoder sinks; injected into the session controller so tests can
/// substitute a recording mock.
pub trait SinkFactory: Send + Sync {
    fn open(
        &self,
        path: &Path,
        format: OutputFormat,
        options: EncoderOptions,
    ) -> anyhow::Result<Box<dyn EncoderSink>>;
}

/// Production factory: GIF through the image encoder, everything else
/// through an ffmpeg child process.
pub struct DefaultSinkFactory;

impl SinkFactory for DefaultSinkFactory {
    fn open(
        &self,
        path: &Path,
        format: OutputFormat,
        options: EncoderOptions,
    ) -> anyhow::Result<Box<dyn EncoderSink>> {
        match format {
            OutputFormat::Gif => Ok(Box::new(gif::GifSink::create(path, options)?)),
            _ => Ok(Box::new(ffmpeg::FfmpegSink::create(path, format, options)?)),
        }
    }
}
