// encoder/ffmpeg.rs - ffmpeg encoder sink
//
// Video containers are produced by an ffmpeg child process fed raw RGBA
// frames on stdin. The process is spawned lazily on the first frame, which
// fixes the stream geometry; a rawvideo pipe cannot change size
// mid-stream, so frames captured after a region change that alters the
// dimensions are skipped.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};

use anyhow::{bail, Context};

use super::{EncoderOptions, EncoderSink, OutputFormat};
use crate::capture::FrameBuffer;

pub struct FfmpegSink {
    path: PathBuf,
    format: OutputFormat,
    fps: u32,
    process: Option<FfmpegProcess>,
    closed: bool,
}

struct FfmpegProcess {
    child: Child,
    stdin: Option<ChildStdin>,
    width: u32,
    height: u32,
}

impl FfmpegSink {
    pub fn create(path: &Path, format: OutputFormat, options: EncoderOptions) -> anyhow::Result<Self> {
        if format == OutputFormat::Gif {
            bail!("GIF output goes through the image encoder, not ffmpeg");
        }
        Ok(Self {
            path: path.to_path_buf(),
            format,
            fps: options.fps.max(1),
            process: None,
            closed: false,
        })
    }

    fn codec_args(format: OutputFormat) -> &'static [&'static str] {
        match format {
            OutputFormat::Mp4 => &[
                "-c:v",
                "libx264",
                "-pix_fmt",
                "yuv420p",
                "-movflags",
                "+faststart",
            ],
            OutputFormat::Avi => &["-c:v", "mpeg4", "-q:v", "5"],
            OutputFormat::Wmv => &["-c:v", "wmv2", "-q:v", "5"],
            // Rejected in create()
            OutputFormat::Gif => &[],
        }
    }

    fn spawn(&mut self, width: u32, height: u32) -> anyhow::Result<()> {
        let mut child = Command::new("ffmpeg")
            .arg("-hide_banner")
            .args(["-loglevel", "error"])
            .arg("-y")
            .args(["-f", "rawvideo"])
            .args(["-pix_fmt", "rgba"])
            .args(["-s", &format!("{}x{}", width, height)])
            .args(["-r", &self.fps.to_string()])
            .args(["-i", "-"])
            .args(Self::codec_args(self.format))
            .arg(&self.path)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .context("failed to launch ffmpeg (is it installed and on PATH?)")?;

        let stdin = child.stdin.take();
        tracing::debug!(width, height, fps = self.fps, "ffmpeg encoder started");
        self.process = Some(FfmpegProcess {
            child,
            stdin,
            width,
            height,
        });
        Ok(())
    }
}

impl EncoderSink for FfmpegSink {
    fn append(&mut self, frame: &FrameBuffer) -> anyhow::Result<()> {
        if self.closed {
            bail!("append on a closed ffmpeg sink");
        }
        if self.process.is_none() {
            self.spawn(frame.width, frame.height)?;
        }
        let Some(process) = self.process.as_mut() else {
            bail!("ffmpeg process unavailable");
        };

        if (frame.width, frame.height) != (process.width, process.height) {
            log::warn!(
                "skipping {}x{} frame, stream is {}x{}",
                frame.width,
                frame.height,
                process.width,
                process.height
            );
            return Ok(());
        }

        let Some(stdin) = process.stdin.as_mut() else {
            bail!("ffmpeg stdin already closed");
        };
        stdin
            .write_all(&frame.packed_rgba())
            .context("failed to stream frame to ffmpeg")
    }

    fn close(&mut self) -> anyhow::Result<()> {
        self.closed = true;
        match self.process.take() {
            Some(mut process) => {
                // EOF on stdin makes ffmpeg flush and finalize the container.
                drop(process.stdin.take());
                let status = process
                    .child
                    .wait()
                    .context("failed to wait for ffmpeg to exit")?;
                if !status.success() {
                    bail!("ffmpeg exited with {}", status);
                }
                Ok(())
            }
            None => {
                log::info!("no frames were captured; {} not written", self.path.display());
                Ok(())
            }
        }
    }
}
