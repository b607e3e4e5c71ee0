// encoder/gif.rs - GIF encoder sink
//
// Streams frames through the image crate's GIF encoder. The loop count is
// written into the stream header before the first frame.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{bail, Context};
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, RgbaImage};

use super::{EncoderOptions, EncoderSink};
use crate::capture::FrameBuffer;

pub struct GifSink {
    encoder: Option<GifEncoder<BufWriter<File>>>,
    delay: Delay,
}

impl GifSink {
    pub fn create(path: &Path, options: EncoderOptions) -> anyhow::Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("failed to create output file {}", path.display()))?;
        let mut encoder = GifEncoder::new(BufWriter::new(file));

        let repeat = if options.loop_count == 0 {
            Repeat::Infinite
        } else {
            Repeat::Finite(options.loop_count)
        };
        encoder
            .set_repeat(repeat)
            .context("failed to set GIF loop count")?;

        Ok(Self {
            encoder: Some(encoder),
            delay: Delay::from_numer_denom_ms(1000, options.fps.max(1)),
        })
    }
}

impl EncoderSink for GifSink {
    fn append(&mut self, frame: &FrameBuffer) -> anyhow::Result<()> {
        let Some(encoder) = self.encoder.as_mut() else {
            bail!("append on a closed GIF sink");
        };
        let image = RgbaImage::from_raw(frame.width, frame.height, frame.packed_rgba().into_owned())
            .context("frame buffer does not match its dimensions")?;
        encoder
            .encode_frame(Frame::from_parts(image, 0, 0, self.delay))
            .context("failed to encode GIF frame")
    }

    fn close(&mut self) -> anyhow::Result<()> {
        // Dropping the encoder flushes and finalizes the stream.
        self.encoder.take();
        Ok(())
    }
}
