// capture/xcap.rs - xcap-backed screen grabber
//
// Snapshots go through the monitor containing the region origin. Region
// coordinates are translated into that monitor's space before cropping.

use anyhow::{anyhow, Context};
use image::imageops;
use xcap::Monitor;

use super::{CaptureRect, FrameBuffer, ScreenGrabber};

/// Full bounds of the primary display, used as the initial capture region.
pub fn primary_display_rect() -> anyhow::Result<CaptureRect> {
    let monitors = Monitor::all().context("failed to enumerate displays")?;
    let monitor = monitors
        .iter()
        .find(|monitor| monitor.is_primary())
        .or_else(|| monitors.first())
        .ok_or_else(|| anyhow!("no displays found"))?;
    Ok(CaptureRect::new(
        monitor.x(),
        monitor.y(),
        monitor.width(),
        monitor.height(),
    ))
}

pub struct XcapGrabber;

impl XcapGrabber {
    pub fn new() -> Self {
        Self
    }
}

impl Default for XcapGrabber {
    fn default() -> Self {
        Self::new()
    }
}

impl ScreenGrabber for XcapGrabber {
    fn grab(&self, region: CaptureRect) -> anyhow::Result<FrameBuffer> {
        let monitor = Monitor::from_point(region.x, region.y)
            .with_context(|| format!("no monitor contains point ({}, {})", region.x, region.y))?;

        let shot = monitor
            .capture_image()
            .with_context(|| format!("screen capture failed on monitor {}", monitor.name()))?;

        // Translate into monitor-local coordinates and clamp to the image.
        let rel_x = (region.x - monitor.x()).max(0) as u32;
        let rel_y = (region.y - monitor.y()).max(0) as u32;
        if rel_x >= shot.width() || rel_y >= shot.height() {
            return Err(anyhow!(
                "capture region {} lies outside monitor {}",
                region,
                monitor.name()
            ));
        }
        let width = region.width.min(shot.width() - rel_x);
        let height = region.height.min(shot.height() - rel_y);

        let cropped = imageops::crop_imm(&shot, rel_x, rel_y, width, height).to_image();
        let (width, height) = cropped.dimensions();
        Ok(FrameBuffer {
            data: cropped.into_raw(),
            width,
            height,
            stride: width * 4,
        })
    }
}
