/*
 *  display/device.rs
 *
 *  pagerctl - pager hardware control
 *  (c) 2020-26 Stuart Hunter
 *
 *  Framebuffer device access: /dev/fb0 mapping plus a memory sink for tests
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use std::fs::OpenOptions;
use std::path::Path;

use embedded_graphics::prelude::*;
use log::{debug, info, warn};
use memmap2::{MmapMut, MmapOptions};

use crate::color::Color;
use crate::display::surface::{FB_HEIGHT, FB_WIDTH};
use crate::error::{PagerError, Result};

/// Bytes per full RGB565 frame.
pub const FRAME_BYTES: usize = FB_WIDTH * FB_HEIGHT * 2;

/// Sink for completed frames. The hardware path maps the framebuffer
/// device; tests swap in [`MemoryPanel`].
pub trait PanelDevice: Send {
    /// Copy a full panel-order frame out to the device.
    fn present(&mut self, pixels: &[Color]) -> Result<()>;
}

/// Memory-mapped `/dev/fb0`.
#[derive(Debug)]
pub struct FbDevice {
    map: MmapMut,
}

impl FbDevice {
    /// Open and map the framebuffer device.
    ///
    /// The panel geometry is fixed at 222x480 RGB565; if the kernel reports
    /// something else via sysfs we warn and carry on, same as a resolution
    /// mismatch is survivable for a status display.
    pub fn open(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| PagerError::Framebuffer {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        Self::check_geometry(path);

        // SAFETY: the mapping is private to this struct and the fbdev
        // region is at least one full frame on this hardware.
        let map = unsafe { MmapOptions::new().len(FRAME_BYTES).map_mut(&file) }.map_err(|e| {
            PagerError::Framebuffer {
                path: path.to_path_buf(),
                reason: format!("mmap failed: {}", e),
            }
        })?;

        info!("Framebuffer mapped: {} ({} bytes)", path.display(), FRAME_BYTES);
        Ok(Self { map })
    }

    /// Compare the kernel-reported geometry against the expected panel.
    /// Mismatch is a warning, not an error.
    fn check_geometry(path: &Path) {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return;
        };
        let sysfs = format!("/sys/class/graphics/{}/virtual_size", name);
        match std::fs::read_to_string(&sysfs) {
            Ok(s) => {
                let dims: Vec<u32> = s.trim().split(',').filter_map(|v| v.parse().ok()).collect();
                if let [xres, yres] = dims[..] {
                    if xres != FB_WIDTH as u32 || yres != FB_HEIGHT as u32 {
                        warn!(
                            "Expected {}x{} framebuffer, kernel reports {}x{}",
                            FB_WIDTH, FB_HEIGHT, xres, yres
                        );
                    }
                }
            }
            Err(e) => debug!("No geometry info at {}: {}", sysfs, e),
        }
    }
}

impl PanelDevice for FbDevice {
    fn present(&mut self, pixels: &[Color]) -> Result<()> {
        debug_assert_eq!(pixels.len(), FB_WIDTH * FB_HEIGHT);
        for (out, px) in self.map.chunks_exact_mut(2).zip(pixels) {
            out.copy_from_slice(&px.into_storage().to_le_bytes());
        }
        Ok(())
    }
}

/// In-memory panel for tests and headless use. Records the last frame and
/// how many flips happened.
#[derive(Debug, Default)]
pub struct MemoryPanel {
    pub last_frame: Vec<Color>,
    pub flips: usize,
}

impl MemoryPanel {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PanelDevice for MemoryPanel {
    fn present(&mut self, pixels: &[Color]) -> Result<()> {
        self.last_frame.clear();
        self.last_frame.extend_from_slice(pixels);
        self.flips += 1;
        Ok(())
    }
}
