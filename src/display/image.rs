/*
 *  display/image.rs
 *
 *  pagerctl - pager hardware control
 *  (c) 2020-26 Stuart Hunter
 *
 *  Image loading and blitting (PNG, JPEG, BMP, GIF)
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

use std::path::Path;

use log::debug;

use crate::color::{rgb, Color};
use crate::display::surface::Surface;
use crate::error::Result;

/// Decoded image in panel-ready RGB565.
#[derive(Debug, Clone)]
pub struct PagerImage {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl PagerImage {
    /// Decode an image file, flattening any alpha against black.
    pub fn load(path: &Path) -> Result<Self> {
        let rgb_img = image::open(path)?.into_rgb8();
        let (width, height) = rgb_img.dimensions();
        let pixels = rgb_img
            .pixels()
            .map(|p| rgb(p.0[0], p.0[1], p.0[2]))
            .collect();
        debug!("Image loaded: {} ({}x{})", path.display(), width, height);
        Ok(Self { width, height, pixels })
    }

    /// Build an image from raw RGB565 pixels (tests and procedural art).
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Color>) -> Self {
        assert_eq!(pixels.len(), (width * height) as usize);
        Self { width, height, pixels }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn pixel(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }
}

/// Blit an image at (x, y). Off-screen parts are clipped.
pub fn draw_image(surface: &mut Surface, x: i32, y: i32, img: &PagerImage) {
    for iy in 0..img.height {
        for ix in 0..img.width {
            surface.set_pixel(x + ix as i32, y + iy as i32, img.pixel(ix, iy));
        }
    }
}

/// Blit an image scaled to `dst_w` x `dst_h` with nearest-neighbor sampling.
pub fn draw_image_scaled(
    surface: &mut Surface,
    x: i32,
    y: i32,
    dst_w: i32,
    dst_h: i32,
    img: &PagerImage,
) {
    if dst_w <= 0 || dst_h <= 0 {
        return;
    }
    for dy in 0..dst_h {
        let src_y = (dy as u32 * img.height) / dst_h as u32;
        for dx in 0..dst_w {
            let src_x = (dx as u32 * img.width) / dst_w as u32;
            surface.set_pixel(x + dx, y + dy, img.pixel(src_x, src_y));
        }
    }
}

/// Load and draw in one call.
pub fn draw_image_file(surface: &mut Surface, x: i32, y: i32, path: &Path) -> Result<()> {
    let img = PagerImage::load(path)?;
    draw_image(surface, x, y, &img);
    Ok(())
}

/// Load and draw scaled in one call.
pub fn draw_image_file_scaled(
    surface: &mut Surface,
    x: i32,
    y: i32,
    dst_w: i32,
    dst_h: i32,
    path: &Path,
) -> Result<()> {
    let img = PagerImage::load(path)?;
    draw_image_scaled(surface, x, y, dst_w, dst_h, &img);
    Ok(())
}

/// Image dimensions without decoding pixel data.
pub fn image_info(path: &Path) -> Result<(u32, u32)> {
    Ok(image::image_dimensions(path)?)
}
