/*
 *  display/surface.rs
 *
 *  pagerctl - pager hardware control
 *  (c) 2020-26 Stuart Hunter
 *
 *  Rotated RGB565 back buffer for the 222x480 panel
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

use core::convert::Infallible;
use embedded_graphics::geometry::{OriginDimensions, Size};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::color::Color;
use crate::error::{PagerError, Result};

/// Physical panel width in pixels (portrait).
pub const FB_WIDTH: usize = 222;
/// Physical panel height in pixels (portrait).
pub const FB_HEIGHT: usize = 480;

/// Display orientation. All drawing is expressed in logical coordinates
/// and rotated into panel coordinates on the way into the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    /// Portrait (default): 222x480.
    #[default]
    Rot0,
    /// Landscape: 480x222, 90 degrees clockwise.
    Rot90,
    /// Portrait inverted.
    Rot180,
    /// Landscape inverted: 480x222.
    Rot270,
}

impl Rotation {
    pub fn from_degrees(degrees: u16) -> Result<Self> {
        match degrees {
            0 => Ok(Rotation::Rot0),
            90 => Ok(Rotation::Rot90),
            180 => Ok(Rotation::Rot180),
            270 => Ok(Rotation::Rot270),
            other => Err(PagerError::InvalidRotation(other)),
        }
    }

    pub fn degrees(self) -> u16 {
        match self {
            Rotation::Rot0 => 0,
            Rotation::Rot90 => 90,
            Rotation::Rot180 => 180,
            Rotation::Rot270 => 270,
        }
    }

    fn swaps_axes(self) -> bool {
        matches!(self, Rotation::Rot90 | Rotation::Rot270)
    }
}

/// Back buffer for the pager panel.
///
/// Pixels live in physical (portrait) order so a flip is a straight copy to
/// the framebuffer device; the rotation transform is applied per write.
/// Out-of-bounds writes are clipped, never an error.
#[derive(Debug, Clone)]
pub struct Surface {
    buf: Vec<Color>,
    rotation: Rotation,
}

impl Surface {
    pub fn new(rotation: Rotation) -> Self {
        Self {
            buf: vec![Color::BLACK; FB_WIDTH * FB_HEIGHT],
            rotation,
        }
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: Rotation) {
        self.rotation = rotation;
    }

    /// Logical width (depends on rotation).
    pub fn width(&self) -> u32 {
        if self.rotation.swaps_axes() { FB_HEIGHT as u32 } else { FB_WIDTH as u32 }
    }

    /// Logical height (depends on rotation).
    pub fn height(&self) -> u32 {
        if self.rotation.swaps_axes() { FB_WIDTH as u32 } else { FB_HEIGHT as u32 }
    }

    /// Immutable raw access in panel order (for the device flip).
    pub fn as_slice(&self) -> &[Color] {
        &self.buf
    }

    /// Clear to a color.
    pub fn clear_color(&mut self, color: Color) {
        self.buf.fill(color);
    }

    /// Transform logical coordinates to panel coordinates.
    #[inline]
    fn transform(&self, lx: i32, ly: i32) -> (i32, i32) {
        match self.rotation {
            Rotation::Rot0 => (lx, ly),
            Rotation::Rot90 => (ly, FB_HEIGHT as i32 - 1 - lx),
            Rotation::Rot180 => (FB_WIDTH as i32 - 1 - lx, FB_HEIGHT as i32 - 1 - ly),
            Rotation::Rot270 => (FB_WIDTH as i32 - 1 - ly, lx),
        }
    }

    /// Map panel (x,y) to linear index; returns None if out of bounds.
    #[inline]
    fn idx(px: i32, py: i32) -> Option<usize> {
        if px >= 0 && py >= 0 {
            let (x, y) = (px as usize, py as usize);
            if x < FB_WIDTH && y < FB_HEIGHT {
                return Some(y * FB_WIDTH + x);
            }
        }
        None
    }

    /// Set a single pixel in logical coordinates. Clipped, infallible.
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if x < 0 || x >= self.width() as i32 || y < 0 || y >= self.height() as i32 {
            return;
        }
        let (px, py) = self.transform(x, y);
        if let Some(i) = Self::idx(px, py) {
            self.buf[i] = color;
        }
    }

    /// Read a pixel back in logical coordinates (test and image helpers).
    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        if x < 0 || x >= self.width() as i32 || y < 0 || y >= self.height() as i32 {
            return None;
        }
        let (px, py) = self.transform(x, y);
        Self::idx(px, py).map(|i| self.buf[i])
    }
}

impl OriginDimensions for Surface {
    fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }
}

impl DrawTarget for Surface {
    type Color = Color;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> core::result::Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(p, c) in pixels {
            self.set_pixel(p.x, p.y, c);
        }
        Ok(())
    }

    fn fill_solid(
        &mut self,
        area: &Rectangle,
        color: Self::Color,
    ) -> core::result::Result<(), Self::Error> {
        // fast row fill when the buffer is not rotated
        if self.rotation == Rotation::Rot0 {
            let clipped = area.intersection(&self.bounding_box());
            let Size { width, height } = clipped.size;
            if width == 0 || height == 0 {
                return Ok(());
            }
            let x0 = clipped.top_left.x as usize;
            let y0 = clipped.top_left.y as usize;
            for row in 0..height as usize {
                let base = (y0 + row) * FB_WIDTH + x0;
                self.buf[base..base + width as usize].fill(color);
            }
            return Ok(());
        }
        // rotated: go through the transform pixel by pixel
        for y in area.rows() {
            for x in area.columns() {
                self.set_pixel(x, y, color);
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> core::result::Result<(), Self::Error> {
        self.clear_color(color);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logical_dimensions_follow_rotation() {
        let s = Surface::new(Rotation::Rot0);
        assert_eq!((s.width(), s.height()), (222, 480));
        let s = Surface::new(Rotation::Rot270);
        assert_eq!((s.width(), s.height()), (480, 222));
    }

    #[test]
    fn rot0_is_identity() {
        let mut s = Surface::new(Rotation::Rot0);
        s.set_pixel(3, 5, crate::color::RED);
        assert_eq!(s.as_slice()[5 * FB_WIDTH + 3], crate::color::RED);
    }

    #[test]
    fn rot90_maps_origin_to_bottom_left() {
        let mut s = Surface::new(Rotation::Rot90);
        // logical (0,0) -> panel (0, 479)
        s.set_pixel(0, 0, crate::color::GREEN);
        assert_eq!(s.as_slice()[479 * FB_WIDTH], crate::color::GREEN);
    }

    #[test]
    fn rot270_maps_origin_to_top_right() {
        let mut s = Surface::new(Rotation::Rot270);
        // logical (0,0) -> panel (221, 0)
        s.set_pixel(0, 0, crate::color::BLUE);
        assert_eq!(s.as_slice()[221], crate::color::BLUE);
    }

    #[test]
    fn rot180_maps_origin_to_far_corner() {
        let mut s = Surface::new(Rotation::Rot180);
        s.set_pixel(0, 0, crate::color::WHITE);
        assert_eq!(s.as_slice()[FB_WIDTH * FB_HEIGHT - 1], crate::color::WHITE);
    }

    #[test]
    fn out_of_bounds_is_clipped() {
        let mut s = Surface::new(Rotation::Rot0);
        s.set_pixel(-1, 0, crate::color::RED);
        s.set_pixel(0, -1, crate::color::RED);
        s.set_pixel(222, 0, crate::color::RED);
        s.set_pixel(0, 480, crate::color::RED);
        assert!(s.as_slice().iter().all(|&c| c == Color::BLACK));
    }

    #[test]
    fn fill_solid_fast_path_matches_clip() {
        let mut s = Surface::new(Rotation::Rot0);
        // straddles the right edge; only the in-bounds part lands
        s.fill_solid(
            &Rectangle::new(Point::new(220, 0), Size::new(10, 2)),
            crate::color::CYAN,
        )
        .unwrap();
        assert_eq!(s.pixel(220, 0), Some(crate::color::CYAN));
        assert_eq!(s.pixel(221, 1), Some(crate::color::CYAN));
        assert_eq!(s.pixel(219, 0), Some(Color::BLACK));
    }

    #[test]
    fn round_trip_readback_under_rotation() {
        for rot in [Rotation::Rot0, Rotation::Rot90, Rotation::Rot180, Rotation::Rot270] {
            let mut s = Surface::new(rot);
            s.set_pixel(17, 13, crate::color::MAGENTA);
            assert_eq!(s.pixel(17, 13), Some(crate::color::MAGENTA), "rotation {:?}", rot);
        }
    }
}
