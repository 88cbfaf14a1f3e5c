/*
 *  display/mod.rs
 *
 *  pagerctl - pager hardware control
 *  (c) 2020-26 Stuart Hunter
 *
 *  Display facade: back buffer, drawing primitives, text, images, flip
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

pub mod device;
pub mod font5x7;
pub mod image;
pub mod surface;
pub mod ttf;

use std::path::Path;

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, Line, PrimitiveStyle, Rectangle};

use crate::color::Color;
use crate::error::Result;
use device::{FbDevice, PanelDevice};
use font5x7::FontSize;
use image::PagerImage;
use surface::{Rotation, Surface};
use ttf::TtfRenderer;

/// The pager panel: a rotated back buffer plus the device it flips to.
///
/// Drawing goes to the buffer only; nothing reaches the glass until
/// [`Display::flip`].
pub struct Display {
    surface: Surface,
    device: Box<dyn PanelDevice>,
    ttf: TtfRenderer,
}

impl Display {
    /// Open the framebuffer device and start with a black screen.
    pub fn open(fb_path: &Path, rotation: Rotation) -> Result<Self> {
        Ok(Self::with_device(Box::new(FbDevice::open(fb_path)?), rotation))
    }

    /// Build a display over any frame sink (tests use a memory panel).
    pub fn with_device(device: Box<dyn PanelDevice>, rotation: Rotation) -> Self {
        Self {
            surface: Surface::new(rotation),
            device,
            ttf: TtfRenderer::new(),
        }
    }

    /// Logical width in pixels for the current rotation.
    pub fn width(&self) -> u32 {
        self.surface.width()
    }

    /// Logical height in pixels for the current rotation.
    pub fn height(&self) -> u32 {
        self.surface.height()
    }

    pub fn rotation(&self) -> Rotation {
        self.surface.rotation()
    }

    /// Change orientation. Buffer contents are not remapped; callers
    /// redraw the next frame anyway.
    pub fn set_rotation(&mut self, rotation: Rotation) {
        self.surface.set_rotation(rotation);
    }

    /// Direct access to the back buffer as a `DrawTarget` for callers
    /// that want the full embedded-graphics toolbox.
    pub fn surface_mut(&mut self) -> &mut Surface {
        &mut self.surface
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Push the back buffer to the panel.
    pub fn flip(&mut self) -> Result<()> {
        self.device.present(self.surface.as_slice())
    }

    pub fn clear(&mut self, color: Color) {
        self.surface.clear_color(color);
    }

    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        self.surface.set_pixel(x, y, color);
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Color) {
        let _ = Rectangle::new(Point::new(x, y), Size::new(w, h))
            .into_styled(PrimitiveStyle::with_fill(color))
            .draw(&mut self.surface);
    }

    pub fn draw_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Color) {
        let _ = Rectangle::new(Point::new(x, y), Size::new(w, h))
            .into_styled(PrimitiveStyle::with_stroke(color, 1))
            .draw(&mut self.surface);
    }

    pub fn hline(&mut self, x: i32, y: i32, w: u32, color: Color) {
        self.fill_rect(x, y, w, 1, color);
    }

    pub fn vline(&mut self, x: i32, y: i32, h: u32, color: Color) {
        self.fill_rect(x, y, 1, h, color);
    }

    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        let _ = Line::new(Point::new(x0, y0), Point::new(x1, y1))
            .into_styled(PrimitiveStyle::with_stroke(color, 1))
            .draw(&mut self.surface);
    }

    pub fn draw_circle(&mut self, cx: i32, cy: i32, r: u32, color: Color) {
        let _ = Circle::with_center(Point::new(cx, cy), 2 * r + 1)
            .into_styled(PrimitiveStyle::with_stroke(color, 1))
            .draw(&mut self.surface);
    }

    pub fn fill_circle(&mut self, cx: i32, cy: i32, r: u32, color: Color) {
        let _ = Circle::with_center(Point::new(cx, cy), 2 * r + 1)
            .into_styled(PrimitiveStyle::with_fill(color))
            .draw(&mut self.surface);
    }

    // Built-in bitmap font.

    pub fn draw_char(&mut self, x: i32, y: i32, c: char, color: Color, size: FontSize) -> i32 {
        font5x7::draw_char(&mut self.surface, x, y, c, color, size)
    }

    pub fn draw_text(&mut self, x: i32, y: i32, text: &str, color: Color, size: FontSize) -> i32 {
        font5x7::draw_text(&mut self.surface, x, y, text, color, size)
    }

    pub fn draw_text_centered(&mut self, y: i32, text: &str, color: Color, size: FontSize) {
        font5x7::draw_text_centered(&mut self.surface, y, text, color, size);
    }

    pub fn text_width(&self, text: &str, size: FontSize) -> i32 {
        font5x7::text_width(text, size)
    }

    pub fn draw_number(&mut self, x: i32, y: i32, num: i64, color: Color, size: FontSize) -> i32 {
        font5x7::draw_number(&mut self.surface, x, y, num, color, size)
    }

    // TrueType text.

    pub fn draw_ttf(
        &mut self,
        x: i32,
        y: i32,
        text: &str,
        color: Color,
        font_path: &Path,
        size: f32,
    ) -> Result<i32> {
        self.ttf.draw_ttf(&mut self.surface, x, y, text, color, font_path, size)
    }

    pub fn ttf_width(&mut self, text: &str, font_path: &Path, size: f32) -> Result<i32> {
        self.ttf.ttf_width(text, font_path, size)
    }

    pub fn ttf_height(&mut self, font_path: &Path, size: f32) -> Result<i32> {
        self.ttf.ttf_height(font_path, size)
    }

    pub fn draw_ttf_centered(
        &mut self,
        y: i32,
        text: &str,
        color: Color,
        font_path: &Path,
        size: f32,
    ) -> Result<()> {
        self.ttf.draw_ttf_centered(&mut self.surface, y, text, color, font_path, size)
    }

    pub fn draw_ttf_right(
        &mut self,
        y: i32,
        text: &str,
        color: Color,
        font_path: &Path,
        size: f32,
        padding: i32,
    ) -> Result<()> {
        self.ttf.draw_ttf_right(&mut self.surface, y, text, color, font_path, size, padding)
    }

    // Images.

    pub fn draw_image(&mut self, x: i32, y: i32, img: &PagerImage) {
        image::draw_image(&mut self.surface, x, y, img);
    }

    pub fn draw_image_scaled(&mut self, x: i32, y: i32, w: i32, h: i32, img: &PagerImage) {
        image::draw_image_scaled(&mut self.surface, x, y, w, h, img);
    }

    pub fn draw_image_file(&mut self, x: i32, y: i32, path: &Path) -> Result<()> {
        image::draw_image_file(&mut self.surface, x, y, path)
    }

    pub fn draw_image_file_scaled(
        &mut self,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        path: &Path,
    ) -> Result<()> {
        image::draw_image_file_scaled(&mut self.surface, x, y, w, h, path)
    }
}

#[cfg(test)]
mod tests {
    use super::device::MemoryPanel;
    use super::surface::{FB_HEIGHT, FB_WIDTH};
    use super::*;

    fn memory_display() -> Display {
        Display::with_device(Box::new(MemoryPanel::new()), Rotation::Rot0)
    }

    #[test]
    fn flip_pushes_back_buffer() {
        let mut d = memory_display();
        d.clear(crate::color::BLUE);
        d.flip().unwrap();
        // readback through a fresh surface is not possible; draw again and
        // verify the buffer itself
        assert!(d.surface().as_slice().iter().all(|&c| c == crate::color::BLUE));
    }

    #[test]
    fn fill_rect_covers_inclusive_extent() {
        let mut d = memory_display();
        d.fill_rect(5, 5, 3, 2, crate::color::RED);
        assert_eq!(d.surface().pixel(5, 5), Some(crate::color::RED));
        assert_eq!(d.surface().pixel(7, 6), Some(crate::color::RED));
        assert_eq!(d.surface().pixel(8, 6), Some(crate::color::BLACK));
        assert_eq!(d.surface().pixel(7, 7), Some(crate::color::BLACK));
    }

    #[test]
    fn draw_rect_outline_only() {
        let mut d = memory_display();
        d.draw_rect(10, 10, 5, 5, crate::color::GREEN);
        assert_eq!(d.surface().pixel(10, 10), Some(crate::color::GREEN));
        assert_eq!(d.surface().pixel(14, 14), Some(crate::color::GREEN));
        assert_eq!(d.surface().pixel(12, 12), Some(crate::color::BLACK));
    }

    #[test]
    fn lines_land_where_asked() {
        let mut d = memory_display();
        d.hline(0, 3, 10, crate::color::WHITE);
        d.vline(3, 0, 10, crate::color::CYAN);
        assert_eq!(d.surface().pixel(9, 3), Some(crate::color::WHITE));
        assert_eq!(d.surface().pixel(10, 3), Some(crate::color::BLACK));
        assert_eq!(d.surface().pixel(3, 9), Some(crate::color::CYAN));
        d.draw_line(0, 0, 5, 5, crate::color::YELLOW);
        assert_eq!(d.surface().pixel(2, 2), Some(crate::color::YELLOW));
        assert_eq!(d.surface().pixel(5, 5), Some(crate::color::YELLOW));
    }

    #[test]
    fn circles_are_centered() {
        let mut d = memory_display();
        d.fill_circle(50, 50, 4, crate::color::MAGENTA);
        assert_eq!(d.surface().pixel(50, 50), Some(crate::color::MAGENTA));
        assert_eq!(d.surface().pixel(54, 50), Some(crate::color::MAGENTA));
        assert_eq!(d.surface().pixel(56, 50), Some(crate::color::BLACK));
    }

    #[test]
    fn rotation_changes_logical_size() {
        let mut d = memory_display();
        assert_eq!((d.width(), d.height()), (FB_WIDTH as u32, FB_HEIGHT as u32));
        d.set_rotation(Rotation::Rot90);
        assert_eq!((d.width(), d.height()), (FB_HEIGHT as u32, FB_WIDTH as u32));
    }
}
