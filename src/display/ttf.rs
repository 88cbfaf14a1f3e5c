/*
 *  display/ttf.rs
 *
 *  pagerctl - pager hardware control
 *  (c) 2020-26 Stuart Hunter
 *
 *  TrueType text rendering with a single-slot font cache
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

use std::path::{Path, PathBuf};

use ab_glyph::{Font, FontVec, PxScale, ScaleFont};
use log::debug;

use crate::color::Color;
use crate::display::surface::Surface;
use crate::error::{PagerError, Result};

/// Coverage below this is treated as background. Keeps anti-aliasing fringe
/// off the panel, which dithers badly in RGB565.
const ALPHA_THRESHOLD: f32 = 0.125;

/// TrueType renderer. Holds the most recently used font; screens in
/// practice use one font at a time, so a single slot covers the common
/// case without an eviction policy.
#[derive(Default)]
pub struct TtfRenderer {
    cached: Option<CachedFont>,
}

struct CachedFont {
    path: PathBuf,
    font: FontVec,
}

impl TtfRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    fn font_for(&mut self, path: &Path) -> Result<&FontVec> {
        let hit = self.cached.as_ref().is_some_and(|c| c.path == path);
        if !hit {
            let data = std::fs::read(path)
                .map_err(|_| PagerError::FontNotFound(path.to_path_buf()))?;
            let font = FontVec::try_from_vec(data)
                .map_err(|_| PagerError::FontInvalid(path.to_path_buf()))?;
            debug!("TTF cache load: {}", path.display());
            self.cached = Some(CachedFont {
                path: path.to_path_buf(),
                font,
            });
        }
        Ok(&self.cached.as_ref().unwrap().font)
    }

    /// Draw text with its glyph box top-left at (x, y). `size` is the pixel
    /// height of the font (ascent to descent). Returns the advance width.
    pub fn draw_ttf(
        &mut self,
        surface: &mut Surface,
        x: i32,
        y: i32,
        text: &str,
        color: Color,
        font_path: &Path,
        size: f32,
    ) -> Result<i32> {
        let font = self.font_for(font_path)?;
        let scaled = font.as_scaled(PxScale::from(size));
        let baseline = y as f32 + scaled.ascent();

        let mut cursor = 0i32;
        let mut chars = text.chars().peekable();
        while let Some(ch) = chars.next() {
            let gid = scaled.glyph_id(ch);
            let glyph = gid.with_scale_and_position(
                PxScale::from(size),
                ab_glyph::point((x + cursor) as f32, baseline),
            );

            if let Some(outlined) = scaled.outline_glyph(glyph) {
                let bounds = outlined.px_bounds();
                outlined.draw(|gx, gy, coverage| {
                    if coverage > ALPHA_THRESHOLD {
                        surface.set_pixel(
                            bounds.min.x as i32 + gx as i32,
                            bounds.min.y as i32 + gy as i32,
                            color,
                        );
                    }
                });
            }

            cursor += scaled.h_advance(gid) as i32;
            if let Some(&next) = chars.peek() {
                cursor += scaled.kern(gid, scaled.glyph_id(next)) as i32;
            }
        }

        Ok(cursor)
    }

    /// Advance width of `text` without drawing.
    pub fn ttf_width(&mut self, text: &str, font_path: &Path, size: f32) -> Result<i32> {
        let font = self.font_for(font_path)?;
        let scaled = font.as_scaled(PxScale::from(size));

        let mut width = 0i32;
        let mut chars = text.chars().peekable();
        while let Some(ch) = chars.next() {
            let gid = scaled.glyph_id(ch);
            width += scaled.h_advance(gid) as i32;
            if let Some(&next) = chars.peek() {
                width += scaled.kern(gid, scaled.glyph_id(next)) as i32;
            }
        }
        Ok(width)
    }

    /// Ascent-to-descent pixel height of the font at `size`.
    pub fn ttf_height(&mut self, font_path: &Path, size: f32) -> Result<i32> {
        let font = self.font_for(font_path)?;
        let scaled = font.as_scaled(PxScale::from(size));
        Ok((scaled.ascent() - scaled.descent()) as i32)
    }

    /// Draw text horizontally centered in the logical width.
    pub fn draw_ttf_centered(
        &mut self,
        surface: &mut Surface,
        y: i32,
        text: &str,
        color: Color,
        font_path: &Path,
        size: f32,
    ) -> Result<()> {
        let width = self.ttf_width(text, font_path, size)?;
        if width > 0 {
            let x = (surface.width() as i32 - width) / 2;
            self.draw_ttf(surface, x, y, text, color, font_path, size)?;
        }
        Ok(())
    }

    /// Draw text right-aligned with `padding` pixels from the edge.
    pub fn draw_ttf_right(
        &mut self,
        surface: &mut Surface,
        y: i32,
        text: &str,
        color: Color,
        font_path: &Path,
        size: f32,
        padding: i32,
    ) -> Result<()> {
        let width = self.ttf_width(text, font_path, size)?;
        if width > 0 {
            let x = surface.width() as i32 - width - padding;
            self.draw_ttf(surface, x, y, text, color, font_path, size)?;
        }
        Ok(())
    }
}
