/*
 *  color.rs
 *
 *  pagerctl - pager hardware control
 *  (c) 2020-26 Stuart Hunter
 *
 *  RGB565 color constants and constructors for the pager panel
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

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;

/// The pager panel is 16-bit RGB565; every drawing call takes this type.
pub type Color = Rgb565;

/// Build a panel color from 8-bit RGB components.
///
/// Truncates to 5/6/5 bits the same way the panel hardware does, so
/// `rgb(255, 255, 255)` is full white and `rgb(7, 3, 7)` rounds to black.
pub const fn rgb(r: u8, g: u8, b: u8) -> Color {
    Rgb565::new(r >> 3, g >> 2, b >> 3)
}

/// Build a panel color from a packed `0xRRGGBB` value.
pub const fn rgb_from_hex(color: u32) -> Color {
    rgb(
        ((color >> 16) & 0xFF) as u8,
        ((color >> 8) & 0xFF) as u8,
        (color & 0xFF) as u8,
    )
}

pub const BLACK: Color = Rgb565::BLACK;
pub const WHITE: Color = Rgb565::WHITE;
pub const RED: Color = Rgb565::RED;
pub const GREEN: Color = Rgb565::GREEN;
pub const BLUE: Color = Rgb565::BLUE;
pub const YELLOW: Color = Rgb565::YELLOW;
pub const CYAN: Color = Rgb565::CYAN;
pub const MAGENTA: Color = Rgb565::MAGENTA;
pub const ORANGE: Color = rgb(255, 165, 0);
pub const PURPLE: Color = rgb(128, 0, 128);
pub const GRAY: Color = rgb(128, 128, 128);
pub const DARK_GRAY: Color = rgb(64, 64, 64);
pub const LIGHT_GRAY: Color = rgb(192, 192, 192);
