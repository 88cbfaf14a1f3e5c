/*
 *  display/font5x7.rs
 *
 *  pagerctl - pager hardware control
 *  (c) 2020-26 Stuart Hunter
 *
 *  Built-in 5x7 bitmap font, ASCII 32-127, integer scaling
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

use crate::color::Color;
use crate::display::surface::Surface;

pub const FONT_WIDTH: i32 = 5;
pub const FONT_HEIGHT: i32 = 7;
const FONT_FIRST: u8 = 32;
const FONT_LAST: u8 = 127;

/// Integer scale factors for the built-in font.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontSize {
    #[default]
    Small = 1,
    Medium = 2,
    Large = 3,
}

impl FontSize {
    #[inline]
    pub fn scale(self) -> i32 {
        self as i32
    }

    /// Glyph cell height including the one-row line gap, in pixels.
    pub fn line_height(self) -> i32 {
        (FONT_HEIGHT + 1) * self.scale()
    }
}

/// Column-major glyph data, LSB at the top row.
static FONT_5X7: [[u8; 5]; 96] = [
    [0x00, 0x00, 0x00, 0x00, 0x00], // 32 (space)
    [0x00, 0x00, 0x5F, 0x00, 0x00], // 33 !
    [0x00, 0x07, 0x00, 0x07, 0x00], // 34 "
    [0x14, 0x7F, 0x14, 0x7F, 0x14], // 35 #
    [0x24, 0x2A, 0x7F, 0x2A, 0x12], // 36 $
    [0x23, 0x13, 0x08, 0x64, 0x62], // 37 %
    [0x36, 0x49, 0x55, 0x22, 0x50], // 38 &
    [0x00, 0x05, 0x03, 0x00, 0x00], // 39 '
    [0x00, 0x1C, 0x22, 0x41, 0x00], // 40 (
    [0x00, 0x41, 0x22, 0x1C, 0x00], // 41 )
    [0x08, 0x2A, 0x1C, 0x2A, 0x08], // 42 *
    [0x08, 0x08, 0x3E, 0x08, 0x08], // 43 +
    [0x00, 0x50, 0x30, 0x00, 0x00], // 44 ,
    [0x08, 0x08, 0x08, 0x08, 0x08], // 45 -
    [0x00, 0x60, 0x60, 0x00, 0x00], // 46 .
    [0x20, 0x10, 0x08, 0x04, 0x02], // 47 /
    [0x3E, 0x51, 0x49, 0x45, 0x3E], // 48 0
    [0x00, 0x42, 0x7F, 0x40, 0x00], // 49 1
    [0x42, 0x61, 0x51, 0x49, 0x46], // 50 2
    [0x21, 0x41, 0x45, 0x4B, 0x31], // 51 3
    [0x18, 0x14, 0x12, 0x7F, 0x10], // 52 4
    [0x27, 0x45, 0x45, 0x45, 0x39], // 53 5
    [0x3C, 0x4A, 0x49, 0x49, 0x30], // 54 6
    [0x01, 0x71, 0x09, 0x05, 0x03], // 55 7
    [0x36, 0x49, 0x49, 0x49, 0x36], // 56 8
    [0x06, 0x49, 0x49, 0x29, 0x1E], // 57 9
    [0x00, 0x36, 0x36, 0x00, 0x00], // 58 :
    [0x00, 0x56, 0x36, 0x00, 0x00], // 59 ;
    [0x00, 0x08, 0x14, 0x22, 0x41], // 60 <
    [0x14, 0x14, 0x14, 0x14, 0x14], // 61 =
    [0x41, 0x22, 0x14, 0x08, 0x00], // 62 >
    [0x02, 0x01, 0x51, 0x09, 0x06], // 63 ?
    [0x32, 0x49, 0x79, 0x41, 0x3E], // 64 @
    [0x7E, 0x11, 0x11, 0x11, 0x7E], // 65 A
    [0x7F, 0x49, 0x49, 0x49, 0x36], // 66 B
    [0x3E, 0x41, 0x41, 0x41, 0x22], // 67 C
    [0x7F, 0x41, 0x41, 0x22, 0x1C], // 68 D
    [0x7F, 0x49, 0x49, 0x49, 0x41], // 69 E
    [0x7F, 0x09, 0x09, 0x01, 0x01], // 70 F
    [0x3E, 0x41, 0x41, 0x51, 0x32], // 71 G
    [0x7F, 0x08, 0x08, 0x08, 0x7F], // 72 H
    [0x00, 0x41, 0x7F, 0x41, 0x00], // 73 I
    [0x20, 0x40, 0x41, 0x3F, 0x01], // 74 J
    [0x7F, 0x08, 0x14, 0x22, 0x41], // 75 K
    [0x7F, 0x40, 0x40, 0x40, 0x40], // 76 L
    [0x7F, 0x02, 0x04, 0x02, 0x7F], // 77 M
    [0x7F, 0x04, 0x08, 0x10, 0x7F], // 78 N
    [0x3E, 0x41, 0x41, 0x41, 0x3E], // 79 O
    [0x7F, 0x09, 0x09, 0x09, 0x06], // 80 P
    [0x3E, 0x41, 0x51, 0x21, 0x5E], // 81 Q
    [0x7F, 0x09, 0x19, 0x29, 0x46], // 82 R
    [0x46, 0x49, 0x49, 0x49, 0x31], // 83 S
    [0x01, 0x01, 0x7F, 0x01, 0x01], // 84 T
    [0x3F, 0x40, 0x40, 0x40, 0x3F], // 85 U
    [0x1F, 0x20, 0x40, 0x20, 0x1F], // 86 V
    [0x7F, 0x20, 0x18, 0x20, 0x7F], // 87 W
    [0x63, 0x14, 0x08, 0x14, 0x63], // 88 X
    [0x03, 0x04, 0x78, 0x04, 0x03], // 89 Y
    [0x61, 0x51, 0x49, 0x45, 0x43], // 90 Z
    [0x00, 0x00, 0x7F, 0x41, 0x41], // 91 [
    [0x02, 0x04, 0x08, 0x10, 0x20], // 92 backslash
    [0x41, 0x41, 0x7F, 0x00, 0x00], // 93 ]
    [0x04, 0x02, 0x01, 0x02, 0x04], // 94 ^
    [0x40, 0x40, 0x40, 0x40, 0x40], // 95 _
    [0x00, 0x01, 0x02, 0x04, 0x00], // 96 `
    [0x20, 0x54, 0x54, 0x54, 0x78], // 97 a
    [0x7F, 0x48, 0x44, 0x44, 0x38], // 98 b
    [0x38, 0x44, 0x44, 0x44, 0x20], // 99 c
    [0x38, 0x44, 0x44, 0x48, 0x7F], // 100 d
    [0x38, 0x54, 0x54, 0x54, 0x18], // 101 e
    [0x08, 0x7E, 0x09, 0x01, 0x02], // 102 f
    [0x08, 0x14, 0x54, 0x54, 0x3C], // 103 g
    [0x7F, 0x08, 0x04, 0x04, 0x78], // 104 h
    [0x00, 0x44, 0x7D, 0x40, 0x00], // 105 i
    [0x20, 0x40, 0x44, 0x3D, 0x00], // 106 j
    [0x00, 0x7F, 0x10, 0x28, 0x44], // 107 k
    [0x00, 0x41, 0x7F, 0x40, 0x00], // 108 l
    [0x7C, 0x04, 0x18, 0x04, 0x78], // 109 m
    [0x7C, 0x08, 0x04, 0x04, 0x78], // 110 n
    [0x38, 0x44, 0x44, 0x44, 0x38], // 111 o
    [0x7C, 0x14, 0x14, 0x14, 0x08], // 112 p
    [0x08, 0x14, 0x14, 0x18, 0x7C], // 113 q
    [0x7C, 0x08, 0x04, 0x04, 0x08], // 114 r
    [0x48, 0x54, 0x54, 0x54, 0x20], // 115 s
    [0x04, 0x3F, 0x44, 0x40, 0x20], // 116 t
    [0x3C, 0x40, 0x40, 0x20, 0x7C], // 117 u
    [0x1C, 0x20, 0x40, 0x20, 0x1C], // 118 v
    [0x3C, 0x40, 0x30, 0x40, 0x3C], // 119 w
    [0x44, 0x28, 0x10, 0x28, 0x44], // 120 x
    [0x0C, 0x50, 0x50, 0x50, 0x3C], // 121 y
    [0x44, 0x64, 0x54, 0x4C, 0x44], // 122 z
    [0x00, 0x08, 0x36, 0x41, 0x00], // 123 {
    [0x00, 0x00, 0x7F, 0x00, 0x00], // 124 |
    [0x00, 0x41, 0x36, 0x08, 0x00], // 125 }
    [0x08, 0x08, 0x2A, 0x1C, 0x08], // 126 ~
    [0x08, 0x1C, 0x2A, 0x08, 0x08], // 127 DEL (left arrow)
];

#[inline]
fn glyph_for(c: char) -> &'static [u8; 5] {
    let b = if c.is_ascii() { c as u8 } else { b'?' };
    let b = if (FONT_FIRST..=FONT_LAST).contains(&b) { b } else { b'?' };
    &FONT_5X7[(b - FONT_FIRST) as usize]
}

/// Draw one glyph at (x, y) top-left. Returns the horizontal advance.
pub fn draw_char(surface: &mut Surface, x: i32, y: i32, c: char, color: Color, size: FontSize) -> i32 {
    let glyph = glyph_for(c);
    let scale = size.scale();

    for (col, &column) in glyph.iter().enumerate() {
        for row in 0..FONT_HEIGHT {
            if column & (1 << row) != 0 {
                for sy in 0..scale {
                    for sx in 0..scale {
                        surface.set_pixel(
                            x + col as i32 * scale + sx,
                            y + row * scale + sy,
                            color,
                        );
                    }
                }
            }
        }
    }

    (FONT_WIDTH + 1) * scale
}

/// Draw a string; `\n` starts a new line under the start column.
/// Returns the width of the last line in pixels.
pub fn draw_text(
    surface: &mut Surface,
    x: i32,
    y: i32,
    text: &str,
    color: Color,
    size: FontSize,
) -> i32 {
    let start_x = x;
    let mut cx = x;
    let mut cy = y;

    for c in text.chars() {
        if c == '\n' {
            cx = start_x;
            cy += size.line_height();
        } else {
            cx += draw_char(surface, cx, cy, c, color, size);
        }
    }

    cx - start_x
}

/// Draw a string horizontally centered in the logical width.
pub fn draw_text_centered(surface: &mut Surface, y: i32, text: &str, color: Color, size: FontSize) {
    let width = text_width(text, size);
    let x = (surface.width() as i32 - width) / 2;
    draw_text(surface, x, y, text, color, size);
}

/// Pixel width of a string, without the trailing inter-glyph gap.
/// Newlines contribute no width (callers center per line themselves).
pub fn text_width(text: &str, size: FontSize) -> i32 {
    let scale = size.scale();
    let mut width = 0;

    for c in text.chars() {
        if c != '\n' {
            width += (FONT_WIDTH + 1) * scale;
        }
    }

    if width > 0 {
        width -= scale;
    }
    width
}

/// Format and draw a signed integer. Returns the drawn width.
pub fn draw_number(
    surface: &mut Surface,
    x: i32,
    y: i32,
    num: i64,
    color: Color,
    size: FontSize,
) -> i32 {
    draw_text(surface, x, y, &num.to_string(), color, size)
}
