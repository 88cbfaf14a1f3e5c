/*
 *  lib.rs
 *
 *  pagerctl - pager hardware control
 *  (c) 2020-26 Stuart Hunter
 *
 *  Userspace control library for the pager handheld: 222x480 RGB565
 *  framebuffer drawing with rotation, bitmap and TrueType text, image
 *  blitting, evdev buttons, sysfs LEDs, RTTTL buzzer playback,
 *  vibration and backlight control.
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

//! Hardware control for the pager handheld.
//!
//! [`Pager::open`] claims every device and hands back one struct with the
//! display, buttons, LEDs, buzzer, vibration motor and backlight on it:
//!
//! ```no_run
//! use pagerctl::{color, FontSize, Pager};
//!
//! let mut pager = Pager::open()?;
//! pager.display.clear(color::BLACK);
//! pager.display.draw_text_centered(200, "HELLO", color::WHITE, FontSize::Large);
//! pager.display.flip()?;
//! let _pressed = pager.input.wait_button();
//! # Ok::<(), pagerctl::PagerError>(())
//! ```
//!
//! Every subsystem is also usable on its own; the display can render to an
//! in-memory panel for tests and the sysfs-backed subsystems take their
//! root paths from [`PagerConfig`].

pub mod audio;
pub mod backlight;
pub mod color;
pub mod config;
pub mod display;
pub mod error;
pub mod haptics;
pub mod input;
pub mod leds;
pub mod pacer;
pub mod pager;
pub mod rtttl;

pub use audio::{AudioPlayer, RtttlMode};
pub use backlight::Backlight;
pub use color::Color;
pub use config::PagerConfig;
pub use display::device::{FbDevice, MemoryPanel, PanelDevice};
pub use display::font5x7::FontSize;
pub use display::image::PagerImage;
pub use display::surface::{Rotation, Surface, FB_HEIGHT, FB_WIDTH};
pub use display::Display;
pub use error::{PagerError, Result};
pub use haptics::Vibrator;
pub use input::{ButtonEvent, Buttons, EventKind, InputDevice, InputState};
pub use leds::Leds;
pub use pager::Pager;
