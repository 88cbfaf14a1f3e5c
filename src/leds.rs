/*
 *  leds.rs
 *
 *  pagerctl - pager hardware control
 *  (c) 2020-26 Stuart Hunter
 *
 *  Button and D-pad LED control via the leds sysfs class
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

use log::debug;

/// Best-effort sysfs write. LEDs are cosmetic; a missing node must never
/// take the application down.
pub(crate) fn write_sysfs(path: &Path, value: impl std::fmt::Display) {
    if let Err(e) = std::fs::write(path, value.to_string()) {
        debug!("sysfs write {} failed: {}", path.display(), e);
    }
}

/// The pager's button LEDs: single-channel LEDs addressed by name plus
/// RGB triplets for the D-pad directions.
#[derive(Debug, Clone)]
pub struct Leds {
    root: PathBuf,
}

impl Leds {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Set a named LED's brightness (`<root>/<name>/brightness`).
    pub fn set(&self, name: &str, brightness: u8) {
        write_sysfs(&self.root.join(name).join("brightness"), brightness);
    }

    /// Set an RGB LED by its three channel devices
    /// (`<name>-led-red`, `-green`, `-blue`).
    pub fn rgb(&self, name: &str, r: u8, g: u8, b: u8) {
        for (channel, value) in [("red", r), ("green", g), ("blue", b)] {
            let dir = format!("{}-led-{}", name, channel);
            write_sysfs(&self.root.join(dir).join("brightness"), value);
        }
    }

    /// Set a D-pad direction LED from a packed `0xRRGGBB` color.
    pub fn dpad(&self, direction: &str, color: u32) {
        self.rgb(
            direction,
            ((color >> 16) & 0xFF) as u8,
            ((color >> 8) & 0xFF) as u8,
            (color & 0xFF) as u8,
        );
    }

    /// Turn off every LED on the face of the unit.
    pub fn all_off(&self) {
        self.set("a-button-led", 0);
        self.set("b-button-led", 0);
        for dir in ["up", "down", "left", "right"] {
            self.dpad(dir, 0);
        }
    }
}
