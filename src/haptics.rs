/*
 *  haptics.rs
 *
 *  pagerctl - pager hardware control
 *  (c) 2020-26 Stuart Hunter
 *
 *  Vibration motor control
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

use std::path::PathBuf;
use std::time::Duration;

use crate::leds::write_sysfs;

/// Vibration motor behind a GPIO value file. Writes are best-effort so a
/// board without the motor wired up still runs.
#[derive(Debug, Clone)]
pub struct Vibrator {
    path: PathBuf,
}

impl Vibrator {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub(crate) fn on(&self) {
        write_sysfs(&self.path, 1);
    }

    pub(crate) fn off(&self) {
        write_sysfs(&self.path, 0);
    }

    /// Buzz for `duration_ms`, blocking.
    pub fn vibrate(&self, duration_ms: u32) {
        self.on();
        std::thread::sleep(Duration::from_millis(duration_ms.into()));
        self.off();
    }

    /// Play an on/off pattern of comma-separated millisecond durations,
    /// starting with on: `"100,50,100"` buzzes twice with a 50ms gap.
    /// Unparseable segments are skipped. Blocking; ends with the motor off.
    pub fn vibrate_pattern(&self, pattern: &str) {
        let mut on = true;
        for token in pattern.split(',') {
            if let Ok(ms) = token.trim().parse::<u32>() {
                if ms > 0 {
                    write_sysfs(&self.path, if on { 1 } else { 0 });
                    std::thread::sleep(Duration::from_millis(ms.into()));
                }
            }
            on = !on;
        }
        self.off();
    }
}
