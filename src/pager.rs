/*
 *  pager.rs
 *
 *  pagerctl - pager hardware control
 *  (c) 2020-26 Stuart Hunter
 *
 *  Top-level pager handle: owns every subsystem, tears down on drop
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

use std::time::Duration;

use log::info;

use crate::audio::{AudioPlayer, Buzzer};
use crate::backlight::Backlight;
use crate::color;
use crate::config::PagerConfig;
use crate::display::surface::Rotation;
use crate::display::Display;
use crate::error::Result;
use crate::haptics::Vibrator;
use crate::input::InputDevice;
use crate::leds::Leds;
use crate::pacer::FramePacer;

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

/// Handle to the whole pager: display, buttons, LEDs, buzzer, motor and
/// backlight. Dropping it silences the buzzer, darkens the LEDs and
/// blanks the screen.
pub struct Pager {
    pub display: Display,
    pub input: InputDevice,
    pub leds: Leds,
    pub audio: AudioPlayer,
    pub vibrator: Vibrator,
    pub backlight: Backlight,
    pacer: FramePacer,
}

impl Pager {
    /// Open the hardware with the stock device layout.
    pub fn open() -> Result<Self> {
        Self::open_with_config(PagerConfig::default())
    }

    /// Open the hardware as laid out by `config`.
    pub fn open_with_config(config: PagerConfig) -> Result<Self> {
        config.validate()?;
        info!(
            "pagerctl {} (built {})",
            env!("CARGO_PKG_VERSION"),
            BUILD_DATE
        );

        let rotation = Rotation::from_degrees(config.rotation)?;
        let display = Display::open(&config.fb_path, rotation)?;
        let input = InputDevice::open(&config.input_paths);
        let leds = Leds::new(config.leds_root.clone());
        let vibrator = Vibrator::new(config.vibrator_path);
        let audio = AudioPlayer::new(Buzzer::new(&config.leds_root), vibrator.clone());
        let backlight = Backlight::discover(&config.backlight_root);

        Ok(Self {
            display,
            input,
            leds,
            audio,
            vibrator,
            backlight,
            pacer: FramePacer::new(config.target_fps),
        })
    }

    /// Milliseconds since the pager was opened.
    pub fn ticks(&self) -> u32 {
        self.pacer.ticks()
    }

    /// Block for `ms` milliseconds.
    pub fn delay(&self, ms: u32) {
        std::thread::sleep(Duration::from_millis(ms.into()));
    }

    /// Pace the render loop to the configured frame rate. Returns the
    /// milliseconds elapsed since the previous frame.
    pub fn frame_sync(&mut self) -> u32 {
        self.pacer.frame_sync()
    }
}

impl Drop for Pager {
    fn drop(&mut self) {
        self.audio.stop();
        self.leds.all_off();
        self.display.clear(color::BLACK);
        let _ = self.display.flip();
        info!("Pager shut down");
    }
}
