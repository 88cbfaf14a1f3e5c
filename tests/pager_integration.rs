/*
 *  tests/pager_integration.rs
 *
 *  pagerctl - pager hardware control
 *  (c) 2020-26 Stuart Hunter
 *
 *  End-to-end tests against a simulated device tree
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

use pagerctl::{color, Buttons, FontSize, Pager, PagerConfig, Rotation, FB_HEIGHT, FB_WIDTH};

const FRAME_BYTES: u64 = (FB_WIDTH * FB_HEIGHT * 2) as u64;

/// Fake the pager's device tree in a tempdir: a regular file stands in for
/// /dev/fb0, plus leds, gpio and backlight class directories.
struct FakeHardware {
    dir: tempfile::TempDir,
}

impl FakeHardware {
    fn new() -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();

        let fb = std::fs::File::create(root.join("fb0")).unwrap();
        fb.set_len(FRAME_BYTES).unwrap();

        let leds = root.join("leds");
        for node in [
            "buzzer",
            "a-button-led",
            "b-button-led",
            "up-led-red",
            "up-led-green",
            "up-led-blue",
            "down-led-red",
            "down-led-green",
            "down-led-blue",
            "left-led-red",
            "left-led-green",
            "left-led-blue",
            "right-led-red",
            "right-led-green",
            "right-led-blue",
        ] {
            std::fs::create_dir_all(leds.join(node)).unwrap();
            std::fs::write(leds.join(node).join("brightness"), "0").unwrap();
        }
        std::fs::write(leds.join("buzzer/frequency"), "0").unwrap();

        let backlight = root.join("backlight/backlight");
        std::fs::create_dir_all(&backlight).unwrap();
        std::fs::write(backlight.join("brightness"), "128").unwrap();
        std::fs::write(backlight.join("max_brightness"), "255").unwrap();

        std::fs::write(root.join("vibrator"), "0").unwrap();

        Self { dir }
    }

    fn config(&self) -> PagerConfig {
        let root = self.dir.path();
        PagerConfig {
            fb_path: root.join("fb0"),
            // not present: buttons run in the disabled fallback
            input_paths: vec![root.join("event0")],
            leds_root: root.join("leds"),
            vibrator_path: root.join("vibrator"),
            backlight_root: root.join("backlight"),
            target_fps: 50,
            rotation: 0,
        }
    }

    fn fb_bytes(&self) -> Vec<u8> {
        std::fs::read(self.dir.path().join("fb0")).unwrap()
    }

    fn led(&self, name: &str) -> String {
        std::fs::read_to_string(self.dir.path().join("leds").join(name).join("brightness"))
            .unwrap()
    }
}

#[test]
fn open_draw_flip_reaches_the_panel() {
    let hw = FakeHardware::new();
    let mut pager = Pager::open_with_config(hw.config()).unwrap();

    pager.display.clear(color::BLACK);
    pager.display.fill_rect(0, 0, 4, 1, color::RED);
    pager.display.flip().unwrap();

    let bytes = hw.fb_bytes();
    // RGB565 red, little endian, in the first panel row
    assert_eq!(&bytes[0..2], &[0x00, 0xF8]);
    assert_eq!(&bytes[6..8], &[0x00, 0xF8]);
    assert_eq!(&bytes[8..10], &[0x00, 0x00]);
}

#[test]
fn rotation_comes_from_config() {
    let hw = FakeHardware::new();
    let mut config = hw.config();
    config.rotation = 270;
    let pager = Pager::open_with_config(config).unwrap();

    assert_eq!(pager.display.rotation(), Rotation::Rot270);
    assert_eq!(pager.display.width(), FB_HEIGHT as u32);
    assert_eq!(pager.display.height(), FB_WIDTH as u32);
}

#[test]
fn invalid_rotation_is_rejected_before_touching_hardware() {
    let hw = FakeHardware::new();
    let mut config = hw.config();
    config.rotation = 45;
    assert!(Pager::open_with_config(config).is_err());
}

#[test]
fn text_rendering_lands_on_the_glass() {
    let hw = FakeHardware::new();
    let mut pager = Pager::open_with_config(hw.config()).unwrap();

    pager.display.clear(color::BLACK);
    let width = pager.display.draw_text(0, 0, "HI", color::WHITE, FontSize::Small);
    assert_eq!(width, 12);
    assert_eq!(pager.display.text_width("HI", FontSize::Small), 11);
    pager.display.flip().unwrap();

    // 'H' has its full left column lit, so panel pixel (0,0) is white
    let bytes = hw.fb_bytes();
    assert_eq!(&bytes[0..2], &[0xFF, 0xFF]);
}

#[test]
fn leds_and_backlight_drive_sysfs() {
    let hw = FakeHardware::new();
    let mut pager = Pager::open_with_config(hw.config()).unwrap();

    pager.leds.set("a-button-led", 255);
    pager.leds.dpad("up", 0x00FF00);
    assert_eq!(hw.led("a-button-led"), "255");
    assert_eq!(hw.led("up-led-green"), "255");
    assert_eq!(hw.led("up-led-red"), "0");

    pager.backlight.set_brightness(100).unwrap();
    assert_eq!(pager.backlight.brightness().unwrap(), 100);
    assert_eq!(pager.backlight.max_brightness().unwrap(), 255);
}

#[test]
fn audio_plays_and_stops_through_the_buzzer() {
    let hw = FakeHardware::new();
    let mut pager = Pager::open_with_config(hw.config()).unwrap();

    pager.audio.beep(880, 1);
    assert_eq!(
        std::fs::read_to_string(hw.dir.path().join("leds/buzzer/frequency")).unwrap(),
        "880"
    );
    assert_eq!(hw.led("buzzer"), "0");

    pager.audio.play_rtttl(pagerctl::rtttl::LEVEL_UP).unwrap();
    assert!(pager.audio.playing());
    pager.audio.stop();
    assert!(!pager.audio.playing());
    assert_eq!(hw.led("buzzer"), "0");
}

#[test]
fn missing_input_device_degrades_quietly() {
    let hw = FakeHardware::new();
    let pager = Pager::open_with_config(hw.config()).unwrap();

    let state = pager.input.poll();
    assert_eq!(state.current, Buttons::NONE);
    assert_eq!(pager.input.wait_button(), Buttons::NONE);
    assert!(!pager.input.has_events());
}

#[test]
fn drop_blanks_screen_and_leds() {
    let hw = FakeHardware::new();
    {
        let mut pager = Pager::open_with_config(hw.config()).unwrap();
        pager.display.clear(color::WHITE);
        pager.display.flip().unwrap();
        pager.leds.set("b-button-led", 200);
    }
    // teardown on drop
    assert!(hw.fb_bytes().iter().all(|&b| b == 0));
    assert_eq!(hw.led("b-button-led"), "0");
}

#[test]
fn frame_sync_and_ticks_advance() {
    let hw = FakeHardware::new();
    let mut pager = Pager::open_with_config(hw.config()).unwrap();

    let t0 = pager.ticks();
    pager.frame_sync();
    let elapsed = pager.frame_sync(); // 50 fps: 20ms slots
    assert!(elapsed >= 19, "frame elapsed {}ms", elapsed);
    assert!(pager.ticks() >= t0 + 19);
}
