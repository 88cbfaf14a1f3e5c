use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{PagerError, Result};

/// Device-node layout and runtime tuning for the pager hardware.
///
/// Defaults match the stock pager image. Everything is overridable so the
/// library can be pointed at a test tree, and so a future hardware revision
/// only needs a YAML file rather than a rebuild.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PagerConfig {
    /// Framebuffer device node.
    pub fb_path: PathBuf,
    /// Input device candidates, tried in order.
    pub input_paths: Vec<PathBuf>,
    /// Root of the LED class tree (button LEDs, D-pad LEDs, buzzer).
    pub leds_root: PathBuf,
    /// Vibration motor GPIO value file.
    pub vibrator_path: PathBuf,
    /// Root of the backlight class tree.
    pub backlight_root: PathBuf,
    /// Frame limiter target for `frame_sync()`.
    pub target_fps: u32,
    /// Initial display rotation in degrees (0, 90, 180, 270).
    pub rotation: u16,
}

impl Default for PagerConfig {
    fn default() -> Self {
        Self {
            fb_path: PathBuf::from("/dev/fb0"),
            input_paths: vec![
                PathBuf::from("/dev/input/event0"),
                PathBuf::from("/dev/input/event1"),
            ],
            leds_root: PathBuf::from("/sys/class/leds"),
            vibrator_path: PathBuf::from("/sys/class/gpio/vibrator/value"),
            backlight_root: PathBuf::from("/sys/class/backlight"),
            // SPI refresh tops out around 20 FPS on this panel
            target_fps: 20,
            rotation: 0,
        }
    }
}

impl PagerConfig {
    /// Load a config from a YAML file and validate it.
    pub fn load(path: &Path) -> Result<Self> {
        let s = std::fs::read_to_string(path)?;
        let cfg: Self = serde_yaml::from_str(&s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Put any invariants here (required fields, ranges, etc.)
    pub fn validate(&self) -> Result<()> {
        match self.rotation {
            0 | 90 | 180 | 270 => {}
            other => return Err(PagerError::InvalidRotation(other)),
        }
        if self.target_fps == 0 {
            return Err(PagerError::Validation("target_fps must be > 0".into()));
        }
        if self.input_paths.is_empty() {
            return Err(PagerError::Validation(
                "at least one input device path is required".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        assert!(PagerConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_bad_rotation() {
        let cfg = PagerConfig { rotation: 45, ..Default::default() };
        assert!(matches!(cfg.validate(), Err(PagerError::InvalidRotation(45))));
    }

    #[test]
    fn rejects_zero_fps() {
        let cfg = PagerConfig { target_fps: 0, ..Default::default() };
        assert!(matches!(cfg.validate(), Err(PagerError::Validation(_))));
    }

    #[test]
    fn loads_partial_yaml_over_defaults() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "target_fps: 30\nrotation: 270").unwrap();
        let cfg = PagerConfig::load(f.path()).unwrap();
        assert_eq!(cfg.target_fps, 30);
        assert_eq!(cfg.rotation, 270);
        // untouched fields keep their defaults
        assert_eq!(cfg.fb_path, PathBuf::from("/dev/fb0"));
    }
}
