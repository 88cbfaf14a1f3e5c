/*
 *  backlight.rs
 *
 *  pagerctl - pager hardware control
 *  (c) 2020-26 Stuart Hunter
 *
 *  Panel backlight discovery and percent-based brightness control
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

use log::{debug, info, warn};

use crate::error::{PagerError, Result};

/// Device names tried before falling back to a directory scan.
const CANDIDATES: [&str; 3] = ["backlight", "lcd-backlight", "panel0-backlight"];

/// Backlight control through the sysfs backlight class. Brightness is
/// exposed as a percentage; the raw range comes from `max_brightness`
/// and is read once.
#[derive(Debug)]
pub struct Backlight {
    dir: Option<PathBuf>,
    max: Option<u32>,
}

impl Backlight {
    /// Find the backlight device under `root`. A missing backlight is
    /// not fatal; brightness calls will report it instead.
    pub fn discover(root: &Path) -> Self {
        let dir = Self::find(root);
        match &dir {
            Some(d) => info!("Backlight: {}", d.display()),
            None => warn!("No backlight device under {}", root.display()),
        }
        Self { dir, max: None }
    }

    fn find(root: &Path) -> Option<PathBuf> {
        for name in CANDIDATES {
            let dir = root.join(name);
            if dir.join("brightness").exists() {
                return Some(dir);
            }
        }
        // unknown vendor name: take the first class entry that looks right
        let mut entries: Vec<_> = std::fs::read_dir(root)
            .ok()?
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| p.join("brightness").exists())
            .collect();
        entries.sort();
        entries.into_iter().next()
    }

    fn dir(&self) -> Result<&Path> {
        self.dir.as_deref().ok_or(PagerError::BacklightUnavailable)
    }

    fn read_value(&self, file: &str) -> Result<u32> {
        let path = self.dir()?.join(file);
        let text = std::fs::read_to_string(&path).map_err(|e| {
            debug!("backlight read {} failed: {}", path.display(), e);
            PagerError::BacklightUnavailable
        })?;
        text.trim()
            .parse()
            .map_err(|_| PagerError::BacklightUnavailable)
    }

    /// Raw hardware maximum, read once and cached.
    pub fn max_brightness(&mut self) -> Result<u32> {
        if let Some(max) = self.max {
            return Ok(max);
        }
        let max = self.read_value("max_brightness")?;
        if max == 0 {
            return Err(PagerError::BacklightUnavailable);
        }
        self.max = Some(max);
        Ok(max)
    }

    /// Current brightness as a percentage of the hardware maximum.
    pub fn brightness(&mut self) -> Result<u32> {
        let value = self.read_value("brightness")?;
        let max = self.max_brightness()?;
        Ok(value * 100 / max)
    }

    /// Set brightness as a percentage; values over 100 are clamped.
    pub fn set_brightness(&mut self, percent: u32) -> Result<()> {
        let max = self.max_brightness()?;
        let value = max * percent.min(100) / 100;
        let path = self.dir()?.join("brightness");
        std::fs::write(&path, value.to_string()).map_err(|e| {
            debug!("backlight write {} failed: {}", path.display(), e);
            PagerError::BacklightUnavailable
        })
    }
}
