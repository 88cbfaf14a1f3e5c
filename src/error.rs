/*
 *  error.rs
 *
 *  pagerctl - pager hardware control
 *  (c) 2020-26 Stuart Hunter
 *
 *  Unified error type for the pager hardware library
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
use thiserror::Error;

/// Error type for all pager hardware operations.
#[derive(Debug, Error)]
pub enum PagerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("framebuffer unavailable at {path}: {reason}")]
    Framebuffer { path: PathBuf, reason: String },

    #[error("invalid rotation angle: {0} (must be 0, 90, 180, or 270)")]
    InvalidRotation(u16),

    #[error("font not found: {0}")]
    FontNotFound(PathBuf),

    #[error("invalid font data in {0}")]
    FontInvalid(PathBuf),

    #[error("RTTTL parse error: {0}")]
    Rtttl(String),

    #[error("backlight control not available")]
    BacklightUnavailable,

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, PagerError>;
