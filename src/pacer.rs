/*
 *  pacer.rs
 *
 *  pagerctl - pager hardware control
 *  (c) 2020-26 Stuart Hunter
 *
 *  Frame pacing and millisecond tick source
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

use std::time::{Duration, Instant};

/// Paces the render loop to a fixed frame rate and hands out millisecond
/// timestamps measured from startup.
#[derive(Debug)]
pub struct FramePacer {
    frame: Duration,
    start: Instant,
    last_frame: Instant,
}

impl FramePacer {
    pub fn new(target_fps: u32) -> Self {
        let now = Instant::now();
        Self {
            frame: Duration::from_secs(1) / target_fps.max(1),
            start: now,
            last_frame: now,
        }
    }

    /// Milliseconds since the pacer was created.
    pub fn ticks(&self) -> u32 {
        self.start.elapsed().as_millis() as u32
    }

    /// Sleep out the remainder of the current frame slot.
    /// Returns the elapsed milliseconds since the previous frame, so
    /// callers can run time-based animation that survives dropped frames.
    pub fn frame_sync(&mut self) -> u32 {
        let elapsed = self.last_frame.elapsed();
        if elapsed < self.frame {
            std::thread::sleep(self.frame - elapsed);
        }
        let now = Instant::now();
        let frame_ms = (now - self.last_frame).as_millis() as u32;
        self.last_frame = now;
        frame_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_sync_enforces_cadence() {
        let mut pacer = FramePacer::new(100); // 10ms frames
        pacer.frame_sync();
        let elapsed = pacer.frame_sync();
        assert!(elapsed >= 9, "frame came back after {}ms", elapsed);
    }

    #[test]
    fn ticks_are_monotonic() {
        let pacer = FramePacer::new(20);
        let a = pacer.ticks();
        std::thread::sleep(Duration::from_millis(5));
        let b = pacer.ticks();
        assert!(b >= a + 4);
    }

    #[test]
    fn zero_fps_is_clamped() {
        // must not panic on a divide by zero
        let _ = FramePacer::new(0);
    }
}
