/*
 *  audio.rs
 *
 *  pagerctl - pager hardware control
 *  (c) 2020-26 Stuart Hunter
 *
 *  Buzzer tones and background RTTTL playback
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
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use log::{debug, warn};

use crate::error::Result;
use crate::haptics::Vibrator;
use crate::leds::write_sysfs;
use crate::rtttl::{self, Note};

/// Stop requests are honored within this interval.
const STOP_SLICE_MS: u64 = 25;

/// What a ringtone drives: the buzzer, the motor, or both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RtttlMode {
    #[default]
    SoundOnly,
    SoundAndVibrate,
    VibrateOnly,
}

impl RtttlMode {
    fn sound(self) -> bool {
        matches!(self, RtttlMode::SoundOnly | RtttlMode::SoundAndVibrate)
    }

    fn vibrate(self) -> bool {
        matches!(self, RtttlMode::SoundAndVibrate | RtttlMode::VibrateOnly)
    }
}

/// PWM buzzer behind the leds sysfs class: a frequency file and a
/// brightness file acting as the gate.
#[derive(Debug, Clone)]
pub(crate) struct Buzzer {
    dir: PathBuf,
}

impl Buzzer {
    pub(crate) fn new(leds_root: &std::path::Path) -> Self {
        Self { dir: leds_root.join("buzzer") }
    }

    fn tone_on(&self, freq: u32) {
        write_sysfs(&self.dir.join("frequency"), freq);
        write_sysfs(&self.dir.join("brightness"), 255);
    }

    fn off(&self) {
        write_sysfs(&self.dir.join("brightness"), 0);
    }
}

struct Worker {
    stop: Arc<AtomicBool>,
    done: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

/// Buzzer and ringtone playback. One tune plays at a time; starting a new
/// one stops whatever is still sounding.
pub struct AudioPlayer {
    buzzer: Buzzer,
    vibrator: Vibrator,
    worker: Option<Worker>,
}

/// Sleep up to `ms`, waking early when a stop is requested.
/// Returns false if interrupted.
fn sleep_unless_stopped(ms: u32, stop: &AtomicBool) -> bool {
    let mut remaining = u64::from(ms);
    while remaining > 0 {
        if stop.load(Ordering::Relaxed) {
            return false;
        }
        let slice = remaining.min(STOP_SLICE_MS);
        std::thread::sleep(Duration::from_millis(slice));
        remaining -= slice;
    }
    !stop.load(Ordering::Relaxed)
}

fn play_notes(
    notes: &[Note],
    mode: RtttlMode,
    buzzer: &Buzzer,
    vibrator: &Vibrator,
    stop: &AtomicBool,
) {
    for note in notes {
        if stop.load(Ordering::Relaxed) {
            break;
        }
        match note.freq {
            Some(freq) => {
                let tone_ms = note.duration_ms * 9 / 10;
                let gap_ms = note.duration_ms - tone_ms;

                if mode.sound() {
                    buzzer.tone_on(freq);
                }
                if mode.vibrate() {
                    vibrator.on();
                }
                let finished = sleep_unless_stopped(tone_ms, stop);
                if mode.sound() {
                    buzzer.off();
                }
                if mode.vibrate() {
                    vibrator.off();
                }
                if !finished || !sleep_unless_stopped(gap_ms, stop) {
                    break;
                }
            }
            None => {
                if mode.vibrate() {
                    vibrator.off();
                }
                if !sleep_unless_stopped(note.duration_ms, stop) {
                    break;
                }
            }
        }
    }
    // leave nothing sounding no matter how we got here
    buzzer.off();
    vibrator.off();
}

impl AudioPlayer {
    pub(crate) fn new(buzzer: Buzzer, vibrator: Vibrator) -> Self {
        Self { buzzer, vibrator, worker: None }
    }

    /// Single blocking tone.
    pub fn beep(&self, freq: u32, duration_ms: u32) {
        self.buzzer.tone_on(freq);
        std::thread::sleep(Duration::from_millis(duration_ms.into()));
        self.buzzer.off();
    }

    /// Start a ringtone in the background, sound only.
    pub fn play_rtttl(&mut self, tune: &str) -> Result<()> {
        self.play_rtttl_mode(tune, RtttlMode::SoundOnly)
    }

    /// Start a ringtone in the background with the given output mode.
    /// Any tune already playing is stopped first.
    pub fn play_rtttl_mode(&mut self, tune: &str, mode: RtttlMode) -> Result<()> {
        let parsed = rtttl::parse(tune)?;
        self.stop();

        debug!(
            "Playing '{}': {} notes, {}ms",
            parsed.name,
            parsed.notes.len(),
            parsed.duration_ms()
        );

        let stop = Arc::new(AtomicBool::new(false));
        let done = Arc::new(AtomicBool::new(false));
        let buzzer = self.buzzer.clone();
        let vibrator = self.vibrator.clone();

        let handle = {
            let stop = Arc::clone(&stop);
            let done = Arc::clone(&done);
            std::thread::Builder::new()
                .name("pager-audio".into())
                .spawn(move || {
                    play_notes(&parsed.notes, mode, &buzzer, &vibrator, &stop);
                    done.store(true, Ordering::Relaxed);
                })?
        };

        self.worker = Some(Worker { stop, done, handle });
        Ok(())
    }

    /// Play a ringtone to completion on the caller's thread.
    pub fn play_rtttl_sync(&mut self, tune: &str, with_vibration: bool) -> Result<()> {
        let parsed = rtttl::parse(tune)?;
        self.stop();
        let mode = if with_vibration {
            RtttlMode::SoundAndVibrate
        } else {
            RtttlMode::SoundOnly
        };
        play_notes(
            &parsed.notes,
            mode,
            &self.buzzer,
            &self.vibrator,
            &AtomicBool::new(false),
        );
        Ok(())
    }

    /// Silence the buzzer and stop any background tune.
    pub fn stop(&mut self) {
        self.buzzer.off();
        if let Some(worker) = self.worker.take() {
            worker.stop.store(true, Ordering::Relaxed);
            if worker.handle.join().is_err() {
                warn!("Audio worker panicked");
            }
        }
        self.buzzer.off();
        self.vibrator.off();
    }

    /// True while a background tune is still sounding.
    pub fn playing(&mut self) -> bool {
        match &self.worker {
            Some(worker) if !worker.done.load(Ordering::Relaxed) => true,
            Some(_) => {
                // reap the finished worker
                if let Some(worker) = self.worker.take() {
                    let _ = worker.handle.join();
                }
                false
            }
            None => false,
        }
    }
}

impl Drop for AudioPlayer {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PagerError;

    fn player(dir: &tempfile::TempDir) -> AudioPlayer {
        let buzzer_dir = dir.path().join("buzzer");
        std::fs::create_dir(&buzzer_dir).unwrap();
        std::fs::write(buzzer_dir.join("frequency"), "0").unwrap();
        std::fs::write(buzzer_dir.join("brightness"), "0").unwrap();
        let vib = dir.path().join("vib");
        std::fs::write(&vib, "0").unwrap();
        AudioPlayer::new(Buzzer::new(dir.path()), Vibrator::new(vib))
    }

    fn brightness(dir: &tempfile::TempDir) -> String {
        std::fs::read_to_string(dir.path().join("buzzer/brightness")).unwrap()
    }

    #[test]
    fn beep_gates_the_buzzer() {
        let dir = tempfile::tempdir().unwrap();
        let p = player(&dir);
        p.beep(440, 1);
        assert_eq!(
            std::fs::read_to_string(dir.path().join("buzzer/frequency")).unwrap(),
            "440"
        );
        assert_eq!(brightness(&dir), "0");
    }

    #[test]
    fn bad_rtttl_is_rejected_up_front() {
        let dir = tempfile::tempdir().unwrap();
        let mut p = player(&dir);
        let err = p.play_rtttl("not a ringtone").unwrap_err();
        assert!(matches!(err, PagerError::Rtttl(_)));
        assert!(!p.playing());
    }

    #[test]
    fn background_playback_completes() {
        let dir = tempfile::tempdir().unwrap();
        let mut p = player(&dir);
        // ~26ms total: one 32nd note at 240 bpm plus slack
        p.play_rtttl("t:d=32,b=240:a").unwrap();
        assert!(p.playing());
        std::thread::sleep(Duration::from_millis(120));
        assert!(!p.playing());
        assert_eq!(brightness(&dir), "0");
    }

    #[test]
    fn stop_interrupts_a_long_tune() {
        let dir = tempfile::tempdir().unwrap();
        let mut p = player(&dir);
        p.play_rtttl("t:d=1,b=30:a,a,a,a").unwrap(); // 8 seconds of tone
        std::thread::sleep(Duration::from_millis(30));
        let start = std::time::Instant::now();
        p.stop();
        assert!(start.elapsed() < Duration::from_millis(500));
        assert!(!p.playing());
        assert_eq!(brightness(&dir), "0");
    }

    #[test]
    fn new_tune_replaces_old() {
        let dir = tempfile::tempdir().unwrap();
        let mut p = player(&dir);
        p.play_rtttl("t:d=1,b=30:a,a,a,a").unwrap();
        p.play_rtttl("t:d=32,b=240:c").unwrap();
        std::thread::sleep(Duration::from_millis(120));
        assert!(!p.playing());
    }

    #[test]
    fn sync_playback_blocks() {
        let dir = tempfile::tempdir().unwrap();
        let mut p = player(&dir);
        p.play_rtttl_sync("t:d=32,b=240:a", false).unwrap();
        assert!(!p.playing());
        assert_eq!(brightness(&dir), "0");
    }
}
