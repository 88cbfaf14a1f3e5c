/*
 *  input.rs
 *
 *  pagerctl - pager hardware control
 *  (c) 2020-26 Stuart Hunter
 *
 *  Button input: evdev reader, state polling, press/release event queue
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

use std::collections::VecDeque;
use std::fs::{File, OpenOptions};
use std::ops::{BitAnd, BitOr, BitOrAssign, Not};
use std::os::fd::AsRawFd;
use std::os::unix::fs::OpenOptionsExt;
use std::path::Path;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use log::{debug, info, warn};

/// Pressed events older than the queue depth are dropped oldest-first.
const QUEUE_DEPTH: usize = 32;

const EV_KEY: u16 = 1;

// evdev key codes as wired on the pager board
const KEY_UP: u16 = 103;
const KEY_DOWN: u16 = 108;
const KEY_LEFT: u16 = 105;
const KEY_RIGHT: u16 = 106;
const BTN_EAST: u16 = 305; // green / A
const BTN_SOUTH: u16 = 304; // red / B
const KEY_POWER: u16 = 116;

/// Button bitmask. Combine with `|`, test with [`Buttons::contains`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Buttons(u8);

impl Buttons {
    pub const NONE: Buttons = Buttons(0);
    pub const UP: Buttons = Buttons(1 << 0);
    pub const DOWN: Buttons = Buttons(1 << 1);
    pub const LEFT: Buttons = Buttons(1 << 2);
    pub const RIGHT: Buttons = Buttons(1 << 3);
    pub const A: Buttons = Buttons(1 << 4);
    pub const B: Buttons = Buttons(1 << 5);
    pub const POWER: Buttons = Buttons(1 << 6);

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn from_bits(bits: u8) -> Buttons {
        Buttons(bits & 0x7F)
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, other: Buttons) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for Buttons {
    type Output = Buttons;
    fn bitor(self, rhs: Buttons) -> Buttons {
        Buttons(self.0 | rhs.0)
    }
}

impl BitOrAssign for Buttons {
    fn bitor_assign(&mut self, rhs: Buttons) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Buttons {
    type Output = Buttons;
    fn bitand(self, rhs: Buttons) -> Buttons {
        Buttons(self.0 & rhs.0)
    }
}

impl Not for Buttons {
    type Output = Buttons;
    fn not(self) -> Buttons {
        Buttons(!self.0 & 0x7F)
    }
}

/// Map an evdev key code to its pager button, if it is one.
pub fn button_for_code(code: u16) -> Option<Buttons> {
    match code {
        KEY_UP => Some(Buttons::UP),
        KEY_DOWN => Some(Buttons::DOWN),
        KEY_LEFT => Some(Buttons::LEFT),
        KEY_RIGHT => Some(Buttons::RIGHT),
        BTN_EAST => Some(Buttons::A),
        BTN_SOUTH => Some(Buttons::B),
        KEY_POWER => Some(Buttons::POWER),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Press,
    Release,
}

/// One queued button transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonEvent {
    pub button: Buttons,
    pub kind: EventKind,
    /// Milliseconds since the input device was opened.
    pub timestamp_ms: u32,
}

/// Edge-triggered view of one poll: what is held now, what went down and
/// what came up since the previous poll.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    pub current: Buttons,
    pub pressed: Buttons,
    pub released: Buttons,
}

/// Raw key events, abstracted so tests can feed scripted input.
pub trait KeySource: Send {
    /// Next pending `EV_KEY` (code, value) pair, or None when drained.
    fn next_key(&mut self) -> Option<(u16, i32)>;
}

/// Non-blocking evdev reader.
pub struct EvdevSource {
    file: File,
}

impl EvdevSource {
    pub fn open(path: &Path) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .custom_flags(libc::O_NONBLOCK)
            .open(path)?;
        Ok(Self { file })
    }
}

impl KeySource for EvdevSource {
    fn next_key(&mut self) -> Option<(u16, i32)> {
        loop {
            let mut ev: libc::input_event = unsafe { std::mem::zeroed() };
            let want = std::mem::size_of::<libc::input_event>();
            // SAFETY: ev is a plain-data struct sized for exactly one event
            let n = unsafe {
                libc::read(
                    self.file.as_raw_fd(),
                    &mut ev as *mut _ as *mut libc::c_void,
                    want,
                )
            };
            if n != want as isize {
                return None;
            }
            if ev.type_ == EV_KEY {
                return Some((ev.code, ev.value));
            }
        }
    }
}

struct Inner {
    source: Option<Box<dyn KeySource>>,
    queue: VecDeque<ButtonEvent>,
    prev: Buttons,
}

/// The pager's seven buttons.
///
/// `poll` is the per-frame API; the event queue keeps transitions that
/// happened between polls so short taps are never lost. `peek_buttons`
/// is lock-free for use from audio and render threads.
pub struct InputDevice {
    inner: Mutex<Inner>,
    current: AtomicU8,
    start: Instant,
}

impl InputDevice {
    /// Try each candidate device path in order. A pager with no reachable
    /// input device still works; every poll just reports no buttons.
    pub fn open(paths: &[std::path::PathBuf]) -> Self {
        let mut source: Option<Box<dyn KeySource>> = None;
        for path in paths {
            match EvdevSource::open(path) {
                Ok(s) => {
                    info!("Input device: {}", path.display());
                    source = Some(Box::new(s));
                    break;
                }
                Err(e) => debug!("Input open {} failed: {}", path.display(), e),
            }
        }
        if source.is_none() {
            warn!("No input device available; buttons disabled");
        }
        Self::with_source(source)
    }

    pub fn with_source(source: Option<Box<dyn KeySource>>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                source,
                queue: VecDeque::with_capacity(QUEUE_DEPTH),
                prev: Buttons::NONE,
            }),
            current: AtomicU8::new(0),
            start: Instant::now(),
        }
    }

    fn now_ms(&self) -> u32 {
        self.start.elapsed().as_millis() as u32
    }

    fn drain_source(&self, inner: &mut Inner) -> Buttons {
        let mut held = inner.prev;
        let now = self.now_ms();
        if let Some(source) = inner.source.as_mut() {
            while let Some((code, value)) = source.next_key() {
                let Some(btn) = button_for_code(code) else {
                    continue;
                };
                let kind = match value {
                    1 => {
                        held |= btn;
                        EventKind::Press
                    }
                    0 => {
                        held = held & !btn;
                        EventKind::Release
                    }
                    _ => continue, // autorepeat
                };
                if inner.queue.len() == QUEUE_DEPTH {
                    inner.queue.pop_front();
                }
                inner.queue.push_back(ButtonEvent {
                    button: btn,
                    kind,
                    timestamp_ms: now,
                });
            }
        }
        held
    }

    /// Read all pending events and report held/pressed/released edges
    /// relative to the previous poll.
    pub fn poll(&self) -> InputState {
        let mut inner = self.inner.lock().unwrap();
        let held = self.drain_source(&mut inner);
        let state = InputState {
            current: held,
            pressed: held & !inner.prev,
            released: !held & inner.prev,
        };
        inner.prev = held;
        self.current.store(held.bits(), Ordering::Relaxed);
        state
    }

    /// Currently held buttons without taking the lock.
    pub fn peek_buttons(&self) -> Buttons {
        Buttons::from_bits(self.current.load(Ordering::Relaxed))
    }

    /// Pop the oldest queued transition, if any.
    pub fn next_event(&self) -> Option<ButtonEvent> {
        let mut inner = self.inner.lock().unwrap();
        self.drain_source(&mut inner);
        inner.queue.pop_front()
    }

    pub fn has_events(&self) -> bool {
        let mut inner = self.inner.lock().unwrap();
        self.drain_source(&mut inner);
        !inner.queue.is_empty()
    }

    pub fn clear_events(&self) {
        self.inner.lock().unwrap().queue.clear();
    }

    /// Block until a button is pressed and return it. Input queued before
    /// the call is discarded first. Returns [`Buttons::NONE`] right away
    /// when no input device was found, so headless runs cannot hang.
    pub fn wait_button(&self) -> Buttons {
        if self.inner.lock().unwrap().source.is_none() {
            return Buttons::NONE;
        }
        self.poll(); // swallow stale state
        loop {
            let state = self.poll();
            if !state.pressed.is_empty() {
                return state.pressed;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
    }
}
