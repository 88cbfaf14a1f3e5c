/*
 *  rtttl.rs
 *
 *  pagerctl - pager hardware control
 *  (c) 2020-26 Stuart Hunter
 *
 *  RTTTL ringtone parser and built-in jingles
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

use crate::error::{PagerError, Result};

/// One parsed RTTTL event. `freq` is None for a rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Note {
    pub freq: Option<u32>,
    pub duration_ms: u32,
}

/// A parsed ringtone: its name string and the note sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tune {
    pub name: String,
    pub notes: Vec<Note>,
}

impl Tune {
    /// Total playing time in milliseconds.
    pub fn duration_ms(&self) -> u32 {
        self.notes.iter().map(|n| n.duration_ms).sum()
    }
}

/// Equal-tempered semitone frequencies for octave 4, starting at middle C.
const OCTAVE_4: [u32; 12] = [262, 277, 294, 311, 330, 349, 370, 392, 415, 440, 466, 494];

/// Frequency of semitone `note` (0 = C .. 11 = B) in `octave`.
/// Octaves above 4 double, octaves below halve, in integer steps.
fn note_freq(note: u32, octave: u32) -> u32 {
    let mut freq = OCTAVE_4[(note % 12) as usize];
    match octave {
        o if o > 4 => freq <<= o - 4,
        o if o < 4 => {
            for _ in o..4 {
                freq /= 2;
            }
        }
        _ => {}
    }
    freq
}

fn parse_leading_number(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
) -> Result<Option<u32>> {
    let mut value: Option<u32> = None;
    while let Some(d) = chars.peek().and_then(|c| c.to_digit(10)) {
        let next = value
            .unwrap_or(0)
            .checked_mul(10)
            .and_then(|v| v.checked_add(d))
            .ok_or_else(|| PagerError::Rtttl("number out of range".into()))?;
        value = Some(next);
        chars.next();
    }
    Ok(value)
}

/// Parse an RTTTL string (`name:defaults:notes`).
///
/// Section defaults are `d=4,o=5,b=120` when omitted. A dot may appear
/// before or after the octave digit; `h` is the European spelling of B;
/// `p` is a rest.
pub fn parse(rtttl: &str) -> Result<Tune> {
    let mut sections = rtttl.splitn(3, ':');
    let name = sections
        .next()
        .ok_or_else(|| PagerError::Rtttl("empty string".into()))?
        .trim()
        .to_string();
    let defaults = sections
        .next()
        .ok_or_else(|| PagerError::Rtttl("missing defaults section".into()))?;
    let body = sections
        .next()
        .ok_or_else(|| PagerError::Rtttl("missing note section".into()))?;

    let mut def_duration: u32 = 4;
    let mut def_octave: u32 = 5;
    let mut bpm: u32 = 120;

    for field in defaults.split(',') {
        let field = field.trim();
        if field.is_empty() {
            continue;
        }
        let Some((key, value)) = field.split_once('=') else {
            return Err(PagerError::Rtttl(format!("bad default '{}'", field)));
        };
        let value: u32 = value
            .trim()
            .parse()
            .map_err(|_| PagerError::Rtttl(format!("bad default '{}'", field)))?;
        match key.trim() {
            "d" => def_duration = value,
            "o" => def_octave = value,
            "b" => bpm = value,
            other => return Err(PagerError::Rtttl(format!("unknown default '{}'", other))),
        }
    }

    if bpm == 0 {
        return Err(PagerError::Rtttl("bpm must be > 0".into()));
    }
    if def_duration == 0 {
        return Err(PagerError::Rtttl("default duration must be > 0".into()));
    }

    // a whole note is four beats
    let whole_note_ms = 240_000 / bpm;
    let mut notes = Vec::new();

    for token in body.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        let mut chars = token.chars().peekable();

        let duration = parse_leading_number(&mut chars)?.unwrap_or(def_duration);
        if duration == 0 {
            return Err(PagerError::Rtttl(format!("zero duration in '{}'", token)));
        }

        let semitone = match chars.next().map(|c| c.to_ascii_lowercase()) {
            Some('c') => Some(0),
            Some('d') => Some(2),
            Some('e') => Some(4),
            Some('f') => Some(5),
            Some('g') => Some(7),
            Some('a') => Some(9),
            Some('b') | Some('h') => Some(11),
            Some('p') => None,
            other => {
                return Err(PagerError::Rtttl(format!(
                    "bad note '{}' in '{}'",
                    other.map(String::from).unwrap_or_default(),
                    token
                )))
            }
        };

        let semitone = if chars.peek() == Some(&'#') {
            chars.next();
            semitone.map(|n| n + 1)
        } else {
            semitone
        };

        let mut dotted = false;
        if chars.peek() == Some(&'.') {
            dotted = true;
            chars.next();
        }

        let octave = parse_leading_number(&mut chars)?.unwrap_or(def_octave);
        if !(1..=8).contains(&octave) {
            return Err(PagerError::Rtttl(format!(
                "octave {} out of range in '{}'",
                octave, token
            )));
        }

        // the dot is also accepted after the octave digit
        if chars.peek() == Some(&'.') {
            dotted = true;
            chars.next();
        }

        let mut duration_ms = whole_note_ms / duration;
        if dotted {
            duration_ms += duration_ms / 2;
        }

        notes.push(Note {
            freq: semitone.map(|n| note_freq(n, octave)),
            duration_ms,
        });
    }

    Ok(Tune { name, notes })
}

// Built-in jingles.

/// Tetris theme (Korobeiniki), A section.
pub const TETRIS_THEME: &str = "tetris:d=4,o=5,b=160:\
    e6,8b,8c6,8d6,16e6,16d6,8c6,8b,a,8a,8c6,e6,8d6,8c6,\
    b,8b,8c6,d6,e6,c6,a,2a,8p,\
    d6,8f6,a6,8g6,8f6,e6,8e6,8c6,e6,8d6,8c6,\
    b,8b,8c6,d6,e6,c6,a,a";

/// Tetris theme, slower B section.
pub const TETRIS_B: &str = "tetrisb:d=4,o=5,b=160:\
    2e6,2c6,2d6,2b,2c6,2a,2g#,2b,64p,\
    2e6,2c6,2d6,2b,c6,e6,2a6,1g#6";

/// Tetris theme, A and B sections back to back.
pub const TETRIS_FULL: &str = "tetrisfull:d=4,o=5,b=160:\
    e6,8b,8c6,8d6,16e6,16d6,8c6,8b,a,8a,8c6,e6,8d6,8c6,\
    b,8b,8c6,d6,e6,c6,a,2a,8p,\
    d6,8f6,a6,8g6,8f6,e6,8e6,8c6,e6,8d6,8c6,\
    b,8b,8c6,d6,e6,c6,a,2a,\
    2e6,2c6,2d6,2b,2c6,2a,2g#,2b,64p,\
    2e6,2c6,2d6,2b,c6,e6,2a6,1g#6";

/// Tetris bass line.
pub const TETRIS_BASS: &str = "tetrisbass:d=4,o=4,b=160:\
    e,e,e,e,a,a,a,a,g#,g#,g#,g#,a,b,c5,8p,\
    d5,d5,d5,d5,c5,c5,c5,c5,b,b,b,b,a,2a";

/// Death sting.
pub const GAME_OVER_1: &str = "smbdeath:d=4,o=5,b=90:\
    8p,16b,16f6,16p,16f6,16f.6,16e.6,16d6,16c6,16p,16e,16p,16c,4p";

/// Game-over melody.
pub const GAME_OVER_2: &str = "gameover:d=4,o=4,b=170:\
    8c5,4p,8g4,4p,4e4,32p,8a4,8b4,6a4,4g#4,6a#4,6g#4,8g4,8f4,1g4";

/// Default game-over jingle.
pub const GAME_OVER: &str = GAME_OVER_1;

/// Level-up jingle.
pub const LEVEL_UP: &str = "levelup:d=16,o=5,b=200:c,e,g,c6,8p,g,c6,e6,8g6";

/// Victory fanfare.
pub const VICTORY: &str = "victory:d=4,o=5,b=180:\
    g,g,g,2d#,f,f,f,2d,\
    g,g,g,d#6,d6,c6,b,8a,2g";

/// Pac-Man intro.
pub const PACMAN: &str = "pacman:d=4,o=5,b=160:\
    b,b6,f#6,d#6,8b6,8f#6,d#6,c6,c7,g6,f6,8c7,8g6,f6";

/// Space Invaders march.
pub const INVADERS: &str = "invaders:d=8,o=4,b=120:\
    e,4e,e,4e,c,4c,d,4d,e,4e,4p,\
    f,4f,f,4f,d,4d,e,4e,d,4d";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_frequencies_double_per_octave() {
        assert_eq!(note_freq(9, 4), 440); // A4
        assert_eq!(note_freq(9, 5), 880);
        assert_eq!(note_freq(9, 3), 220);
        assert_eq!(note_freq(0, 4), 262); // middle C
        assert_eq!(note_freq(4, 6), 1320); // E6
    }

    #[test]
    fn defaults_applied_when_sections_empty() {
        let tune = parse("x::a").unwrap();
        // d=4, o=5, b=120: quarter note at 120 bpm is 500ms, A5 is 880Hz
        assert_eq!(tune.name, "x");
        assert_eq!(tune.notes, vec![Note { freq: Some(880), duration_ms: 500 }]);
    }

    #[test]
    fn explicit_defaults_override() {
        let tune = parse("t:d=8,o=4,b=60:c").unwrap();
        // whole note at 60 bpm is 4000ms; eighth is 500ms; C4 is 262Hz
        assert_eq!(tune.notes, vec![Note { freq: Some(262), duration_ms: 500 }]);
    }

    #[test]
    fn sharps_and_european_b() {
        let tune = parse("t:o=4:c#,h,b").unwrap();
        assert_eq!(tune.notes[0].freq, Some(277));
        assert_eq!(tune.notes[1].freq, Some(494));
        assert_eq!(tune.notes[1], tune.notes[2]);
    }

    #[test]
    fn rests_have_no_frequency() {
        let tune = parse("t:b=120:2p,8p").unwrap();
        assert_eq!(
            tune.notes,
            vec![
                Note { freq: None, duration_ms: 1000 },
                Note { freq: None, duration_ms: 250 },
            ]
        );
    }

    #[test]
    fn dot_before_or_after_octave() {
        let before = parse("t:b=120:4e.6").unwrap();
        let after = parse("t:b=120:4e6.").unwrap();
        assert_eq!(before.notes, after.notes);
        assert_eq!(before.notes[0].duration_ms, 750);
        assert_eq!(before.notes[0].freq, Some(1320));
    }

    #[test]
    fn inline_duration_and_octave() {
        let tune = parse("t:d=4,o=5,b=160:16e6,8b").unwrap();
        // whole note at 160 bpm is 1500ms; B at the default octave 5 is 988Hz
        assert_eq!(tune.notes[0], Note { freq: Some(1320), duration_ms: 93 });
        assert_eq!(tune.notes[1], Note { freq: Some(988), duration_ms: 187 });
    }

    #[test]
    fn whitespace_and_empty_tokens_skipped() {
        let tune = parse("t:: a , ,b ").unwrap();
        assert_eq!(tune.notes.len(), 2);
    }

    #[test]
    fn malformed_inputs_are_rejected() {
        assert!(matches!(parse("noseparators"), Err(PagerError::Rtttl(_))));
        assert!(matches!(parse("t:d=4"), Err(PagerError::Rtttl(_))));
        assert!(matches!(parse("t:b=0:a"), Err(PagerError::Rtttl(_))));
        assert!(matches!(parse("t::q"), Err(PagerError::Rtttl(_))));
        assert!(matches!(parse("t:x=3:a"), Err(PagerError::Rtttl(_))));
    }

    #[test]
    fn out_of_range_octaves_are_rejected() {
        // a single octave digit is the notation; runs of digits must not
        // be folded into a huge octave
        assert!(matches!(parse("t::a44"), Err(PagerError::Rtttl(_))));
        assert!(matches!(parse("t::a9"), Err(PagerError::Rtttl(_))));
        assert!(matches!(parse("t:o=0:c"), Err(PagerError::Rtttl(_))));
        assert!(parse("t::a8").is_ok());
    }

    #[test]
    fn oversized_numbers_are_rejected() {
        assert!(matches!(parse("t::99999999999a"), Err(PagerError::Rtttl(_))));
        assert!(matches!(parse("t::a4294967296"), Err(PagerError::Rtttl(_))));
    }

    #[test]
    fn builtin_jingles_parse() {
        for (name, tune) in [
            ("tetris", TETRIS_THEME),
            ("tetrisb", TETRIS_B),
            ("tetrisfull", TETRIS_FULL),
            ("tetrisbass", TETRIS_BASS),
            ("smbdeath", GAME_OVER_1),
            ("gameover", GAME_OVER_2),
            ("levelup", LEVEL_UP),
            ("victory", VICTORY),
            ("pacman", PACMAN),
            ("invaders", INVADERS),
        ] {
            let parsed = parse(tune).unwrap_or_else(|e| panic!("{}: {}", name, e));
            assert_eq!(parsed.name, name);
            assert!(!parsed.notes.is_empty(), "{} has no notes", name);
        }
    }

    #[test]
    fn tune_duration_totals() {
        let tune = parse("t:b=120:4a,4a").unwrap();
        assert_eq!(tune.duration_ms(), 1000);
    }
}
