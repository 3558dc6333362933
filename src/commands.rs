//! Maps voice transcripts, key chords and swipes to page commands.

use std::collections::VecDeque;
use std::fmt::{self, Display};
use std::str::FromStr;

use crate::types::Section;

pub const MIN_SWIPE_DISTANCE: f64 = 50.0;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Command {
    Goto(Section),
    NextSection,
    PreviousSection,
    ScrollTop,
    ScrollBottom,
    CycleTheme,
    ToggleFocus,
    ExitFocus,
    ToggleMusic,
}

// Order matters: the first matching entry wins.
const VOICE_TOKENS: &[(&[&str], Command)] = &[
    (&["مشاريع", "projects"], Command::Goto(Section::Projects)),
    (&["تواصل", "contact"], Command::Goto(Section::Contact)),
    (&["مهارات", "skills"], Command::Goto(Section::Skills)),
    (&["خدمات", "services"], Command::Goto(Section::Services)),
    (&["ثيم", "theme"], Command::CycleTheme),
    (&["موسيقى", "music"], Command::ToggleMusic),
];

/// Substring match on the lowercased transcript.
pub fn parse_voice(transcript: &str) -> Option<Command> {
    let transcript = transcript.to_lowercase();
    VOICE_TOKENS
        .iter()
        .find(|(tokens, _)| tokens.iter().any(|token| transcript.contains(token)))
        .map(|(_, command)| *command)
}

/// A key press with its modifier state, parsed from `"ctrl+t"`, `"cmd+1"`,
/// `"escape"`, `"ArrowUp"`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct KeyChord {
    pub key: String,
    pub ctrl: bool,
    pub meta: bool,
}

impl KeyChord {
    pub fn plain(key: &str) -> Self {
        Self {
            key: normalize_key(key),
            ctrl: false,
            meta: false,
        }
    }

    pub fn ctrl(key: &str) -> Self {
        Self {
            ctrl: true,
            ..Self::plain(key)
        }
    }

    const fn has_command_modifier(&self) -> bool {
        self.ctrl || self.meta
    }
}

impl FromStr for KeyChord {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chord = Self::plain("");
        let mut parts = s.trim().split('+').peekable();
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                chord.key = normalize_key(part);
                break;
            }
            match part.trim().to_ascii_lowercase().as_str() {
                "ctrl" | "control" => chord.ctrl = true,
                "cmd" | "meta" | "super" => chord.meta = true,
                other => return Err(format!("unknown modifier: {other}")),
            }
        }
        if chord.key.is_empty() {
            return Err(format!("missing key in chord: {s}"));
        }
        Ok(chord)
    }
}

impl Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ctrl {
            f.write_str("ctrl+")?;
        }
        if self.meta {
            f.write_str("cmd+")?;
        }
        f.write_str(&self.key)
    }
}

fn normalize_key(key: &str) -> String {
    let key = key.trim().to_lowercase();
    match key.strip_prefix("arrow") {
        Some(direction) if !direction.is_empty() => direction.to_string(),
        _ if key == "esc" => "escape".to_string(),
        _ => key,
    }
}

pub fn parse_key(chord: &KeyChord) -> Option<Command> {
    if chord.key == "escape" {
        return Some(Command::ExitFocus);
    }
    if !chord.has_command_modifier() {
        return None;
    }
    match chord.key.as_str() {
        "1" => Some(Command::Goto(Section::Home)),
        "2" => Some(Command::Goto(Section::Skills)),
        "3" => Some(Command::Goto(Section::Projects)),
        "4" => Some(Command::Goto(Section::Contact)),
        "t" => Some(Command::CycleTheme),
        "f" => Some(Command::ToggleFocus),
        "m" => Some(Command::ToggleMusic),
        _ => None,
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Swipe {
    pub start: (f64, f64),
    pub end: (f64, f64),
}

/// Dominant axis wins; short swipes are ignored.
pub fn classify_swipe(swipe: Swipe) -> Option<Command> {
    let dx = swipe.end.0 - swipe.start.0;
    let dy = swipe.end.1 - swipe.start.1;
    if dx.abs() > dy.abs() {
        if dx > MIN_SWIPE_DISTANCE {
            Some(Command::PreviousSection)
        } else if dx < -MIN_SWIPE_DISTANCE {
            Some(Command::NextSection)
        } else {
            None
        }
    } else if dy > MIN_SWIPE_DISTANCE {
        Some(Command::ScrollTop)
    } else if dy < -MIN_SWIPE_DISTANCE {
        Some(Command::ScrollBottom)
    } else {
        None
    }
}

const KONAMI: [&str; 10] = [
    "up", "up", "down", "down", "left", "right", "left", "right", "b", "a",
];

/// Watches plain key presses for ↑↑↓↓←→←→BA.
#[derive(Debug, Default)]
pub struct KonamiDetector {
    recent: VecDeque<String>,
}

impl KonamiDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when this key completes the sequence.
    pub fn push(&mut self, key: &str) -> bool {
        self.recent.push_back(normalize_key(key));
        if self.recent.len() > KONAMI.len() {
            self.recent.pop_front();
        }
        if self.recent.iter().map(String::as_str).eq(KONAMI) {
            self.recent.clear();
            return true;
        }
        false
    }
}
