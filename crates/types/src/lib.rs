//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (engine logic, terminal rendering, leaderboard).
//!
//! # Difficulty Layouts
//!
//! Each difficulty stacks a fixed list of square grids. Index `i` of the list is
//! layer index `i`; the last entry is the outermost layer and is played first.
//!
//! | Difficulty | Grid sizes | Tiles |
//! |------------|------------|-------|
//! | Easy | 4, 2 | 20 |
//! | Medium | 6, 4, 2 | 56 |
//! | Hard | 6, 6, 4, 2 | 92 |
//!
//! # Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Fixed timestep interval (~60 FPS) |
//! | `REVEAL_DELAY_MS` | 800 | Both tiles visible before the pair is evaluated |
//! | `MATCH_FEEDBACK_MS` | 500 | Match feedback before layer completion is checked |
//! | `MISMATCH_FLIP_BACK_MS` | 600 | Mismatched tiles stay visible before flipping back |
//! | `WIN_TRANSITION_MS` | 1000 | Pause between clearing the last layer and the end screen |
//!
//! # Examples
//!
//! ```
//! use tilematch_types::{Difficulty, NoteId, TileId};
//!
//! let difficulty = Difficulty::from_str("HARD").unwrap();
//! assert_eq!(difficulty.layer_sizes(), &[6, 6, 4, 2]);
//!
//! let id = TileId::parse("layer1-tile7").unwrap();
//! assert_eq!(id, TileId::new(1, 7));
//! assert_eq!(id.to_string(), "layer1-tile7");
//!
//! assert_eq!(NoteId::new(69).name(), "A4");
//! ```

use std::fmt;

/// Fixed timestep interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Reveal pause after the second tile of a pair is flipped.
pub const REVEAL_DELAY_MS: u32 = 800;

/// Pause after a successful match before the layer is checked for completion.
pub const MATCH_FEEDBACK_MS: u32 = 500;

/// Pause after a mismatch before both tiles flip back face down.
pub const MISMATCH_FLIP_BACK_MS: u32 = 600;

/// Pause between clearing the innermost layer and entering the ended phase.
pub const WIN_TRANSITION_MS: u32 = 1000;

/// Lowest note identifier handed out by the board generator.
pub const NOTE_POOL_MIN: u8 = 1;

/// Highest note identifier handed out by the board generator.
pub const NOTE_POOL_MAX: u8 = 128;

/// Number of distinct notes available to a single layer.
pub const NOTE_POOL_SIZE: usize = (NOTE_POOL_MAX - NOTE_POOL_MIN) as usize + 1;

/// Horizontal distance between neighbouring tile centres.
pub const TILE_SPACING: f32 = 1.2;

/// Vertical distance between stacked layers.
pub const LAYER_HEIGHT_STEP: f32 = 0.3;

/// Namespace key the leaderboard record is stored under.
pub const LEADERBOARD_KEY: &str = "tileMatchLeaderboard";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timing_defaults() {
        assert_eq!(REVEAL_DELAY_MS, 800);
        assert_eq!(MATCH_FEEDBACK_MS, 500);
        assert_eq!(MISMATCH_FLIP_BACK_MS, 600);
        assert_eq!(WIN_TRANSITION_MS, 1000);
        assert_eq!(NOTE_POOL_SIZE, 128);
    }

    #[test]
    fn every_difficulty_layer_pairs_evenly() {
        for difficulty in Difficulty::ALL {
            for &size in difficulty.layer_sizes() {
                let cells = size as usize * size as usize;
                assert_eq!(cells % 2, 0, "{:?} size {}", difficulty, size);
                assert!(cells / 2 <= NOTE_POOL_SIZE);
            }
        }
    }

    #[test]
    fn tile_id_parse_rejects_garbage() {
        assert_eq!(TileId::parse("layer0-tile0"), Some(TileId::new(0, 0)));
        assert_eq!(TileId::parse("layer-tile0"), None);
        assert_eq!(TileId::parse("layer0tile0"), None);
        assert_eq!(TileId::parse("layer0-tile"), None);
        assert_eq!(TileId::parse("tile0-layer0"), None);
        assert_eq!(TileId::parse("layer300-tile0"), None);
    }

    #[test]
    fn note_names_follow_midi_octaves() {
        assert_eq!(NoteId::new(60).name(), "C4");
        assert_eq!(NoteId::new(61).name(), "C#4");
        assert_eq!(NoteId::new(1).name(), "C#-1");
        assert_eq!(NoteId::new(127).name(), "G9");
        assert_eq!(NoteId::new(128).name(), "G#9");
    }

    #[test]
    fn note_frequency_is_equal_tempered() {
        assert!((NoteId::new(69).frequency_hz() - 440.0).abs() < 1e-3);
        assert!((NoteId::new(81).frequency_hz() - 880.0).abs() < 1e-3);
        assert!((NoteId::new(60).frequency_hz() - 261.626).abs() < 1e-2);
    }
}

/// Difficulty level selecting the stacked grid layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// All difficulties, easiest first.
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Grid sizes indexed by layer index (last entry is played first).
    pub fn layer_sizes(&self) -> &'static [u8] {
        match self {
            Difficulty::Easy => &[4, 2],
            Difficulty::Medium => &[6, 4, 2],
            Difficulty::Hard => &[6, 6, 4, 2],
        }
    }

    /// Total tile count over every layer.
    pub fn tile_count(&self) -> usize {
        self.layer_sizes()
            .iter()
            .map(|&n| n as usize * n as usize)
            .sum()
    }

    /// Parse difficulty from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tilematch_types::Difficulty;
    ///
    /// assert_eq!(Difficulty::from_str("easy"), Some(Difficulty::Easy));
    /// assert_eq!(Difficulty::from_str("Medium"), Some(Difficulty::Medium));
    /// assert_eq!(Difficulty::from_str("nightmare"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// Display label used by the menu and end screen.
    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    /// Next difficulty, wrapping from Hard back to Easy.
    pub fn next(&self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Medium,
            Difficulty::Medium => Difficulty::Hard,
            Difficulty::Hard => Difficulty::Easy,
        }
    }

    /// Previous difficulty, wrapping from Easy back to Hard.
    pub fn prev(&self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Hard,
            Difficulty::Medium => Difficulty::Easy,
            Difficulty::Hard => Difficulty::Medium,
        }
    }
}

/// Session phase.
///
/// `Menu → Playing → Ended`, and any phase resets back to `Menu`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GamePhase {
    #[default]
    Menu,
    Playing,
    Ended,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Menu => "menu",
            GamePhase::Playing => "playing",
            GamePhase::Ended => "ended",
        }
    }
}

/// Tile identity: owning layer plus row-major index inside that layer.
///
/// Displays as `layer{L}-tile{I}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId {
    pub layer: u8,
    pub index: u16,
}

impl TileId {
    pub const fn new(layer: u8, index: u16) -> Self {
        Self { layer, index }
    }

    /// Parse the `layer{L}-tile{I}` textual form.
    pub fn parse(s: &str) -> Option<Self> {
        let rest = s.strip_prefix("layer")?;
        let (layer, index) = rest.split_once("-tile")?;
        Some(Self {
            layer: layer.parse().ok()?,
            index: index.parse().ok()?,
        })
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "layer{}-tile{}", self.layer, self.index)
    }
}

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Note identifier: the MIDI number tiles are paired on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NoteId(pub u8);

impl NoteId {
    pub const fn new(midi: u8) -> Self {
        Self(midi)
    }

    pub fn midi(&self) -> u8 {
        self.0
    }

    /// Scientific pitch name (`60` is `C4`).
    pub fn name(&self) -> String {
        let pitch = NOTE_NAMES[(self.0 % 12) as usize];
        let octave = (self.0 / 12) as i32 - 1;
        format!("{}{}", pitch, octave)
    }

    /// Equal-tempered frequency with A4 (MIDI 69) at 440 Hz.
    pub fn frequency_hz(&self) -> f64 {
        440.0 * 2f64.powf((self.0 as f64 - 69.0) / 12.0)
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Commands collaborators can issue against a game session.
///
/// These are used by the terminal front-end and by scripted drivers alike.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameCommand {
    /// Build a fresh board for the given difficulty
    Init(Difficulty),
    /// Menu -> Playing
    StartPlaying,
    /// Flip a tile face up
    Flip(TileId),
    /// Dismiss the transient matched-note popup
    ClearMatchedNote,
    /// Set (or clear, when empty) the team identifier
    SetTeam(String),
    /// Playing -> Ended
    EndGame,
    /// Discard the session and return to the menu
    Reset,
}

impl GameCommand {
    /// Command name as used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            GameCommand::Init(_) => "init",
            GameCommand::StartPlaying => "startPlaying",
            GameCommand::Flip(_) => "flip",
            GameCommand::ClearMatchedNote => "clearMatchedNote",
            GameCommand::SetTeam(_) => "setTeam",
            GameCommand::EndGame => "endGame",
            GameCommand::Reset => "reset",
        }
    }
}
