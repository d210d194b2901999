//! Core game logic module - pure, deterministic, and testable
//!
//! This crate contains the board generator, the tile/layer model, the match
//! engine and the layer progression rules. It has **no dependencies** on
//! terminals, storage or wall-clock time, making it:
//!
//! - **Deterministic**: Same seed produces the same boards
//! - **Testable**: Every delayed step is driven by an explicit [`GameState::tick`]
//! - **Portable**: Any front-end can read snapshots and issue commands
//!
//! # Module Structure
//!
//! - [`board`]: tiles, layers and the layered-grid generator
//! - [`game_state`]: the session: match engine, layer progression, phases
//! - [`rng`]: seeded LCG and the note pool
//! - [`scoring`]: leaderboard score formula
//! - [`snapshot`]: read-only copies for collaborators
//! - [`timer`]: non-cancellable timer queue keyed by session
//!
//! # Game Rules
//!
//! - Flip two tiles on the active layer; equal notes match and stay face up
//! - The pair is revealed for 800ms before it is judged
//! - Mismatches flip back after 600ms; flips while a pair resolves are dropped
//! - A fully matched layer is cleared and the next inner layer unlocks
//! - Clearing layer 0 wins; the session ends 1000ms later
//!
//! # Example
//!
//! ```
//! use tilematch_core::GameState;
//! use tilematch_core::types::{Difficulty, GamePhase, REVEAL_DELAY_MS};
//!
//! let mut game = GameState::new(12345);
//! game.init_game(Difficulty::Easy);
//! game.start_playing();
//!
//! let layer = game.current_layer().unwrap();
//! let first = &layer.tiles[0];
//! let partner = layer
//!     .tiles
//!     .iter()
//!     .find(|t| t.note == first.note && t.id != first.id)
//!     .unwrap();
//! let (a, b) = (first.id, partner.id);
//!
//! assert!(game.flip_tile(a));
//! assert!(game.flip_tile(b));
//! game.tick(REVEAL_DELAY_MS);
//!
//! assert!(game.board().tile(a).unwrap().matched);
//! assert_eq!(game.moves(), 2);
//! assert_eq!(game.phase(), GamePhase::Playing);
//! ```

pub mod board;
pub mod game_state;
pub mod rng;
pub mod scoring;
pub mod snapshot;
pub mod timer;

pub use tilematch_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, BoardError, Layer, Tile};
pub use game_state::{EngineState, GameEvent, GameState};
pub use rng::{NotePool, SimpleRng};
pub use scoring::{calculate_score, format_elapsed};
pub use snapshot::GameSnapshot;
pub use timer::{ScheduledTimer, Scheduler, TimerKind};
