//! Leaderboard persistence.
//!
//! A best-effort local cache of each team's lowest score, kept as a single
//! JSON blob in a key-value backend. Not a database: no durability
//! guarantees and no cross-process locking.

pub mod error;
pub mod leaderboard;
pub mod store;

pub use tilematch_types as types;

pub use error::{Result, StoreError};
pub use leaderboard::Leaderboard;
pub use store::{FileStore, KeyValueStore, MemoryStore};
