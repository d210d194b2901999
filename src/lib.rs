//! Tile Match (workspace facade crate).
//!
//! The engine, leaderboard and terminal front-end live in dedicated crates
//! under `crates/`; this package re-exports them as
//! `tilematch::{core,input,leaderboard,term,types}` and adds the app
//! controller and environment config used by the binary.

pub mod app;
pub mod config;

pub use tilematch_core as core;
pub use tilematch_input as input;
pub use tilematch_leaderboard as leaderboard;
pub use tilematch_term as term;
pub use tilematch_types as types;
