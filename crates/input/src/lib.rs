//! Terminal input module.
//!
//! Maps `crossterm` key events into [`UiCommand`]s for the screen that is
//! currently shown. Engine commands are issued by the app controller; this
//! crate only knows about keys.

pub mod map;

pub use tilematch_types as types;

pub use map::{map_key, should_quit, Screen, UiCommand};
