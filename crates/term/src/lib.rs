//! Terminal rendering for the tile game.
//!
//! Screens are drawn into a plain framebuffer by [`BoardView`] and flushed to
//! the terminal by [`TerminalRenderer`], which only writes cells that changed.
//! No widget toolkit is involved.

pub mod board_view;
pub mod fb;
pub mod renderer;

pub use tilematch_core as core;
pub use tilematch_input as input;
pub use tilematch_types as types;

pub use board_view::{AppView, BoardView, Viewport};
pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use renderer::{dirty_runs, encode_diff_into, encode_full_into, DirtyRun, TerminalRenderer};
