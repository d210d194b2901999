//! BoardView: maps a game snapshot plus UI state into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::{format_elapsed, GameSnapshot, Layer, Tile};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::input::Screen;
use crate::types::Difficulty;

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Everything one frame needs: the engine snapshot and the app's own UI state.
#[derive(Debug, Clone, Copy)]
pub struct AppView<'a> {
    pub screen: Screen,
    pub snapshot: &'a GameSnapshot,
    /// `(row, col)` on the current layer.
    pub cursor: (u8, u8),
    pub menu_difficulty: Difficulty,
    pub team_input: &'a str,
    /// Leaderboard rows, best first.
    pub leaderboard: &'a [(String, f64)],
    /// One-line status (save result, hints).
    pub message: Option<&'a str>,
}

const BG: Rgb = Rgb::new(0, 0, 0);
const BOARD_BG: Rgb = Rgb::new(24, 26, 38);
const CURSOR_BG: Rgb = Rgb::new(70, 80, 140);

const TEXT: CellStyle = CellStyle::new(Rgb::new(210, 210, 210), BG);
const LABEL: CellStyle = CellStyle::new(Rgb::new(230, 230, 230), BG).bold();
const HINT: CellStyle = CellStyle::new(Rgb::new(130, 130, 140), BG).dim();
const TITLE: CellStyle = CellStyle::new(Rgb::new(120, 200, 255), BG).bold();
const BORDER: CellStyle = CellStyle::new(Rgb::new(170, 170, 190), BG);
const POPUP: CellStyle = CellStyle::new(Rgb::new(255, 230, 120), BG).bold();

const FACE_DOWN: CellStyle = CellStyle::new(Rgb::new(110, 110, 150), BOARD_BG);
const FACE_UP: CellStyle = CellStyle::new(Rgb::new(255, 220, 90), BOARD_BG).bold();
const MATCHED: CellStyle = CellStyle::new(Rgb::new(100, 210, 120), BOARD_BG).dim();

/// Terminal view of the tile game.
pub struct BoardView {
    /// Tile width in terminal columns (brackets included).
    tile_w: u16,
    /// Rows per tile row (the last one is spacing).
    tile_h: u16,
}

impl Default for BoardView {
    fn default() -> Self {
        Self {
            tile_w: 6,
            tile_h: 2,
        }
    }
}

impl BoardView {
    pub fn new(tile_w: u16, tile_h: u16) -> Self {
        Self {
            tile_w: tile_w.max(3),
            tile_h: tile_h.max(1),
        }
    }

    /// Render into an existing framebuffer, resizing it to the viewport.
    pub fn render_into(&self, view: &AppView<'_>, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(TEXT);

        match view.screen {
            Screen::Menu => self.draw_menu(fb, view),
            Screen::Playing => self.draw_playing(fb, view),
            Screen::Ended => self.draw_ended(fb, view),
            Screen::Leaderboard => self.draw_leaderboard(fb, view),
        }

        if let Some(message) = view.message {
            let y = viewport.height.saturating_sub(2);
            fb.put_str_centered(y, message, TEXT);
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, view: &AppView<'_>, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(view, viewport, &mut fb);
        fb
    }

    fn draw_footer(&self, fb: &mut FrameBuffer, hint: &str) {
        let y = fb.height().saturating_sub(1);
        fb.put_str_centered(y, hint, HINT);
    }

    fn draw_menu(&self, fb: &mut FrameBuffer, view: &AppView<'_>) {
        let top = fb.height().saturating_sub(10) / 2;
        fb.put_str_centered(top, "T I L E   M A T C H", TITLE);
        fb.put_str_centered(top + 1, "match the notes, clear the layers", HINT);

        let d = view.menu_difficulty;
        let line = format!("Difficulty:  < {} >", d.label());
        fb.put_str_centered(top + 3, &line, LABEL);
        let sizes: Vec<String> = d
            .layer_sizes()
            .iter()
            .rev()
            .map(|n| format!("{n}x{n}"))
            .collect();
        let detail = format!("{} tiles  ({})", d.tile_count(), sizes.join(", "));
        fb.put_str_centered(top + 4, &detail, HINT);

        let team = format!("Team:  {}_", view.team_input);
        fb.put_str_centered(top + 6, &team, LABEL);
        if view.team_input.trim().is_empty() {
            fb.put_str_centered(top + 7, "(no team: scores are not saved)", HINT);
        }

        self.draw_footer(fb, "←/→ difficulty  type team  enter start  tab scores  esc quit");
    }

    fn draw_playing(&self, fb: &mut FrameBuffer, view: &AppView<'_>) {
        let snap = view.snapshot;
        let Some(layer) = snap.current_layer() else {
            fb.put_str_centered(fb.height() / 2, "no board", HINT);
            return;
        };

        let n = layer.grid_size as u16;
        let frame_w = n * self.tile_w + 2;
        let frame_h = n * self.tile_h + 1;
        let panel_w = 24;
        let start_x = fb.width().saturating_sub(frame_w + panel_w) / 2;
        let start_y = 2;

        let total = snap.layers.len();
        let title = format!(
            "Layer {}/{}  ({}x{})",
            total - snap.current_layer,
            total,
            n,
            n
        );
        fb.put_str(start_x, 0, &title, TITLE);

        fb.fill_rect(start_x + 1, start_y + 1, frame_w - 2, frame_h - 2, ' ', FACE_DOWN);
        fb.draw_box(start_x, start_y, frame_w, frame_h, BORDER);

        for row in 0..layer.grid_size {
            for col in 0..layer.grid_size {
                if let Some(tile) = layer.tile(row, col) {
                    let selected = view.cursor == (row, col);
                    let x = start_x + 1 + col as u16 * self.tile_w;
                    let y = start_y + 1 + row as u16 * self.tile_h;
                    self.draw_tile(fb, x, y, tile, selected);
                }
            }
        }

        let panel_x = start_x + frame_w + 2;
        self.draw_side_panel(fb, snap, panel_x, start_y);

        if let Some(note) = snap.matched_note {
            let popup = format!("♪ {}  {:.1} Hz", note.name(), note.frequency_hz());
            let y = start_y + frame_h + 1;
            let x = start_x + frame_w.saturating_sub(popup.chars().count() as u16) / 2;
            fb.put_str(x, y, &popup, POPUP);
        }

        self.draw_footer(fb, "arrows move  space flip  x dismiss  tab scores  r menu  q quit");
    }

    fn draw_tile(&self, fb: &mut FrameBuffer, x: u16, y: u16, tile: &Tile, selected: bool) {
        let inner = (self.tile_w - 2) as usize;
        let (text, mut style) = if tile.matched {
            (tile.note.name(), MATCHED)
        } else if tile.flipped {
            (tile.note.name(), FACE_UP)
        } else {
            ("░".repeat(inner), FACE_DOWN)
        };
        if selected {
            style = style.on(CURSOR_BG);
        }
        let label = format!("[{:^inner$}]", text, inner = inner);
        fb.put_str(x, y, &label, style);
    }

    fn draw_side_panel(&self, fb: &mut FrameBuffer, snap: &GameSnapshot, x: u16, y: u16) {
        if x >= fb.width() {
            return;
        }
        let mut y = y;
        let mut stat = |fb: &mut FrameBuffer, label: &str, value: &str| {
            fb.put_str(x, y, label, LABEL);
            fb.put_str(x + 7, y, value, TEXT);
            y += 1;
        };
        stat(fb, "MOVES", &snap.moves.to_string());
        stat(fb, "TIME", &format_elapsed(snap.elapsed_secs));
        let score = snap
            .score
            .map(|s| format!("{s:.2}"))
            .unwrap_or_else(|| "-".to_string());
        stat(fb, "SCORE", &score);
        stat(fb, "TEAM", snap.team_id.as_deref().unwrap_or("-"));
        stat(fb, "LAYERS", &layer_strip(&snap.layers));

        y += 1;
        let heading = format!("NOTES ({})", snap.discovered_notes.len());
        fb.put_str(x, y, &heading, LABEL);
        y += 1;

        // Most recent discoveries, four per row.
        let recent: Vec<String> = snap
            .discovered_notes
            .iter()
            .rev()
            .take(12)
            .map(|n| n.name())
            .collect();
        for chunk in recent.chunks(4) {
            if y >= fb.height().saturating_sub(2) {
                break;
            }
            fb.put_str(x, y, &chunk.join(" "), TEXT);
            y += 1;
        }

        if snap.busy {
            fb.put_str(x, y + 1, "…", HINT);
        }
    }

    fn draw_ended(&self, fb: &mut FrameBuffer, view: &AppView<'_>) {
        let snap = view.snapshot;
        let won = !snap.layers.is_empty() && snap.layers.iter().all(|l| l.cleared);
        let top = fb.height().saturating_sub(10) / 2;

        let title = if won { "ALL LAYERS CLEARED" } else { "GAME OVER" };
        fb.put_str_centered(top, title, TITLE);

        let lines = [
            format!("Difficulty  {}", snap.difficulty.label()),
            format!("Time        {}", format_elapsed(snap.elapsed_secs)),
            format!("Moves       {}", snap.moves),
            format!(
                "Score       {}",
                snap.score
                    .map(|s| format!("{s:.2}"))
                    .unwrap_or_else(|| "-".to_string())
            ),
            format!("Notes       {}", snap.discovered_notes.len()),
        ];
        for (i, line) in lines.iter().enumerate() {
            fb.put_str_centered(top + 2 + i as u16, line, TEXT);
        }

        self.draw_footer(fb, "enter menu  tab scores  q quit");
    }

    fn draw_leaderboard(&self, fb: &mut FrameBuffer, view: &AppView<'_>) {
        fb.put_str_centered(1, "LEADERBOARD", TITLE);
        fb.put_str_centered(2, "lower is better (seconds per move)", HINT);

        if view.leaderboard.is_empty() {
            fb.put_str_centered(4, "No scores yet", TEXT);
        } else {
            let last_row = fb.height().saturating_sub(3);
            for (i, (team, score)) in view.leaderboard.iter().enumerate() {
                let y = 4 + i as u16;
                if y >= last_row {
                    break;
                }
                let highlight = view.snapshot.team_id.as_deref() == Some(team.as_str());
                let style = if highlight { LABEL } else { TEXT };
                let row = format!("{:>3}. {:<18} {:>8.2}", i + 1, team, score);
                fb.put_str_centered(y, &row, style);
            }
        }

        self.draw_footer(fb, "esc back");
    }
}

/// One glyph per layer in play order: cleared, current, locked.
fn layer_strip(layers: &[Layer]) -> String {
    layers
        .iter()
        .rev()
        .map(|l| {
            if l.cleared {
                '■'
            } else if l.active {
                '▣'
            } else {
                '□'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameState;

    fn view<'a>(screen: Screen, snap: &'a GameSnapshot) -> AppView<'a> {
        AppView {
            screen,
            snapshot: snap,
            cursor: (0, 0),
            menu_difficulty: Difficulty::Medium,
            team_input: "",
            leaderboard: &[],
            message: None,
        }
    }

    #[test]
    fn menu_shows_difficulty_and_team() {
        let snap = GameSnapshot::default();
        let mut v = view(Screen::Menu, &snap);
        v.team_input = "Owls";
        let fb = BoardView::default().render(&v, Viewport::new(80, 24));
        assert!(fb.contains_text("< Medium >"));
        assert!(fb.contains_text("56 tiles"));
        assert!(fb.contains_text("Team:  Owls_"));
    }

    #[test]
    fn playing_draws_face_down_grid_and_stats() {
        let mut game = GameState::new(3);
        game.init_game(Difficulty::Easy);
        game.start_playing();
        let snap = game.snapshot();
        let fb = BoardView::default().render(&view(Screen::Playing, &snap), Viewport::new(80, 24));

        assert!(fb.contains_text("Layer 1/2"));
        assert!(fb.contains_text("[░░░░]"));
        assert!(fb.contains_text("MOVES  0"));
        assert!(fb.contains_text("▣□"));
    }

    #[test]
    fn flipped_tile_shows_note_name() {
        let mut game = GameState::new(3);
        game.init_game(Difficulty::Easy);
        game.start_playing();
        let tile = game.current_layer().unwrap().tiles[0].clone();
        assert!(game.flip_tile(tile.id));

        let snap = game.snapshot();
        let fb = BoardView::default().render(&view(Screen::Playing, &snap), Viewport::new(80, 24));
        assert!(fb.contains_text(&tile.note.name()));
        assert!(fb.contains_text("MOVES  1"));
    }

    #[test]
    fn leaderboard_lists_rows_in_order() {
        let snap = GameSnapshot::default();
        let rows = vec![("B".to_string(), 2.0), ("A".to_string(), 5.0)];
        let mut v = view(Screen::Leaderboard, &snap);
        v.leaderboard = &rows;
        let fb = BoardView::default().render(&v, Viewport::new(60, 12));
        assert!(fb.contains_text("  1. B"));
        assert!(fb.contains_text("  2. A"));
        assert!(fb.contains_text("5.00"));
    }

    #[test]
    fn empty_leaderboard_says_so() {
        let snap = GameSnapshot::default();
        let fb = BoardView::default().render(&view(Screen::Leaderboard, &snap), Viewport::new(40, 10));
        assert!(fb.contains_text("No scores yet"));
    }

    #[test]
    fn message_line_is_drawn() {
        let snap = GameSnapshot::default();
        let mut v = view(Screen::Ended, &snap);
        v.message = Some("saved");
        let fb = BoardView::default().render(&v, Viewport::new(40, 12));
        assert!(fb.contains_text("GAME OVER"));
        assert!(fb.contains_text("saved"));
    }

    #[test]
    fn tiny_viewport_does_not_panic() {
        let mut game = GameState::new(1);
        game.init_game(Difficulty::Hard);
        let snap = game.snapshot();
        for screen in [Screen::Menu, Screen::Playing, Screen::Ended, Screen::Leaderboard] {
            let fb = BoardView::default().render(&view(screen, &snap), Viewport::new(5, 3));
            assert_eq!(fb.width(), 5);
        }
    }
}
