//! App controller: turns UI commands into engine operations.
//!
//! Owns the [`GameState`] and the [`Leaderboard`] and keeps the presentation
//! state the engine does not know about: which screen is up, the tile cursor,
//! the menu selections, popup and leaderboard refresh timers. Like the engine
//! it is advanced only by [`App::tick`].

use crate::core::{GameEvent, GameSnapshot, GameState};
use crate::input::{Screen, UiCommand};
use crate::leaderboard::{KeyValueStore, Leaderboard};
use crate::term::AppView;
use crate::types::{Difficulty, GamePhase, TileId};

/// Matched-note popup lifetime.
pub const POPUP_DISMISS_MS: u32 = 2000;

/// Leaderboard re-read interval while the leaderboard screen is shown.
pub const LEADERBOARD_REFRESH_MS: u32 = 2000;

/// Longest team name accepted from the keyboard.
pub const MAX_TEAM_LEN: usize = 20;

pub struct App<S: KeyValueStore> {
    game: GameState,
    leaderboard: Leaderboard<S>,
    screen: Screen,
    /// Screen to go back to when the leaderboard closes.
    return_screen: Screen,
    cursor: (u8, u8),
    menu_difficulty: Difficulty,
    team_input: String,
    rows: Vec<(String, f64)>,
    popup_ms: u32,
    refresh_ms: u32,
    /// Session whose score was already submitted.
    submitted_session: Option<u32>,
    message: Option<String>,
    snapshot: GameSnapshot,
}

impl<S: KeyValueStore> App<S> {
    pub fn new(seed: u32, leaderboard: Leaderboard<S>) -> Self {
        Self {
            game: GameState::new(seed),
            leaderboard,
            screen: Screen::Menu,
            return_screen: Screen::Menu,
            cursor: (0, 0),
            menu_difficulty: Difficulty::default(),
            team_input: String::new(),
            rows: Vec::new(),
            popup_ms: 0,
            refresh_ms: 0,
            submitted_session: None,
            message: None,
            snapshot: GameSnapshot::default(),
        }
    }

    pub fn with_menu(mut self, difficulty: Difficulty, team: Option<&str>) -> Self {
        self.menu_difficulty = difficulty;
        self.team_input = team.unwrap_or_default().chars().take(MAX_TEAM_LEN).collect();
        self
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    pub fn leaderboard(&self) -> &Leaderboard<S> {
        &self.leaderboard
    }

    pub fn leaderboard_mut(&mut self) -> &mut Leaderboard<S> {
        &mut self.leaderboard
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn cursor(&self) -> (u8, u8) {
        self.cursor
    }

    pub fn menu_difficulty(&self) -> Difficulty {
        self.menu_difficulty
    }

    pub fn team_input(&self) -> &str {
        &self.team_input
    }

    /// Leaderboard rows as last read.
    pub fn leaderboard_rows(&self) -> &[(String, f64)] {
        &self.rows
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Move the cursor, clamped to the current layer.
    pub fn set_cursor(&mut self, row: u8, col: u8) {
        let max = self
            .game
            .current_layer()
            .map(|l| l.grid_size.saturating_sub(1))
            .unwrap_or(0);
        self.cursor = (row.min(max), col.min(max));
    }

    /// Tile under the cursor.
    pub fn selected_tile(&self) -> Option<TileId> {
        let layer = self.game.current_layer()?;
        let (row, col) = self.cursor;
        layer.tile(row, col).map(|t| t.id)
    }

    /// Apply one UI command. Returns whether anything changed.
    pub fn handle(&mut self, command: UiCommand) -> bool {
        let (row, col) = self.cursor;
        match command {
            UiCommand::CursorUp => self.move_cursor(row.saturating_sub(1), col),
            UiCommand::CursorDown => self.move_cursor(row.saturating_add(1), col),
            UiCommand::CursorLeft => self.move_cursor(row, col.saturating_sub(1)),
            UiCommand::CursorRight => self.move_cursor(row, col.saturating_add(1)),
            UiCommand::Flip => match self.selected_tile() {
                Some(id) => self.game.flip_tile(id),
                None => false,
            },
            UiCommand::NextDifficulty => {
                self.menu_difficulty = self.menu_difficulty.next();
                true
            }
            UiCommand::PrevDifficulty => {
                self.menu_difficulty = self.menu_difficulty.prev();
                true
            }
            UiCommand::StartGame => self.start_game(),
            UiCommand::TypeChar(c) => {
                if self.team_input.chars().count() >= MAX_TEAM_LEN {
                    return false;
                }
                self.team_input.push(c);
                true
            }
            UiCommand::Backspace => self.team_input.pop().is_some(),
            UiCommand::DismissPopup => self.game.clear_matched_note(),
            UiCommand::ShowLeaderboard => {
                if self.screen != Screen::Leaderboard {
                    self.return_screen = self.screen;
                    self.screen = Screen::Leaderboard;
                }
                self.refresh_leaderboard();
                true
            }
            UiCommand::Back => {
                if self.screen != Screen::Leaderboard {
                    return false;
                }
                self.screen = self.return_screen;
                true
            }
            UiCommand::BackToMenu => {
                self.game.reset_game();
                self.screen = Screen::Menu;
                self.return_screen = Screen::Menu;
                self.cursor = (0, 0);
                self.message = None;
                true
            }
        }
    }

    fn move_cursor(&mut self, row: u8, col: u8) -> bool {
        let before = self.cursor;
        self.set_cursor(row, col);
        self.cursor != before
    }

    fn start_game(&mut self) -> bool {
        if self.game.phase() != GamePhase::Menu {
            return false;
        }
        self.game.init_game(self.menu_difficulty);
        self.game.set_team_id(&self.team_input);
        self.game.start_playing();
        self.screen = Screen::Playing;
        self.return_screen = Screen::Menu;
        self.cursor = (0, 0);
        self.popup_ms = 0;
        self.message = None;
        tracing::info!(
            difficulty = self.menu_difficulty.as_str(),
            team = self.game.team_id().unwrap_or("-"),
            "game started"
        );
        true
    }

    /// Advance the engine and the UI timers by `elapsed_ms`.
    pub fn tick(&mut self, elapsed_ms: u32) {
        self.game.tick(elapsed_ms);

        let mut fresh_match = false;
        while let Some(event) = self.game.pop_event() {
            match event {
                GameEvent::NoteMatched { .. } => {
                    fresh_match = true;
                    self.popup_ms = 0;
                }
                GameEvent::LayerCleared { cleared, next } => {
                    tracing::debug!(cleared, next, "cursor reset for next layer");
                    self.cursor = (0, 0);
                }
                GameEvent::GameWon => {
                    self.message = Some("All layers cleared!".to_string());
                }
                _ => {}
            }
        }

        if self.game.matched_note().is_some() && !fresh_match {
            self.popup_ms = self.popup_ms.saturating_add(elapsed_ms);
            if self.popup_ms >= POPUP_DISMISS_MS {
                self.game.clear_matched_note();
                self.popup_ms = 0;
            }
        }

        if self.game.phase() == GamePhase::Ended {
            match self.screen {
                Screen::Playing => self.enter_end_screen(),
                Screen::Leaderboard if self.return_screen == Screen::Playing => {
                    self.return_screen = Screen::Ended;
                    self.submit_score();
                }
                _ => {}
            }
        }

        if self.screen == Screen::Leaderboard {
            self.refresh_ms = self.refresh_ms.saturating_add(elapsed_ms);
            if self.refresh_ms >= LEADERBOARD_REFRESH_MS {
                self.refresh_leaderboard();
            }
        }
    }

    fn enter_end_screen(&mut self) {
        self.screen = Screen::Ended;
        self.submit_score();
    }

    /// Save the finished session's score once, if it has a team and a score.
    fn submit_score(&mut self) {
        let session = self.game.session_id();
        if self.submitted_session == Some(session) {
            return;
        }
        self.submitted_session = Some(session);

        let Some(team) = self.game.team_id().map(str::to_string) else {
            self.message = Some("No team name: score not recorded".to_string());
            return;
        };
        let Some(score) = self.game.score() else {
            self.message = Some("No score to record".to_string());
            return;
        };

        self.message = Some(if self.leaderboard.save_score(&team, score) {
            format!("New best for {team}: {score:.2}")
        } else {
            match self.leaderboard.best(&team) {
                Some(best) => format!("Score {score:.2}, best for {team} stays {best:.2}"),
                None => format!("Score {score:.2} could not be saved"),
            }
        });
    }

    pub fn refresh_leaderboard(&mut self) {
        self.rows = self.leaderboard.sorted();
        self.refresh_ms = 0;
    }

    /// Frame description for the renderer.
    pub fn view(&mut self) -> AppView<'_> {
        self.game.snapshot_into(&mut self.snapshot);
        AppView {
            screen: self.screen,
            snapshot: &self.snapshot,
            cursor: self.cursor,
            menu_difficulty: self.menu_difficulty,
            team_input: &self.team_input,
            leaderboard: &self.rows,
            message: self.message.as_deref(),
        }
    }
}
