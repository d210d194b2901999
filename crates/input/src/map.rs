//! Key mapping from terminal events to UI commands.
//!
//! The same key means different things per screen: on the menu printable keys
//! type the team name, while in play `h`/`j`/`k`/`l` move the cursor.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Screen the key arrives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Screen {
    #[default]
    Menu,
    Playing,
    Ended,
    Leaderboard,
}

/// What the app controller should do with a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiCommand {
    CursorUp,
    CursorDown,
    CursorLeft,
    CursorRight,
    /// Flip the tile under the cursor.
    Flip,
    NextDifficulty,
    PrevDifficulty,
    /// Build a board at the selected difficulty and enter play.
    StartGame,
    /// Append a character to the team name.
    TypeChar(char),
    Backspace,
    DismissPopup,
    ShowLeaderboard,
    /// Leave the leaderboard screen.
    Back,
    /// Abandon the session and return to the menu.
    BackToMenu,
}

fn is_team_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, ' ' | '-' | '_' | '.')
}

/// Map a key on `screen` to a command.
pub fn map_key(screen: Screen, key: KeyEvent) -> Option<UiCommand> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }

    match screen {
        Screen::Menu => match key.code {
            KeyCode::Left | KeyCode::Up => Some(UiCommand::PrevDifficulty),
            KeyCode::Right | KeyCode::Down => Some(UiCommand::NextDifficulty),
            KeyCode::Enter => Some(UiCommand::StartGame),
            KeyCode::Tab => Some(UiCommand::ShowLeaderboard),
            KeyCode::Backspace | KeyCode::Delete => Some(UiCommand::Backspace),
            KeyCode::Char(c) if is_team_char(c) => Some(UiCommand::TypeChar(c)),
            _ => None,
        },
        Screen::Playing => match key.code {
            KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('a') | KeyCode::Char('A') => {
                Some(UiCommand::CursorLeft)
            }
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('L') | KeyCode::Char('d') | KeyCode::Char('D') => {
                Some(UiCommand::CursorRight)
            }
            KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('K') | KeyCode::Char('w') | KeyCode::Char('W') => {
                Some(UiCommand::CursorUp)
            }
            KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J') | KeyCode::Char('s') | KeyCode::Char('S') => {
                Some(UiCommand::CursorDown)
            }
            KeyCode::Char(' ') | KeyCode::Enter => Some(UiCommand::Flip),
            KeyCode::Char('x') | KeyCode::Char('X') => Some(UiCommand::DismissPopup),
            KeyCode::Tab => Some(UiCommand::ShowLeaderboard),
            KeyCode::Char('r') | KeyCode::Char('R') => Some(UiCommand::BackToMenu),
            _ => None,
        },
        Screen::Ended => match key.code {
            KeyCode::Enter | KeyCode::Char('r') | KeyCode::Char('R') => Some(UiCommand::BackToMenu),
            KeyCode::Tab => Some(UiCommand::ShowLeaderboard),
            _ => None,
        },
        Screen::Leaderboard => match key.code {
            KeyCode::Esc | KeyCode::Tab | KeyCode::Enter | KeyCode::Backspace => Some(UiCommand::Back),
            _ => None,
        },
    }
}

/// Check if key should quit the program.
///
/// `q` types into the team name on the menu, so only Esc and Ctrl-C quit there.
pub fn should_quit(screen: Screen, key: KeyEvent) -> bool {
    if key.kind == KeyEventKind::Release {
        return false;
    }
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }
    match screen {
        Screen::Menu => key.code == KeyCode::Esc,
        Screen::Leaderboard => false,
        Screen::Playing | Screen::Ended => {
            matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc)
        }
    }
}
