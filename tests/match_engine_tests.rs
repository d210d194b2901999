//! Match engine tests: flip gating, reveal window, match and mismatch resolution

use tilematch::core::{EngineState, GameEvent, GameState};
use tilematch::types::{
    Difficulty, GamePhase, NoteId, TileId, MATCH_FEEDBACK_MS, MISMATCH_FLIP_BACK_MS,
    REVEAL_DELAY_MS,
};

fn playing(difficulty: Difficulty) -> GameState {
    let mut state = GameState::new(4242);
    state.init_game(difficulty);
    state.start_playing();
    state
}

fn active_tiles(state: &GameState) -> Vec<(TileId, NoteId)> {
    state
        .current_layer()
        .unwrap()
        .tiles
        .iter()
        .filter(|t| !t.matched)
        .map(|t| (t.id, t.note))
        .collect()
}

fn pair(state: &GameState) -> (TileId, TileId) {
    let tiles = active_tiles(state);
    let (a, note) = tiles[0];
    let b = tiles[1..].iter().find(|(_, n)| *n == note).unwrap().0;
    (a, b)
}

fn non_pair(state: &GameState) -> (TileId, TileId) {
    let tiles = active_tiles(state);
    let (a, note) = tiles[0];
    let b = tiles[1..].iter().find(|(_, n)| *n != note).unwrap().0;
    (a, b)
}

#[test]
fn test_third_flip_is_ignored() {
    let mut state = playing(Difficulty::Medium);
    let tiles = active_tiles(&state);
    assert!(state.flip_tile(tiles[0].0));
    assert!(state.flip_tile(tiles[1].0));
    let before = state.snapshot();

    assert!(!state.flip_tile(tiles[2].0));
    assert_eq!(state.snapshot(), before);
    assert!(!state.board().tile(tiles[2].0).unwrap().flipped);
    assert_eq!(state.moves(), 2);
}

#[test]
fn test_same_tile_twice_is_ignored() {
    let mut state = playing(Difficulty::Easy);
    let (a, _) = active_tiles(&state)[0];
    assert!(state.flip_tile(a));
    assert!(!state.flip_tile(a));
    assert_eq!(state.pending(), &[a]);
    assert_eq!(state.moves(), 1);
    assert_eq!(state.engine_state(), EngineState::AwaitingSecondFlip);
}

#[test]
fn test_match_resolution() {
    let mut state = playing(Difficulty::Easy);
    let (a, b) = pair(&state);
    let note = state.board().tile(a).unwrap().note;

    state.flip_tile(a);
    state.flip_tile(b);
    assert_eq!(state.engine_state(), EngineState::Resolving);
    state.tick(REVEAL_DELAY_MS);

    for id in [a, b] {
        let tile = state.board().tile(id).unwrap();
        assert!(tile.matched);
        assert!(tile.flipped);
    }
    assert!(state.pending().is_empty());
    assert_eq!(state.discovered_notes(), &[note]);
    assert_eq!(state.matched_note(), Some(note));

    // Still locked during match feedback.
    assert!(state.is_busy());
    state.tick(MATCH_FEEDBACK_MS);
    assert!(!state.is_busy());
    assert_eq!(state.engine_state(), EngineState::Idle);
}

#[test]
fn test_mismatch_flips_back() {
    let mut state = playing(Difficulty::Easy);
    let (a, b) = non_pair(&state);

    state.flip_tile(a);
    state.flip_tile(b);
    state.tick(REVEAL_DELAY_MS);

    // Visible during the flip-back window.
    assert!(state.board().tile(a).unwrap().flipped);
    assert!(state.is_busy());

    state.tick(MISMATCH_FLIP_BACK_MS);
    for id in [a, b] {
        let tile = state.board().tile(id).unwrap();
        assert!(!tile.flipped);
        assert!(!tile.matched);
    }
    assert!(state.pending().is_empty());
    assert!(!state.is_busy());
    assert!(state.discovered_notes().is_empty());
    assert_eq!(state.moves(), 2);
}

#[test]
fn test_reveal_window_holds_state() {
    let mut state = playing(Difficulty::Easy);
    let (a, b) = pair(&state);
    state.flip_tile(a);
    state.flip_tile(b);

    state.tick(REVEAL_DELAY_MS - 1);
    assert!(!state.board().tile(a).unwrap().matched);
    assert_eq!(state.pending().len(), 2);

    state.tick(1);
    assert!(state.board().tile(a).unwrap().matched);
}

#[test]
fn test_flips_while_resolving_are_dropped() {
    let mut state = playing(Difficulty::Easy);
    let (a, b) = non_pair(&state);
    state.flip_tile(a);
    state.flip_tile(b);
    state.tick(REVEAL_DELAY_MS);

    let other = active_tiles(&state)
        .into_iter()
        .map(|(id, _)| id)
        .find(|id| *id != a && *id != b)
        .unwrap();
    assert!(!state.flip_tile(other));
    state.tick(MISMATCH_FLIP_BACK_MS);
    assert!(state.flip_tile(other));
}

#[test]
fn test_discovered_notes_keep_first_discovery_order() {
    let mut state = playing(Difficulty::Easy);
    let mut matched = Vec::new();
    while !active_tiles(&state).is_empty() {
        let (a, b) = pair(&state);
        matched.push(state.board().tile(a).unwrap().note);
        state.flip_tile(a);
        state.flip_tile(b);
        state.tick(REVEAL_DELAY_MS + MATCH_FEEDBACK_MS);
    }
    assert_eq!(matched.len(), Difficulty::Easy.tile_count() / 2);

    let mut expected: Vec<NoteId> = Vec::new();
    for note in matched {
        if !expected.contains(&note) {
            expected.push(note);
        }
    }
    assert_eq!(state.discovered_notes(), expected.as_slice());
}

#[test]
fn test_inactive_tiles_cannot_flip() {
    let mut state = playing(Difficulty::Easy);
    let inner = state.board().layer(0).unwrap().tiles[0].id;
    assert!(!state.flip_tile(inner));
    assert!(!state.flip_tile(TileId::new(9, 0)));
    assert_eq!(state.moves(), 0);
}

#[test]
fn test_events_are_published() {
    let mut state = playing(Difficulty::Easy);
    assert_eq!(state.pop_event(), Some(GameEvent::PhaseChanged(GamePhase::Playing)));

    let (a, b) = pair(&state);
    state.flip_tile(a);
    state.flip_tile(b);
    state.tick(REVEAL_DELAY_MS);

    assert_eq!(state.pop_event(), Some(GameEvent::TileFlipped(a)));
    assert_eq!(state.pop_event(), Some(GameEvent::TileFlipped(b)));
    let note = state.board().tile(a).unwrap().note;
    assert_eq!(
        state.pop_event(),
        Some(GameEvent::NoteMatched {
            note,
            first_discovery: true
        })
    );
    assert_eq!(state.pop_event(), None);
}

#[test]
fn test_clock_starts_on_first_flip() {
    let mut state = playing(Difficulty::Easy);
    state.tick(5000);
    assert_eq!(state.elapsed_ms(), 0);

    let (a, _) = active_tiles(&state)[0];
    state.flip_tile(a);
    state.tick(2500);
    assert_eq!(state.elapsed_ms(), 2500);
    assert_eq!(state.elapsed_secs(), 2);
    assert_eq!(state.score(), Some(2.0));
}
