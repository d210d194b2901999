use arrayvec::ArrayVec;

use crate::board::Layer;
use crate::game_state::EngineState;
use crate::types::{Difficulty, GamePhase, NoteId, TileId};

/// Read-only copy of a session for renderers, audio and UI.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GameSnapshot {
    pub phase: GamePhase,
    pub difficulty: Difficulty,
    pub layers: Vec<Layer>,
    pub current_layer: usize,
    pub pending: ArrayVec<TileId, 2>,
    pub moves: u32,
    pub elapsed_ms: u64,
    pub elapsed_secs: u64,
    pub busy: bool,
    pub engine_state: EngineState,
    pub discovered_notes: Vec<NoteId>,
    pub matched_note: Option<NoteId>,
    pub team_id: Option<String>,
    pub session_id: u32,
    pub score: Option<f64>,
}

impl GameSnapshot {
    pub fn clear(&mut self) {
        self.phase = GamePhase::Menu;
        self.difficulty = Difficulty::default();
        self.layers.clear();
        self.current_layer = 0;
        self.pending.clear();
        self.moves = 0;
        self.elapsed_ms = 0;
        self.elapsed_secs = 0;
        self.busy = false;
        self.engine_state = EngineState::Idle;
        self.discovered_notes.clear();
        self.matched_note = None;
        self.team_id = None;
        self.session_id = 0;
        self.score = None;
    }

    pub fn current_layer(&self) -> Option<&Layer> {
        self.layers.get(self.current_layer)
    }

    pub fn cleared_layers(&self) -> usize {
        self.layers.iter().filter(|l| l.cleared).count()
    }

    /// Whether a flip could be accepted right now.
    pub fn playable(&self) -> bool {
        self.phase == GamePhase::Playing && !self.busy && self.pending.len() < 2
    }
}
