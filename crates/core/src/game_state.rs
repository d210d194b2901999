//! Game state module - manages the complete session state
//!
//! This module ties together the board, the note RNG, the timer queue and
//! scoring. It owns the match engine (flip, evaluate, flip back), the layer
//! progression controller and the session phase machine.
//!
//! All delayed steps are driven by [`GameState::tick`]; nothing here sleeps or
//! spawns threads.

use std::collections::VecDeque;

use arrayvec::ArrayVec;

use crate::board::{Board, Layer};
use crate::rng::SimpleRng;
use crate::scoring::calculate_score;
use crate::snapshot::GameSnapshot;
use crate::timer::{ScheduledTimer, Scheduler, TimerKind};
use crate::types::*;

/// Events kept for collaborators before the oldest are dropped.
const EVENT_QUEUE_CAP: usize = 64;

/// Match engine state, derived from the pending set and the busy flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EngineState {
    #[default]
    Idle,
    AwaitingSecondFlip,
    /// A pair is being revealed, evaluated or settled; flips are dropped.
    Resolving,
}

/// Notifications for audio/UI collaborators, drained with [`GameState::pop_event`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    TileFlipped(TileId),
    NoteMatched { note: NoteId, first_discovery: bool },
    Mismatch { first: TileId, second: TileId },
    LayerCleared { cleared: u8, next: u8 },
    GameWon,
    PhaseChanged(GamePhase),
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    phase: GamePhase,
    difficulty: Difficulty,
    board: Board,
    current_layer: usize,
    /// Tiles flipped and waiting for resolution (0, 1 or 2).
    pending: ArrayVec<TileId, 2>,
    /// Accepted flips (not pairs).
    moves: u32,
    busy: bool,
    /// Matched notes in discovery order, no duplicates.
    discovered: Vec<NoteId>,
    /// Last matched note until acknowledged.
    matched_note: Option<NoteId>,
    team_id: Option<String>,
    /// Monotonic session generation (increments on init and reset).
    ///
    /// Timers scheduled under an older generation are ignored when they fire.
    session_id: u32,
    /// Game clock, advanced only by `tick`.
    now_ms: u64,
    clock_started_ms: Option<u64>,
    clock_stopped_ms: Option<u64>,
    scheduler: Scheduler,
    rng: SimpleRng,
    events: VecDeque<GameEvent>,
    consistency_faults: u32,
}

impl GameState {
    /// Create an empty session (menu phase, no board) with the given RNG seed
    pub fn new(seed: u32) -> Self {
        Self {
            phase: GamePhase::Menu,
            difficulty: Difficulty::default(),
            board: Board::new(),
            current_layer: 0,
            pending: ArrayVec::new(),
            moves: 0,
            busy: false,
            discovered: Vec::new(),
            matched_note: None,
            team_id: None,
            session_id: 0,
            now_ms: 0,
            clock_started_ms: None,
            clock_stopped_ms: None,
            scheduler: Scheduler::new(),
            rng: SimpleRng::new(seed),
            events: VecDeque::with_capacity(EVENT_QUEUE_CAP),
            consistency_faults: 0,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn layers(&self) -> &[Layer] {
        self.board.layers()
    }

    pub fn current_layer_index(&self) -> usize {
        self.current_layer
    }

    pub fn current_layer(&self) -> Option<&Layer> {
        self.board.layer(self.current_layer)
    }

    pub fn pending(&self) -> &[TileId] {
        &self.pending
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn discovered_notes(&self) -> &[NoteId] {
        &self.discovered
    }

    pub fn matched_note(&self) -> Option<NoteId> {
        self.matched_note
    }

    pub fn team_id(&self) -> Option<&str> {
        self.team_id.as_deref()
    }

    pub fn session_id(&self) -> u32 {
        self.session_id
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Number of internal consistency faults recovered from so far.
    pub fn consistency_faults(&self) -> u32 {
        self.consistency_faults
    }

    /// Timers still queued, including stale ones from discarded sessions.
    pub fn pending_timers(&self) -> usize {
        self.scheduler.len()
    }

    pub fn engine_state(&self) -> EngineState {
        if self.busy {
            EngineState::Resolving
        } else if self.pending.len() == 1 {
            EngineState::AwaitingSecondFlip
        } else {
            EngineState::Idle
        }
    }

    /// Elapsed play time: starts on the first accepted flip, stops on the win.
    pub fn elapsed_ms(&self) -> u64 {
        match self.clock_started_ms {
            Some(start) => self
                .clock_stopped_ms
                .unwrap_or(self.now_ms)
                .saturating_sub(start),
            None => 0,
        }
    }

    /// Elapsed play time in whole seconds (what the HUD and score use).
    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_ms() / 1000
    }

    pub fn clock_running(&self) -> bool {
        self.clock_started_ms.is_some() && self.clock_stopped_ms.is_none()
    }

    /// Current score, once both elapsed seconds and moves are positive.
    pub fn score(&self) -> Option<f64> {
        calculate_score(self.elapsed_secs() as f64, self.moves)
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        out.phase = self.phase;
        out.difficulty = self.difficulty;
        out.layers.clear();
        out.layers.extend_from_slice(self.board.layers());
        out.current_layer = self.current_layer;
        out.pending.clone_from(&self.pending);
        out.moves = self.moves;
        out.elapsed_ms = self.elapsed_ms();
        out.elapsed_secs = self.elapsed_secs();
        out.busy = self.busy;
        out.engine_state = self.engine_state();
        out.discovered_notes.clear();
        out.discovered_notes.extend_from_slice(&self.discovered);
        out.matched_note = self.matched_note;
        out.team_id.clone_from(&self.team_id);
        out.session_id = self.session_id;
        out.score = self.score();
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    /// Take the oldest queued event.
    pub fn pop_event(&mut self) -> Option<GameEvent> {
        self.events.pop_front()
    }

    fn emit(&mut self, event: GameEvent) {
        if self.events.len() == EVENT_QUEUE_CAP {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    fn schedule(&mut self, delay_ms: u32, kind: TimerKind) {
        self.scheduler
            .schedule(self.now_ms + delay_ms as u64, self.session_id, kind);
    }

    // ----- session controller -----

    /// Build a fresh board. The phase and team id are left untouched.
    pub fn init_game(&mut self, difficulty: Difficulty) {
        self.session_id = self.session_id.wrapping_add(1);
        self.difficulty = difficulty;
        self.board = Board::generate(difficulty, &mut self.rng);
        self.current_layer = self.board.top_index().unwrap_or(0);
        self.pending.clear();
        self.moves = 0;
        self.busy = false;
        self.discovered.clear();
        self.matched_note = None;
        self.clock_started_ms = None;
        self.clock_stopped_ms = None;
        self.events.clear();

        tracing::info!(
            difficulty = difficulty.as_str(),
            layers = self.board.layer_count(),
            session = self.session_id,
            "game initialized"
        );
    }

    /// Menu -> Playing
    pub fn start_playing(&mut self) -> bool {
        if self.phase != GamePhase::Menu {
            return false;
        }
        self.set_phase(GamePhase::Playing);
        true
    }

    /// Playing -> Ended
    pub fn end_game(&mut self) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        if self.clock_running() {
            self.clock_stopped_ms = Some(self.now_ms);
        }
        self.set_phase(GamePhase::Ended);
        true
    }

    /// The win transition ends the session from whatever phase it is in.
    fn finish_game(&mut self) {
        if self.phase == GamePhase::Ended {
            return;
        }
        if self.clock_running() {
            self.clock_stopped_ms = Some(self.now_ms);
        }
        self.set_phase(GamePhase::Ended);
    }

    /// Discard the session and return to the menu.
    ///
    /// Already-scheduled timers stay queued but belong to the old session.
    pub fn reset_game(&mut self) {
        self.session_id = self.session_id.wrapping_add(1);
        self.board = Board::new();
        self.current_layer = 0;
        self.pending.clear();
        self.moves = 0;
        self.busy = false;
        self.discovered.clear();
        self.matched_note = None;
        self.team_id = None;
        self.clock_started_ms = None;
        self.clock_stopped_ms = None;
        self.events.clear();
        self.set_phase(GamePhase::Menu);
        tracing::info!(session = self.session_id, "game reset");
    }

    fn set_phase(&mut self, phase: GamePhase) {
        if self.phase != phase {
            tracing::debug!(from = self.phase.as_str(), to = phase.as_str(), "phase change");
            self.phase = phase;
            self.emit(GameEvent::PhaseChanged(phase));
        }
    }

    /// Set the team identifier; blank input clears it.
    pub fn set_team_id(&mut self, team: &str) {
        let team = team.trim();
        self.team_id = if team.is_empty() {
            None
        } else {
            Some(team.to_string())
        };
    }

    /// Acknowledge the matched-note popup. Returns whether one was showing.
    pub fn clear_matched_note(&mut self) -> bool {
        self.matched_note.take().is_some()
    }

    // ----- match engine -----

    /// Flip a tile face up.
    ///
    /// Returns false (and changes nothing) while a pair is resolving, when two
    /// tiles are already pending, when the tile is already pending, unknown,
    /// inactive or matched.
    pub fn flip_tile(&mut self, id: TileId) -> bool {
        if self.busy {
            tracing::trace!(tile = %id, "flip ignored: busy");
            return false;
        }
        if self.pending.is_full() || self.pending.contains(&id) {
            tracing::trace!(tile = %id, "flip ignored: already pending");
            return false;
        }

        let Some(tile) = self.board.tile_mut(id) else {
            tracing::trace!(tile = %id, "flip ignored: unknown tile");
            return false;
        };
        if !tile.active || tile.matched {
            tracing::trace!(tile = %id, "flip ignored: inactive or matched");
            return false;
        }
        tile.flipped = true;

        if self.clock_started_ms.is_none() {
            self.clock_started_ms = Some(self.now_ms);
        }
        self.pending.push(id);
        self.moves += 1;
        self.emit(GameEvent::TileFlipped(id));
        tracing::debug!(tile = %id, moves = self.moves, pending = self.pending.len(), "tile flipped");

        if self.pending.is_full() {
            self.busy = true;
            self.schedule(REVEAL_DELAY_MS, TimerKind::EvaluatePair);
        }

        true
    }

    /// Advance the game clock and fire every timer that comes due.
    ///
    /// Follow-up timers are scheduled relative to the timer that created them,
    /// so one large tick resolves a whole cascade in order. Returns whether any
    /// timer of the current session fired.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        let target = self.now_ms.saturating_add(elapsed_ms as u64);
        let mut fired = false;

        while let Some(timer) = self.scheduler.pop_due(target) {
            self.now_ms = self.now_ms.max(timer.due_ms);
            fired |= self.fire(timer);
        }

        self.now_ms = target;

        if self.busy && self.scheduler.pending_for(self.session_id) == 0 {
            let pending = self.pending.len();
            self.recover_fault(pending, "busy with no timer left to resolve it");
        }
        fired
    }

    fn fire(&mut self, timer: ScheduledTimer) -> bool {
        if timer.session != self.session_id {
            tracing::trace!(
                kind = timer.kind.as_str(),
                timer_session = timer.session,
                session = self.session_id,
                "stale timer ignored"
            );
            return false;
        }

        match timer.kind {
            TimerKind::EvaluatePair => self.evaluate_pair(),
            TimerKind::SettleMatch => self.settle_match(),
            TimerKind::FlipBack => self.flip_back(),
            TimerKind::FinishGame => self.finish_game(),
        }
        true
    }

    /// Compare the two pending tiles.
    fn evaluate_pair(&mut self) {
        let pair = match self.pending.as_slice() {
            &[first, second] => Some((first, second)),
            _ => None,
        };
        let Some((first, second)) = pair else {
            let pending = self.pending.len();
            self.recover_fault(pending, "match check without a full pair");
            return;
        };

        let notes = (
            self.board.tile(first).map(|t| t.note),
            self.board.tile(second).map(|t| t.note),
        );
        let (Some(a), Some(b)) = notes else {
            self.recover_fault(2, "tiles not found for match check");
            return;
        };

        if a != b {
            tracing::debug!(%first, %second, "mismatch");
            self.emit(GameEvent::Mismatch { first, second });
            self.schedule(MISMATCH_FLIP_BACK_MS, TimerKind::FlipBack);
            return;
        }

        for id in [first, second] {
            if let Some(tile) = self.board.tile_mut(id) {
                tile.matched = true;
            }
        }
        self.pending.clear();

        let first_discovery = !self.discovered.contains(&a);
        if first_discovery {
            self.discovered.push(a);
        }
        self.matched_note = Some(a);
        self.emit(GameEvent::NoteMatched {
            note: a,
            first_discovery,
        });
        tracing::debug!(note = a.midi(), first_discovery, "pair matched");

        self.schedule(MATCH_FEEDBACK_MS, TimerKind::SettleMatch);
    }

    fn recover_fault(&mut self, pending: usize, reason: &'static str) {
        self.consistency_faults += 1;
        tracing::error!(
            pending,
            session = self.session_id,
            faults = self.consistency_faults,
            "{}",
            reason
        );
        self.pending.clear();
        self.busy = false;
    }

    /// After match feedback: advance the layer if it is complete, then unlock.
    fn settle_match(&mut self) {
        let complete = self
            .board
            .layer(self.current_layer)
            .is_some_and(|l| !l.cleared && l.all_matched());
        if complete {
            tracing::info!(layer = self.current_layer, "layer cleared");
            self.advance_layer(self.current_layer);
        }
        self.busy = false;
    }

    /// Turn the mismatched pair face down and unlock.
    fn flip_back(&mut self) {
        for id in self.pending.drain(..) {
            if let Some(tile) = self.board.tile_mut(id) {
                if !tile.matched {
                    tile.flipped = false;
                }
            }
        }
        self.busy = false;
    }

    // ----- layer progression -----

    /// Clear the current layer and activate the next inner one, or win.
    ///
    /// Rejected (returns false) while a pair is resolving, or for any layer
    /// other than the current, uncleared one.
    pub fn clear_layer(&mut self, layer_index: usize) -> bool {
        if self.busy {
            return false;
        }
        self.advance_layer(layer_index)
    }

    fn advance_layer(&mut self, layer_index: usize) -> bool {
        if layer_index != self.current_layer || !self.board.mark_cleared(layer_index) {
            tracing::trace!(layer = layer_index, "clear ignored");
            return false;
        }

        // Single tile flipped on the cleared layer: drop it from play.
        let board = &mut self.board;
        self.pending.retain(|id| {
            if id.layer as usize != layer_index {
                return true;
            }
            if let Some(tile) = board.tile_mut(*id) {
                if !tile.matched {
                    tile.flipped = false;
                }
            }
            false
        });

        match layer_index.checked_sub(1) {
            Some(next) => {
                self.board.activate(next);
                self.current_layer = next;
                self.emit(GameEvent::LayerCleared {
                    cleared: layer_index as u8,
                    next: next as u8,
                });
            }
            None => {
                if self.clock_running() {
                    self.clock_stopped_ms = Some(self.now_ms);
                }
                tracing::info!(
                    moves = self.moves,
                    elapsed_ms = self.elapsed_ms(),
                    "all layers cleared"
                );
                self.emit(GameEvent::GameWon);
                self.schedule(WIN_TRANSITION_MS, TimerKind::FinishGame);
            }
        }
        true
    }

    /// Apply a collaborator command
    pub fn apply_command(&mut self, command: GameCommand) -> bool {
        tracing::trace!(command = command.as_str(), "apply command");
        match command {
            GameCommand::Init(difficulty) => {
                self.init_game(difficulty);
                true
            }
            GameCommand::StartPlaying => self.start_playing(),
            GameCommand::Flip(id) => self.flip_tile(id),
            GameCommand::ClearMatchedNote => self.clear_matched_note(),
            GameCommand::SetTeam(team) => {
                self.set_team_id(&team);
                true
            }
            GameCommand::EndGame => self.end_game(),
            GameCommand::Reset => {
                self.reset_game();
                true
            }
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(1)
    }
}
