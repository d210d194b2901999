//! Timer module - cooperative, non-cancellable delayed steps
//!
//! The match engine never sleeps. It schedules a [`TimerKind`] at an absolute
//! game time and `GameState::tick` fires everything that has come due. Each
//! timer remembers the session it was scheduled in; once the session is
//! replaced the timer still fires but the engine ignores it.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Delayed engine step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Compare the two pending tiles (after the reveal pause)
    EvaluatePair,
    /// Check layer completion and release busy (after match feedback)
    SettleMatch,
    /// Turn a mismatched pair face down and release busy
    FlipBack,
    /// Move the session to the ended phase (after the win pause)
    FinishGame,
}

impl TimerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerKind::EvaluatePair => "evaluate_pair",
            TimerKind::SettleMatch => "settle_match",
            TimerKind::FlipBack => "flip_back",
            TimerKind::FinishGame => "finish_game",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledTimer {
    pub due_ms: u64,
    /// Session generation the timer belongs to.
    pub session: u32,
    pub kind: TimerKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct HeapKey {
    due_ms: u64,
    seq: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Entry {
    key: HeapKey,
    timer: ScheduledTimer,
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.key.cmp(&other.key)
    }
}

/// Min-heap of timers ordered by due time, then scheduling order.
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    heap: BinaryHeap<Reverse<Entry>>,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due_ms: u64, session: u32, kind: TimerKind) {
        let key = HeapKey {
            due_ms,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.heap.push(Reverse(Entry {
            key,
            timer: ScheduledTimer {
                due_ms,
                session,
                kind,
            },
        }));
    }

    /// Pop the earliest timer due at or before `now_ms`.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<ScheduledTimer> {
        match self.heap.peek() {
            Some(Reverse(entry)) if entry.key.due_ms <= now_ms => {
                self.heap.pop().map(|Reverse(entry)| entry.timer)
            }
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Count timers still waiting for a given session.
    pub fn pending_for(&self, session: u32) -> usize {
        self.heap
            .iter()
            .filter(|Reverse(entry)| entry.timer.session == session)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_due_order() {
        let mut s = Scheduler::new();
        s.schedule(500, 1, TimerKind::SettleMatch);
        s.schedule(100, 1, TimerKind::EvaluatePair);
        s.schedule(300, 1, TimerKind::FlipBack);

        assert_eq!(s.pop_due(1000).map(|t| t.kind), Some(TimerKind::EvaluatePair));
        assert_eq!(s.pop_due(1000).map(|t| t.kind), Some(TimerKind::FlipBack));
        assert_eq!(s.pop_due(1000).map(|t| t.kind), Some(TimerKind::SettleMatch));
        assert!(s.pop_due(1000).is_none());
    }

    #[test]
    fn equal_due_times_keep_scheduling_order() {
        let mut s = Scheduler::new();
        s.schedule(100, 1, TimerKind::FinishGame);
        s.schedule(100, 2, TimerKind::EvaluatePair);

        assert_eq!(s.pop_due(100).map(|t| t.session), Some(1));
        assert_eq!(s.pop_due(100).map(|t| t.session), Some(2));
    }

    #[test]
    fn nothing_fires_early() {
        let mut s = Scheduler::new();
        s.schedule(800, 1, TimerKind::EvaluatePair);
        assert!(s.pop_due(799).is_none());
        assert_eq!(s.len(), 1);
        assert!(s.pop_due(800).is_some());
        assert!(s.is_empty());
    }

    #[test]
    fn pending_for_counts_by_session() {
        let mut s = Scheduler::new();
        s.schedule(1, 1, TimerKind::EvaluatePair);
        s.schedule(2, 2, TimerKind::EvaluatePair);
        s.schedule(3, 2, TimerKind::SettleMatch);
        assert_eq!(s.pending_for(1), 1);
        assert_eq!(s.pending_for(2), 2);
        assert_eq!(s.pending_for(3), 0);
    }
}
