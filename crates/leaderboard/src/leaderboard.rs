//! Best-score table over a [`KeyValueStore`].
//!
//! Stored as one JSON object under a namespace key: `{ "Team1": 2.0, "Team2": 5.5 }`
//! where each value is the team's lowest score (time / moves).
//!
//! Storage trouble never surfaces to callers: unreadable or corrupt data reads
//! as an empty table and failed writes are logged and dropped.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::store::KeyValueStore;
use crate::types::LEADERBOARD_KEY;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
struct LeaderboardData(BTreeMap<String, f64>);

/// Team -> best (lowest) score.
#[derive(Debug, Clone)]
pub struct Leaderboard<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> Leaderboard<S> {
    /// Leaderboard under the default namespace key.
    pub fn new(store: S) -> Self {
        Self::with_key(store, LEADERBOARD_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    fn load(&self) -> Result<LeaderboardData> {
        match self.store.get(&self.key)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(LeaderboardData::default()),
        }
    }

    fn write(&mut self, data: &LeaderboardData) -> Result<()> {
        let raw = serde_json::to_string(data)?;
        self.store.set(&self.key, &raw)
    }

    /// Full table. Empty if the record is missing or unreadable.
    pub fn entries(&self) -> BTreeMap<String, f64> {
        match self.load() {
            Ok(data) => data.0,
            Err(err) => {
                tracing::warn!(key = %self.key, error = %err, "leaderboard unreadable, treating as empty");
                BTreeMap::new()
            }
        }
    }

    /// Best score for one team.
    pub fn best(&self, team: &str) -> Option<f64> {
        self.entries().get(team.trim()).copied()
    }

    /// Entries ordered by score, lowest (best) first. Ties order by team.
    pub fn sorted(&self) -> Vec<(String, f64)> {
        let mut entries: Vec<(String, f64)> = self.entries().into_iter().collect();
        entries.sort_by(|a, b| a.1.total_cmp(&b.1));
        entries
    }

    /// 1-based position of a team in [`Self::sorted`].
    pub fn rank(&self, team: &str) -> Option<usize> {
        let team = team.trim();
        self.sorted()
            .iter()
            .position(|(t, _)| t == team)
            .map(|i| i + 1)
    }

    /// Record a score if the team has none yet or the new one is strictly lower.
    ///
    /// Returns whether the stored table changed. Blank team ids and negative or
    /// non-finite scores are rejected.
    pub fn save_score(&mut self, team: &str, score: f64) -> bool {
        let team = team.trim();
        if team.is_empty() {
            tracing::warn!("score submitted without a team id");
            return false;
        }
        if !score.is_finite() || score < 0.0 {
            tracing::warn!(team, score, "invalid score rejected");
            return false;
        }

        // A corrupt record is replaced by a fresh table here.
        let mut data = LeaderboardData(self.entries());
        if let Some(&best) = data.0.get(team) {
            if score >= best {
                tracing::debug!(team, score, best, "score not better than best");
                return false;
            }
        }
        data.0.insert(team.to_string(), score);

        match self.write(&data) {
            Ok(()) => {
                tracing::info!(team, score, "leaderboard updated");
                true
            }
            Err(err) => {
                tracing::warn!(team, score, error = %err, "failed to save score");
                false
            }
        }
    }

    /// Remove the whole record. Returns false if the backend failed.
    pub fn clear(&mut self) -> bool {
        match self.store.remove(&self.key) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(key = %self.key, error = %err, "failed to clear leaderboard");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::store::MemoryStore;

    /// Backend that fails every operation.
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(StoreError::Unavailable {
                reason: "offline".into(),
            })
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<()> {
            Err(StoreError::Unavailable {
                reason: "offline".into(),
            })
        }

        fn remove(&mut self, _key: &str) -> Result<()> {
            Err(StoreError::Unavailable {
                reason: "offline".into(),
            })
        }
    }

    #[test]
    fn test_only_lower_scores_replace() {
        let mut board = Leaderboard::new(MemoryStore::new());
        assert!(board.save_score("A", 5.0));
        assert!(board.save_score("A", 3.0));
        assert!(!board.save_score("A", 7.0));
        assert!(!board.save_score("A", 3.0));
        assert_eq!(board.best("A"), Some(3.0));
    }

    #[test]
    fn test_sorted_ascending() {
        let mut board = Leaderboard::new(MemoryStore::new());
        board.save_score("A", 5.0);
        board.save_score("B", 2.0);
        board.save_score("C", 8.0);
        assert_eq!(
            board.sorted(),
            vec![
                ("B".to_string(), 2.0),
                ("A".to_string(), 5.0),
                ("C".to_string(), 8.0)
            ]
        );
        assert_eq!(board.rank("C"), Some(3));
        assert_eq!(board.rank("Z"), None);
    }

    #[test]
    fn test_ties_order_by_team() {
        let mut board = Leaderboard::new(MemoryStore::new());
        board.save_score("zeta", 1.0);
        board.save_score("alpha", 1.0);
        let teams: Vec<String> = board.sorted().into_iter().map(|(t, _)| t).collect();
        assert_eq!(teams, vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_stored_as_flat_json_object() {
        let mut board = Leaderboard::new(MemoryStore::new());
        board.save_score("Team1", 2.0);
        let raw = board.store().get(LEADERBOARD_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value, serde_json::json!({ "Team1": 2.0 }));
    }

    #[test]
    fn test_corrupt_record_reads_empty_and_is_overwritten() {
        let mut store = MemoryStore::new();
        store.set(LEADERBOARD_KEY, "{not json").unwrap();
        let mut board = Leaderboard::new(store);
        assert!(board.entries().is_empty());
        assert!(board.sorted().is_empty());

        assert!(board.save_score("A", 4.0));
        assert_eq!(board.sorted(), vec![("A".to_string(), 4.0)]);
    }

    #[test]
    fn test_wrong_shape_reads_empty() {
        let mut store = MemoryStore::new();
        store.set(LEADERBOARD_KEY, "[1, 2, 3]").unwrap();
        let board = Leaderboard::new(store);
        assert!(board.entries().is_empty());
    }

    #[test]
    fn test_rejects_blank_team_and_bad_scores() {
        let mut board = Leaderboard::new(MemoryStore::new());
        assert!(!board.save_score("   ", 1.0));
        assert!(!board.save_score("A", f64::NAN));
        assert!(!board.save_score("A", f64::INFINITY));
        assert!(!board.save_score("A", -1.0));
        assert!(board.entries().is_empty());
    }

    #[test]
    fn test_team_ids_are_trimmed() {
        let mut board = Leaderboard::new(MemoryStore::new());
        assert!(board.save_score("  Owls ", 2.5));
        assert_eq!(board.best("Owls"), Some(2.5));
    }

    #[test]
    fn test_clear_removes_everything() {
        let mut board = Leaderboard::new(MemoryStore::new());
        board.save_score("A", 1.0);
        assert!(board.clear());
        assert!(board.entries().is_empty());
        assert!(board.clear());
    }

    #[test]
    fn test_broken_backend_degrades_quietly() {
        let mut board = Leaderboard::new(BrokenStore);
        assert!(board.entries().is_empty());
        assert!(board.sorted().is_empty());
        assert!(!board.save_score("A", 1.0));
        assert!(!board.clear());
    }

    #[test]
    fn test_separate_keys_are_independent() {
        let mut a = Leaderboard::with_key(MemoryStore::new(), "one");
        a.save_score("A", 1.0);
        let store = a.store().clone();
        let b = Leaderboard::with_key(store, "two");
        assert!(b.entries().is_empty());
    }
}
