//! Runtime configuration read from `TILEMATCH_*` environment variables.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::types::Difficulty;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Board RNG seed; a fixed seed replays the same boards.
    pub seed: u32,
    /// Difficulty preselected on the menu.
    pub difficulty: Difficulty,
    /// Team name prefilled on the menu.
    pub team: Option<String>,
    /// Directory holding `tileMatchLeaderboard.json`.
    pub data_dir: PathBuf,
    /// Keep the leaderboard in memory only.
    pub no_persist: bool,
    /// `tracing` filter directive (`TILEMATCH_LOG`).
    pub log_filter: String,
    /// Log file; no logging is installed without one.
    pub log_path: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any variable source (tests pass a map).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        let seed = non_empty("TILEMATCH_SEED")
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(clock_seed);

        let difficulty = non_empty("TILEMATCH_DIFFICULTY")
            .and_then(|s| Difficulty::from_str(&s))
            .unwrap_or_default();

        let data_dir = non_empty("TILEMATCH_DATA_DIR")
            .map(PathBuf::from)
            .or_else(|| non_empty("XDG_DATA_HOME").map(|d| PathBuf::from(d).join("tilematch")))
            .or_else(|| {
                non_empty("HOME").map(|h| PathBuf::from(h).join(".local/share/tilematch"))
            })
            .unwrap_or_else(|| PathBuf::from(".tilematch"));

        let no_persist = non_empty("TILEMATCH_NO_PERSIST")
            .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
            .unwrap_or(false);

        Self {
            seed,
            difficulty,
            team: non_empty("TILEMATCH_TEAM"),
            data_dir,
            no_persist,
            log_filter: non_empty("TILEMATCH_LOG").unwrap_or_else(|| "info".to_string()),
            log_path: non_empty("TILEMATCH_LOG_PATH").map(PathBuf::from),
        }
    }
}

fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(1)
}
