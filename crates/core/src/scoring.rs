//! Scoring module - leaderboard score for a finished session
//!
//! `score = elapsed_secs / moves`. Lower is better: a fast game with few
//! wasted flips wins.

/// Score for a session, or `None` until both time and moves are positive.
///
/// # Examples
///
/// ```
/// use tilematch_core::calculate_score;
///
/// assert_eq!(calculate_score(50.0, 10), Some(5.0));
/// assert_eq!(calculate_score(0.0, 10), None);
/// assert_eq!(calculate_score(12.0, 0), None);
/// ```
pub fn calculate_score(elapsed_secs: f64, moves: u32) -> Option<f64> {
    if moves == 0 || !elapsed_secs.is_finite() || elapsed_secs <= 0.0 {
        return None;
    }
    Some(elapsed_secs / moves as f64)
}

/// Format seconds the way the end screen shows them (`3m 7s`).
pub fn format_elapsed(secs: u64) -> String {
    format!("{}m {}s", secs / 60, secs % 60)
}
