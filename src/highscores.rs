//! High score records and leaderboard
//!
//! Records are stored one per line as `timestamp|name|score|level|played`.
//! Ranking: higher score first, then shorter played time, then the more
//! recent timestamp.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::consts::MAX_NAME_LEN;

/// Leaderboard size shown on the game-over screen
pub const DEFAULT_LEADERBOARD_SIZE: usize = 5;

/// Played-time stand-in for unreadable values; sorts after real times
pub const PLAYED_SENTINEL: u64 = 9999;

const DEFAULT_PLAYER_NAME: &str = "Player";
const FIELD_SEPARATOR: char = '|';

/// One finished run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    /// Unix seconds when the run ended
    pub timestamp: u64,
    pub player_name: String,
    pub score: u64,
    pub level: u32,
    pub played_seconds: u64,
}

impl ScoreRecord {
    pub fn new(
        timestamp: u64,
        player_name: &str,
        score: u64,
        level: u32,
        played_seconds: u64,
    ) -> Self {
        Self {
            timestamp,
            player_name: sanitize_player_name(player_name),
            score,
            level,
            played_seconds,
        }
    }

    /// Serialize as one log line (no trailing newline)
    pub fn to_line(&self) -> String {
        format!(
            "{}|{}|{}|{}|{}",
            self.timestamp, self.player_name, self.score, self.level, self.played_seconds
        )
    }

    /// Parse one log line. Lines without exactly five fields are rejected;
    /// unreadable numbers fall back to defaults.
    pub fn parse_line(line: &str) -> Option<Self> {
        let fields: Vec<&str> = line.trim_end_matches(['\r', '\n']).split(FIELD_SEPARATOR).collect();
        let [ts, name, score, level, played] = fields.as_slice() else {
            return None;
        };
        Some(Self {
            timestamp: ts.trim().parse().unwrap_or(0),
            player_name: name.to_string(),
            score: score.trim().parse().unwrap_or(0),
            level: level.trim().parse().unwrap_or(0),
            played_seconds: played.trim().parse().unwrap_or(PLAYED_SENTINEL),
        })
    }

    /// Leaderboard order: `Less` means `self` ranks higher
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .cmp(&self.score)
            .then(self.played_seconds.cmp(&other.played_seconds))
            .then(other.timestamp.cmp(&self.timestamp))
    }
}

/// Trim, strip the field separator and control characters, cap the length.
/// An empty result becomes "Player".
pub fn sanitize_player_name(raw: &str) -> String {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| if c == FIELD_SEPARATOR { '_' } else { c })
        .take(MAX_NAME_LEN)
        .collect();
    let cleaned = cleaned.trim_end();
    if cleaned.is_empty() {
        DEFAULT_PLAYER_NAME.to_string()
    } else {
        cleaned.to_string()
    }
}

/// Format whole seconds as `MM:SS`
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Ranked top-N view over a set of records
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<ScoreRecord>,
}

impl HighScores {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Rank `records` and keep the best `n`
    pub fn from_records(mut records: Vec<ScoreRecord>, n: usize) -> Self {
        records.sort_by(ScoreRecord::rank_cmp);
        records.truncate(n);
        Self { entries: records }
    }

    /// 1-indexed rank of `record` if it made the board
    pub fn position_of(&self, record: &ScoreRecord) -> Option<usize> {
        self.entries.iter().position(|e| e == record).map(|i| i + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(ts: u64, score: u64, played: u64) -> ScoreRecord {
        ScoreRecord::new(ts, "ann", score, 1, played)
    }

    #[test]
    fn test_line_format() {
        let r = ScoreRecord::new(1_700_000_000, "Zed", 140, 4, 93);
        assert_eq!(r.to_line(), "1700000000|Zed|140|4|93");
        assert_eq!(ScoreRecord::parse_line(&r.to_line()), Some(r));
    }

    #[test]
    fn test_parse_defaults_and_rejects() {
        let r = ScoreRecord::parse_line("12|bob|lots|2|soon").unwrap();
        assert_eq!(r.score, 0);
        assert_eq!(r.played_seconds, PLAYED_SENTINEL);
        assert_eq!(r.level, 2);

        assert!(ScoreRecord::parse_line("12|bob|10|2").is_none());
        assert!(ScoreRecord::parse_line("12|bob|10|2|5|extra").is_none());
        assert!(ScoreRecord::parse_line("").is_none());
    }

    #[test]
    fn test_ranking_order() {
        let board = HighScores::from_records(
            vec![
                rec(1, 50, 30),
                rec(2, 90, 80),
                rec(3, 90, 40),
                rec(4, 50, 30),
                rec(5, 10, PLAYED_SENTINEL),
                rec(6, 10, 500),
            ],
            5,
        );
        let order: Vec<u64> = board.entries.iter().map(|e| e.timestamp).collect();
        // 90/40, 90/80, then the 50/30 tie broken by recency, then 10/500
        assert_eq!(order, vec![3, 2, 4, 1, 6]);
        assert_eq!(board.top_score(), Some(90));
    }

    #[test]
    fn test_position_of_current_run() {
        let current = rec(9, 70, 20);
        let board = HighScores::from_records(vec![rec(1, 100, 10), current.clone(), rec(2, 5, 1)], 5);
        assert_eq!(board.position_of(&current), Some(2));

        let small = HighScores::from_records(vec![rec(1, 100, 10), rec(2, 90, 1)], 1);
        assert_eq!(small.position_of(&rec(2, 90, 1)), None);
    }

    #[test]
    fn test_sanitize_player_name() {
        assert_eq!(sanitize_player_name("   "), "Player");
        assert_eq!(sanitize_player_name(" Ada "), "Ada");
        assert_eq!(sanitize_player_name("a|b"), "a_b");
        assert_eq!(sanitize_player_name("abcdefghijklmnop"), "abcdefghijkl");
        assert_eq!(sanitize_player_name("tab\there"), "tabhere");
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(75), "01:15");
        assert_eq!(format_clock(3600), "60:00");
    }
}
