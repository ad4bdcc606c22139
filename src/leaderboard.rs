//! Leaderboard data and ranking.

use std::collections::{BTreeMap, HashMap};

use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::games::GameKind;

/// One leaderboard row as sent by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct LeaderboardEntry {
    #[serde(alias = "name")]
    player_name: String,
    #[serde(default)]
    points: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    difficulty: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    moves: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    score: Option<i64>,
}

/// A player's summed points within one game.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct RankedPlayer {
    rank: usize,
    player_name: String,
    points: i64,
}

/// Per-game leaderboards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Leaderboard {
    boards: HashMap<GameKind, Vec<LeaderboardEntry>>,
}

impl Leaderboard {
    /// Builds a leaderboard from already-typed boards.
    pub fn new(boards: HashMap<GameKind, Vec<LeaderboardEntry>>) -> Self {
        Self { boards }
    }

    /// Builds a leaderboard from the raw `GET /api/leaderboard` payload.
    ///
    /// Keys that are not a known game are skipped.
    #[instrument(skip(raw), fields(keys = raw.len()))]
    pub fn from_raw(raw: BTreeMap<String, Vec<LeaderboardEntry>>) -> Self {
        let mut boards = HashMap::new();
        for (key, entries) in raw {
            match GameKind::parse(&key) {
                Some(kind) => {
                    boards.insert(kind, entries);
                }
                None => debug!(key = %key, "Skipping unknown leaderboard key"),
            }
        }
        Self { boards }
    }

    /// Raw entries for one game, in backend order.
    pub fn entries(&self, kind: GameKind) -> &[LeaderboardEntry] {
        self.boards.get(&kind).map(Vec::as_slice).unwrap_or_default()
    }

    /// Sums points per player and ranks them, highest first.
    ///
    /// Players with equal totals keep the order in which they first appear.
    #[instrument(skip(self))]
    pub fn ranked(&self, kind: GameKind) -> Vec<RankedPlayer> {
        let mut totals: Vec<(String, i64)> = Vec::new();
        for entry in self.entries(kind) {
            match totals.iter_mut().find(|(name, _)| *name == entry.player_name) {
                Some((_, total)) => *total += entry.points,
                None => totals.push((entry.player_name.clone(), entry.points)),
            }
        }
        totals.sort_by(|a, b| b.1.cmp(&a.1));
        totals
            .into_iter()
            .enumerate()
            .map(|(i, (player_name, points))| RankedPlayer {
                rank: i + 1,
                player_name,
                points,
            })
            .collect()
    }

    /// Points of the first entry for `player_name`, or 0.
    pub fn player_points(&self, kind: GameKind, player_name: &str) -> i64 {
        self.entries(kind)
            .iter()
            .find(|entry| entry.player_name == player_name)
            .map_or(0, |entry| entry.points)
    }

    /// True if no game has any entries.
    pub fn is_empty(&self) -> bool {
        self.boards.values().all(Vec::is_empty)
    }
}
