//! Memory card rules.

use derive_getters::Getters;
use tracing::{debug, instrument};

use super::{GameRules, Progress, unexpected_result, wrong_kind};
use crate::error::ArcadeError;
use crate::games::kind::{Difficulty, GameKind};
use crate::games::moves::Move;
use crate::games::results::{
    FlipStatus, HiddenCards, MoveResult, Outcome, SessionDescriptor,
};

/// Grid edge length for a difficulty when the backend does not say.
pub fn default_grid_size(difficulty: Difficulty) -> usize {
    match difficulty {
        Difficulty::Easy => 4,
        Difficulty::Hard => 8,
        Difficulty::Medium | Difficulty::Normal => 6,
    }
}

/// Memory session state.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct MemoryState {
    grid_size: usize,
    total_pairs: u32,
    revealed: Vec<bool>,
    matched: Vec<bool>,
    faces: Vec<Option<i64>>,
    first_card: Option<usize>,
    pending_hide: Option<(usize, usize)>,
    moves: u32,
    matches: u32,
}

impl MemoryState {
    /// Creates an all-hidden grid.
    pub fn new(grid_size: usize, total_pairs: u32) -> Self {
        let cards = grid_size * grid_size;
        Self {
            grid_size,
            total_pairs,
            revealed: vec![false; cards],
            matched: vec![false; cards],
            faces: vec![None; cards],
            first_card: None,
            pending_hide: None,
            moves: 0,
            matches: 0,
        }
    }

    /// Builds the grid from a start response.
    pub fn from_descriptor(difficulty: Difficulty, descriptor: &SessionDescriptor) -> Self {
        let grid_size = descriptor
            .grid_size
            .unwrap_or_else(|| default_grid_size(difficulty));
        let total_pairs = descriptor
            .total_pairs
            .unwrap_or((grid_size * grid_size / 2) as u32);
        Self::new(grid_size, total_pairs)
    }

    /// Number of cards on the grid.
    pub fn card_count(&self) -> usize {
        self.grid_size * self.grid_size
    }

    /// True while a non-matching pair waits to be turned face down.
    pub fn is_waiting_for_hide(&self) -> bool {
        self.pending_hide.is_some()
    }

    /// Turns the pending pair face down after the backend confirmed the hide.
    #[instrument(skip(self, hidden))]
    pub fn finish_hide(&mut self, hidden: &HiddenCards) {
        let Some((first, second)) = self.pending_hide.take() else {
            debug!("No cards waiting to be hidden");
            return;
        };
        for index in [first, second] {
            if let Some(face) = self.faces.get_mut(index) {
                *face = None;
            }
        }
        if hidden.revealed.len() == self.revealed.len() {
            self.revealed.clone_from(&hidden.revealed);
        } else {
            for index in [first, second] {
                if let Some(flag) = self.revealed.get_mut(index) {
                    *flag = false;
                }
            }
        }
        debug!(first, second, "Cards hidden");
    }

    fn sync_flags(&mut self, revealed: Option<&Vec<bool>>, matched: Option<&Vec<bool>>) {
        if let Some(revealed) = revealed.filter(|r| r.len() == self.revealed.len()) {
            self.revealed.clone_from(revealed);
        }
        if let Some(matched) = matched.filter(|m| m.len() == self.matched.len()) {
            self.matched.clone_from(matched);
        }
    }

    fn mark(flags: &mut [bool], index: usize) {
        if let Some(flag) = flags.get_mut(index) {
            *flag = true;
        }
    }
}

impl GameRules for MemoryState {
    fn kind(&self) -> GameKind {
        GameKind::Memory
    }

    #[instrument(skip(self))]
    fn validate_move(&self, mv: &Move) -> Result<(), ArcadeError> {
        let Move::Flip(index) = mv else {
            return Err(wrong_kind(self.kind(), mv.kind()));
        };
        if self.is_waiting_for_hide() {
            return Err(ArcadeError::invalid_state(
                "waiting for the last pair to be hidden",
            ));
        }
        if *index >= self.card_count() {
            return Err(ArcadeError::validation(format!(
                "card {} is outside the {}x{} grid",
                index, self.grid_size, self.grid_size
            )));
        }
        if self.revealed[*index] || self.matched[*index] {
            return Err(ArcadeError::validation(format!(
                "card {} is already face up",
                index
            )));
        }
        Ok(())
    }

    #[instrument(skip(self, result))]
    fn apply_result(&mut self, result: &MoveResult) -> Result<Progress, ArcadeError> {
        let MoveResult::Flip(flip) = result else {
            return Err(unexpected_result(self.kind(), result.kind()));
        };

        let index = flip.card_index;
        if let Some(index) = index {
            Self::mark(&mut self.revealed, index);
            if let Some(face) = self.faces.get_mut(index) {
                *face = flip.card_value;
            }
        }
        if let Some(moves) = flip.moves {
            self.moves = moves;
        }
        self.sync_flags(flip.revealed.as_ref(), flip.matched.as_ref());

        match flip.status {
            FlipStatus::FirstCard => {
                self.first_card = index;
                Ok(Progress::Continue(Outcome::Continue))
            }
            FlipStatus::Match => {
                let first = flip.first_card.or(self.first_card.take());
                for card in [first, index].into_iter().flatten() {
                    Self::mark(&mut self.matched, card);
                }
                self.matches = flip.matches.unwrap_or(self.matches + 1);
                debug!(matches = self.matches, total = self.total_pairs, "Pair matched");

                let completed = flip.game_status.as_deref() == Some("completed");
                if completed || self.matches >= self.total_pairs {
                    Ok(Progress::Finished {
                        outcome: Outcome::Won,
                        points: self.score(Outcome::Won),
                        attempts: self.moves,
                    })
                } else {
                    Ok(Progress::Continue(Outcome::Matched))
                }
            }
            FlipStatus::NoMatch => {
                let first = flip.first_card.or(self.first_card.take());
                let second = flip.second_card.or(index);
                if let (Some(first), Some(second)) = (first, second) {
                    self.pending_hide = Some((first, second));
                }
                Ok(Progress::Continue(Outcome::Unmatched))
            }
        }
    }

    fn score(&self, outcome: Outcome) -> i64 {
        match outcome {
            Outcome::Won => {
                (3 * i64::from(self.total_pairs) - i64::from(self.moves) + 1).max(1)
            }
            _ => 0,
        }
    }

    fn render(&self) -> String {
        let mut out = format!(
            "Moves {} | Matches {} / {}\n",
            self.moves, self.matches, self.total_pairs
        );
        for row in 0..self.grid_size {
            let line: Vec<String> = (0..self.grid_size)
                .map(|col| {
                    let index = row * self.grid_size + col;
                    match (self.matched[index], self.faces[index]) {
                        (true, _) => "  *".to_string(),
                        (false, Some(face)) if self.revealed[index] => format!("{:>3}", face),
                        _ => format!("{:>3}", format!("?{}", index)),
                    }
                })
                .collect();
            out.push_str(&line.join(" "));
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::results::MemoryFlip;

    fn flip(status: FlipStatus, card_index: usize) -> MemoryFlip {
        MemoryFlip {
            card_index: Some(card_index),
            card_value: Some(1),
            status,
            moves: None,
            matches: None,
            game_status: None,
            matched: None,
            revealed: None,
            first_card: None,
            second_card: None,
        }
    }

    #[test]
    fn test_no_match_blocks_flips_until_hidden() {
        let mut state = MemoryState::new(4, 8);
        state
            .apply_result(&MoveResult::Flip(flip(FlipStatus::FirstCard, 0)))
            .unwrap();
        let progress = state
            .apply_result(&MoveResult::Flip(flip(FlipStatus::NoMatch, 5)))
            .unwrap();
        assert_eq!(progress, Progress::Continue(Outcome::Unmatched));
        assert_eq!(*state.pending_hide(), Some((0, 5)));
        assert!(state.validate_move(&Move::Flip(3)).is_err());

        state.finish_hide(&HiddenCards::default());
        assert!(!state.revealed()[0]);
        assert!(!state.revealed()[5]);
        assert!(state.validate_move(&Move::Flip(0)).is_ok());
    }

    #[test]
    fn test_match_marks_first_card_reported_by_backend() {
        let mut state = MemoryState::new(4, 8);
        let mut second = flip(FlipStatus::Match, 9);
        second.first_card = Some(2);

        let progress = state.apply_result(&MoveResult::Flip(second)).unwrap();

        assert_eq!(progress, Progress::Continue(Outcome::Matched));
        assert!(state.matched()[2]);
        assert!(state.matched()[9]);
        assert!(state.validate_move(&Move::Flip(2)).is_err());
    }

    #[test]
    fn test_score_uses_three_moves_per_pair() {
        let mut state = MemoryState::new(4, 8);
        state.moves = 10;
        assert_eq!(state.score(Outcome::Won), 15);
        state.moves = 40;
        assert_eq!(state.score(Outcome::Won), 1);
    }
}
