//! Number guess rules.

use derive_getters::Getters;
use tracing::{debug, instrument};

use super::{GameRules, Progress, unexpected_result, wrong_kind};
use crate::error::ArcadeError;
use crate::games::kind::{Difficulty, GameKind};
use crate::games::moves::Move;
use crate::games::results::{GuessVerdict, MoveResult, Outcome, SessionDescriptor};

/// Guesses allowed when the backend does not say.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

/// Target range for a difficulty when the backend does not say.
pub fn default_range(difficulty: Difficulty) -> (i64, i64) {
    match difficulty {
        Difficulty::Easy => (1, 50),
        Difficulty::Hard => (1, 200),
        Difficulty::Medium | Difficulty::Normal => (1, 100),
    }
}

/// Mirror of a number guess session.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct NumberGuessState {
    min: i64,
    max: i64,
    max_attempts: u32,
    attempts: u32,
    last_hint: Option<String>,
    target: Option<i64>,
}

impl NumberGuessState {
    /// Creates a fresh mirror.
    pub fn new(min: i64, max: i64, max_attempts: u32) -> Self {
        Self {
            min,
            max,
            max_attempts,
            attempts: 0,
            last_hint: None,
            target: None,
        }
    }

    /// Builds the mirror from a start response.
    pub fn from_descriptor(difficulty: Difficulty, descriptor: &SessionDescriptor) -> Self {
        let (min, max) = default_range(difficulty);
        Self::new(
            descriptor.min.unwrap_or(min),
            descriptor.max.unwrap_or(max),
            descriptor.max_attempts.unwrap_or(DEFAULT_MAX_ATTEMPTS),
        )
    }

    /// Guesses left.
    pub fn remaining(&self) -> u32 {
        self.max_attempts.saturating_sub(self.attempts)
    }
}

impl GameRules for NumberGuessState {
    fn kind(&self) -> GameKind {
        GameKind::NumberGuess
    }

    #[instrument(skip(self))]
    fn validate_move(&self, mv: &Move) -> Result<(), ArcadeError> {
        let Move::Guess(guess) = mv else {
            return Err(wrong_kind(self.kind(), mv.kind()));
        };
        if !(self.min..=self.max).contains(guess) {
            return Err(ArcadeError::validation(format!(
                "guess {} is outside {}-{}",
                guess, self.min, self.max
            )));
        }
        Ok(())
    }

    #[instrument(skip(self, result))]
    fn apply_result(&mut self, result: &MoveResult) -> Result<Progress, ArcadeError> {
        let MoveResult::Guess(guess) = result else {
            return Err(unexpected_result(self.kind(), result.kind()));
        };

        self.attempts = guess.attempts.unwrap_or(self.attempts + 1);
        self.last_hint = guess.hint.clone();
        if guess.target.is_some() {
            self.target = guess.target;
        }
        debug!(attempts = self.attempts, verdict = ?guess.result, "Guess applied");

        let outcome = match guess.result {
            GuessVerdict::Incorrect => return Ok(Progress::Continue(Outcome::Continue)),
            GuessVerdict::Correct => Outcome::Won,
            GuessVerdict::GameOver => Outcome::Lost,
        };
        Ok(Progress::Finished {
            outcome,
            points: self.score(outcome),
            attempts: self.attempts,
        })
    }

    fn score(&self, outcome: Outcome) -> i64 {
        match outcome {
            Outcome::Won => (i64::from(self.max_attempts) - i64::from(self.attempts) + 1).max(1),
            _ => 0,
        }
    }

    fn render(&self) -> String {
        let mut out = format!(
            "Range {}-{} | attempts left {}",
            self.min,
            self.max,
            self.remaining()
        );
        if let Some(hint) = &self.last_hint {
            out.push_str(&format!("\nTry {}!", hint));
        }
        if let Some(target) = self.target {
            out.push_str(&format!("\nThe number was {}", target));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::results::GuessResult;

    fn guess(result: GuessVerdict, attempts: u32) -> MoveResult {
        MoveResult::Guess(GuessResult {
            result,
            hint: None,
            attempts: Some(attempts),
            remaining: None,
            target: None,
        })
    }

    #[test]
    fn test_score_on_first_try_is_max_attempts() {
        let mut state = NumberGuessState::new(1, 100, 10);
        let progress = state.apply_result(&guess(GuessVerdict::Correct, 1)).unwrap();
        assert_eq!(
            progress,
            Progress::Finished {
                outcome: Outcome::Won,
                points: 10,
                attempts: 1
            }
        );
    }

    #[test]
    fn test_score_never_below_one_on_win() {
        let mut state = NumberGuessState::new(1, 100, 3);
        state.attempts = 7;
        assert_eq!(state.score(Outcome::Won), 1);
    }

    #[test]
    fn test_out_of_range_guess_rejected() {
        let state = NumberGuessState::new(1, 50, 10);
        assert!(state.validate_move(&Move::Guess(51)).is_err());
        assert!(state.validate_move(&Move::Guess(0)).is_err());
        assert!(state.validate_move(&Move::Guess(50)).is_ok());
    }

    #[test]
    fn test_missing_attempts_counts_locally() {
        let mut state = NumberGuessState::new(1, 100, 10);
        let result = MoveResult::Guess(GuessResult {
            result: GuessVerdict::Incorrect,
            hint: Some("higher".to_string()),
            attempts: None,
            remaining: None,
            target: None,
        });
        state.apply_result(&result).unwrap();
        state.apply_result(&result).unwrap();
        assert_eq!(*state.attempts(), 2);
        assert_eq!(state.remaining(), 8);
    }
}
