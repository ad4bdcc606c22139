//! Rock-paper-scissors rules.

use derive_getters::Getters;
use tracing::instrument;

use super::{GameRules, Progress, unexpected_result, wrong_kind};
use crate::error::ArcadeError;
use crate::games::kind::GameKind;
use crate::games::moves::{Move, RpsChoice};
use crate::games::results::{MoveResult, Outcome, RoundResult, RpsRound};

/// Running score across rounds of one activation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Getters)]
pub struct RpsTally {
    player: u32,
    computer: u32,
    ties: u32,
}

impl RpsTally {
    fn record(&mut self, result: RoundResult) {
        match result {
            RoundResult::Win => self.player += 1,
            RoundResult::Lose => self.computer += 1,
            RoundResult::Tie => self.ties += 1,
        }
    }
}

/// Rock-paper-scissors session state.
#[derive(Debug, Clone, Default, PartialEq, Getters)]
pub struct RpsState {
    tally: RpsTally,
    last_round: Option<RpsRound>,
}

impl RpsState {
    /// Starts a round carrying over an earlier tally.
    pub fn with_tally(tally: RpsTally) -> Self {
        Self {
            tally,
            last_round: None,
        }
    }
}

impl GameRules for RpsState {
    fn kind(&self) -> GameKind {
        GameKind::RockPaperScissors
    }

    fn validate_move(&self, mv: &Move) -> Result<(), ArcadeError> {
        match mv {
            Move::Throw(_) => Ok(()),
            other => Err(wrong_kind(self.kind(), other.kind())),
        }
    }

    #[instrument(skip(self, result))]
    fn apply_result(&mut self, result: &MoveResult) -> Result<Progress, ArcadeError> {
        let MoveResult::Round(round) = result else {
            return Err(unexpected_result(self.kind(), result.kind()));
        };
        self.tally.record(round.result);
        self.last_round = Some(round.clone());

        let outcome = match round.result {
            RoundResult::Win => Outcome::Won,
            RoundResult::Lose => Outcome::Lost,
            RoundResult::Tie => Outcome::Tie,
        };
        Ok(Progress::Finished {
            outcome,
            points: self.score(outcome),
            attempts: 1,
        })
    }

    fn score(&self, outcome: Outcome) -> i64 {
        i64::from(outcome == Outcome::Won)
    }

    fn render(&self) -> String {
        let mut out = format!(
            "You {} : {} Computer",
            self.tally.player, self.tally.computer
        );
        if let Some(round) = &self.last_round {
            let name = |c: Option<RpsChoice>| c.map_or("?", |c| c.as_str());
            out.push_str(&format!(
                "\n{} vs {}: {}",
                name(round.player_choice),
                name(round.computer_choice),
                match round.result {
                    RoundResult::Win => "You win!",
                    RoundResult::Lose => "You lose!",
                    RoundResult::Tie => "It's a tie!",
                }
            ));
        }
        out
    }
}
