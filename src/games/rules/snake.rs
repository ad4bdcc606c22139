//! Snake rules.

use derive_getters::Getters;
use tracing::{debug, instrument};

use super::{GameRules, Progress, unexpected_result, wrong_kind};
use crate::error::ArcadeError;
use crate::games::kind::GameKind;
use crate::games::moves::{Direction, Move};
use crate::games::results::{MoveResult, Outcome, Point, SessionDescriptor, SnakeStatus};

/// Grid edge length when the backend does not say.
pub const DEFAULT_GRID_SIZE: usize = 20;

/// Snake session state.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct SnakeState {
    grid_size: usize,
    body: Vec<Point>,
    food: Option<Point>,
    points: i64,
    /// Direction to send with the next tick.
    direction: Direction,
    /// Direction the backend last moved in.
    heading: Direction,
    paused: bool,
    crash_reason: Option<String>,
}

impl SnakeState {
    /// Builds the state from a start response.
    pub fn from_descriptor(descriptor: &SessionDescriptor) -> Self {
        Self {
            grid_size: descriptor.grid_size.unwrap_or(DEFAULT_GRID_SIZE),
            body: descriptor.snake.clone().unwrap_or_default(),
            food: descriptor.food,
            points: descriptor.score.unwrap_or(0),
            direction: Direction::default(),
            heading: Direction::default(),
            paused: false,
            crash_reason: None,
        }
    }

    /// Sets the direction for the next tick.
    ///
    /// Turning straight back onto the body is refused; the backend would
    /// ignore it anyway.
    #[instrument(skip(self))]
    pub fn steer(&mut self, direction: Direction) -> Result<(), ArcadeError> {
        if direction == self.heading.opposite() {
            return Err(ArcadeError::validation(format!(
                "cannot turn {} while heading {}",
                direction.as_str(),
                self.heading.as_str()
            )));
        }
        self.direction = direction;
        Ok(())
    }

    /// Marks the game paused or running.
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// The move the ticker should send next.
    pub fn next_move(&self) -> Move {
        Move::Advance(self.direction)
    }
}

impl GameRules for SnakeState {
    fn kind(&self) -> GameKind {
        GameKind::Snake
    }

    fn validate_move(&self, mv: &Move) -> Result<(), ArcadeError> {
        match mv {
            Move::Advance(_) => Ok(()),
            other => Err(wrong_kind(self.kind(), other.kind())),
        }
    }

    #[instrument(skip(self, result))]
    fn apply_result(&mut self, result: &MoveResult) -> Result<Progress, ArcadeError> {
        let MoveResult::Step(step) = result else {
            return Err(unexpected_result(self.kind(), result.kind()));
        };
        if let Some(body) = &step.snake {
            self.body.clone_from(body);
        }
        if step.food.is_some() {
            self.food = step.food;
        }
        if let Some(score) = step.score {
            self.points = score;
        }

        match step.status {
            SnakeStatus::Active => {
                if self.direction != self.heading.opposite() {
                    self.heading = self.direction;
                }
                Ok(Progress::Continue(Outcome::Continue))
            }
            SnakeStatus::GameOver => {
                self.crash_reason = step.reason.clone();
                debug!(score = self.points, reason = ?step.reason, "Snake crashed");
                Ok(Progress::Finished {
                    outcome: Outcome::Lost,
                    points: self.score(Outcome::Lost),
                    attempts: 1,
                })
            }
        }
    }

    fn score(&self, _outcome: Outcome) -> i64 {
        self.points
    }

    fn render(&self) -> String {
        let mut out = format!(
            "Score {} | Length {}{}\n",
            self.points,
            self.body.len(),
            if self.paused { " | paused" } else { "" }
        );
        for y in 0..self.grid_size as i32 {
            for x in 0..self.grid_size as i32 {
                let cell = [x, y];
                let glyph = if self.body.first() == Some(&cell) {
                    '@'
                } else if self.body.contains(&cell) {
                    'o'
                } else if self.food == Some(cell) {
                    '*'
                } else {
                    '.'
                };
                out.push(glyph);
            }
            out.push('\n');
        }
        if let Some(reason) = &self.crash_reason {
            out.push_str(&format!("Game over ({}). Final score {}\n", reason, self.points));
        }
        out
    }
}
