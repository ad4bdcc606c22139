//! Game session controller.
//!
//! Drives one session at a time from creation through moves to completion:
//!
//! ```text
//! Idle --start--> Created --move--> InProgress --terminal result--> Completed
//!   ^                                                                   |
//!   +-------------------------------close-------------------------------+
//! ```
//!
//! Memory and snake sessions skip `Created`. Timers never touch the
//! controller; they post [`ScheduledAction`]s to the receiver returned by
//! [`GameSessionController::new`], and the owner feeds those back through
//! [`GameSessionController::handle`].

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use derive_getters::Getters;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, instrument, warn};

use crate::client::GameApi;
use crate::config::Timings;
use crate::error::{ArcadeError, ArcadeErrorKind};
use crate::games::{
    Difficulty, Direction, GameKind, KindState, MemoryState, Move, MoveResult, Outcome, Progress,
    RpsState, RpsTally, SnakeState,
};
use crate::leaderboard::Leaderboard;
use crate::schedule::{ScheduledAction, ScheduledTask};
use crate::score::{ScoreRecord, ScoreReport, ScoreReporter};
use crate::session::{PlayerIdentity, Session, SessionId, SessionStatus, SessionStore};

/// Externally visible controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    /// No session.
    Idle,
    /// Session created, no move yet.
    Created,
    /// Session running.
    InProgress,
    /// Session finished; close or restart to play again.
    Completed,
}

/// What one dispatched move did.
#[derive(Debug, Clone, Getters)]
pub struct MoveReport {
    /// Backend response.
    result: MoveResult,
    /// How the result was interpreted.
    progress: Progress,
    /// Session status after the move.
    status: SessionStatus,
    /// Score outcome, present only when this move finished the session.
    score: Option<ScoreReport>,
}

/// State machine for a single game session.
#[derive(Debug)]
pub struct GameSessionController<A: GameApi> {
    api: Arc<A>,
    reporter: ScoreReporter<A>,
    store: SessionStore,
    identity: Option<PlayerIdentity>,
    timings: Timings,
    tx: UnboundedSender<ScheduledAction>,
    snake_ticker: ScheduledTask,
    tick_pending: Arc<AtomicBool>,
    hide_timer: ScheduledTask,
    last_report: Option<ScoreReport>,
    leaderboard: Option<Leaderboard>,
}

impl<A: GameApi> GameSessionController<A> {
    /// Creates an idle controller and the receiver its timers post to.
    pub fn new(api: Arc<A>, timings: Timings) -> (Self, UnboundedReceiver<ScheduledAction>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let controller = Self {
            reporter: ScoreReporter::new(Arc::clone(&api)),
            api,
            store: SessionStore::new(),
            identity: None,
            timings,
            tx,
            snake_ticker: ScheduledTask::default(),
            tick_pending: Arc::new(AtomicBool::new(false)),
            hide_timer: ScheduledTask::default(),
            last_report: None,
            leaderboard: None,
        };
        (controller, rx)
    }

    /// Current state.
    pub fn state(&self) -> ControllerState {
        match self.store.get().map(Session::status) {
            None => ControllerState::Idle,
            Some(SessionStatus::Created) => ControllerState::Created,
            Some(SessionStatus::InProgress) => ControllerState::InProgress,
            Some(SessionStatus::Completed) => ControllerState::Completed,
        }
    }

    /// The active session.
    pub fn session(&self) -> Option<&Session> {
        self.store.get()
    }

    /// Transient state of the active session.
    pub fn kind_state(&self) -> Option<&KindState> {
        self.store.state()
    }

    /// The logged-in player, if any.
    pub fn identity(&self) -> Option<&PlayerIdentity> {
        self.identity.as_ref()
    }

    /// Score outcome of the most recently completed session.
    pub fn last_report(&self) -> Option<&ScoreReport> {
        self.last_report.as_ref()
    }

    /// Most recently fetched leaderboard.
    pub fn leaderboard(&self) -> Option<&Leaderboard> {
        self.leaderboard.as_ref()
    }

    /// True while the snake ticker is running.
    pub fn is_ticking(&self) -> bool {
        self.snake_ticker.is_active()
    }

    /// Injects or removes the player scores are recorded for.
    #[instrument(skip(self, identity), fields(player = identity.as_ref().map(|i| i.name().as_str())))]
    pub fn set_identity(&mut self, identity: Option<PlayerIdentity>) {
        self.identity = identity;
    }

    /// Starts a session of `kind`.
    ///
    /// # Errors
    ///
    /// `InvalidState` unless idle; `SessionCreateFailed` if the backend
    /// refuses, in which case the controller stays idle.
    #[instrument(skip(self))]
    pub async fn start(
        &mut self,
        kind: GameKind,
        difficulty: Difficulty,
    ) -> Result<Session, ArcadeError> {
        self.start_with(kind, difficulty, None).await
    }

    async fn start_with(
        &mut self,
        kind: GameKind,
        difficulty: Difficulty,
        tally: Option<RpsTally>,
    ) -> Result<Session, ArcadeError> {
        if let Some(session) = self.store.get() {
            return Err(ArcadeError::invalid_state(format!(
                "session {} is still open",
                session.id()
            )));
        }
        self.cancel_timers();

        let descriptor = self
            .api
            .create_session(kind, difficulty)
            .await
            .map_err(|e| {
                warn!(error = %e, "Session creation failed");
                ArcadeError::new(ArcadeErrorKind::SessionCreateFailed(e.kind().to_string()))
            })?;

        let mut state = KindState::from_descriptor(kind, difficulty, &descriptor);
        if let (Some(tally), Some(rps)) = (tally, state.rps_mut()) {
            *rps = RpsState::with_tally(tally);
        }
        let session = Session::new(descriptor.game_id, kind, difficulty);
        let id = session.id().clone();
        self.store.set(session.clone(), state);

        if kind == GameKind::Snake {
            self.start_ticker(id.clone());
        }
        info!(session_id = %id, "Session started");
        Ok(session)
    }

    /// Validates and dispatches a move for the active session.
    ///
    /// # Errors
    ///
    /// `InvalidState` without an open session, `Validation` for a move the
    /// local mirror rejects, or the backend's error. On a backend error the
    /// session is left untouched.
    #[instrument(skip(self))]
    pub async fn submit_move(&mut self, mv: Move) -> Result<MoveReport, ArcadeError> {
        let session_id = self.check_move(&mv)?;
        self.dispatch(session_id, mv).await
    }

    /// Like [`submit_move`](Self::submit_move), but only for `session_id`.
    ///
    /// # Errors
    ///
    /// `InvalidState` when `session_id` is not the active session.
    #[instrument(skip(self))]
    pub async fn submit_move_for(
        &mut self,
        session_id: &str,
        mv: Move,
    ) -> Result<MoveReport, ArcadeError> {
        self.ensure_current(session_id)?;
        self.submit_move(mv).await
    }

    /// Runs a timer-posted action.
    ///
    /// Returns the move report for a snake tick, `None` for a hide or for a
    /// tick while paused.
    ///
    /// # Errors
    ///
    /// `InvalidState` for an action tagged with a session that is no longer
    /// active, otherwise whatever the underlying operation returns.
    #[instrument(skip(self))]
    pub async fn handle(
        &mut self,
        action: ScheduledAction,
    ) -> Result<Option<MoveReport>, ArcadeError> {
        self.ensure_current(action.session_id())?;
        match action {
            ScheduledAction::SnakeTick { .. } => {
                let report = self.tick().await;
                self.tick_pending.store(false, Ordering::Release);
                report
            }
            ScheduledAction::HideCards { .. } => {
                self.hide_cards().await?;
                Ok(None)
            }
        }
    }

    async fn tick(&mut self) -> Result<Option<MoveReport>, ArcadeError> {
        let snake = self
            .store
            .state()
            .and_then(KindState::snake)
            .ok_or_else(|| ArcadeError::invalid_state("tick for a non-snake session"))?;
        if *snake.paused() {
            debug!("Tick while paused");
            return Ok(None);
        }
        let mv = snake.next_move();
        self.submit_move(mv).await.map(Some)
    }

    /// Turns the pending memory pair face down.
    ///
    /// Normally run by the hide timer; call directly to retry after a failed
    /// hide. The pair stays pending until the backend confirms.
    #[instrument(skip(self))]
    pub async fn hide_cards(&mut self) -> Result<(), ArcadeError> {
        let session_id = {
            let session = self.open_session()?;
            let memory = self
                .store
                .state()
                .and_then(KindState::memory)
                .ok_or_else(|| ArcadeError::invalid_state("not a memory session"))?;
            if !memory.is_waiting_for_hide() {
                return Err(ArcadeError::invalid_state("no cards waiting to be hidden"));
            }
            session.id().clone()
        };
        self.hide_timer.cancel();

        let hidden = self.api.hide_cards(&session_id).await?;
        if let Some(memory) = self.memory_mut() {
            memory.finish_hide(&hidden);
        }
        Ok(())
    }

    /// Sets the snake's next direction.
    ///
    /// # Errors
    ///
    /// `Validation` when reversing onto the current heading.
    #[instrument(skip(self))]
    pub fn steer(&mut self, direction: Direction) -> Result<(), ArcadeError> {
        self.open_session()?;
        self.snake_mut()?.steer(direction)
    }

    /// Stops the snake ticker.
    #[instrument(skip(self))]
    pub fn pause(&mut self) -> Result<(), ArcadeError> {
        self.open_session()?;
        self.snake_mut()?.set_paused(true);
        self.snake_ticker.cancel();
        info!("Snake paused");
        Ok(())
    }

    /// Restarts the snake ticker.
    #[instrument(skip(self))]
    pub fn resume(&mut self) -> Result<(), ArcadeError> {
        let session_id = self.open_session()?.id().clone();
        self.snake_mut()?.set_paused(false);
        if !self.snake_ticker.is_active() {
            self.start_ticker(session_id);
        }
        info!("Snake resumed");
        Ok(())
    }

    /// Closes the session and starts a new one of the same kind and
    /// difficulty. The rock-paper-scissors tally carries over.
    #[instrument(skip(self))]
    pub async fn restart(&mut self) -> Result<Session, ArcadeError> {
        let session = self
            .store
            .get()
            .ok_or_else(|| ArcadeError::invalid_state("nothing to restart"))?;
        let (kind, difficulty) = (*session.kind(), *session.difficulty());
        let tally = self
            .store
            .state()
            .and_then(KindState::rps)
            .map(|rps| *rps.tally());

        self.close();
        self.start_with(kind, difficulty, tally).await
    }

    /// Cancels timers and drops the session. Calling it when idle does nothing.
    #[instrument(skip(self))]
    pub fn close(&mut self) {
        self.cancel_timers();
        match self.store.clear() {
            Some((session, _)) => info!(session_id = %session.id(), "Session closed"),
            None => debug!("Nothing to close"),
        }
    }

    fn check_move(&self, mv: &Move) -> Result<SessionId, ArcadeError> {
        let session = self.open_session()?;
        let state = self
            .store
            .state()
            .ok_or_else(|| ArcadeError::invalid_state("no active session"))?;
        state.rules().validate_move(mv)?;
        Ok(session.id().clone())
    }

    async fn dispatch(&mut self, session_id: SessionId, mv: Move) -> Result<MoveReport, ArcadeError> {
        let result = self.api.submit_move(&session_id, mv).await?;

        let (session, state) = self
            .store
            .get_mut()
            .ok_or_else(|| ArcadeError::invalid_state("session closed during move"))?;
        let rules = state.rules_mut();
        rules.record_move(&mv);
        let progress = rules.apply_result(&result)?;
        session.advance(SessionStatus::InProgress);
        let (kind, difficulty) = (*session.kind(), *session.difficulty());
        debug!(outcome = ?progress.outcome(), "Result applied");

        let score = match progress {
            Progress::Finished {
                points, attempts, ..
            } => Some(self.complete(kind, difficulty, points, attempts).await),
            Progress::Continue(Outcome::Unmatched) => {
                self.hide_timer = ScheduledTask::after(
                    *self.timings.memory_hide_delay(),
                    self.tx.clone(),
                    ScheduledAction::HideCards {
                        session_id: session_id.clone(),
                    },
                );
                None
            }
            Progress::Continue(_) => None,
        };

        let status = self
            .store
            .get()
            .map_or(SessionStatus::Completed, |s| *s.status());
        Ok(MoveReport {
            result,
            progress,
            status,
            score,
        })
    }

    /// Marks the session completed and records the score. Runs once per
    /// session since completed sessions reject further moves.
    #[instrument(skip(self))]
    async fn complete(
        &mut self,
        kind: GameKind,
        difficulty: Difficulty,
        points: i64,
        attempts: u32,
    ) -> ScoreReport {
        if let Some((session, _)) = self.store.get_mut() {
            session.advance(SessionStatus::Completed);
        }
        self.cancel_timers();
        info!("Session completed");

        let report = match &self.identity {
            None => {
                info!("No player logged in, score not recorded");
                ScoreReport::Skipped
            }
            Some(identity) => {
                let record = ScoreRecord::new(
                    identity.name().clone(),
                    kind,
                    points,
                    attempts,
                    difficulty.for_score(kind),
                );
                match self.reporter.report(&record).await {
                    Ok(leaderboard) => {
                        if let Some(board) = &leaderboard {
                            self.leaderboard = Some(board.clone());
                        }
                        ScoreReport::Recorded {
                            record,
                            leaderboard,
                        }
                    }
                    Err(error) => {
                        warn!(error = %error, "Score could not be recorded");
                        ScoreReport::Failed { record, error }
                    }
                }
            }
        };
        self.last_report = Some(report.clone());
        report
    }

    fn open_session(&self) -> Result<&Session, ArcadeError> {
        let session = self
            .store
            .get()
            .ok_or_else(|| ArcadeError::invalid_state("no active session"))?;
        if !session.accepts_moves() {
            return Err(ArcadeError::invalid_state(format!(
                "session {} is completed",
                session.id()
            )));
        }
        Ok(session)
    }

    fn ensure_current(&self, session_id: &str) -> Result<(), ArcadeError> {
        match self.store.get() {
            Some(session) if session.id() == session_id => Ok(()),
            _ => {
                debug!(session_id, "Rejecting action for stale session");
                Err(ArcadeError::invalid_state(format!(
                    "session {} is not active",
                    session_id
                )))
            }
        }
    }

    fn snake_mut(&mut self) -> Result<&mut SnakeState, ArcadeError> {
        self.store
            .get_mut()
            .and_then(|(_, state)| state.snake_mut())
            .ok_or_else(|| ArcadeError::invalid_state("not a snake session"))
    }

    fn memory_mut(&mut self) -> Option<&mut MemoryState> {
        self.store.get_mut().and_then(|(_, state)| state.memory_mut())
    }

    fn start_ticker(&mut self, session_id: SessionId) {
        self.tick_pending = Arc::new(AtomicBool::new(false));
        self.snake_ticker = ScheduledTask::every(
            *self.timings.snake_tick(),
            self.tx.clone(),
            ScheduledAction::SnakeTick { session_id },
            Arc::clone(&self.tick_pending),
        );
    }

    fn cancel_timers(&mut self) {
        let ticker = self.snake_ticker.cancel();
        let hide = self.hide_timer.cancel();
        if ticker || hide {
            debug!(ticker, hide, "Timers cancelled");
        }
    }
}
