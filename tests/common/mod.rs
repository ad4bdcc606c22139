//! Scripted in-memory game backend shared by the integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use playzone::{
    ArcadeError, ArcadeErrorKind, Difficulty, GameApi, GameKind, GameSessionController,
    HiddenCards, Leaderboard, Move, MoveResult, ScheduledAction, ScoreRecord, SessionDescriptor,
    Timings,
};
use serde_json::json;
use tokio::sync::mpsc::UnboundedReceiver;

/// A backend call as seen by the fake.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateSession(GameKind, Difficulty),
    SubmitMove(String, Move),
    HideCards(String),
    FetchLeaderboard,
    AddScore(ScoreRecord),
}

#[derive(Debug, Default)]
struct Script {
    sessions: VecDeque<Result<SessionDescriptor, ArcadeError>>,
    moves: VecDeque<Result<MoveResult, ArcadeError>>,
    hides: VecDeque<Result<HiddenCards, ArcadeError>>,
    score_error: Option<ArcadeError>,
    leaderboard_error: Option<ArcadeError>,
    leaderboard: Leaderboard,
    move_delay: Option<Duration>,
    calls: Vec<Call>,
    issued: usize,
}

/// Backend that replays queued responses and records every call.
#[derive(Debug, Default)]
pub struct ScriptedApi {
    script: Mutex<Script>,
}

impl ScriptedApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_session(&self, descriptor: SessionDescriptor) {
        self.script.lock().unwrap().sessions.push_back(Ok(descriptor));
    }

    pub fn fail_session(&self, error: ArcadeError) {
        self.script.lock().unwrap().sessions.push_back(Err(error));
    }

    pub fn push_move(&self, kind: GameKind, body: serde_json::Value) {
        let result = MoveResult::decode(kind, body).expect("scripted result should decode");
        self.script.lock().unwrap().moves.push_back(Ok(result));
    }

    pub fn fail_move(&self, error: ArcadeError) {
        self.script.lock().unwrap().moves.push_back(Err(error));
    }

    pub fn push_hide(&self, hidden: HiddenCards) {
        self.script.lock().unwrap().hides.push_back(Ok(hidden));
    }

    pub fn fail_hide(&self, error: ArcadeError) {
        self.script.lock().unwrap().hides.push_back(Err(error));
    }

    /// Makes every move round trip take `delay`.
    pub fn delay_moves(&self, delay: Duration) {
        self.script.lock().unwrap().move_delay = Some(delay);
    }

    pub fn fail_scores(&self, error: ArcadeError) {
        self.script.lock().unwrap().score_error = Some(error);
    }

    pub fn fail_leaderboard(&self, error: ArcadeError) {
        self.script.lock().unwrap().leaderboard_error = Some(error);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.script.lock().unwrap().calls.clone()
    }

    pub fn scores(&self) -> Vec<ScoreRecord> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::AddScore(record) => Some(record),
                _ => None,
            })
            .collect()
    }

    pub fn move_calls(&self) -> Vec<Move> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::SubmitMove(_, mv) => Some(mv),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl GameApi for ScriptedApi {
    async fn create_session(
        &self,
        kind: GameKind,
        difficulty: Difficulty,
    ) -> Result<SessionDescriptor, ArcadeError> {
        let mut script = self.script.lock().unwrap();
        script.calls.push(Call::CreateSession(kind, difficulty));
        script.issued += 1;
        let issued = script.issued;
        script.sessions.pop_front().unwrap_or_else(|| {
            Ok(SessionDescriptor {
                game_id: format!("session-{}", issued),
                ..SessionDescriptor::default()
            })
        })
    }

    async fn submit_move(&self, session_id: &str, mv: Move) -> Result<MoveResult, ArcadeError> {
        let (result, delay) = {
            let mut script = self.script.lock().unwrap();
            script
                .calls
                .push(Call::SubmitMove(session_id.to_string(), mv));
            let result = script.moves.pop_front().unwrap_or_else(|| {
                Err(ArcadeError::new(ArcadeErrorKind::Network(
                    "no scripted result".to_string(),
                )))
            });
            (result, script.move_delay)
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        result
    }

    async fn hide_cards(&self, session_id: &str) -> Result<HiddenCards, ArcadeError> {
        let mut script = self.script.lock().unwrap();
        script.calls.push(Call::HideCards(session_id.to_string()));
        script
            .hides
            .pop_front()
            .unwrap_or_else(|| Ok(HiddenCards::default()))
    }

    async fn fetch_leaderboard(&self) -> Result<Leaderboard, ArcadeError> {
        let mut script = self.script.lock().unwrap();
        script.calls.push(Call::FetchLeaderboard);
        match &script.leaderboard_error {
            Some(error) => Err(error.clone()),
            None => Ok(script.leaderboard.clone()),
        }
    }

    async fn add_score(&self, record: &ScoreRecord) -> Result<(), ArcadeError> {
        let mut script = self.script.lock().unwrap();
        script.calls.push(Call::AddScore(record.clone()));
        match &script.score_error {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

pub fn timings() -> Timings {
    Timings::new(Duration::from_millis(200), Duration::from_millis(1500))
}

pub fn controller(
    api: &Arc<ScriptedApi>,
) -> (
    GameSessionController<ScriptedApi>,
    UnboundedReceiver<ScheduledAction>,
) {
    GameSessionController::new(Arc::clone(api), timings())
}

pub fn network_error() -> ArcadeError {
    ArcadeError::new(ArcadeErrorKind::Network("connection refused".to_string()))
}

pub fn descriptor(game_id: &str) -> SessionDescriptor {
    SessionDescriptor {
        game_id: game_id.to_string(),
        ..SessionDescriptor::default()
    }
}

pub fn number_guess_descriptor(game_id: &str) -> SessionDescriptor {
    SessionDescriptor {
        min: Some(1),
        max: Some(100),
        max_attempts: Some(10),
        ..descriptor(game_id)
    }
}

pub fn memory_descriptor(game_id: &str, grid_size: usize, total_pairs: u32) -> SessionDescriptor {
    SessionDescriptor {
        grid_size: Some(grid_size),
        total_pairs: Some(total_pairs),
        ..descriptor(game_id)
    }
}

pub fn snake_descriptor(game_id: &str) -> SessionDescriptor {
    SessionDescriptor {
        grid_size: Some(20),
        snake: Some(vec![[5, 5], [4, 5], [3, 5]]),
        food: Some([10, 10]),
        score: Some(0),
        ..descriptor(game_id)
    }
}

pub fn incorrect(attempts: u32, hint: &str) -> serde_json::Value {
    json!({ "result": "incorrect", "hint": hint, "attempts": attempts, "remaining": 10 - attempts })
}

pub fn correct(attempts: u32, target: i64) -> serde_json::Value {
    json!({ "result": "correct", "attempts": attempts, "target": target })
}

pub fn out_of_guesses(attempts: u32, target: i64) -> serde_json::Value {
    json!({ "result": "game_over", "attempts": attempts, "remaining": 0, "target": target })
}

pub fn turn(status: &str, winner: Option<&str>) -> serde_json::Value {
    json!({
        "board": ["X", "O", "X", "X", "O", "O", "O", "X", "X"],
        "status": status,
        "winner": winner,
        "ai_move": null,
    })
}

pub fn round(player: &str, computer: &str, result: &str) -> serde_json::Value {
    json!({ "player_choice": player, "computer_choice": computer, "result": result })
}

pub fn first_card(index: usize, value: i64, moves: u32) -> serde_json::Value {
    json!({ "card_index": index, "card_value": value, "status": "first_card", "moves": moves })
}

pub fn matched(index: usize, value: i64, moves: u32, matches: u32, done: bool) -> serde_json::Value {
    let mut body = json!({
        "card_index": index,
        "card_value": value,
        "status": "match",
        "moves": moves,
        "matches": matches,
    });
    if done {
        body["game_status"] = json!("completed");
    }
    body
}

pub fn no_match(first: usize, second: usize, value: i64, moves: u32) -> serde_json::Value {
    json!({
        "card_index": second,
        "card_value": value,
        "status": "no_match",
        "moves": moves,
        "first_card": first,
        "second_card": second,
    })
}

pub fn step(head: [i32; 2], score: i64) -> serde_json::Value {
    json!({ "snake": [head, [5, 5]], "food": [10, 10], "score": score, "status": "active" })
}

pub fn crash(score: i64, reason: &str) -> serde_json::Value {
    json!({ "status": "game_over", "score": score, "reason": reason })
}
