//! Tests for the HTTP game client against a mock arcade backend.

use std::time::Duration;

use axum::http::{HeaderMap, StatusCode, header};
use axum::routing::{get, post};
use axum::{Json, Router};
use playzone::{
    ArcadeErrorKind, Difficulty, GameApi, GameKind, GuessVerdict, HttpGameClient, Move,
    MoveResult, RpsChoice, ScoreRecord,
};
use serde_json::{Value, json};

/// Serves `app` on an ephemeral port and returns its base URL.
async fn spawn_backend(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock backend");
    let addr = listener.local_addr().expect("No local address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Mock backend failed");
    });
    format!("http://{}", addr)
}

fn client(base_url: &str) -> HttpGameClient {
    HttpGameClient::new(base_url, Duration::from_secs(5)).expect("Failed to build client")
}

fn logged_in(headers: &HeaderMap) -> bool {
    headers
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|cookie| cookie.contains("session=abc"))
}

fn arcade() -> Router {
    Router::new()
        .route(
            "/api/games/number-guess/start",
            post(|Json(body): Json<Value>| async move {
                Json(json!({
                    "game_id": "g1",
                    "min": 1,
                    "max": 100,
                    "max_attempts": 10,
                    "difficulty": body["difficulty"],
                }))
            }),
        )
        .route(
            "/api/games/number-guess/guess",
            post(|Json(body): Json<Value>| async move {
                if body["game_id"] != "g1" || body["guess"] != 25 {
                    return (StatusCode::BAD_REQUEST, Json(json!({ "error": "bad body" })));
                }
                (
                    StatusCode::OK,
                    Json(json!({ "result": "incorrect", "hint": "higher", "attempts": 1, "remaining": 9 })),
                )
            }),
        )
        .route(
            "/api/games/tictactoe/move",
            post(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "Invalid move" })),
                )
            }),
        )
        .route(
            "/api/games/snake/move",
            post(|| async { Json(json!({ "nonsense": true })) }),
        )
        .route(
            "/api/games/memory/hide-cards",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded") }),
        )
        .route(
            "/api/players/login",
            post(|Json(body): Json<Value>| async move {
                if body["password"] != "hunter2" {
                    return (
                        StatusCode::UNAUTHORIZED,
                        HeaderMap::new(),
                        Json(json!({ "error": "Invalid name or password" })),
                    );
                }
                let mut headers = HeaderMap::new();
                headers.insert(
                    header::SET_COOKIE,
                    "session=abc; Path=/".parse().expect("valid header"),
                );
                (
                    StatusCode::OK,
                    headers,
                    Json(json!({
                        "message": "Logged in",
                        "player": { "id": 7, "name": body["name"], "created_at": "2024-01-01T00:00:00" },
                    })),
                )
            }),
        )
        .route(
            "/api/players/current",
            get(|headers: HeaderMap| async move {
                if !logged_in(&headers) {
                    return (
                        StatusCode::UNAUTHORIZED,
                        Json(json!({ "error": "Not logged in" })),
                    );
                }
                (
                    StatusCode::OK,
                    Json(json!({ "id": 7, "name": "alice", "created_at": "2024-01-01T00:00:00" })),
                )
            }),
        )
        .route(
            "/api/scores/add",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                if !logged_in(&headers) {
                    return (
                        StatusCode::UNAUTHORIZED,
                        Json(json!({ "error": "Not logged in" })),
                    );
                }
                let expected = json!({
                    "game_type": "tictactoe",
                    "points": 3,
                    "attempts": 1,
                    "difficulty": "normal",
                });
                if body != expected {
                    return (StatusCode::BAD_REQUEST, Json(json!({ "error": "bad body" })));
                }
                (StatusCode::OK, Json(json!({ "message": "Score added" })))
            }),
        )
        .route(
            "/api/leaderboard",
            get(|| async {
                Json(json!({
                    "number_guess": [
                        { "player_name": "alice", "points": 8, "difficulty": "medium" },
                        { "player_name": "bob", "points": 5 },
                    ],
                    "pinball": [{ "player_name": "zed", "points": 99 }],
                }))
            }),
        )
        .route(
            "/api/leaderboard/tictactoe",
            get(|| async {
                Json(json!([
                    { "player_name": "bob", "points": 6 },
                    { "player_name": "alice", "points": 9 },
                ]))
            }),
        )
        .route(
            "/api/players/best-scores",
            get(|| async { Json(json!({ "number_guess": 8, "snake": 40, "pinball": 1 })) }),
        )
}

#[tokio::test]
async fn test_create_session_and_guess() {
    let base = spawn_backend(arcade()).await;
    let client = client(&base);

    let descriptor = client
        .create_session(GameKind::NumberGuess, Difficulty::Hard)
        .await
        .expect("start failed");
    assert_eq!(descriptor.game_id, "g1");
    assert_eq!(descriptor.difficulty, Some(Difficulty::Hard));
    assert_eq!(descriptor.max_attempts, Some(10));

    let result = client
        .submit_move("g1", Move::Guess(25))
        .await
        .expect("guess failed");
    match result {
        MoveResult::Guess(guess) => {
            assert_eq!(guess.result, GuessVerdict::Incorrect);
            assert_eq!(guess.hint.as_deref(), Some("higher"));
        }
        other => panic!("expected a guess result, got {:?}", other),
    }
}

#[tokio::test]
async fn test_rps_session_is_local() {
    // No backend at all: RPS sessions never hit the network.
    let client = client("http://127.0.0.1:9");

    let first = client
        .create_session(GameKind::RockPaperScissors, Difficulty::Normal)
        .await
        .expect("local session");
    let second = client
        .create_session(GameKind::RockPaperScissors, Difficulty::Normal)
        .await
        .expect("local session");

    assert_eq!(first.game_id.len(), 36);
    assert_ne!(first.game_id, second.game_id);
}

#[tokio::test]
async fn test_error_body_becomes_backend_error() {
    let base = spawn_backend(arcade()).await;
    let client = client(&base);

    let err = client.submit_move("t1", Move::Place(4)).await.unwrap_err();

    assert_eq!(
        *err.kind(),
        ArcadeErrorKind::Backend {
            status: 400,
            message: "Invalid move".to_string()
        }
    );
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_plain_error_body_is_kept() {
    let base = spawn_backend(arcade()).await;
    let client = client(&base);

    let err = client.hide_cards("m1").await.unwrap_err();

    assert_eq!(
        *err.kind(),
        ArcadeErrorKind::Backend {
            status: 500,
            message: "upstream exploded".to_string()
        }
    );
}

#[tokio::test]
async fn test_unexpected_shape_is_decode_error() {
    let base = spawn_backend(arcade()).await;
    let client = client(&base);

    let err = client
        .submit_move("s1", Move::Advance(playzone::Direction::Up))
        .await
        .unwrap_err();

    assert!(matches!(err.kind(), ArcadeErrorKind::Decode(_)));
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let client = client(&format!("http://{}", addr));

    let err = client
        .submit_move("r1", Move::Throw(RpsChoice::Rock))
        .await
        .unwrap_err();

    assert!(matches!(err.kind(), ArcadeErrorKind::Network(_)));
}

#[tokio::test]
async fn test_login_cookie_carries_over_to_scores() {
    let base = spawn_backend(arcade()).await;
    let client = client(&base);
    let record = ScoreRecord::new(
        "alice".to_string(),
        GameKind::TicTacToe,
        3,
        1,
        Difficulty::Normal,
    );

    assert!(client.current_player().await.unwrap().is_none());
    let err = client.add_score(&record).await.unwrap_err();
    assert!(matches!(
        err.kind(),
        ArcadeErrorKind::Backend { status: 401, .. }
    ));

    let identity = client.login("alice", "hunter2").await.expect("login failed");
    assert_eq!(identity.name(), "alice");
    assert_eq!(identity.credential(), "7");

    let current = client.current_player().await.unwrap().expect("logged in");
    assert_eq!(current.name(), "alice");
    client.add_score(&record).await.expect("score rejected");
}

#[tokio::test]
async fn test_wrong_password_is_backend_error() {
    let base = spawn_backend(arcade()).await;
    let client = client(&base);

    let err = client.login("alice", "wrong").await.unwrap_err();

    assert_eq!(
        *err.kind(),
        ArcadeErrorKind::Backend {
            status: 401,
            message: "Invalid name or password".to_string()
        }
    );
}

#[tokio::test]
async fn test_fetch_leaderboard_skips_unknown_games() {
    let base = spawn_backend(arcade()).await;
    let client = client(&base);

    let board = client.fetch_leaderboard().await.expect("leaderboard");

    assert_eq!(board.entries(GameKind::NumberGuess).len(), 2);
    assert_eq!(board.player_points(GameKind::NumberGuess, "bob"), 5);
    assert!(board.entries(GameKind::Snake).is_empty());
    assert!(!board.is_empty());
}

#[tokio::test]
async fn test_game_leaderboard_is_ranked() {
    let base = spawn_backend(arcade()).await;
    let client = client(&base);

    let ranked = client
        .fetch_game_leaderboard(GameKind::TicTacToe)
        .await
        .expect("leaderboard");

    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0].player_name(), "alice");
    assert_eq!(*ranked[0].rank(), 1);
    assert_eq!(ranked[1].player_name(), "bob");
}

#[tokio::test]
async fn test_best_scores_by_kind() {
    let base = spawn_backend(arcade()).await;
    let client = client(&base);

    let best = client.best_scores().await.expect("best scores");

    assert_eq!(best.len(), 2);
    assert_eq!(best.get(&GameKind::NumberGuess), Some(&8));
    assert_eq!(best.get(&GameKind::Snake), Some(&40));
}
