//! Playzone - terminal client
//!
//! Plays arcade games against the backend and prints leaderboards.

#![warn(missing_docs)]

mod cli;
mod play;

use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use cli::{Cli, Command};
use playzone::{
    ArcadeConfig, Difficulty, GameApi, GameKind, GameSessionController, HttpGameClient,
    PlayerIdentity,
};
use strum::IntoEnumIterator;
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ArcadeConfig::from_file(path)?,
        None => ArcadeConfig::default(),
    };
    if let Some(url) = cli.server_url {
        config = config.with_base_url(url);
    }

    match cli.command {
        Command::Play {
            kind,
            difficulty,
            player,
            password,
        } => run_play(config, kind, difficulty, player, password).await,
        Command::Leaderboard { kind } => run_leaderboard(config, kind).await,
        Command::BestScores { player, password } => {
            run_best_scores(config, player, password).await
        }
    }
}

fn parse_kind(kind: &str) -> Result<GameKind> {
    GameKind::parse(kind).ok_or_else(|| {
        let known: Vec<_> = GameKind::iter().map(GameKind::api_name).collect();
        anyhow!("unknown game '{}', expected one of {}", kind, known.join(", "))
    })
}

async fn log_in(
    client: &HttpGameClient,
    player: &str,
    password: Option<String>,
) -> Result<PlayerIdentity> {
    let password = password.context("a password is required (--password or PLAYZONE_PASSWORD)")?;
    Ok(client.login(player, &password).await?)
}

/// Run one game activation
#[instrument(skip(config, password))]
async fn run_play(
    config: ArcadeConfig,
    kind: String,
    difficulty: Option<String>,
    player: Option<String>,
    password: Option<String>,
) -> Result<()> {
    let kind = parse_kind(&kind)?;
    let difficulty = match difficulty {
        Some(d) => Difficulty::parse(&d).ok_or_else(|| anyhow!("unknown difficulty '{}'", d))?,
        None => *config.default_difficulty(),
    };
    let player = player.or_else(|| config.player_name().clone());
    let config = config.with_player_name(player);

    let client = Arc::new(HttpGameClient::from_config(&config)?);
    let identity = match config.player_name() {
        Some(name) => Some(log_in(&client, name, password).await?),
        None => None,
    };

    let (mut controller, actions) = GameSessionController::new(client, config.timings());
    controller.set_identity(identity);
    controller.start(kind, difficulty).await?;
    info!(?kind, ?difficulty, "Game started");

    play::run(controller, actions, kind).await
}

/// Print ranked totals
#[instrument(skip(config))]
async fn run_leaderboard(config: ArcadeConfig, kind: Option<String>) -> Result<()> {
    let client = HttpGameClient::from_config(&config)?;

    if let Some(kind) = kind {
        let kind = parse_kind(&kind)?;
        let ranked = client.fetch_game_leaderboard(kind).await?;
        println!("{}", kind.label());
        for player in ranked {
            println!("  {}. {} {}", player.rank(), player.player_name(), player.points());
        }
        return Ok(());
    }

    let board = client.fetch_leaderboard().await?;
    for kind in GameKind::iter() {
        println!("{}", kind.label());
        let ranked = board.ranked(kind);
        if ranked.is_empty() {
            println!("  no scores yet");
        }
        for player in ranked {
            println!("  {}. {} {}", player.rank(), player.player_name(), player.points());
        }
    }
    Ok(())
}

/// Print a player's best points
#[instrument(skip(config, password))]
async fn run_best_scores(
    config: ArcadeConfig,
    player: String,
    password: Option<String>,
) -> Result<()> {
    let client = HttpGameClient::from_config(&config)?;
    log_in(&client, &player, password).await?;

    let best = client.best_scores().await?;
    for kind in GameKind::iter() {
        match best.get(&kind) {
            Some(points) => println!("{:<20} {}", kind.label(), points),
            None => println!("{:<20} -", kind.label()),
        }
    }
    Ok(())
}
