//! Command-line interface for playzone.

use clap::{Parser, Subcommand};

/// Playzone - terminal client for the arcade API
#[derive(Parser, Debug)]
#[command(name = "playzone")]
#[command(about = "Play arcade games and browse leaderboards from the terminal", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, global = true)]
    pub config: Option<std::path::PathBuf>,

    /// Arcade backend URL (overrides the config file)
    #[arg(long, env = "PLAYZONE_URL", global = true)]
    pub server_url: Option<String>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play one game: number_guess, rps, tictactoe, memory or snake
    Play {
        /// Game to play
        kind: String,

        /// easy, medium or hard (number_guess and memory only)
        #[arg(short, long)]
        difficulty: Option<String>,

        /// Player to log in as; scores are only recorded when set
        #[arg(short, long)]
        player: Option<String>,

        /// Password for the player
        #[arg(long, env = "PLAYZONE_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Print ranked totals per game
    Leaderboard {
        /// Only this game
        #[arg(short, long)]
        kind: Option<String>,
    },

    /// Print a player's best points per game
    BestScores {
        /// Player to log in as
        #[arg(short, long)]
        player: String,

        /// Password for the player
        #[arg(long, env = "PLAYZONE_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
}
