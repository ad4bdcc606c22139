//! Line-oriented terminal front end for one game activation.

use anyhow::Result;
use playzone::{
    ArcadeErrorKind, Direction, GameApi, GameKind, GameSessionController, Move, MoveReport,
    Progress, RpsChoice, ScheduledAction, ScoreReport,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, instrument, warn};

/// One parsed line of user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input {
    Move(Move),
    Steer(Direction),
    Pause,
    Resume,
    Hide,
    Restart,
    Help,
    Quit,
}

/// Parses a line for a game of `kind`.
fn parse_input(kind: GameKind, line: &str) -> Option<Input> {
    let line = line.trim();
    match line {
        "q" | "quit" => return Some(Input::Quit),
        "restart" => return Some(Input::Restart),
        "r" if kind != GameKind::RockPaperScissors => return Some(Input::Restart),
        "?" | "help" => return Some(Input::Help),
        _ => {}
    }

    match kind {
        GameKind::NumberGuess => line.parse().ok().map(|n| Input::Move(Move::Guess(n))),
        GameKind::RockPaperScissors => RpsChoice::parse(line).map(|c| Input::Move(Move::Throw(c))),
        GameKind::TicTacToe => line.parse().ok().map(|p| Input::Move(Move::Place(p))),
        GameKind::Memory => match line {
            "h" | "hide" => Some(Input::Hide),
            _ => line.parse().ok().map(|i| Input::Move(Move::Flip(i))),
        },
        GameKind::Snake => match line {
            "p" | "pause" => Some(Input::Pause),
            "c" | "continue" => Some(Input::Resume),
            _ => Direction::parse(line).map(Input::Steer),
        },
    }
}

fn help(kind: GameKind) -> &'static str {
    match kind {
        GameKind::NumberGuess => "enter a number; r restarts, q quits",
        GameKind::RockPaperScissors => "rock, paper or scissors (or r/p/s); restart starts over, q quits",
        GameKind::TicTacToe => "enter a cell 0-8; r restarts, q quits",
        GameKind::Memory => "enter a card index; h hides a stuck pair, r restarts, q quits",
        GameKind::Snake => "w/a/s/d steers, p pauses, c continues, r restarts, q quits",
    }
}

/// Drives `controller` from stdin until the user quits.
#[instrument(skip(controller, actions))]
pub async fn run<A: GameApi>(
    mut controller: GameSessionController<A>,
    mut actions: UnboundedReceiver<ScheduledAction>,
    kind: GameKind,
) -> Result<()> {
    println!("{} - {}", kind.label(), help(kind));
    render(&controller);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("stdin closed");
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                let Some(input) = parse_input(kind, &line) else {
                    println!("? {}", help(kind));
                    continue;
                };
                if input == Input::Quit {
                    break;
                }
                apply(&mut controller, input, kind).await;
            }
            Some(action) = actions.recv() => {
                match controller.handle(action).await {
                    Ok(Some(report)) => show_report(&controller, &report),
                    Ok(None) => render(&controller),
                    Err(e) if matches!(e.kind(), ArcadeErrorKind::InvalidState(_)) => {
                        debug!(error = %e, "Dropped scheduled action");
                    }
                    Err(e) => {
                        warn!(error = %e, "Scheduled action failed");
                        println!("! {}", e.kind());
                    }
                }
            }
        }
    }

    controller.close();
    Ok(())
}

async fn apply<A: GameApi>(controller: &mut GameSessionController<A>, input: Input, kind: GameKind) {
    let outcome = match input {
        Input::Move(mv) => match controller.submit_move(mv).await {
            Ok(report) => {
                show_report(controller, &report);
                return;
            }
            Err(e) => Err(e),
        },
        Input::Steer(direction) => controller.steer(direction),
        Input::Pause => controller.pause(),
        Input::Resume => controller.resume(),
        Input::Hide => controller.hide_cards().await,
        Input::Restart => controller.restart().await.map(|_| ()),
        Input::Help => {
            println!("{}", help(kind));
            Ok(())
        }
        Input::Quit => Ok(()),
    };

    match outcome {
        Ok(()) => {
            if !matches!(input, Input::Steer(_) | Input::Help) {
                render(controller);
            }
        }
        Err(e) => println!("! {}", e.kind()),
    }
}

fn render<A: GameApi>(controller: &GameSessionController<A>) {
    if let Some(state) = controller.kind_state() {
        println!("{}", state.rules().render());
    }
}

fn show_report<A: GameApi>(controller: &GameSessionController<A>, report: &MoveReport) {
    render(controller);
    if let Progress::Finished { outcome, points, .. } = report.progress() {
        println!("Game over: {:?}, {} points. r plays again, q quits.", outcome, points);
    }
    match report.score() {
        Some(ScoreReport::Recorded { leaderboard, .. }) => {
            println!("Score recorded.");
            if let (Some(board), Some(session)) = (leaderboard, controller.session()) {
                for player in board.ranked(*session.kind()).iter().take(5) {
                    println!("  {}. {} {}", player.rank(), player.player_name(), player.points());
                }
            }
        }
        Some(ScoreReport::Skipped) => println!("Not logged in; score not recorded."),
        Some(ScoreReport::Failed { error, .. }) => {
            println!("Score could not be recorded: {}", error.kind())
        }
        None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_input_per_kind() {
        assert_eq!(
            parse_input(GameKind::NumberGuess, "42"),
            Some(Input::Move(Move::Guess(42)))
        );
        assert_eq!(
            parse_input(GameKind::Snake, "w"),
            Some(Input::Steer(Direction::Up))
        );
        assert_eq!(parse_input(GameKind::Memory, "h"), Some(Input::Hide));
        assert_eq!(
            parse_input(GameKind::RockPaperScissors, "r"),
            Some(Input::Move(Move::Throw(RpsChoice::Rock)))
        );
        assert_eq!(parse_input(GameKind::TicTacToe, "q"), Some(Input::Quit));
        assert_eq!(parse_input(GameKind::TicTacToe, "x"), None);
    }
}
