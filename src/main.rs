//! Twisty Puzzle Viewer
//!
//! Drives the rotation engine interactively in a 3D window, or headlessly:
//! replaying a move sequence through the animation loop, or checking the
//! face permutation tables.

mod visualization;

use std::path::PathBuf;

use anyhow::{bail, ensure, Context};
use clap::{Parser, Subcommand};

use rubik::{notation, EngineConfig, Face, FaceTurn, PuzzleState, RotationController, TickOutcome};

/// Animates face turns of a 3x3x3 twisty puzzle.
#[derive(Parser)]
#[command(name = "rubik")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON file with engine settings.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Seconds per face turn, overriding the config file.
    #[arg(long, global = true)]
    turn_duration: Option<f32>,
    /// Seconds per view nudge, overriding the config file.
    #[arg(long, global = true)]
    view_duration: Option<f32>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Open the interactive 3D viewer.
    View,
    /// Animate a move sequence without a window and print where every cubie ends up.
    Replay {
        /// Moves such as "F R' U2".
        moves: String,
        /// Simulated frames per second.
        #[arg(long, default_value_t = 60.0)]
        fps: f64,
    },
    /// Verify the face permutation tables.
    Check,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command.unwrap_or(Command::View) {
        Command::View => {
            println!("Controls: {}", visualization::CONTROLS);
            visualization::display(config);
        }
        Command::Replay { moves, fps } => {
            let replay = run_replay(config, &moves, fps)?;
            println!(
                "{} turns in {} frames ({:.2}s)",
                replay.turns, replay.frames, replay.seconds
            );
            print!("{}", replay.puzzle.format_occupants());
        }
        Command::Check => {
            run_check()?;
            println!("All {} faces ok", Face::ALL.len());
        }
    }
    Ok(())
}

/// Reads the config file if one was given, then applies command-line overrides.
fn load_config(cli: &Cli) -> anyhow::Result<EngineConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            EngineConfig::from_json_str(&text)
                .with_context(|| format!("failed to parse {}", path.display()))?
        }
        None => EngineConfig::default(),
    };
    if let Some(seconds) = cli.turn_duration {
        config.turn_duration = seconds;
    }
    if let Some(seconds) = cli.view_duration {
        config.view_duration = seconds;
    }
    config.validate().context("invalid engine config")?;
    log::debug!("using {config:?}");
    Ok(config)
}

struct Replay {
    puzzle: PuzzleState,
    turns: usize,
    frames: usize,
    seconds: f64,
}

/// Feeds the moves to a controller as fast as its queue accepts them and
/// ticks at a fixed frame rate until every turn has been committed.
fn run_replay(config: EngineConfig, moves: &str, fps: f64) -> anyhow::Result<Replay> {
    ensure!(fps.is_finite() && fps > 0.0, "fps must be positive, got {fps}");
    let turns = notation::parse_sequence(moves).with_context(|| format!("bad moves {moves:?}"))?;

    let frame = 1.0 / fps;
    let mut controller = RotationController::new(config);
    let mut now = 0.0;
    let mut frames = 0;
    let mut committed = 0;
    let mut step = |controller: &mut RotationController, now: &mut f64| {
        *now += frame;
        frames += 1;
        if let TickOutcome::Committed(turn) = controller.tick(*now) {
            committed += 1;
            log::trace!("frame {frames}: committed {turn}");
        }
    };

    for &turn in &turns {
        while !controller.request_turn(turn, now) {
            step(&mut controller, &mut now);
        }
    }
    while !controller.is_idle() {
        step(&mut controller, &mut now);
    }

    ensure!(
        committed == turns.len(),
        "committed {committed} of {} turns",
        turns.len()
    );
    Ok(Replay {
        puzzle: controller.puzzle().clone(),
        turns: turns.len(),
        frames,
        seconds: now,
    })
}

/// Every face turn is a bijection of order four whose inverse undoes it.
fn run_check() -> anyhow::Result<()> {
    for face in Face::ALL {
        let forward = FaceTurn::forward(face);
        let mut state = PuzzleState::new();
        for quarter in 1..=4 {
            state.apply_turn(forward);
            if !state.is_permutation() {
                bail!("{face} is not a bijection after {quarter} turns");
            }
        }
        if state.occupants() != PuzzleState::new().occupants() {
            bail!("four {face} turns do not restore the puzzle");
        }

        let mut undone = PuzzleState::new();
        undone.apply_turn(forward);
        undone.apply_turn(forward.inverted());
        if undone.occupants() != PuzzleState::new().occupants() {
            bail!("{face}' does not undo {face}");
        }
        log::info!("{face}: ok");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_passes() {
        run_check().unwrap();
    }

    #[test]
    fn test_replay_matches_direct_turns() {
        let moves = "F R' U2 B L' D";
        let replay = run_replay(EngineConfig::default(), moves, 60.0).unwrap();
        assert_eq!(replay.turns, 7);

        let mut direct = PuzzleState::new();
        for turn in notation::parse_sequence(moves).unwrap() {
            direct.apply_turn(turn);
        }
        assert_eq!(replay.puzzle.occupants(), direct.occupants());
        // each turn spans about 24 frames at the default duration
        assert!(replay.frames >= 7 * 24, "{} frames", replay.frames);
    }

    #[test]
    fn test_replay_rejects_bad_input() {
        assert!(run_replay(EngineConfig::default(), "F X", 60.0).is_err());
        assert!(run_replay(EngineConfig::default(), "F", 0.0).is_err());
    }

    #[test]
    fn test_cli_overrides_durations() {
        let cli = Cli::parse_from(["rubik", "--turn-duration", "0.1", "check"]);
        let config = load_config(&cli).unwrap();
        assert_eq!(config.turn_duration, 0.1);
        assert_eq!(config.view_duration, EngineConfig::default().view_duration);

        let cli = Cli::parse_from(["rubik", "--view-duration", "0", "check"]);
        assert!(load_config(&cli).is_err());
    }
}
