use std::io::Read;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use tracing_subscriber::filter::LevelFilter;
use vimsweep_core::*;

mod render;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Preset {
    Easy,
    Medium,
    Hard,
}

impl From<Preset> for Difficulty {
    fn from(preset: Preset) -> Self {
        match preset {
            Preset::Easy => Difficulty::Easy,
            Preset::Medium => Difficulty::Medium,
            Preset::Hard => Difficulty::Hard,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

/// Replays vim-style minesweeper keystrokes and prints the resulting board.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Board preset, individual dimensions can be overridden below
    #[arg(short, long, value_enum, default_value_t = Preset::Easy)]
    difficulty: Preset,

    #[arg(long)]
    width: Option<Coord>,

    #[arg(long)]
    height: Option<Coord>,

    #[arg(long)]
    mines: Option<CellCount>,

    /// Seed for a repeatable game, a random one is used and logged otherwise
    #[arg(short, long)]
    seed: Option<u64>,

    /// Keystrokes to replay, read from stdin when omitted
    #[arg(short, long)]
    keys: Option<String>,

    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    #[command(flatten)]
    verbose: Verbosity<WarnLevel>,
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let preset = GameConfig::from(Difficulty::from(self.difficulty));
        let size = (
            self.width.unwrap_or(preset.size.0),
            self.height.unwrap_or(preset.size.1),
        );
        let mines = self.mines.unwrap_or(preset.mines);
        GameConfig::new(size, mines).with_context(|| {
            format!("invalid board {}x{} with {} mines", size.0, size.1, mines)
        })
    }

    fn read_keys(&self) -> Result<String> {
        if let Some(keys) = &self.keys {
            return Ok(keys.clone());
        }
        let mut keys = String::new();
        std::io::stdin()
            .read_to_string(&mut keys)
            .context("could not read keystrokes from stdin")?;
        Ok(keys)
    }
}

fn level_filter(level: log::LevelFilter) -> LevelFilter {
    match level {
        log::LevelFilter::Off => LevelFilter::OFF,
        log::LevelFilter::Error => LevelFilter::ERROR,
        log::LevelFilter::Warn => LevelFilter::WARN,
        log::LevelFilter::Info => LevelFilter::INFO,
        log::LevelFilter::Debug => LevelFilter::DEBUG,
        log::LevelFilter::Trace => LevelFilter::TRACE,
    }
}

fn init_logging(verbose: &Verbosity<WarnLevel>) -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(level_filter(verbose.log_level_filter()))
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!(err))
        .context("could not install the logger")
}

/// Feeds every key through the lexer into the session until the game ends or the keys run out.
fn replay(session: &mut Session, keys: &str) -> Result<Outcome> {
    let mut lexer = Lexer::new();
    let mut command_line = String::new();
    let mut outcome = Outcome::Continue;

    for (position, symbol) in keys.chars().enumerate() {
        let feed = lexer
            .feed(symbol)
            .with_context(|| format!("bad keystroke at position {position}"))?;

        if let Some(echo) = feed.echo {
            command_line.push(echo);
        }
        let Some(token) = feed.token else {
            continue;
        };
        if !command_line.is_empty() {
            log::info!("{}", command_line);
            command_line.clear();
        }

        outcome = session
            .apply(&token)
            .with_context(|| format!("could not apply {:?}", token.to_string()))?;
        log::debug!("{:?} -> {:?}, cursor at {:?}", token.to_string(), outcome, session.cursor());
        if outcome.is_final() {
            if position + 1 < keys.chars().count() {
                log::warn!("Game over, ignoring keys after position {position}");
            }
            break;
        }
    }

    if !lexer.is_idle() {
        log::warn!("Keystrokes ended while {}", lexer.state());
    }
    Ok(outcome)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.verbose)?;

    let config = cli.game_config()?;
    let keys = cli.read_keys()?;
    let mut session = Session::new(config, cli.seed)?;
    log::info!("Playing with seed {:?}", session.seed());

    let outcome = replay(&mut session, &keys)?;
    log::info!("Finished with {:?} after {:?}", outcome, session.elapsed());

    match cli.format {
        Format::Text => print!("{}", render::Text(&session)),
        Format::Json => println!("{}", render::json(&session)?),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(size: Coord2, mines: &[Coord2]) -> Session {
        Session::from_board(Board::from_mine_coords(size, mines).unwrap())
    }

    #[test]
    fn replay_stops_at_quit() {
        let mut session = session((3, 3), &[(1, 1)]);

        assert_eq!(replay(&mut session, ":q\nx").unwrap(), Outcome::Quit);
        assert!(!session.cell_at((0, 0)).unwrap().is_swept());
    }

    #[test]
    fn replay_reports_bad_keys() {
        let mut session = session((3, 3), &[(1, 1)]);

        let err = replay(&mut session, "jjq").unwrap_err();
        assert_eq!(err.to_string(), "bad keystroke at position 2");
    }

    #[test]
    fn replay_without_ending_continues() {
        let mut session = session((3, 3), &[(1, 1)]);

        assert_eq!(replay(&mut session, "lx3").unwrap(), Outcome::Continue);
        assert_eq!(session.status(), Status::InProgress);
    }

    #[test]
    fn verbosity_flags_pick_log_level() {
        fn level(args: &[&str]) -> LevelFilter {
            level_filter(Cli::parse_from(args.iter().copied()).verbose.log_level_filter())
        }

        assert_eq!(level(&["vimsweep"]), LevelFilter::WARN);
        assert_eq!(level(&["vimsweep", "-v"]), LevelFilter::INFO);
        assert_eq!(level(&["vimsweep", "-vv"]), LevelFilter::DEBUG);
        assert_eq!(level(&["vimsweep", "-q"]), LevelFilter::ERROR);
    }

    #[test]
    fn logger_installs_only_once() {
        let cli = Cli::parse_from(["vimsweep", "-vvv"]);

        init_logging(&cli.verbose).unwrap();
        let err = init_logging(&cli.verbose).unwrap_err();
        assert_eq!(err.to_string(), "could not install the logger");
    }

    #[test]
    fn overrides_apply_on_top_of_preset() {
        let cli = Cli::parse_from(["vimsweep", "-d", "hard", "--mines", "5"]);
        assert_eq!(cli.game_config().unwrap(), GameConfig::new((24, 20), 5).unwrap());
    }

    #[test]
    fn overfull_board_is_rejected() {
        let cli = Cli::parse_from(["vimsweep", "--width", "2", "--height", "2", "--mines", "4"]);
        assert!(cli.game_config().is_err());
    }
}
