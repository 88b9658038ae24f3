use core::time::Duration;
use serde::{Deserialize, Serialize};
use web_time::Instant;

use crate::*;

/// Valid transitions:
/// - InProgress -> Won
/// - InProgress -> Lost
/// - InProgress -> Quit
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    #[default]
    InProgress,
    Won,
    Lost,
    Quit,
}

impl Status {
    /// Indicates the session has ended and no tokens are accepted anymore
    pub const fn is_final(self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

/// Result of applying one token.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Quit,
    Won,
    Lost,
}

impl Outcome {
    pub const fn is_final(self) -> bool {
        !matches!(self, Self::Continue)
    }
}

/// Represents a game from the first key to the end
#[derive(Clone, Debug)]
pub struct Session {
    board: Board,
    cursor: Coord2,
    seed: Option<u64>,
    status: Status,
    started_at: Option<Instant>,
    ended_at: Option<Instant>,
}

impl Session {
    /// Generates a board for `config`. Without a seed a random one is picked; see [`Session::seed`].
    pub fn new(config: GameConfig, seed: Option<u64>) -> Result<Self> {
        let config = GameConfig::new(config.size, config.mines)?;
        let generator = ShuffleGenerator::from_seed_or_random(seed);
        let seed = generator.seed();
        let mut session = Self::from_board(generator.generate(config));
        session.seed = Some(seed);
        Ok(session)
    }

    pub fn from_board(board: Board) -> Self {
        Self {
            board,
            cursor: (0, 0),
            seed: None,
            status: Status::default(),
            started_at: None,
            ended_at: None,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn cell_at(&self, coords: Coord2) -> Result<Cell> {
        let coords = self.board.validate_coords(coords)?;
        Ok(self.board[coords])
    }

    pub fn view_at(&self, coords: Coord2) -> CellView {
        CellView::of(&self.board[coords], self.status == Status::Lost)
    }

    pub fn cursor(&self) -> Coord2 {
        self.cursor
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Seed the board was generated from, `None` for boards built by hand.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// How many mines have not been flagged yet, negative when over-flagged
    pub fn mines_left(&self) -> i32 {
        i32::from(self.board.mine_count()) - i32::from(self.board.flag_count())
    }

    /// Time since the first accepted token, frozen once the session ends.
    pub fn elapsed(&self) -> Duration {
        match self.started_at {
            Some(started_at) => self
                .ended_at
                .unwrap_or_else(Instant::now)
                .duration_since(started_at),
            None => Duration::ZERO,
        }
    }

    pub fn apply(&mut self, token: &Token) -> Result<Outcome> {
        if self.status.is_final() {
            return Err(GameError::AlreadyEnded);
        }
        self.mark_started();

        let outcome = match token {
            Token::Motion { motion, .. } => {
                for _ in 0..token.repeat() {
                    self.cursor = self.moved(*motion);
                }
                log::trace!("Cursor at {:?}", self.cursor);
                Outcome::Continue
            }
            Token::Sweep { .. } => {
                let mut outcome = Outcome::Continue;
                for _ in 0..token.repeat() {
                    outcome = self.sweep_at_cursor();
                    if outcome.is_final() {
                        break;
                    }
                }
                outcome
            }
            Token::Flag => {
                self.board.toggle_flag(self.cursor);
                Outcome::Continue
            }
            Token::Command(_) if token.is_quit() => {
                self.end(Status::Quit);
                Outcome::Quit
            }
            Token::Command(text) => {
                log::debug!("Ignoring command :{}", text);
                Outcome::Continue
            }
        };

        Ok(outcome)
    }

    fn sweep_at_cursor(&mut self) -> Outcome {
        let revealed = self.board.sweep_or_chord(self.cursor);
        if revealed == RevealOutcome::HitMine {
            self.end(Status::Lost);
            Outcome::Lost
        } else if revealed.has_update() && self.board.is_won() {
            self.end(Status::Won);
            Outcome::Won
        } else {
            Outcome::Continue
        }
    }

    /// Where `motion` takes the cursor, clamped to the board.
    fn moved(&self, motion: Motion) -> Coord2 {
        use Motion::*;

        let (x, y) = self.cursor;
        let (width, height) = self.board.size();
        let (last_x, last_y) = (width - 1, height - 1);

        match motion {
            Left => (x.saturating_sub(1), y),
            Right => (x.saturating_add(1).min(last_x), y),
            Up => (x, y.saturating_sub(1)),
            Down => (x, y.saturating_add(1).min(last_y)),
            LineStart => (0, y),
            LineEnd => (last_x, y),
            Top => (0, 0),
            Middle => (0, last_y / 2),
            Bottom => (0, last_y),
            NextLine if y < last_y => (0, y + 1),
            NextLine => (x, y),
            NextUnswept => self.board.next_unswept(self.cursor).unwrap_or(self.cursor),
            PrevUnswept => self.board.prev_unswept(self.cursor).unwrap_or(self.cursor),
        }
    }

    /// Checks if the session has not started and records the start time
    fn mark_started(&mut self) {
        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
        }
    }

    fn end(&mut self, status: Status) {
        log::debug!("Session ended: {:?}", status);
        self.status = status;
        self.ended_at = Some(Instant::now());
    }
}
