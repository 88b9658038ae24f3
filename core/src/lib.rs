//! Game engine and key-sequence interpreter for a vim-flavored minesweeper.
//!
//! Keystrokes go through the [`Lexer`], which turns them into [`Token`]s.
//! A [`Session`] applies tokens to its [`Board`] and reports an [`Outcome`].
//! Drawing is left to the caller, which reads cells back through
//! [`Session::view_at`].

use core::ops::BitOr;
use serde::{Deserialize, Serialize};

pub use board::*;
pub use cell::*;
pub use error::*;
pub use generator::*;
pub use lexer::*;
pub use session::*;
pub use tile::*;
pub use types::*;

mod board;
mod cell;
mod engine;
mod error;
mod generator;
mod lexer;
mod session;
mod tile;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord2,
    pub mines: CellCount,
}

impl GameConfig {
    pub const EASY: Self = Self::new_unchecked((10, 8), 10);
    pub const MEDIUM: Self = Self::new_unchecked((18, 14), 40);
    pub const HARD: Self = Self::new_unchecked((24, 20), 99);

    pub const fn new_unchecked(size: Coord2, mines: CellCount) -> Self {
        Self { size, mines }
    }

    /// Builds a config, rejecting empty boards and boards with no safe cell.
    pub fn new(size: Coord2, mines: CellCount) -> Result<Self> {
        if size.0 == 0 || size.1 == 0 {
            return Err(GameError::InvalidSize);
        }
        if mines >= mult(size.0, size.1) {
            return Err(GameError::TooManyMines);
        }
        Ok(Self::new_unchecked(size, mines))
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::EASY
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl From<Difficulty> for GameConfig {
    fn from(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => GameConfig::EASY,
            Difficulty::Medium => GameConfig::MEDIUM,
            Difficulty::Hard => GameConfig::HARD,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            Revealed => true,
            HitMine => true,
        }
    }
}

/// Merges outcomes of a multi-cell sweep, a mine taking priority.
impl BitOr for RevealOutcome {
    type Output = RevealOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        use RevealOutcome::*;
        match (self, rhs) {
            (HitMine, _) => HitMine,
            (_, HitMine) => HitMine,
            (Revealed, _) => Revealed,
            (_, Revealed) => Revealed,
            (NoChange, NoChange) => NoChange,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_match_classic_sizes() {
        assert_eq!(GameConfig::from(Difficulty::Easy).total_cells(), 80);
        assert_eq!(GameConfig::MEDIUM.total_cells(), 18 * 14);
        assert_eq!(GameConfig::HARD, GameConfig::new((24, 20), 99).unwrap());
    }

    #[test]
    fn config_rejects_full_board() {
        assert_eq!(GameConfig::new((2, 2), 4), Err(GameError::TooManyMines));
        assert_eq!(GameConfig::new((0, 5), 0), Err(GameError::InvalidSize));
        assert!(GameConfig::new((1, 1), 0).is_ok());
    }

    #[test]
    fn hit_mine_dominates_merge() {
        use RevealOutcome::*;
        assert_eq!(NoChange | Revealed, Revealed);
        assert_eq!(Revealed | HitMine, HitMine);
        assert_eq!(NoChange | NoChange, NoChange);
    }
}
