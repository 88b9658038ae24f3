use serde::{Deserialize, Serialize};

use crate::MarkOutcome;

/// What a cell holds, fixed once the board is generated.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellValue {
    Mine,
    /// Adjacent mine count, always in `1..=8`.
    Number(u8),
    Blank,
}

impl CellValue {
    pub const fn from_adjacent_mines(count: u8) -> Self {
        if count == 0 {
            Self::Blank
        } else {
            Self::Number(count)
        }
    }

    pub const fn is_mine(self) -> bool {
        matches!(self, Self::Mine)
    }

    pub const fn is_blank(self) -> bool {
        matches!(self, Self::Blank)
    }
}

impl Default for CellValue {
    fn default() -> Self {
        Self::Blank
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    value: CellValue,
    swept: bool,
    flagged: bool,
}

impl Cell {
    pub const fn new(value: CellValue) -> Self {
        Self {
            value,
            swept: false,
            flagged: false,
        }
    }

    pub const fn value(&self) -> CellValue {
        self.value
    }

    pub const fn is_swept(&self) -> bool {
        self.swept
    }

    pub const fn is_flagged(&self) -> bool {
        self.flagged
    }

    /// Flips the flag; swept cells keep theirs frozen.
    pub fn toggle_flag(&mut self) -> MarkOutcome {
        if self.swept {
            return MarkOutcome::NoChange;
        }
        self.flagged = !self.flagged;
        MarkOutcome::Changed
    }

    /// Reveals the cell unless it is flagged, handing back its value.
    pub fn sweep(&mut self) -> Option<CellValue> {
        if self.flagged {
            return None;
        }
        self.swept = true;
        Some(self.value)
    }
}
