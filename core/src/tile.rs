use serde::{Deserialize, Serialize};

use crate::*;

/// What a cell should look like to the player.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    Hidden,
    Flagged,
    Swept(CellValue),
    // these are only used to show the result after a loss:
    Exploded,
    Mine,
    IncorrectFlag,
}

impl CellView {
    /// Projects a cell, adding the end-of-game markings when `lost` is set.
    pub fn of(cell: &Cell, lost: bool) -> Self {
        let is_mine = cell.value().is_mine();
        match (cell.is_swept(), cell.is_flagged()) {
            (true, _) if is_mine => Self::Exploded,
            (true, _) => Self::Swept(cell.value()),
            (false, true) if lost && !is_mine => Self::IncorrectFlag,
            (false, true) => Self::Flagged,
            (false, false) if lost && is_mine => Self::Mine,
            (false, false) => Self::Hidden,
        }
    }
}

impl Default for CellView {
    fn default() -> Self {
        Self::Hidden
    }
}
