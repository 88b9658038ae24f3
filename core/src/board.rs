use core::fmt;
use core::ops::Index;
use ndarray::Array2;
use serde::Serialize;

use crate::*;

/// Numbers a mine mask: every non-mine cell gets the count of its mined neighbors.
pub fn number_board(mine_mask: &Array2<bool>) -> Array2<CellValue> {
    let mut counts: Array2<u8> = Array2::zeros(mine_mask.dim());

    for ((x, y), &is_mine) in mine_mask.indexed_iter() {
        if !is_mine {
            continue;
        }
        for pos in mine_mask.iter_neighbors((x as Coord, y as Coord)) {
            if !mine_mask[pos.to_nd_index()] {
                counts[pos.to_nd_index()] += 1;
            }
        }
    }

    Array2::from_shape_fn(mine_mask.dim(), |index| {
        if mine_mask[index] {
            CellValue::Mine
        } else {
            CellValue::from_adjacent_mines(counts[index])
        }
    })
}

/// The grid of cells, indexed by `(x, y)`.
///
/// Only built from a mine mask, so every number matches its neighborhood and
/// both sides stay within `1..=Coord::MAX`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Board {
    cells: Array2<Cell>,
    mine_count: CellCount,
    flag_count: CellCount,
    safe_swept_count: CellCount,
}

impl Board {
    fn from_values(values: Array2<CellValue>) -> Self {
        let cells = values.mapv(Cell::new);
        // a board never holds more than Coord::MAX squared cells
        let mine_count = cells.iter().filter(|cell| cell.value().is_mine()).count() as CellCount;
        Self {
            cells,
            mine_count,
            flag_count: 0,
            safe_swept_count: 0,
        }
    }

    pub(crate) fn from_mine_mask(mine_mask: &Array2<bool>) -> Self {
        Self::from_values(number_board(mine_mask))
    }

    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        if size.0 == 0 || size.1 == 0 {
            return Err(GameError::InvalidSize);
        }
        let mut mine_mask: Array2<bool> = Array2::default(size.to_nd_index());

        for &coords in mine_coords {
            if coords.0 >= size.0 || coords.1 >= size.1 {
                return Err(GameError::InvalidCoords);
            }
            mine_mask[coords.to_nd_index()] = true;
        }

        Ok(Self::from_mine_mask(&mine_mask))
    }

    pub fn config(&self) -> GameConfig {
        GameConfig::new_unchecked(self.size(), self.mine_count)
    }

    pub fn size(&self) -> Coord2 {
        let (x_len, y_len) = self.cells.dim();
        (x_len as Coord, y_len as Coord)
    }

    pub fn width(&self) -> Coord {
        self.size().0
    }

    pub fn height(&self) -> Coord {
        self.size().1
    }

    pub fn total_cells(&self) -> CellCount {
        self.cells.len() as CellCount
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn flag_count(&self) -> CellCount {
        self.flag_count
    }

    /// Number of non-mine cells swept so far.
    pub fn safe_swept_count(&self) -> CellCount {
        self.safe_swept_count
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size.0 && coords.1 < size.1 {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        self.cells.iter_neighbors(coords)
    }

    /// All board positions in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Coord2> + use<> {
        let (width, height) = self.size();
        (0..height).flat_map(move |y| (0..width).map(move |x| (x, y)))
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> MarkOutcome {
        let cell = &mut self.cells[coords.to_nd_index()];
        let outcome = cell.toggle_flag();
        if outcome.has_update() {
            if cell.is_flagged() {
                self.flag_count += 1;
            } else {
                self.flag_count -= 1;
            }
            log::debug!("Flag toggled at {:?}, flagged: {}", coords, cell.is_flagged());
        }
        outcome
    }

    /// Sweeps a single cell, keeping the swept counter in step.
    pub(crate) fn sweep_cell(&mut self, coords: Coord2) -> Option<CellValue> {
        let cell = &mut self.cells[coords.to_nd_index()];
        let was_swept = cell.is_swept();
        let value = cell.sweep()?;
        if !was_swept && !value.is_mine() {
            self.safe_swept_count += 1;
        }
        Some(value)
    }
}

impl Index<Coord2> for Board {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}

/// Writes the full layout, one row per line: `*` for mines, digits, `.` for blanks.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height() {
            for x in 0..self.width() {
                let symbol = match self[(x, y)].value() {
                    CellValue::Mine => '*',
                    CellValue::Number(count) => char::from(b'0' + count),
                    CellValue::Blank => '.',
                };
                write!(f, "{symbol}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
