use std::collections::{BTreeSet, VecDeque};

use crate::*;

impl Board {
    /// Sweeps the cell at `coords`, cascading through connected blanks.
    ///
    /// Flagged cells are left alone. Sweeping an already swept blank runs the cascade again, which opens
    /// cells that were flagged during the earlier pass and have since been unflagged.
    pub fn sweep(&mut self, coords: Coord2) -> RevealOutcome {
        let mut visited = BTreeSet::new();
        self.sweep_tracked(coords, &mut visited)
    }

    /// Reveals every unflagged hidden neighbor of a swept number once the flags around it match the number.
    pub fn chord_sweep(&mut self, coords: Coord2) -> RevealOutcome {
        let cell = self[coords];
        let CellValue::Number(count) = cell.value() else {
            return RevealOutcome::NoChange;
        };
        if !cell.is_swept() || self.count_flagged_neighbors(coords) != count {
            return RevealOutcome::NoChange;
        }

        log::debug!("Chord sweep at {:?}", coords);
        let targets: Vec<_> = self
            .iter_neighbors(coords)
            .filter(|&pos| !self[pos].is_swept() && !self[pos].is_flagged())
            .collect();

        let mut visited = BTreeSet::from([coords]);
        let mut outcome = RevealOutcome::NoChange;
        for pos in targets {
            // an earlier target's cascade may already have swept this one
            if visited.contains(&pos) {
                continue;
            }
            outcome = outcome | self.sweep_tracked(pos, &mut visited);
        }
        outcome
    }

    /// What `x` does under the cursor: chord on a swept number, plain sweep anywhere else.
    pub fn sweep_or_chord(&mut self, coords: Coord2) -> RevealOutcome {
        let cell = self[coords];
        match cell.value() {
            CellValue::Number(_) if cell.is_swept() => self.chord_sweep(coords),
            _ => self.sweep(coords),
        }
    }

    /// Every safe cell has been swept. Flags play no part.
    pub fn is_won(&self) -> bool {
        self.safe_swept_count() == self.safe_cell_count()
    }

    /// Some mine has been swept.
    pub fn is_lost(&self) -> bool {
        self.positions().any(|pos| {
            let cell = self[pos];
            cell.is_swept() && cell.value().is_mine()
        })
    }

    /// First unswept cell strictly after `coords` in row-major order.
    pub fn next_unswept(&self, coords: Coord2) -> Option<Coord2> {
        let width = self.width();
        let start = row_major_index(coords, width) + 1;
        (start..usize::from(self.total_cells()))
            .map(|index| from_row_major_index(index, width))
            .find(|&pos| !self[pos].is_swept())
    }

    /// Last unswept cell strictly before `coords` in row-major order.
    pub fn prev_unswept(&self, coords: Coord2) -> Option<Coord2> {
        let width = self.width();
        (0..row_major_index(coords, width))
            .rev()
            .map(|index| from_row_major_index(index, width))
            .find(|&pos| !self[pos].is_swept())
    }

    fn sweep_tracked(&mut self, coords: Coord2, visited: &mut BTreeSet<Coord2>) -> RevealOutcome {
        visited.insert(coords);
        let was_swept = self[coords].is_swept();

        match self.sweep_cell(coords) {
            None => RevealOutcome::NoChange,
            Some(CellValue::Mine) => {
                log::debug!("Swept mine at {:?}", coords);
                RevealOutcome::HitMine
            }
            Some(CellValue::Blank) => {
                log::debug!("Swept blank at {:?}", coords);
                let cascaded = self.cascade(coords, visited);
                if was_swept && !cascaded {
                    RevealOutcome::NoChange
                } else {
                    RevealOutcome::Revealed
                }
            }
            Some(value) => {
                log::debug!("Swept {:?} at {:?}", value, coords);
                if was_swept {
                    RevealOutcome::NoChange
                } else {
                    RevealOutcome::Revealed
                }
            }
        }
    }

    /// Flood fill from a swept blank cell. Returns whether any cell was newly swept.
    fn cascade(&mut self, origin: Coord2, visited: &mut BTreeSet<Coord2>) -> bool {
        let mut to_visit: VecDeque<_> = self.unswept_neighbors(origin).collect();
        log::trace!("Starting cascade from {:?}, initial neighbors: {:?}", origin, to_visit);
        let mut revealed_any = false;

        while let Some(visit_coords) = to_visit.pop_front() {
            if !visited.insert(visit_coords) {
                continue;
            }

            if self[visit_coords].is_swept() {
                continue;
            }

            let Some(value) = self.sweep_cell(visit_coords) else {
                log::trace!("Skipping flagged cell at {:?}", visit_coords);
                continue;
            };
            revealed_any = true;
            log::trace!("Cascade swept {:?} at {:?}", value, visit_coords);

            if value.is_blank() {
                to_visit.extend(
                    self.unswept_neighbors(visit_coords)
                        .filter(|pos| !visited.contains(pos)),
                );
            }
        }

        revealed_any
    }

    fn unswept_neighbors(&self, coords: Coord2) -> impl Iterator<Item = Coord2> + use<'_> {
        self.iter_neighbors(coords)
            .filter(|&pos| !self[pos].is_swept())
    }

    fn count_flagged_neighbors(&self, coords: Coord2) -> u8 {
        self.iter_neighbors(coords)
            .filter(|&pos| self[pos].is_flagged())
            .count() as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use proptest::sample::Index;

    fn board(size: Coord2, mines: &[Coord2]) -> Board {
        Board::from_mine_coords(size, mines).unwrap()
    }

    /// Swept cells as a grid: `#` hidden, `F` flagged, value symbols otherwise.
    fn swept_map(board: &Board) -> String {
        let mut out = String::new();
        for y in 0..board.height() {
            for x in 0..board.width() {
                let cell = board[(x, y)];
                out.push(match (cell.is_swept(), cell.value()) {
                    (false, _) if cell.is_flagged() => 'F',
                    (false, _) => '#',
                    (true, CellValue::Mine) => '*',
                    (true, CellValue::Number(n)) => char::from(b'0' + n),
                    (true, CellValue::Blank) => '.',
                });
            }
            out.push('\n');
        }
        out
    }

    /// Recursive depth-first fill, kept independent from the worklist version.
    fn reference_fill(board: &Board, coords: Coord2, swept: &mut BTreeSet<Coord2>) {
        let cell = board[coords];
        if cell.is_flagged() || !swept.insert(coords) {
            return;
        }
        if cell.value().is_blank() {
            for pos in board.iter_neighbors(coords) {
                reference_fill(board, pos, swept);
            }
        }
    }

    #[test]
    fn sweeping_mine_is_a_loss() {
        let mut board = board((2, 2), &[(0, 0)]);

        assert_eq!(board.sweep((0, 0)), RevealOutcome::HitMine);
        assert!(board.is_lost());
        assert!(!board.is_won());
    }

    #[test]
    fn sweeping_number_stops_there() {
        let mut board = board((3, 3), &[(0, 0)]);

        assert_eq!(board.sweep((1, 1)), RevealOutcome::Revealed);
        assert_eq!(board.safe_swept_count(), 1);
    }

    #[test]
    fn blank_region_on_wide_board() {
        let mut board = board((10, 3), &[(3, 0), (3, 1), (3, 2), (8, 2)]);

        assert_eq!(board.sweep((6, 0)), RevealOutcome::Revealed);
        assert_eq!(
            swept_map(&board),
            concat!(
                "####2.....\n",
                "####3..111\n",
                "####2..1##\n",
            )
        );
        assert!(!board.is_lost());
    }

    #[test]
    fn cascade_skips_flagged_cells() {
        let mut board = board((3, 3), &[(2, 2)]);
        board.toggle_flag((0, 2));

        board.sweep((0, 0));

        assert!(!board[(0, 2)].is_swept());
        assert!(board[(0, 2)].is_flagged());
        assert!(board[(1, 1)].is_swept());
    }

    #[test]
    fn resweeping_blank_opens_unflagged_cells() {
        let mut board = board((3, 3), &[(2, 2)]);
        board.toggle_flag((0, 2));
        board.sweep((0, 0));
        board.toggle_flag((0, 2));

        assert_eq!(board.sweep((0, 1)), RevealOutcome::Revealed);
        assert!(board[(0, 2)].is_swept());
        assert!(board.is_won());
    }

    #[test]
    fn resweeping_finished_blank_is_no_change() {
        let mut board = board((3, 3), &[(2, 2)]);
        board.sweep((0, 0));

        assert_eq!(board.sweep((0, 0)), RevealOutcome::NoChange);
    }

    #[test]
    fn chord_requires_matching_flag_count() {
        let mut board = board((3, 1), &[(0, 0), (2, 0)]);
        board.sweep((1, 0));

        assert_eq!(board.chord_sweep((1, 0)), RevealOutcome::NoChange);
        board.toggle_flag((0, 0));
        assert_eq!(board.chord_sweep((1, 0)), RevealOutcome::NoChange);
        assert!(!board[(2, 0)].is_swept());
    }

    #[test]
    fn chord_reveals_only_unflagged_neighbor() {
        let mut board = board((3, 1), &[(0, 0)]);
        board.sweep((1, 0));
        board.toggle_flag((0, 0));

        assert_eq!(board.chord_sweep((1, 0)), RevealOutcome::Revealed);
        assert!(board[(2, 0)].is_swept());
        assert!(!board[(0, 0)].is_swept());
        assert!(board[(0, 0)].is_flagged());
    }

    #[test]
    fn chord_with_wrong_flag_hits_mine() {
        let mut board = board((3, 1), &[(0, 0)]);
        board.sweep((1, 0));
        board.toggle_flag((2, 0));

        assert_eq!(board.chord_sweep((1, 0)), RevealOutcome::HitMine);
        assert!(board.is_lost());
    }

    #[test]
    fn chord_cascades_through_blank_neighbors() {
        let mut board = board((4, 3), &[(0, 0)]);
        board.sweep((1, 1));
        board.toggle_flag((0, 0));

        assert_eq!(board.chord_sweep((1, 1)), RevealOutcome::Revealed);
        assert!(board.is_won());
    }

    #[test]
    fn chord_on_hidden_cell_is_no_change() {
        let mut board = board((3, 1), &[(0, 0)]);
        assert_eq!(board.chord_sweep((1, 0)), RevealOutcome::NoChange);
    }

    #[test]
    fn sweep_or_chord_picks_by_cell_state() {
        let mut board = board((3, 1), &[(0, 0)]);

        assert_eq!(board.sweep_or_chord((1, 0)), RevealOutcome::Revealed);
        board.toggle_flag((0, 0));
        assert_eq!(board.sweep_or_chord((1, 0)), RevealOutcome::Revealed);
        assert!(board.is_won());
    }

    #[test]
    fn win_ignores_flags_on_mines() {
        let mut board = board((2, 1), &[(0, 0)]);
        assert!(!board.is_won());

        board.sweep((1, 0));
        assert!(board.is_won());

        board.toggle_flag((0, 0));
        board.sweep((1, 0));
        assert!(board.is_won());
    }

    #[test]
    fn unswept_scan_in_row_major_order() {
        let mut board = board((3, 2), &[(0, 0)]);
        board.sweep((1, 0));
        board.sweep((2, 0));

        assert_eq!(board.next_unswept((0, 0)), Some((0, 1)));
        assert_eq!(board.next_unswept((2, 1)), None);
        assert_eq!(board.prev_unswept((0, 1)), Some((0, 0)));
        assert_eq!(board.prev_unswept((0, 0)), None);
    }

    proptest! {
        #[test]
        fn cascade_matches_recursive_reference(
            width in 1u8..32,
            height in 1u8..32,
            mine_ratio in 0.0f64..0.3,
            seed in any::<u64>(),
            start in any::<Index>(),
            flag in proptest::option::of(any::<Index>()),
        ) {
            let total = mult(width, height);
            let mines = ((f64::from(total) * mine_ratio) as CellCount).min(total - 1);
            let config = GameConfig::new_unchecked((width, height), mines);
            let mut board = ShuffleGenerator::new(seed).generate(config);

            let start = from_row_major_index(start.index(total.into()), width);
            if let Some(flag) = flag {
                let flag = from_row_major_index(flag.index(total.into()), width);
                if flag != start {
                    board.toggle_flag(flag);
                }
            }

            let mut expected = BTreeSet::new();
            reference_fill(&board, start, &mut expected);

            board.sweep(start);
            let actual: BTreeSet<_> = board
                .positions()
                .filter(|&pos| board[pos].is_swept())
                .collect();

            prop_assert_eq!(actual, expected);
        }
    }
}
