use ndarray::Array2;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

use super::*;

/// Purely random placement: a Fisher-Yates shuffle of mine and blank markers laid out row-major.
///
/// There is no first-click safety, the cell under the opening cursor can hold a mine.
#[derive(Clone, Debug, PartialEq)]
pub struct ShuffleGenerator {
    seed: u64,
}

impl ShuffleGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Uses `seed` when given, otherwise draws one from the thread rng.
    pub fn from_seed_or_random(seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(|| rand::rng().random());
        Self::new(seed)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl BoardGenerator for ShuffleGenerator {
    fn generate(self, config: GameConfig) -> Board {
        let mut rng = SmallRng::seed_from_u64(self.seed);
        log::info!(
            "Generating {}x{} board with {} mines, seed {}",
            config.size.0,
            config.size.1,
            config.mines,
            self.seed
        );
        Board::generate(config, &mut rng)
    }
}

impl Board {
    pub fn generate<R: Rng + ?Sized>(config: GameConfig, rng: &mut R) -> Board {
        let mut size = config.size;
        if size.0 == 0 || size.1 == 0 {
            log::warn!(
                "Cannot generate a {}x{} board, widening every side to at least one cell",
                size.0,
                size.1
            );
            size = (size.0.max(1), size.1.max(1));
        }

        let total_cells = usize::from(mult(size.0, size.1));
        let mut mines = usize::from(config.mines);

        if mines >= total_cells {
            log::warn!(
                "Board would have no safe cell, requested {} mines but only {} cells, leaving one free",
                mines,
                total_cells
            );
            mines = total_cells.saturating_sub(1);
        }

        let mut markers = vec![false; total_cells];
        markers[..mines].fill(true);
        markers.shuffle(rng);

        let width = size.0;
        let mine_mask = Array2::from_shape_fn(size.to_nd_index(), |(x, y)| {
            markers[row_major_index((x as Coord, y as Coord), width)]
        });

        Board::from_mine_mask(&mine_mask)
    }
}
