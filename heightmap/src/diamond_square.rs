use crate::error::{InvalidArgument, Result};
use crate::grid::Grid;
use crate::rng::RandomSource;

// Displacement amplitude is multiplied by this after every level
pub const ROUGHNESS_DECAY: f64 = 0.5;

// Largest accepted roughness. Every cell stays within 1 + roughness of zero,
// so the four-neighbour sums and the normalization range remain finite.
pub const MAX_ROUGHNESS: f64 = 1e300;

// 2D heightmap generator using the Diamond–Square algorithm.
//
// Output is a size×size grid normalized to [0, 1]. All randomness comes from
// the caller's `RandomSource`, drawn in a fixed order: the four corners, then
// per level the whole diamond pass followed by the whole square pass, each
// walked with x outer and y inner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiamondSquare {
    size: usize,    // must be 2^k + 1, e.g. 129, 257
    roughness: f64, // initial displacement amplitude, halved each level
}

impl DiamondSquare {
    pub fn new(size: usize, roughness: f64) -> Result<Self> {
        validate(size, roughness)?;
        Ok(Self { size, roughness })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn roughness(&self) -> f64 {
        self.roughness
    }

    // Number of subdivision levels, log2(size - 1)
    pub fn levels(&self) -> u32 {
        if self.size == 1 {
            0
        } else {
            (self.size - 1).trailing_zeros()
        }
    }

    // Exact number of values one generation pulls from the random source.
    // Every cell is assigned exactly once, so this is size² (1 for size 1).
    pub fn draws_required(&self) -> usize {
        let mut draws = if self.size == 1 { 1 } else { 4 };
        let mut step = self.size - 1;
        while step > 1 {
            draws += diamond_count(self.size, step) + square_count(self.size, step);
            step /= 2;
        }
        draws
    }

    // Seed the corners and run every subdivision level, without normalizing
    pub fn subdivide<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Grid {
        let size = self.size;
        let mut grid = Grid::new(size);

        if size == 1 {
            grid.set(0, 0, rng.next_uniform());
            return grid;
        }

        // Step is the current distance between 2 known points
        let mut step = size - 1;
        let mut roughness = self.roughness;

        grid.set(0, 0, rng.next_uniform());
        grid.set(0, step, rng.next_uniform());
        grid.set(step, 0, rng.next_uniform());
        grid.set(step, step, rng.next_uniform());

        while step > 1 {
            tracing::debug!(
                step,
                half = step / 2,
                roughness,
                diamonds = diamond_count(size, step),
                squares = square_count(size, step),
                "diamond_square.level"
            );
            grid = diamond_pass(grid, step, roughness, rng);
            grid = square_pass(grid, step, roughness, rng);

            step /= 2;
            roughness *= ROUGHNESS_DECAY;
        }

        grid
    }

    // Generate a size×size heightmap with values in [0, 1].
    // A single-cell grid is returned as seeded; there is nothing to normalize.
    pub fn generate<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Grid {
        let mut grid = self.subdivide(rng);
        if self.size > 1 {
            grid.normalize();
        }
        tracing::info!(
            size = self.size,
            roughness = self.roughness,
            levels = self.levels(),
            "diamond_square.generated"
        );
        grid
    }
}

// Validate, then generate. Nothing is allocated if the arguments are rejected.
pub fn generate<R: RandomSource + ?Sized>(
    size: usize,
    roughness: f64,
    rng: &mut R,
) -> Result<Grid> {
    Ok(DiamondSquare::new(size, roughness)?.generate(rng))
}

fn validate(size: usize, roughness: f64) -> Result<()> {
    if size == 0 {
        return Err(InvalidArgument::ZeroSize.into());
    }
    if size % 2 == 0 {
        return Err(InvalidArgument::EvenSize(size).into());
    }
    if size > 1 && !(size - 1).is_power_of_two() {
        return Err(InvalidArgument::NotDyadic(size).into());
    }
    if size.checked_mul(size).is_none() {
        return Err(InvalidArgument::TooLarge(size).into());
    }
    if !roughness.is_finite() || !(0.0..=MAX_ROUGHNESS).contains(&roughness) {
        return Err(InvalidArgument::Roughness(roughness).into());
    }
    Ok(())
}

#[inline]
fn displacement<R: RandomSource + ?Sized>(rng: &mut R, roughness: f64) -> f64 {
    (rng.next_uniform() - 0.5) * roughness
}

// Cells per side of the coarse lattice at this step
#[inline]
fn cells_per_side(size: usize, step: usize) -> usize {
    (size - 1) / step
}

// Centers written by one diamond pass: n²
pub fn diamond_count(size: usize, step: usize) -> usize {
    let n = cells_per_side(size, step);
    n * n
}

// Edge midpoints written by one square pass: 2n(n+1).
// The half lattice has (2n+1)² points, (n+1)² are coarse corners and
// n² are diamond centers.
pub fn square_count(size: usize, step: usize) -> usize {
    let n = cells_per_side(size, step);
    2 * n * (n + 1)
}

// Set the center of every step×step cell to the mean of its four corners
// plus displacement.
pub fn diamond_pass<R: RandomSource + ?Sized>(
    mut grid: Grid,
    step: usize,
    roughness: f64,
    rng: &mut R,
) -> Grid {
    let size = grid.size();
    // Distance to the center from a corner
    let half = step / 2;

    for x in (0..size - 1).step_by(step) {
        for y in (0..size - 1).step_by(step) {
            let avg = (grid.get(x, y)
                + grid.get(x + step, y)
                + grid.get(x, y + step)
                + grid.get(x + step, y + step))
                * 0.25;
            grid.set(x + half, y + half, avg + displacement(rng, roughness));
        }
    }

    grid
}

// Set every half-lattice point that is neither a coarse corner nor a diamond
// center, i.e. whose lattice coordinates (x/half, y/half) have an odd sum.
// Each takes the mean of its in-bounds axis neighbours at distance `half`
// (3 on the border, 4 inside; no wrap-around) plus displacement.
pub fn square_pass<R: RandomSource + ?Sized>(
    mut grid: Grid,
    step: usize,
    roughness: f64,
    rng: &mut R,
) -> Grid {
    let size = grid.size();
    let half = step / 2;

    for x in (0..size).step_by(half) {
        // Odd lattice column: start on the coarse rows, even: on the centers
        let y0 = if (x / half) % 2 == 0 { half } else { 0 };
        for y in (y0..size).step_by(step) {
            let mut sum = 0.0;
            let mut cnt = 0u32;
            if x >= half {
                sum += grid.get(x - half, y);
                cnt += 1;
            }
            if x + half < size {
                sum += grid.get(x + half, y);
                cnt += 1;
            }
            if y >= half {
                sum += grid.get(x, y - half);
                cnt += 1;
            }
            if y + half < size {
                sum += grid.get(x, y + half);
                cnt += 1;
            }
            let avg = sum / f64::from(cnt);
            grid.set(x, y, avg + displacement(rng, roughness));
        }
    }

    grid
}
