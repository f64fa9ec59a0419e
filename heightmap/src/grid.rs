use std::ops::{Index, IndexMut};

// Square height grid, row-major: cell (x, y) lives at `y * size + x`.
// `x` is the column, `y` the row.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    size: usize,
    cells: Vec<f64>,
}

impl Grid {
    // All-zero size×size grid
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![0.0; size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    // Number of cells, size²
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    fn idx(&self, x: usize, y: usize) -> usize {
        assert!(
            x < self.size && y < self.size,
            "cell ({}, {}) outside {}×{} grid",
            x,
            y,
            self.size,
            self.size
        );
        y * self.size + x
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f64 {
        self.cells[self.idx(x, y)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, v: f64) {
        let i = self.idx(x, y);
        self.cells[i] = v;
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.cells
    }

    // Rows top to bottom, each `size` cells long
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        // chunks(0) panics, an empty grid has no rows anyway
        self.cells.chunks(self.size.max(1))
    }

    pub fn min(&self) -> f64 {
        self.cells.iter().copied().fold(f64::INFINITY, f64::min)
    }

    pub fn max(&self) -> f64 {
        self.cells.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    // Shift so the minimum is 0, then scale so the maximum is 1.
    // A constant grid ends up all zero.
    pub fn normalize(&mut self) {
        let min = self.min();
        for v in self.cells.iter_mut() {
            *v -= min;
        }

        let max = self.max();
        tracing::debug!(min, range = max, "grid.normalize");
        if max == 0.0 {
            return;
        }
        for v in self.cells.iter_mut() {
            *v /= max;
        }
    }

    // Flattened f32 copy (row-major) for image buffers
    pub fn to_f32_flat(&self) -> Vec<f32> {
        self.cells.iter().map(|&v| v as f32).collect()
    }
}

impl Index<(usize, usize)> for Grid {
    type Output = f64;

    fn index(&self, (x, y): (usize, usize)) -> &f64 {
        &self.cells[self.idx(x, y)]
    }
}

impl IndexMut<(usize, usize)> for Grid {
    fn index_mut(&mut self, (x, y): (usize, usize)) -> &mut f64 {
        let i = self.idx(x, y);
        &mut self.cells[i]
    }
}
