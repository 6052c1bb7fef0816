//! # Scene Generation
//!
//! A scene is an `N x N` binary grid holding square objects. Objects never
//! overlap and never touch through a shared edge, so the count of objects is
//! well defined from the occupancy alone. When the grid runs out of room the
//! generator places fewer objects than requested and reports the reduced
//! count as the label.

use std::fmt;

/// `N x N` binary occupancy matrix, indexed `(x, y)`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Grid {
    dim: usize,
    cells: Vec<bool>,
}

impl Grid {
    #[must_use]
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            cells: vec![false; dim * dim],
        }
    }

    #[must_use]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Value at `(x, y)`; out-of-range coordinates read as empty.
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> bool {
        x < self.dim && y < self.dim && self.cells[x * self.dim + y]
    }

    /// # Panics
    ///
    /// Panics if `(x, y)` is outside the grid.
    pub fn set(&mut self, x: usize, y: usize, value: bool) {
        assert!(
            x < self.dim && y < self.dim,
            "cell ({x}, {y}) outside {0}x{0} grid",
            self.dim
        );
        self.cells[x * self.dim + y] = value;
    }

    pub fn clear(&mut self) {
        self.cells.fill(false);
    }

    #[must_use]
    pub fn count_ones(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// Cells in row-major `(x, y)` order.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.cells.iter().copied()
    }

    /// Coordinates of every occupied cell.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let dim = self.dim;
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c)
            .map(move |(i, _)| (i / dim, i % dim))
    }

    /// Write the grid as 0.0 / 1.0 values into `out`, which must hold `dim * dim` floats.
    pub fn write_layer(&self, out: &mut [f32]) {
        for (dst, &cell) in out.iter_mut().zip(&self.cells) {
            *dst = if cell { 1.0 } else { 0.0 };
        }
    }

    /// True when the cell and its 4-neighbourhood are all empty.
    fn is_isolated(&self, x: usize, y: usize) -> bool {
        !self.get(x, y)
            && !self.get(x + 1, y)
            && !self.get(x, y + 1)
            && (x == 0 || !self.get(x - 1, y))
            && (y == 0 || !self.get(x, y - 1))
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for x in 0..self.dim {
            for y in 0..self.dim {
                f.write_str(if self.get(x, y) { "#" } else { "." })?;
            }
            if x + 1 < self.dim {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

/// Axis-aligned square object anchored at its top-left cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Square {
    pub x: usize,
    pub y: usize,
    pub size: usize,
}

impl Square {
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> {
        let Square { x, y, size } = *self;
        (x..x + size).flat_map(move |i| (y..y + size).map(move |j| (i, j)))
    }

    /// True when the square fits on `grid` without overlapping or touching
    /// anything already placed.
    #[must_use]
    pub fn fits(&self, grid: &Grid) -> bool {
        self.x + self.size <= grid.dim()
            && self.y + self.size <= grid.dim()
            && self.cells().all(|(i, j)| grid.is_isolated(i, j))
    }
}

/// Parameters of one scene draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SceneParams {
    pub dim: usize,
    pub max_objects: usize,
    pub max_object_size: usize,
    /// Draw the object count uniformly from `[1, max_objects]` instead of using `max_objects`.
    pub random_count: bool,
    /// Draw each starting size uniformly from `[1, max_object_size]`.
    pub random_size: bool,
}

/// A generated scene and the objects actually committed to it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scene {
    pub grid: Grid,
    pub objects: Vec<Square>,
    /// How many objects the generator tried to place.
    pub requested: usize,
}

impl Scene {
    /// Number of objects drawn; this is the ground-truth label.
    #[must_use]
    pub fn label(&self) -> usize {
        self.objects.len()
    }

    /// True when placement ran out of room before all requested objects fit.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.objects.len() < self.requested
    }
}

#[derive(Clone, Debug)]
pub struct SceneGenerator {
    params: SceneParams,
}

impl SceneGenerator {
    #[must_use]
    pub fn new(params: SceneParams) -> Self {
        Self { params }
    }

    #[must_use]
    pub fn params(&self) -> &SceneParams {
        &self.params
    }

    /// Draw a new scene.
    ///
    /// For each object the candidate size shrinks until some window of that
    /// size is free together with its 4-neighbourhood, then an anchor is drawn
    /// uniformly among the windows that fit. If not even a single cell fits,
    /// placement stops and the scene reports the reduced label.
    pub fn generate(&self, rng: &mut fastrand::Rng) -> Scene {
        let p = &self.params;
        let requested = if p.random_count {
            rng.usize(1..=p.max_objects.max(1))
        } else {
            p.max_objects
        };

        let mut grid = Grid::new(p.dim);
        let mut objects = Vec::with_capacity(requested);

        for _ in 0..requested {
            let start = if p.random_size {
                rng.usize(1..=p.max_object_size.max(1))
            } else {
                p.max_object_size
            };

            let Some((size, anchors)) = (1..=start.min(p.dim))
                .rev()
                .map(|size| (size, feasible_anchors(&grid, size)))
                .find(|(_, anchors)| !anchors.is_empty())
            else {
                tracing::warn!(
                    dim = p.dim,
                    requested,
                    placed = objects.len(),
                    "no room left in scene, reporting reduced label"
                );
                break;
            };

            let (x, y) = anchors[rng.usize(..anchors.len())];
            let square = Square { x, y, size };
            for (i, j) in square.cells() {
                grid.set(i, j, true);
            }
            objects.push(square);
        }

        tracing::trace!(label = objects.len(), requested, "scene generated");
        Scene {
            grid,
            objects,
            requested,
        }
    }
}

/// Top-left anchors where a `size x size` square fits on `grid`.
fn feasible_anchors(grid: &Grid, size: usize) -> Vec<(usize, usize)> {
    if size == 0 || size > grid.dim() {
        return Vec::new();
    }
    let span = grid.dim() - size + 1;
    (0..span)
        .flat_map(|x| (0..span).map(move |y| (x, y)))
        .filter(|&(x, y)| Square { x, y, size }.fits(grid))
        .collect()
}
