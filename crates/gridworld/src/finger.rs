//! Bounded 2D cursor over a grid layer.

use crate::actions::{Action, Direction, Finger};
use crate::scene::Grid;

/// A finger position plus its one-hot layer.
#[derive(Clone, Debug)]
pub struct FingerAgent {
    finger: Finger,
    pos: (usize, usize),
    layer: Grid,
    random_start: bool,
}

impl FingerAgent {
    /// Create a finger on a `dim x dim` layer, at `(0, 0)` or at a uniformly
    /// random cell when `random_start` is set.
    #[must_use]
    pub fn new(finger: Finger, dim: usize, random_start: bool, rng: &mut fastrand::Rng) -> Self {
        let mut agent = Self {
            finger,
            pos: (0, 0),
            layer: Grid::new(dim),
            random_start,
        };
        agent.reset(rng);
        agent
    }

    /// The four movement actions this finger claims from the action space.
    pub fn declared_actions(finger: Finger) -> impl Iterator<Item = Action> {
        Direction::ALL
            .into_iter()
            .map(move |dir| Action::Move { finger, dir })
    }

    pub fn reset(&mut self, rng: &mut fastrand::Rng) {
        let dim = self.layer.dim();
        self.pos = if self.random_start && dim > 0 {
            (rng.usize(..dim), rng.usize(..dim))
        } else {
            (0, 0)
        };
        self.refresh_layer();
    }

    /// Move one cell; moves past the edge leave the finger where it is.
    pub fn step(&mut self, dir: Direction) {
        let max = self.layer.dim().saturating_sub(1);
        let (x, y) = self.pos;
        self.pos = match dir {
            Direction::Right => (x.saturating_add(1).min(max), y),
            Direction::Left => (x.saturating_sub(1), y),
            Direction::Up => (x, y.saturating_sub(1)),
            Direction::Down => (x, y.saturating_add(1).min(max)),
        };
        self.refresh_layer();
    }

    #[must_use]
    pub fn finger(&self) -> Finger {
        self.finger
    }

    #[must_use]
    pub fn position(&self) -> (usize, usize) {
        self.pos
    }

    /// One-hot layer marking the current position.
    #[must_use]
    pub fn layer(&self) -> &Grid {
        &self.layer
    }

    fn refresh_layer(&mut self) {
        self.layer.clear();
        if self.layer.dim() > 0 {
            self.layer.set(self.pos.0, self.pos.1, true);
        }
    }
}
