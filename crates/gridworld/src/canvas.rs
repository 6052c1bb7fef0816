//! The external representation: a binary canvas the agent writes on.

use crate::actions::Action;
use crate::scene::Grid;
use serde::{Deserialize, Serialize};

/// How a mark action changes the cell under the repr finger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanvasMode {
    /// Set the cell to 1; marks never revert.
    #[default]
    Monotonic,
    /// Flip the cell (historical variant).
    Toggle,
}

#[derive(Clone, Debug)]
pub struct ExternalRepresentation {
    canvas: Grid,
    mode: CanvasMode,
}

impl ExternalRepresentation {
    #[must_use]
    pub fn new(dim: usize, mode: CanvasMode) -> Self {
        Self {
            canvas: Grid::new(dim),
            mode,
        }
    }

    pub fn declared_actions() -> impl Iterator<Item = Action> {
        std::iter::once(Action::MarkCanvas)
    }

    pub fn reset(&mut self) {
        self.canvas.clear();
    }

    pub fn draw_point(&mut self, (x, y): (usize, usize)) {
        let value = match self.mode {
            CanvasMode::Monotonic => true,
            CanvasMode::Toggle => !self.canvas.get(x, y),
        };
        self.canvas.set(x, y, value);
    }

    #[must_use]
    pub fn canvas(&self) -> &Grid {
        &self.canvas
    }

    #[must_use]
    pub fn mode(&self) -> CanvasMode {
        self.mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monotonic_marks_never_revert() {
        let mut repr = ExternalRepresentation::new(3, CanvasMode::Monotonic);
        repr.draw_point((1, 2));
        repr.draw_point((1, 2));
        assert!(repr.canvas().get(1, 2));
        assert_eq!(repr.canvas().count_ones(), 1);
    }

    #[test]
    fn toggle_flips() {
        let mut repr = ExternalRepresentation::new(3, CanvasMode::Toggle);
        repr.draw_point((0, 0));
        assert!(repr.canvas().get(0, 0));
        repr.draw_point((0, 0));
        assert!(!repr.canvas().get(0, 0));
    }
}
