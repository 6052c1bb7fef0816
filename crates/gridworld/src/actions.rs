//! # Action Space
//!
//! Actions are identified on the wire by an integer code in `[0, n_actions)`
//! and decoded once into the tagged [`Action`] type. Codes are handed out by
//! [`ActionSpaceBuilder`]: every component declares the actions it needs, in
//! construction order, and whatever codes are left over become numeric label
//! submissions `"1"`, `"2"`, ...

use crate::error::EnvError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Movement direction of a finger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// Declaration order used when a finger claims its codes.
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }
}

/// Which of the two cursors an action moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Finger {
    /// Points into the scene layer.
    Scene,
    /// Points into the external representation (canvas).
    Repr,
}

impl Finger {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Finger::Scene => "scene",
            Finger::Repr => "repr",
        }
    }
}

/// A decoded action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Move { finger: Finger, dir: Direction },
    /// Mark the canvas under the repr finger.
    MarkCanvas,
    /// Claim that the scene holds this many objects.
    SubmitLabel(usize),
}

impl Action {
    #[must_use]
    pub const fn is_label(&self) -> bool {
        matches!(self, Action::SubmitLabel(_))
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Move { finger, dir } => write!(f, "{}-{}", finger.name(), dir.name()),
            Action::MarkCanvas => f.write_str("mod_point"),
            Action::SubmitLabel(n) => write!(f, "{n}"),
        }
    }
}

/// Collects component declarations and allocates codes in one pass.
///
/// ```
/// use gridworld::{Action, ActionSpaceBuilder};
///
/// let space = ActionSpaceBuilder::new(3)
///     .claim([Action::MarkCanvas])
///     .build()
///     .unwrap();
/// assert_eq!(space.decode(0), Some(Action::MarkCanvas));
/// assert_eq!(space.decode(2), Some(Action::SubmitLabel(2)));
/// ```
#[derive(Debug, Clone)]
pub struct ActionSpaceBuilder {
    n_actions: usize,
    claims: Vec<Vec<Action>>,
}

impl ActionSpaceBuilder {
    #[must_use]
    pub fn new(n_actions: usize) -> Self {
        Self {
            n_actions,
            claims: Vec::new(),
        }
    }

    /// Declare the named actions of the next component.
    #[must_use]
    pub fn claim(mut self, actions: impl IntoIterator<Item = Action>) -> Self {
        self.claims.push(actions.into_iter().collect());
        self
    }

    /// Assign codes in ascending order, component by component, then fill
    /// the remaining codes with numeric labels.
    ///
    /// When `n_actions` is smaller than the number of declared actions the
    /// later components silently receive fewer codes; the shortfall is kept
    /// in [`ActionSpace::truncated`] so callers can refuse such a space.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::DuplicateAction`] if two declarations name the same
    /// action.
    pub fn build(self) -> Result<ActionSpace, EnvError> {
        let mut by_code = Vec::with_capacity(self.n_actions);
        let mut by_action = HashMap::with_capacity(self.n_actions);
        let mut truncated = 0;

        for action in self.claims.into_iter().flatten() {
            if by_action.contains_key(&action) {
                return Err(EnvError::DuplicateAction(action));
            }
            if by_code.len() == self.n_actions {
                truncated += 1;
                continue;
            }
            by_action.insert(action, by_code.len());
            by_code.push(action);
        }

        if truncated > 0 {
            tracing::warn!(
                n_actions = self.n_actions,
                truncated,
                "action space too small, later components lost codes"
            );
        }

        let mut label = 1;
        while by_code.len() < self.n_actions {
            let action = Action::SubmitLabel(label);
            if by_action.contains_key(&action) {
                return Err(EnvError::DuplicateAction(action));
            }
            by_action.insert(action, by_code.len());
            by_code.push(action);
            label += 1;
        }

        Ok(ActionSpace {
            by_code,
            by_action,
            truncated,
        })
    }
}

/// Immutable, disjoint code <-> action mapping covering `[0, n_actions)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionSpace {
    by_code: Vec<Action>,
    by_action: HashMap<Action, usize>,
    truncated: usize,
}

impl ActionSpace {
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }

    #[must_use]
    pub fn decode(&self, code: usize) -> Option<Action> {
        self.by_code.get(code).copied()
    }

    #[must_use]
    pub fn code(&self, action: Action) -> Option<usize> {
        self.by_action.get(&action).copied()
    }

    /// Number of declared actions that did not receive a code.
    #[must_use]
    pub fn truncated(&self) -> usize {
        self.truncated
    }

    /// Codes of the numeric label actions, in ascending label order.
    pub fn label_codes(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.iter().filter_map(|(code, action)| match action {
            Action::SubmitLabel(n) => Some((n, code)),
            _ => None,
        })
    }

    #[must_use]
    pub fn n_labels(&self) -> usize {
        self.label_codes().count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, Action)> + '_ {
        self.by_code.iter().copied().enumerate()
    }

    /// Display names indexed by code.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.by_code.iter().map(ToString::to_string).collect()
    }
}
