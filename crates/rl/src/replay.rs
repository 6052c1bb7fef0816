//! Fixed-capacity experience replay.

/// One environment step. `next_state` is `None` on terminal steps.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    pub state: Vec<f32>,
    pub action: usize,
    pub next_state: Option<Vec<f32>>,
    pub reward: f32,
}

impl Transition {
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.next_state.is_none()
    }
}

/// Ring buffer: once full, each push overwrites the oldest entry.
#[derive(Clone, Debug)]
pub struct ReplayMemory {
    capacity: usize,
    buffer: Vec<Transition>,
    position: usize,
}

impl ReplayMemory {
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "replay capacity must be positive");
        Self {
            capacity,
            buffer: Vec::with_capacity(capacity.min(1 << 16)),
            position: 0,
        }
    }

    pub fn push(&mut self, transition: Transition) {
        if self.buffer.len() < self.capacity {
            self.buffer.push(transition);
        } else {
            self.buffer[self.position] = transition;
        }
        self.position = (self.position + 1) % self.capacity;
    }

    /// `k` distinct transitions drawn uniformly, or `None` while fewer than
    /// `k` are stored.
    #[must_use]
    pub fn sample(&self, k: usize, rng: &mut fastrand::Rng) -> Option<Vec<&Transition>> {
        let len = self.buffer.len();
        if k > len {
            return None;
        }
        // Floyd's sampling without replacement
        let mut picked: Vec<usize> = Vec::with_capacity(k);
        for j in len - k..len {
            let t = rng.usize(..=j);
            picked.push(if picked.contains(&t) { j } else { t });
        }
        Some(picked.into_iter().map(|i| &self.buffer[i]).collect())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Stored transitions in storage order, not insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Transition> {
        self.buffer.iter()
    }
}
