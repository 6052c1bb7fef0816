//! Curriculum phases: each phase raises the object ceiling of its scenes
//! while the label space stays fixed.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurriculumPhase {
    pub max_episode_objects: usize,
    pub n_episodes: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Curriculum {
    phases: Vec<CurriculumPhase>,
}

impl Curriculum {
    #[must_use]
    pub fn new(phases: Vec<CurriculumPhase>) -> Self {
        Self { phases }
    }

    /// One phase per ceiling in `min..=max`, each `n_episodes` long.
    #[must_use]
    pub fn from_range(min_objects: usize, max_objects: usize, n_episodes: usize) -> Self {
        let phases = (min_objects..=max_objects)
            .map(|max_episode_objects| CurriculumPhase {
                max_episode_objects,
                n_episodes,
            })
            .collect();
        Self { phases }
    }

    #[must_use]
    pub fn phases(&self) -> &[CurriculumPhase] {
        &self.phases
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.phases.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    #[must_use]
    pub fn total_episodes(&self) -> usize {
        self.phases.iter().map(|p| p.n_episodes).sum()
    }

    #[must_use]
    pub fn last(&self) -> Option<&CurriculumPhase> {
        self.phases.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_builds_one_phase_per_ceiling() {
        let c = Curriculum::from_range(1, 3, 10);
        let ceilings: Vec<usize> = c.phases().iter().map(|p| p.max_episode_objects).collect();
        assert_eq!(ceilings, vec![1, 2, 3]);
        assert_eq!(c.total_episodes(), 30);
        assert!(Curriculum::from_range(3, 2, 10).is_empty());
    }
}
