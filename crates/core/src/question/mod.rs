use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::Serialize;

use crate::config::QuestionConfig;

/// Where the "no" button jumps to after it is pressed or hovered.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DodgeMove {
    pub x: f32,
    pub y: f32,
    pub rotate: f32,
    pub scale: f32,
}

impl Default for DodgeMove {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            rotate: 0.0,
            scale: 1.0,
        }
    }
}

/// The opening yes/no question. Declining never succeeds; the button just
/// runs away and a tease is shown.
#[derive(Debug)]
pub struct QuestionGame {
    rng: StdRng,
    teases: Vec<String>,
    dodge: DodgeMove,
    tease: Option<usize>,
    declines: u32,
}

impl QuestionGame {
    pub fn new(config: &QuestionConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::with_rng(config.teases.clone(), rng)
    }

    pub fn with_rng(teases: Vec<String>, rng: StdRng) -> Self {
        Self {
            rng,
            teases,
            dodge: DodgeMove::default(),
            tease: None,
            declines: 0,
        }
    }

    pub fn dodge(&self) -> DodgeMove {
        self.dodge
    }

    pub fn tease(&self) -> Option<&str> {
        self.tease.map(|index| self.teases[index].as_str())
    }

    pub fn decline_count(&self) -> u32 {
        self.declines
    }

    pub fn decline(&mut self) -> DodgeMove {
        self.dodge = DodgeMove {
            x: self.rng.random_range(-150.0..150.0),
            y: self.rng.random_range(-100.0..100.0),
            rotate: self.rng.random_range(0.0..360.0),
            scale: self.rng.random_range(0.7..1.2),
        };
        if !self.teases.is_empty() {
            self.tease = Some(self.rng.random_range(0..self.teases.len()));
        }
        self.declines += 1;
        tracing::debug!(declines = self.declines, "question declined");
        self.dodge
    }
}
