//! Randomness source
//!
//! The simulation never touches global randomness. Everything goes through a
//! `RandomSource` owned by the simulation, so a seed fully determines a run.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Uniform draws the spawner needs
pub trait RandomSource {
    /// Uniform integer in `0..capacity`
    fn slot(&mut self, capacity: usize) -> usize;
    /// Uniform float in `[0, 1)`
    fn unit(&mut self) -> f32;
    /// Restart the sequence from a new seed
    fn reseed(&mut self, seed: u64);
}

/// PCG-backed source, reproducible from its seed
#[derive(Debug, Clone)]
pub struct SeededRng {
    seed: u64,
    rng: Pcg32,
}

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Seed the current sequence started from
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for SeededRng {
    fn slot(&mut self, capacity: usize) -> usize {
        self.rng.random_range(0..capacity)
    }

    fn unit(&mut self) -> f32 {
        self.rng.random::<f32>()
    }

    fn reseed(&mut self, seed: u64) {
        *self = Self::new(seed);
    }
}

/// Replays fixed draws; falls back to slot 0 and 0.5 once a queue runs dry
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub(crate) struct ScriptedRng {
    pub slots: std::collections::VecDeque<usize>,
    pub units: std::collections::VecDeque<f32>,
}

#[cfg(test)]
impl ScriptedRng {
    pub fn new(slots: &[usize], units: &[f32]) -> Self {
        Self {
            slots: slots.iter().copied().collect(),
            units: units.iter().copied().collect(),
        }
    }
}

#[cfg(test)]
impl RandomSource for ScriptedRng {
    fn slot(&mut self, capacity: usize) -> usize {
        self.slots.pop_front().unwrap_or(0) % capacity
    }

    fn unit(&mut self) -> f32 {
        self.units.pop_front().unwrap_or(0.5)
    }

    fn reseed(&mut self, _seed: u64) {}
}
