use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::engine::RandomSource;
use crate::infra::rng_seed::RngSeed;

/// Системный RNG (thread_rng) для боевых столов.
#[derive(Clone, Debug, Default)]
pub struct SystemRng;

impl RandomSource for SystemRng {
    fn shuffle<T>(&mut self, slice: &mut [T]) {
        slice.shuffle(&mut rand::thread_rng());
    }
}

/// Детерминированный RNG для тестов и воспроизведения раздач.
#[derive(Clone, Debug)]
pub struct DeterministicRng {
    inner: StdRng,
}

impl DeterministicRng {
    pub fn from_u64(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self {
            inner: StdRng::from_seed(seed),
        }
    }
}

impl RandomSource for DeterministicRng {
    fn shuffle<T>(&mut self, slice: &mut [T]) {
        slice.shuffle(&mut self.inner);
    }
}

/// RNG стола: либо системный, либо детерминированный с отдельным seed на каждый матч.
#[derive(Clone, Debug)]
pub enum TableRng {
    System(SystemRng),
    Seeded {
        base: RngSeed,
        table_id: u64,
        /// Сколько колод уже перемешано за этим столом.
        index: u64,
    },
}

impl TableRng {
    pub fn new(base: Option<RngSeed>, table_id: u64) -> Self {
        match base {
            Some(base) => TableRng::Seeded {
                base,
                table_id,
                index: 0,
            },
            None => TableRng::System(SystemRng),
        }
    }
}

impl RandomSource for TableRng {
    fn shuffle<T>(&mut self, slice: &mut [T]) {
        match self {
            TableRng::System(rng) => rng.shuffle(slice),
            TableRng::Seeded {
                base,
                table_id,
                index,
            } => {
                let seed = base.derive(*table_id, *index);
                *index += 1;
                seed.to_rng().shuffle(slice);
            }
        }
    }
}
