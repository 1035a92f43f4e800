//! Round-scoped spawn position allocation.

use ahash::AHashMap;
use tickshot_common::{Point, SimError, SimResult, Side};
use tracing::debug;

use crate::rng::RandomSource;

#[derive(Debug, Clone, Default)]
struct SpawnPool {
    candidates: Vec<Point>,
    taken: Vec<bool>,
}

/// Hands out each spawn candidate of a side at most once per round.
#[derive(Debug, Clone, Default)]
pub struct SpawnAllocator {
    pools: AHashMap<Side, SpawnPool>,
}

impl SpawnAllocator {
    /// Creates an allocator with no pools.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes the next free spawn position for `side`.
    ///
    /// The first call of a round copies `candidates` (shuffled once when
    /// `randomize` is set) into the side's pool; later calls in the same round
    /// ignore `candidates`.
    pub fn take<R: RandomSource + ?Sized>(
        &mut self,
        side: Side,
        candidates: &[Point],
        randomize: bool,
        rng: &mut R,
    ) -> SimResult<Point> {
        let pool = self.pools.entry(side).or_insert_with(|| {
            let mut candidates = candidates.to_vec();
            if randomize {
                rng.shuffle(&mut candidates);
            }
            SpawnPool {
                taken: vec![false; candidates.len()],
                candidates,
            }
        });

        let index = pool
            .taken
            .iter()
            .position(|taken| !taken)
            .ok_or(SimError::NoFreeSpawn { side })?;
        pool.taken[index] = true;
        let position = pool.candidates[index];
        debug!(%side, index, %position, "spawn allocated");
        Ok(position)
    }

    /// Number of candidates still free for `side`, `None` before the first take of the round.
    #[must_use]
    pub fn remaining(&self, side: Side) -> Option<usize> {
        self.pools
            .get(&side)
            .map(|pool| pool.taken.iter().filter(|taken| !**taken).count())
    }

    /// Forgets every pool.
    pub fn reset(&mut self) {
        self.pools.clear();
    }
}
