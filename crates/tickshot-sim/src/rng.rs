//! Injectable random source.
//!
//! Recoil jitter and spawn shuffling are the only random inputs of a tick.
//! Both go through [`RandomSource`] so tests can pin exact sequences.

use std::collections::VecDeque;

/// Source of random integers.
pub trait RandomSource {
    /// Returns an integer in `min..=max`.
    fn int_in(&mut self, min: i32, max: i32) -> i32;

    /// Returns a fair coin flip.
    fn coin(&mut self) -> bool {
        self.int_in(0, 1) == 1
    }

    /// Shuffles a slice in place (Fisher-Yates).
    fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.int_in(0, i as i32) as usize;
            items.swap(i, j.min(i));
        }
    }
}

impl RandomSource for fastrand::Rng {
    fn int_in(&mut self, min: i32, max: i32) -> i32 {
        if min >= max {
            return min;
        }
        self.i32(min..=max)
    }
}

/// Replays a fixed list of values, clamped into each requested range.
///
/// Once the script runs out every request returns the range minimum.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    values: VecDeque<i32>,
}

impl ScriptedRandom {
    /// Creates a source replaying `values` in order.
    #[must_use]
    pub fn new(values: impl IntoIterator<Item = i32>) -> Self {
        Self {
            values: values.into_iter().collect(),
        }
    }

    /// Returns the number of unread values.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

impl RandomSource for ScriptedRandom {
    fn int_in(&mut self, min: i32, max: i32) -> i32 {
        self.values
            .pop_front()
            .map_or(min, |value| value.clamp(min, max.max(min)))
    }
}
