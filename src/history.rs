/*
 *  history.rs
 *
 *  avis - audio spectrum visualizer / matrix controller
 *
 *  Rolling min/max loudness history backing the adaptive normalizer
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

/// Fixed-capacity circular buffer of per-frame (min, max) loudness pairs.
///
/// The cursor always points at the next slot to overwrite. Slots never
/// written since startup keep their initial value of 0.0, and [`fold`]
/// deliberately scans the full capacity anyway: during the first
/// `capacity` ticks the normalization window is biased toward zero.
/// That startup transient is part of the contract, not an artifact.
///
/// [`fold`]: HistoryRing::fold
#[derive(Debug, Clone)]
pub struct HistoryRing {
    min: Vec<f32>,
    max: Vec<f32>,
    cursor: usize,
}

impl HistoryRing {
    pub fn new(capacity: usize) -> Self {
        Self {
            min: vec![0.0; capacity],
            max: vec![0.0; capacity],
            cursor: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.min.len()
    }

    /// Overwrite the slot under the cursor and advance it, wrapping at
    /// capacity.
    pub fn push(&mut self, min: f32, max: f32) {
        self.min[self.cursor] = min;
        self.max[self.cursor] = max;
        self.cursor = (self.cursor + 1) % self.capacity();
    }

    /// Fold the whole ring into an effective (min, max), seeded with the
    /// current frame's own extrema.
    pub fn fold(&self, seed_min: f32, seed_max: f32) -> (f32, f32) {
        let mut lo = seed_min;
        let mut hi = seed_max;
        for i in 0..self.capacity() {
            if self.min[i] < lo {
                lo = self.min[i];
            }
            if self.max[i] > hi {
                hi = self.max[i];
            }
        }
        (lo, hi)
    }
}
