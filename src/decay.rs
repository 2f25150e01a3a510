/*
 *  decay.rs
 *
 *  avis - audio spectrum visualizer / matrix controller
 *
 *  Per-column peak-hold marker with constant-rate gravity
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

/// Row units the marker falls per tick when the bar underneath is quieter.
pub const DROPOFF_RATE: f32 = 0.25;

/// Classic VU-meter peak hold: one decaying marker per column, measured
/// in rows from the bottom of the matrix. The marker snaps up instantly
/// to meet a loud transient and sinks back at [`DROPOFF_RATE`] per tick,
/// clamped to `[0, led_height - 1]`.
pub struct DecayTracker {
    dropoffs: Vec<f32>,
    max_row: f32,
    rows: f32,
}

impl DecayTracker {
    pub fn new(columns: usize, led_height: u32) -> Self {
        Self {
            dropoffs: vec![0.0; columns],
            max_row: led_height as f32 - 1.0,
            rows: led_height as f32,
        }
    }

    /// Advance one tick. `levels` are the normalized [0,1] amplitudes for
    /// this tick, one per column; returns the updated marker rows.
    pub fn advance(&mut self, levels: &[f32]) -> &[f32] {
        for (d, &level) in self.dropoffs.iter_mut().zip(levels) {
            let target = level * self.rows;
            *d = (*d - DROPOFF_RATE).max(target).clamp(0.0, self.max_row);
        }
        &self.dropoffs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::Rng;

    #[test]
    fn marker_stays_in_row_bounds() {
        let mut rng = rand::rng();
        let mut tracker = DecayTracker::new(32, 16);
        for _ in 0..500 {
            let levels: Vec<f32> = (0..32).map(|_| rng.random_range(0.0..1.0)).collect();
            for &d in tracker.advance(&levels) {
                assert!((0.0..=15.0).contains(&d), "marker out of range: {d}");
            }
        }
        // extremes
        for _ in 0..100 {
            for &d in tracker.advance(&[1.0; 32]) {
                assert_eq!(d, 15.0);
            }
        }
        for _ in 0..100 {
            tracker.advance(&[0.0; 32]);
        }
        let rows = tracker.advance(&[0.0; 32]).to_vec();
        assert!(rows.iter().all(|&d| d == 0.0));
    }

    #[test]
    fn falls_at_exact_rate_until_floor() {
        let mut tracker = DecayTracker::new(1, 16);
        tracker.advance(&[1.0]);
        let mut prev = 15.0f32;

        loop {
            let d = tracker.advance(&[0.0])[0];
            if d == 0.0 {
                break;
            }
            assert_abs_diff_eq!(prev - d, DROPOFF_RATE, epsilon = 1e-5);
            prev = d;
        }
        // 15.0 rows at 0.25 per tick
        assert_eq!(tracker.advance(&[0.0])[0], 0.0);
    }

    #[test]
    fn marker_snaps_up_to_a_louder_bar() {
        let mut tracker = DecayTracker::new(1, 16);
        tracker.advance(&[0.25]); // marker at 4.0
        let d = tracker.advance(&[0.75])[0];
        assert_eq!(d, 12.0);
    }
}
