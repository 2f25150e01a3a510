/*
 *  normalize.rs
 *
 *  avis - audio spectrum visualizer / matrix controller
 *
 *  Adaptive loudness normalization over a rolling history window
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

use crate::history::HistoryRing;

/// Automatic gain control for the display: rescales each amplitude vector
/// into [0,1] against the min/max seen over the last `hist_len` frames,
/// so the bars stay legible across quiet and loud input without manual
/// calibration.
///
/// The fold over the full ring is an O(hist_len) rescan every tick.
/// Deliberate: hist_len is small and fixed, an incremental min/max would
/// buy nothing but bookkeeping.
pub struct AdaptiveNormalizer {
    history: HistoryRing,
}

impl AdaptiveNormalizer {
    pub fn new(hist_len: usize) -> Self {
        Self {
            history: HistoryRing::new(hist_len),
        }
    }

    /// Record this frame's extrema in the history, then rescale the
    /// vector in place to `(x - min) / (max - min)` over the effective
    /// window. A collapsed range (max == min) is widened to min + 1,
    /// the only explicit guard in the pipeline.
    pub fn normalize(&mut self, amp: &mut [f32]) {
        let Some(&first) = amp.first() else {
            return;
        };

        let mut cur_min = first;
        let mut cur_max = first;
        for &a in amp.iter() {
            if a < cur_min {
                cur_min = a;
            }
            if a > cur_max {
                cur_max = a;
            }
        }

        self.history.push(cur_min, cur_max);
        let (lo, mut hi) = self.history.fold(cur_min, cur_max);

        // don't allow zero-length ranges
        if hi == lo {
            hi = lo + 1.0;
        }

        for a in amp.iter_mut() {
            *a = (*a - lo) / (hi - lo);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::Rng;

    #[test]
    fn output_always_in_unit_range() {
        let mut rng = rand::rng();
        let mut norm = AdaptiveNormalizer::new(128);
        for _ in 0..300 {
            let mut amp: Vec<f32> = (0..32).map(|_| rng.random_range(0.0..5000.0)).collect();
            norm.normalize(&mut amp);
            assert!(amp.iter().all(|&a| (0.0..=1.0).contains(&a)), "{amp:?}");
        }
    }

    #[test]
    fn positive_scaling_preserves_column_ordering() {
        let base: Vec<f32> = vec![3.0, 1.0, 4.0, 1.5, 9.0, 2.6, 5.3, 5.8];
        let scaled: Vec<f32> = base.iter().map(|a| a * 37.5).collect();

        let order = |v: &[f32]| {
            let mut idx: Vec<usize> = (0..v.len()).collect();
            idx.sort_by(|&a, &b| v[a].total_cmp(&v[b]));
            idx
        };

        let mut a = base.clone();
        AdaptiveNormalizer::new(16).normalize(&mut a);
        let mut b = scaled.clone();
        AdaptiveNormalizer::new(16).normalize(&mut b);

        assert_eq!(order(&a), order(&b));
    }

    #[test]
    fn constant_frames_saturate_then_collapse() {
        // While unwritten ring slots (0.0) widen the window, a constant
        // frame normalizes to all ones; once the ring holds nothing but
        // the constant, min == max collapses the range and the forced
        // min + 1 puts the constant at the bottom.
        let hist_len = 128;
        let mut norm = AdaptiveNormalizer::new(hist_len);

        for tick in 1..hist_len {
            let mut amp = vec![42.0f32; 32];
            norm.normalize(&mut amp);
            assert!(
                amp.iter().all(|&a| a == 1.0),
                "tick {tick}: expected saturation, got {amp:?}"
            );
        }

        for _ in 0..3 {
            let mut amp = vec![42.0f32; 32];
            norm.normalize(&mut amp);
            assert!(amp.iter().all(|&a| a == 0.0), "{amp:?}");
        }
    }

    #[test]
    fn quiet_frame_after_loud_history_stays_low() {
        let mut norm = AdaptiveNormalizer::new(8);
        let mut loud = vec![100.0f32; 4];
        norm.normalize(&mut loud);

        let mut quiet = vec![1.0f32, 2.0, 3.0, 4.0];
        norm.normalize(&mut quiet);
        assert!(quiet.iter().all(|&a| a < 0.05), "{quiet:?}");
        assert_abs_diff_eq!(quiet[3], 0.04, epsilon = 1e-6);
    }
}
