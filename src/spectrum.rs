/*
 *  spectrum.rs
 *
 *  avis - audio spectrum visualizer / matrix controller
 *
 *  FFT bucketing of raw audio frames into per-column magnitudes
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

use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;

/// Turns one raw mono audio frame into `columns` bucketed magnitudes.
///
/// The forward FFT of the frame is computed and only the first half of
/// the non-negative-frequency coefficients is kept (the back half of the
/// full output is the redundant conjugate mirror for real input, and the
/// display only uses the lower half of what remains, i.e. the first
/// quarter of the full output). That window is partitioned into `columns`
/// contiguous equal-width buckets; the column value is the mean
/// coefficient magnitude over the bucket. Coefficients beyond
/// `bucket_width * columns` are dropped.
///
/// No window function is applied before the transform; spectral leakage
/// is an accepted simplification for a 32-column display.
pub struct AmplitudeExtractor {
    fft: Arc<dyn Fft<f32>>,
    buf: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
    columns: usize,
    bucket_width: usize,
}

impl AmplitudeExtractor {
    /// `samples_per_frame` must leave at least one coefficient per column
    /// in the kept quarter; [`crate::config::Config`] validation
    /// guarantees that for configured values.
    pub fn new(samples_per_frame: usize, columns: usize) -> Self {
        let mut planner = FftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(samples_per_frame);

        let buf = vec![Complex::new(0.0, 0.0); samples_per_frame];
        let scratch = vec![Complex::new(0.0, 0.0); fft.get_inplace_scratch_len()];
        let bucket_width = (samples_per_frame / 4) / columns;
        assert!(bucket_width >= 1, "more columns than FFT coefficients");

        Self {
            fft,
            buf,
            scratch,
            columns,
            bucket_width,
        }
    }

    /// Extract the amplitude vector for one frame. The frame length must
    /// equal the `samples_per_frame` this extractor was planned for; a
    /// short frame is a caller contract violation and fails fast.
    pub fn extract(&mut self, frame: &[f32]) -> Vec<f32> {
        assert_eq!(frame.len(), self.buf.len(), "audio frame length mismatch");

        for (slot, &s) in self.buf.iter_mut().zip(frame) {
            slot.re = s;
            slot.im = 0.0;
        }
        self.fft.process_with_scratch(&mut self.buf, &mut self.scratch);

        let mut out = vec![0.0f32; self.columns];
        for (i, col) in out.iter_mut().enumerate() {
            let start = i * self.bucket_width;
            let mut acc = 0.0f32;
            for c in &self.buf[start..start + self.bucket_width] {
                acc += (c.re * c.re + c.im * c.im).sqrt();
            }
            *col = acc / self.bucket_width as f32;
        }
        out
    }

    pub fn bucket_width(&self) -> usize {
        self.bucket_width
    }
}
