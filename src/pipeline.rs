/*
 *  pipeline.rs
 *
 *  avis - audio spectrum visualizer / matrix controller
 *
 *  The per-tick driver owning all visualization state
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

use log::trace;
use std::sync::mpsc::{Receiver, TryRecvError};

use crate::compose::MatrixComposer;
use crate::config::Config;
use crate::decay::DecayTracker;
use crate::frame::MatrixFrame;
use crate::normalize::AdaptiveNormalizer;
use crate::spectrum::AmplitudeExtractor;

/// Owns every piece of per-tick and process-lifetime pipeline state:
/// the FFT extractor, the normalizer's history ring, the dropoff markers
/// and the composer, plus the receiving end of the audio frame queue.
/// Single writer, single reader: the render loop is the only caller.
pub struct Pipeline {
    extractor: AmplitudeExtractor,
    normalizer: AdaptiveNormalizer,
    decay: DecayTracker,
    composer: MatrixComposer,
    frames: Receiver<Vec<f32>>,
}

impl Pipeline {
    pub fn new(cfg: &Config, frames: Receiver<Vec<f32>>) -> Self {
        Self {
            extractor: AmplitudeExtractor::new(cfg.samples_per_frame, cfg.led_width as usize),
            normalizer: AdaptiveNormalizer::new(cfg.hist_len),
            decay: DecayTracker::new(cfg.led_width as usize, cfg.led_height),
            composer: MatrixComposer::new(cfg.led_width, cfg.led_height, cfg.mode),
            frames,
        }
    }

    /// Run one full tick: pull the newest audio frame and push it through
    /// extraction, normalization, decay and composition. Returns `None`
    /// only once the capture side has gone away and the queue is drained.
    pub fn tick(&mut self) -> Option<MatrixFrame> {
        let frame = self.latest_frame()?;
        let mut amps = self.extractor.extract(&frame);
        self.normalizer.normalize(&mut amps);
        let dropoffs = self.decay.advance(&amps);
        Some(self.composer.compose(&amps, dropoffs))
    }

    /// Latest-wins drain: discard everything but the most recently
    /// captured frame, trading completeness for bounded end-to-end
    /// latency. Blocks for the next frame only when the queue is empty,
    /// so an idle tick is bounded by audio arrival, not the frame rate.
    fn latest_frame(&mut self) -> Option<Vec<f32>> {
        let mut newest = None;
        let mut discarded = 0usize;

        loop {
            match self.frames.try_recv() {
                Ok(frame) => {
                    if newest.is_some() {
                        discarded += 1;
                    }
                    newest = Some(frame);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => return newest,
            }
        }
        if discarded > 0 {
            trace!("dropped {discarded} stale audio frame(s)");
        }

        match newest {
            Some(frame) => Some(frame),
            None => self.frames.recv().ok(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::channel;

    #[test]
    fn drain_keeps_only_the_newest_frame() {
        let cfg = Config::default();
        let (tx, rx) = channel();
        let mut pipeline = Pipeline::new(&cfg, rx);

        tx.send(vec![0.1; 512]).unwrap();
        tx.send(vec![0.2; 512]).unwrap();
        tx.send(vec![0.3; 512]).unwrap();

        let frame = pipeline.latest_frame().unwrap();
        assert_eq!(frame[0], 0.3);
        // the older two are gone; next call would block, so check via
        // disconnect instead
        drop(tx);
        assert!(pipeline.latest_frame().is_none());
    }

    #[test]
    fn tick_returns_none_after_capture_ends() {
        let cfg = Config::default();
        let (tx, rx) = channel();
        let mut pipeline = Pipeline::new(&cfg, rx);

        tx.send(vec![0.0; 512]).unwrap();
        drop(tx);

        assert!(pipeline.tick().is_some());
        assert!(pipeline.tick().is_none());
    }
}
