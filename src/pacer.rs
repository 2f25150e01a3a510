/*
 *  pacer.rs
 *
 *  avis - audio spectrum visualizer / matrix controller
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

use std::time::{Duration, Instant};

/// Best-effort tick pacing for the render loop. Drift under load is
/// accepted; the audio queue bounds latency, this only caps the rate.
pub struct Pacer {
    next_deadline: Instant,
    frame: Duration,
}

impl Pacer {
    pub fn new(target_fps: u32) -> Self {
        let frame = Duration::from_micros(1_000_000u64 / target_fps.max(1) as u64);
        Self {
            next_deadline: Instant::now(),
            frame,
        }
    }

    pub fn period(&self) -> Duration {
        self.frame
    }

    /// Returns true if a tick is due; if true, also schedules the next
    /// deadline.
    #[inline]
    pub fn due(&mut self) -> bool {
        let now = Instant::now();
        if now >= self.next_deadline {
            self.next_deadline = now + self.frame;
            true
        } else {
            false
        }
    }
}
