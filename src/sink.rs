/*
 *  sink.rs
 *
 *  avis - audio spectrum visualizer / matrix controller
 *
 *  Frame sink seam between the pipeline and its outputs
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

use thiserror::Error;

use crate::frame::MatrixFrame;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("serial open failed: {0}")]
    Open(#[from] serialport::Error),
    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// A consumer of composed frames. Zero or more sinks may be attached to
/// the render loop; every attached sink receives the same tick's frame.
/// A sink that returns an error is detached and the loop keeps running;
/// an unplugged matrix should not take the window down with it.
pub trait FrameSink {
    /// Short name for log lines.
    fn name(&self) -> &str;

    fn submit(&mut self, frame: &MatrixFrame) -> Result<(), SinkError>;
}
