/*
 *  lib.rs
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

//! Real-time audio spectrum visualizer and LED matrix controller.
//!
//! One tick of the pipeline turns a raw mono audio frame into a renderable
//! column matrix:
//!
//! audio frame → [`spectrum::AmplitudeExtractor`] → [`normalize::AdaptiveNormalizer`]
//! → {[`decay::DecayTracker`], [`compose::MatrixComposer`]} → [`frame::MatrixFrame`]
//! → sinks (window and/or serial device).

pub mod audio;
pub mod compose;
pub mod config;
pub mod decay;
pub mod display;
pub mod frame;
pub mod history;
pub mod normalize;
pub mod pacer;
pub mod pipeline;
pub mod serial;
pub mod sink;
pub mod spectrum;

pub use compose::{ComposeMode, MatrixComposer};
pub use config::{Cli, Config, ConfigError};
pub use decay::DecayTracker;
pub use frame::MatrixFrame;
pub use history::HistoryRing;
pub use normalize::AdaptiveNormalizer;
pub use pipeline::Pipeline;
pub use sink::{FrameSink, SinkError};
pub use spectrum::AmplitudeExtractor;
