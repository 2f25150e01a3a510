/*
 *  audio.rs
 *
 *  avis - audio spectrum visualizer / matrix controller
 *
 *  Capture-side collaborator: cpal input stream and the frame queue
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

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use log::{info, warn};
use std::sync::mpsc::{Receiver, Sender, channel};
use thiserror::Error;

use crate::config::Config;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no audio input device found")]
    NoDevice,
    #[error("device enumeration failed: {0}")]
    Devices(#[from] cpal::DevicesError),
    #[error("input config query failed: {0}")]
    DefaultConfig(#[from] cpal::DefaultStreamConfigError),
    #[error("input stream build failed: {0}")]
    Build(#[from] cpal::BuildStreamError),
    #[error("input stream start failed: {0}")]
    Play(#[from] cpal::PlayStreamError),
}

/// Keeps the capture stream alive. Dropping it closes the input stream;
/// that is the whole shutdown story for the producer side.
pub struct AudioCapture {
    _stream: cpal::Stream,
}

/// Re-blocks the hardware's arbitrary buffer sizes into frames of exactly
/// `frame_len` mono samples and pushes each completed frame onto the
/// queue. Runs inside the capture callback, so it only copies and sends;
/// it never blocks on the consumer (the channel is unbounded).
struct FrameChunker {
    pending: Vec<f32>,
    frame_len: usize,
    channels: usize,
    tx: Sender<Vec<f32>>,
}

impl FrameChunker {
    fn push(&mut self, interleaved: &[f32]) {
        for sample in interleaved.chunks(self.channels) {
            // channel 0 only; the pipeline is mono by design
            self.pending.push(sample[0]);
            if self.pending.len() == self.frame_len {
                let frame =
                    std::mem::replace(&mut self.pending, Vec::with_capacity(self.frame_len));
                // a closed channel just means the render loop is gone
                let _ = self.tx.send(frame);
            }
        }
    }
}

/// Open the default input device at the configured sample rate and start
/// capturing. Returns the keep-alive handle and the receiving end of the
/// frame queue.
pub fn start(cfg: &Config) -> Result<(AudioCapture, Receiver<Vec<f32>>), AudioError> {
    let host = cpal::default_host();
    let device = host.default_input_device().ok_or(AudioError::NoDevice)?;
    let supported = device.default_input_config()?;
    let channels = supported.channels() as usize;

    info!(
        "capturing from '{}' at {} Hz, {} channel(s)",
        device.name().unwrap_or_else(|_| "unknown".into()),
        cfg.sample_rate_hz,
        channels
    );

    let stream_config = cpal::StreamConfig {
        channels: supported.channels(),
        sample_rate: cpal::SampleRate(cfg.sample_rate_hz),
        buffer_size: cpal::BufferSize::Default,
    };

    let (tx, rx) = channel();
    let mut chunker = FrameChunker {
        pending: Vec::with_capacity(cfg.samples_per_frame),
        frame_len: cfg.samples_per_frame,
        channels,
        tx,
    };

    let stream = device.build_input_stream(
        &stream_config,
        move |data: &[f32], _: &cpal::InputCallbackInfo| chunker.push(data),
        // overruns and device hiccups are logged and otherwise ignored
        |err| warn!("audio stream error: {err}"),
        None,
    )?;
    stream.play()?;

    Ok((AudioCapture { _stream: stream }, rx))
}

/// Input device names for `--list-devices`.
pub fn list_input_devices() -> Result<Vec<String>, AudioError> {
    let host = cpal::default_host();
    let names = host
        .input_devices()?
        .map(|d| d.name().unwrap_or_else(|_| "unknown".into()))
        .collect();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunker_reblocks_into_exact_frames() {
        let (tx, rx) = channel();
        let mut chunker = FrameChunker {
            pending: Vec::new(),
            frame_len: 4,
            channels: 1,
            tx,
        };

        chunker.push(&[1.0, 2.0, 3.0]);
        assert!(rx.try_recv().is_err(), "no full frame yet");
        chunker.push(&[4.0, 5.0]);
        assert_eq!(rx.try_recv().unwrap(), vec![1.0, 2.0, 3.0, 4.0]);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn chunker_takes_first_channel_of_interleaved_input() {
        let (tx, rx) = channel();
        let mut chunker = FrameChunker {
            pending: Vec::new(),
            frame_len: 3,
            channels: 2,
            tx,
        };

        chunker.push(&[1.0, -1.0, 2.0, -2.0, 3.0, -3.0]);
        assert_eq!(rx.try_recv().unwrap(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn chunker_survives_a_dropped_receiver() {
        let (tx, rx) = channel();
        let mut chunker = FrameChunker {
            pending: Vec::new(),
            frame_len: 2,
            channels: 1,
            tx,
        };
        drop(rx);
        chunker.push(&[1.0, 2.0, 3.0, 4.0]);
    }
}
