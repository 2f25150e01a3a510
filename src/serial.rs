/*
 *  serial.rs
 *
 *  avis - audio spectrum visualizer / matrix controller
 *
 *  Raw byte upload of column heights to the physical matrix
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

use log::info;
use serialport::SerialPort;
use std::io::Write;
use std::time::Duration;

use crate::frame::MatrixFrame;
use crate::sink::{FrameSink, SinkError};

const BAUD_RATE: u32 = 115_200;
// write-only usage, the timeout is here for completeness
const TIMEOUT: Duration = Duration::from_secs(5);

/// Streams each frame to the LED matrix controller: exactly one unsigned
/// byte per column, left to right, value = illuminated height in rows.
/// No header, no checksum, no acknowledgment. The controller repaints
/// from whatever it last received.
pub struct SerialUploader {
    port: Box<dyn SerialPort>,
    path: String,
}

impl SerialUploader {
    pub fn open(path: &str) -> Result<Self, SinkError> {
        let port = serialport::new(path, BAUD_RATE).timeout(TIMEOUT).open()?;
        info!("serial matrix attached on {path} at {BAUD_RATE} baud");
        Ok(Self {
            port,
            path: path.to_string(),
        })
    }
}

/// The wire payload for one frame.
pub fn encode(frame: &MatrixFrame) -> Vec<u8> {
    frame.heights().to_vec()
}

impl FrameSink for SerialUploader {
    fn name(&self) -> &str {
        &self.path
    }

    fn submit(&mut self, frame: &MatrixFrame) -> Result<(), SinkError> {
        self.port.write_all(&encode(frame))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_is_one_height_byte_per_column_in_order() {
        let heights: Vec<u8> = (0..32).collect();
        let dropoffs = vec![0.0; 32];
        let frame = MatrixFrame::new(heights.clone(), dropoffs, None);

        assert_eq!(encode(&frame), heights);
    }
}
