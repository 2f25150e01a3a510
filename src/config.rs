/*
 *  config.rs
 *
 *  avis - audio spectrum visualizer / matrix controller
 *
 *  CLI parsing and validated runtime configuration
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

use clap::{ArgAction, Parser};
use thiserror::Error;

use crate::compose::ComposeMode;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("validation error: {0}")]
    Validation(String),
}

/// Command line surface. Everything is optional and layers over
/// [`Config::default`]; the geometry flags exist for bench setups with
/// other matrix sizes.
#[derive(Debug, Parser, Clone)]
#[command(name = "avis", about = "audio spectrum visualizer / matrix controller")]
pub struct Cli {
    /// Frame composition strategy
    #[arg(long, value_enum)]
    pub mode: Option<ComposeMode>,
    /// Serial device of the physical matrix (e.g. /dev/ttyACM1); omit to
    /// render on screen only
    #[arg(long)]
    pub serial: Option<String>,
    /// Matrix columns
    #[arg(long)]
    pub width: Option<u32>,
    /// Matrix rows
    #[arg(long)]
    pub height: Option<u32>,
    /// On-screen pixels per matrix cell
    #[arg(long)]
    pub scale: Option<u32>,
    /// Render loop target framerate
    #[arg(long)]
    pub fps: Option<u32>,
    #[arg(long)]
    pub log_level: Option<String>,
    /// List audio input devices and exit
    #[arg(long, action = ArgAction::SetTrue)]
    pub list_devices: bool,
}

/// Effective configuration, fixed at startup and never mutated after.
#[derive(Debug, Clone)]
pub struct Config {
    pub led_width: u32,
    pub led_height: u32,
    pub framerate: u32,
    pub display_scale: u32,
    pub samples_per_frame: usize,
    pub hist_len: usize,
    pub sample_rate_hz: u32,
    pub mode: ComposeMode,
    pub serial_device: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            led_width: 32,
            led_height: 16,
            framerate: 60,
            display_scale: 20,
            samples_per_frame: 512,
            hist_len: 128,
            sample_rate_hz: 44_100,
            mode: ComposeMode::Bar,
            serial_device: None,
        }
    }
}

impl Config {
    /// Layer CLI overrides on the defaults, then validate.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let mut cfg = Config::default();
        if let Some(mode) = cli.mode {
            cfg.mode = mode;
        }
        if let Some(w) = cli.width {
            cfg.led_width = w;
        }
        if let Some(h) = cli.height {
            cfg.led_height = h;
        }
        if let Some(s) = cli.scale {
            cfg.display_scale = s;
        }
        if let Some(fps) = cli.fps {
            cfg.framerate = fps;
        }
        cfg.serial_device = cli.serial.clone();

        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.led_width == 0 || self.led_height == 0 {
            return Err(ConfigError::Validation(
                "matrix width/height must be > 0".into(),
            ));
        }
        if self.display_scale == 0 {
            return Err(ConfigError::Validation("display scale must be > 0".into()));
        }
        if self.framerate == 0 {
            return Err(ConfigError::Validation("framerate must be > 0".into()));
        }
        if self.hist_len == 0 {
            return Err(ConfigError::Validation("history length must be > 0".into()));
        }
        if self.led_height > 256 {
            return Err(ConfigError::Validation(
                "matrix height must fit a one-byte column height (max 256)".into(),
            ));
        }
        if self.samples_per_frame / 4 < self.led_width as usize {
            return Err(ConfigError::Validation(format!(
                "{} columns need at least {} samples per frame",
                self.led_width,
                self.led_width * 4
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_cli() -> Cli {
        Cli {
            mode: None,
            serial: None,
            width: None,
            height: None,
            scale: None,
            fps: None,
            log_level: None,
            list_devices: false,
        }
    }

    #[test]
    fn defaults_are_the_reference_setup() {
        let cfg = Config::from_cli(&bare_cli()).unwrap();
        assert_eq!(cfg.led_width, 32);
        assert_eq!(cfg.led_height, 16);
        assert_eq!(cfg.framerate, 60);
        assert_eq!(cfg.samples_per_frame, 512);
        assert_eq!(cfg.hist_len, 128);
        assert_eq!(cfg.sample_rate_hz, 44_100);
        assert_eq!(cfg.mode, ComposeMode::Bar);
    }

    #[test]
    fn too_many_columns_for_the_frame_is_rejected() {
        // 512 samples leave 128 usable coefficients
        let mut cli = bare_cli();
        cli.width = Some(129);
        assert!(Config::from_cli(&cli).is_err());
        cli.width = Some(128);
        assert!(Config::from_cli(&cli).is_ok());
    }

    #[test]
    fn height_beyond_one_byte_is_rejected() {
        let mut cli = bare_cli();
        cli.height = Some(257);
        assert!(Config::from_cli(&cli).is_err());
        cli.height = Some(256);
        assert!(Config::from_cli(&cli).is_ok());
    }

    #[test]
    fn zero_geometry_is_rejected() {
        let mut cli = bare_cli();
        cli.height = Some(0);
        assert!(Config::from_cli(&cli).is_err());
    }
}
