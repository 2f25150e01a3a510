/*
 *  main.rs
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

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use log::info;

use avis::audio;
use avis::config::{Cli, Config};
use avis::display::VisWindow;
use avis::pipeline::Pipeline;
use avis::serial::SerialUploader;
use avis::sink::FrameSink;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = cli.log_level.as_deref().unwrap_or("info");
    env_logger::Builder::from_env(Env::default().default_filter_or(filter)).init();

    if cli.list_devices {
        for name in audio::list_input_devices().context("enumerating input devices")? {
            println!("{name}");
        }
        return Ok(());
    }

    let cfg = Config::from_cli(&cli)?;
    info!(
        "{}x{} matrix, {} fps, {} mode",
        cfg.led_width,
        cfg.led_height,
        cfg.framerate,
        match cfg.mode {
            avis::ComposeMode::Bar => "bar",
            avis::ComposeMode::Grid => "grid",
        }
    );

    let mut sinks: Vec<Box<dyn FrameSink>> = Vec::new();
    if let Some(device) = cfg.serial_device.as_deref() {
        let uploader = SerialUploader::open(device)
            .with_context(|| format!("opening serial matrix on {device}"))?;
        sinks.push(Box::new(uploader));
    }

    let (capture, frames) = audio::start(&cfg).context("starting audio capture")?;
    let pipeline = Pipeline::new(&cfg, frames);

    VisWindow::new(&cfg).run(pipeline, sinks, capture)?;
    Ok(())
}
