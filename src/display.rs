/*
 *  display.rs
 *
 *  avis - audio spectrum visualizer / matrix controller
 *
 *  On-screen presenter and the render loop that drives the pipeline
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

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::RgbColor;
use log::{error, info};
use pixels::{Pixels, SurfaceTexture};
use thiserror::Error;
use winit::{
    dpi::PhysicalSize,
    event::{Event, VirtualKeyCode},
    event_loop::{ControlFlow, EventLoop},
    window::WindowBuilder,
};
use winit_input_helper::WinitInputHelper;

use crate::audio::AudioCapture;
use crate::compose::{BAR_COLOR, BG_COLOR, DROPOFF_COLOR};
use crate::config::Config;
use crate::frame::MatrixFrame;
use crate::pacer::Pacer;
use crate::pipeline::Pipeline;
use crate::sink::FrameSink;

#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("window creation failed: {0}")]
    Window(#[from] winit::error::OsError),
    #[error("render surface failed: {0}")]
    Surface(#[from] pixels::Error),
}

/// The on-screen surface: each matrix cell becomes a `scale` x `scale`
/// rectangle in a fixed-size window. The window owns the event loop and
/// paces the pipeline; closing it (or Escape / Q) ends the process
/// cooperatively, which drops the capture stream with it.
pub struct VisWindow {
    led_width: u32,
    led_height: u32,
    scale: u32,
    framerate: u32,
}

impl VisWindow {
    pub fn new(cfg: &Config) -> Self {
        Self {
            led_width: cfg.led_width,
            led_height: cfg.led_height,
            scale: cfg.display_scale,
            framerate: cfg.framerate,
        }
    }

    /// Run the render loop until quit. Every due tick pulls one frame
    /// through the pipeline, paints it, and fans it out to the attached
    /// sinks; a failing sink is detached, the loop keeps going.
    pub fn run(
        self,
        mut pipeline: Pipeline,
        mut sinks: Vec<Box<dyn FrameSink>>,
        capture: AudioCapture,
    ) -> Result<(), DisplayError> {
        let (buf_w, buf_h) = (self.led_width * self.scale, self.led_height * self.scale);

        let event_loop = EventLoop::new();
        let mut input = WinitInputHelper::new();

        let window = WindowBuilder::new()
            .with_title("avis")
            .with_inner_size(PhysicalSize::new(buf_w, buf_h))
            .with_resizable(false)
            .build(&event_loop)?;

        let window_size = window.inner_size();
        let surface_texture = SurfaceTexture::new(window_size.width, window_size.height, &window);
        let mut pixels = Pixels::new(buf_w, buf_h, surface_texture)?;

        let mut pacer = Pacer::new(self.framerate);
        let (led_width, led_height, scale) = (self.led_width, self.led_height, self.scale);

        // keep the capture stream alive for the lifetime of the loop
        let _capture = capture;

        event_loop.run(move |event, _, control_flow| {
            *control_flow = ControlFlow::Poll;

            if let Event::RedrawRequested(_) = event {
                if let Err(err) = pixels.render() {
                    error!("surface present failed: {err}");
                    *control_flow = ControlFlow::Exit;
                    return;
                }
            }

            if input.update(&event) {
                if input.key_pressed(VirtualKeyCode::Escape)
                    || input.key_pressed(VirtualKeyCode::Q)
                    || input.close_requested()
                    || input.destroyed()
                {
                    *control_flow = ControlFlow::Exit;
                    return;
                }
            }

            if pacer.due() {
                match pipeline.tick() {
                    Some(frame) => {
                        paint(&frame, led_width, led_height, scale, pixels.frame_mut());
                        sinks.retain_mut(|sink| match sink.submit(&frame) {
                            Ok(()) => true,
                            Err(err) => {
                                error!("sink '{}' failed, detaching: {err}", sink.name());
                                false
                            }
                        });
                        window.request_redraw();
                    }
                    None => {
                        info!("audio capture ended, shutting down");
                        *control_flow = ControlFlow::Exit;
                    }
                }
            }
        });
    }
}

/// Paint one composed frame into the RGBA surface buffer. Grid frames are
/// blitted cell by cell; bar frames draw the bar rectangle and a
/// half-cell dropoff marker per column without any backing grid.
fn paint(frame: &MatrixFrame, led_width: u32, led_height: u32, scale: u32, rgba: &mut [u8]) {
    let stride = (led_width * scale) as usize;
    fill_rect(rgba, stride, 0, 0, stride, (led_height * scale) as usize, BG_COLOR);

    if let Some(grid) = frame.grid() {
        let s = scale as usize;
        for y in 0..grid.height() {
            for x in 0..grid.width() {
                let color = grid.cell(x, y);
                if color != BG_COLOR {
                    fill_rect(rgba, stride, x * s, y * s, s, s, color);
                }
            }
        }
        return;
    }

    let s = scale as usize;
    for (x, (&h, &d)) in frame.heights().iter().zip(frame.dropoffs()).enumerate() {
        let h = h as usize;
        if h > 0 {
            let y0 = (led_height as usize - h) * s;
            fill_rect(rgba, stride, x * s, y0, s, h * s, BAR_COLOR);
        }

        let marker_row = led_height as usize - 1 - (d.floor() as usize).min(led_height as usize - 1);
        // half a cell tall so it reads as a marker, not a bar segment
        fill_rect(rgba, stride, x * s, marker_row * s, s, (s / 2).max(1), DROPOFF_COLOR);
    }
}

fn fill_rect(rgba: &mut [u8], stride: usize, x: usize, y: usize, w: usize, h: usize, color: Rgb888) {
    let px = [color.r(), color.g(), color.b(), 0xff];
    for row in y..y + h {
        let base = (row * stride + x) * 4;
        for cell in rgba[base..base + w * 4].chunks_exact_mut(4) {
            cell.copy_from_slice(&px);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_frame_paints_from_the_bottom() {
        // 2x4 matrix at scale 1: column 0 has height 2, marker at row 3
        let frame = MatrixFrame::new(vec![2, 0], vec![3.0, 0.0], None);
        let mut rgba = vec![0u8; 2 * 4 * 4];
        paint(&frame, 2, 4, 1, &mut rgba);

        let cell = |x: usize, y: usize| {
            let i = (y * 2 + x) * 4;
            (rgba[i], rgba[i + 1], rgba[i + 2])
        };
        assert_eq!(cell(0, 3), (255, 255, 255));
        assert_eq!(cell(0, 2), (255, 255, 255));
        assert_eq!(cell(0, 1), (0, 0, 0));
        // marker row for dropoff 3.0 is the top row
        assert_eq!(cell(0, 0), (130, 30, 255));
        // empty column: marker only, at the bottom row
        assert_eq!(cell(1, 3), (130, 30, 255));
        assert_eq!(cell(1, 2), (0, 0, 0));
    }
}
