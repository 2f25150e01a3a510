/*
 *  frame.rs
 *
 *  avis - audio spectrum visualizer / matrix controller
 *
 *  Composed matrix frames and the runtime-sized cell grid
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

use core::convert::Infallible;
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;

/// One composed, renderable snapshot of the column matrix for a single
/// tick. Owned by the render loop; a new instance is produced per tick
/// and the previous one discarded.
///
/// Every frame carries the per-column illuminated heights (what the
/// serial transport consumes) and the dropoff marker rows. In grid mode
/// the composer additionally materializes the per-cell color grid; in bar
/// mode `grid` stays `None` and the presenter draws from the columns
/// directly.
#[derive(Debug, Clone)]
pub struct MatrixFrame {
    heights: Vec<u8>,
    dropoffs: Vec<f32>,
    grid: Option<CellGrid>,
}

impl MatrixFrame {
    pub fn new(heights: Vec<u8>, dropoffs: Vec<f32>, grid: Option<CellGrid>) -> Self {
        debug_assert_eq!(heights.len(), dropoffs.len());
        Self {
            heights,
            dropoffs,
            grid,
        }
    }

    /// Illuminated rows per column, left to right.
    pub fn heights(&self) -> &[u8] {
        &self.heights
    }

    /// Dropoff marker row per column, measured from the bottom.
    pub fn dropoffs(&self) -> &[f32] {
        &self.dropoffs
    }

    pub fn grid(&self) -> Option<&CellGrid> {
        self.grid.as_ref()
    }
}

/// A runtime-sized grid of matrix cells, drawable with embedded-graphics
/// primitives. Row 0 is the top row; the composer handles the bottom-up
/// inversion of bar heights.
#[derive(Debug, Clone)]
pub struct CellGrid {
    buf: Vec<Rgb888>,
    w: usize,
    h: usize,
}

impl CellGrid {
    pub fn new(width: u32, height: u32, fill: Rgb888) -> Self {
        let (w, h) = (width as usize, height as usize);
        Self {
            buf: vec![fill; w * h],
            w,
            h,
        }
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn height(&self) -> usize {
        self.h
    }

    /// Cell color at (x, y); out-of-bounds reads are a bug in the caller.
    pub fn cell(&self, x: usize, y: usize) -> Rgb888 {
        self.buf[y * self.w + x]
    }

    #[inline]
    fn idx(&self, p: Point) -> Option<usize> {
        if p.x >= 0 && p.y >= 0 {
            let (x, y) = (p.x as usize, p.y as usize);
            if x < self.w && y < self.h {
                return Some(y * self.w + x);
            }
        }
        None
    }
}

impl OriginDimensions for CellGrid {
    fn size(&self) -> Size {
        Size::new(self.w as u32, self.h as u32)
    }
}

impl DrawTarget for CellGrid {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(p, c) in pixels {
            if let Some(i) = self.idx(p) {
                self.buf[i] = c;
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.buf.fill(color);
        Ok(())
    }
}
