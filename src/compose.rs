/*
 *  compose.rs
 *
 *  avis - audio spectrum visualizer / matrix controller
 *
 *  Bar / grid frame composition from normalized amplitudes
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

use clap::ValueEnum;
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};

use crate::frame::{CellGrid, MatrixFrame};

/// Bar body color.
pub const BAR_COLOR: Rgb888 = Rgb888::new(255, 255, 255);
/// Dropoff marker color.
pub const DROPOFF_COLOR: Rgb888 = Rgb888::new(130, 30, 255);
/// Unlit cell color.
pub const BG_COLOR: Rgb888 = Rgb888::new(0, 0, 0);

/// Which frame composition strategy to run.
///
/// Both modes produce the same column data; they differ only in whether a
/// per-cell backing grid is materialized for the presenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ComposeMode {
    /// Heights and dropoff points only; the presenter draws rectangles
    /// directly.
    #[default]
    Bar,
    /// Full per-cell color grid.
    Grid,
}

/// Combines normalized amplitudes and dropoff state into a [`MatrixFrame`].
pub struct MatrixComposer {
    width: u32,
    height: u32,
    mode: ComposeMode,
}

impl MatrixComposer {
    pub fn new(width: u32, height: u32, mode: ComposeMode) -> Self {
        Self {
            width,
            height,
            mode,
        }
    }

    /// Compose one tick. `amps` must already be normalized to [0,1];
    /// `dropoffs` are marker rows from [`crate::decay::DecayTracker`].
    ///
    /// The illuminated height is `floor(amp * led_height)`, clamped to
    /// `led_height - 1` so the drawn bar and the serial byte range agree.
    pub fn compose(&self, amps: &[f32], dropoffs: &[f32]) -> MatrixFrame {
        let max_h = self.height as i32 - 1;
        let heights: Vec<u8> = amps
            .iter()
            .map(|&a| ((a * self.height as f32).floor() as i32).clamp(0, max_h) as u8)
            .collect();

        let grid = match self.mode {
            ComposeMode::Bar => None,
            ComposeMode::Grid => {
                let mut grid = CellGrid::new(self.width, self.height, BG_COLOR);
                if let Err(e) = self.draw_columns(&mut grid, &heights, dropoffs) {
                    match e {}
                }
                Some(grid)
            }
        };

        MatrixFrame::new(heights, dropoffs.to_vec(), grid)
    }

    /// Draw every column onto a cell-resolution target: the bar from the
    /// bottom row upward, then the dropoff marker cell on top of whatever
    /// the bar left there. Zero-height bars are skipped (a one-cell stub
    /// for every silent column is ugly), but their marker still draws.
    fn draw_columns<D>(&self, target: &mut D, heights: &[u8], dropoffs: &[f32]) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb888>,
    {
        let bar_style = PrimitiveStyle::with_fill(BAR_COLOR);
        let rows = self.height as i32;

        for (x, (&h, &d)) in heights.iter().zip(dropoffs).enumerate() {
            let h = h as i32;
            if h > 0 {
                Rectangle::new(Point::new(x as i32, rows - h), Size::new(1, h as u32))
                    .into_styled(bar_style)
                    .draw(target)?;
            }

            let marker_y = rows - 1 - (d.floor() as i32).clamp(0, rows - 1);
            Pixel(Point::new(x as i32, marker_y), DROPOFF_COLOR).draw(target)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn composer(mode: ComposeMode) -> MatrixComposer {
        MatrixComposer::new(4, 16, mode)
    }

    #[test]
    fn heights_floor_and_clamp() {
        let c = composer(ComposeMode::Bar);
        let frame = c.compose(&[0.0, 0.49, 0.5, 1.0], &[0.0; 4]);
        // 0.49 * 16 = 7.84 -> 7; 1.0 * 16 = 16 clamps to 15
        assert_eq!(frame.heights(), &[0, 7, 8, 15]);
        assert!(frame.grid().is_none());
    }

    #[test]
    fn heights_fill_a_byte_on_the_tallest_valid_matrix() {
        // 256 rows is the tallest height validation accepts; a full-scale
        // column must land on 255 exactly, not wrap
        let c = MatrixComposer::new(1, 256, ComposeMode::Bar);
        let frame = c.compose(&[1.0], &[0.0]);
        assert_eq!(frame.heights(), &[255]);
    }

    #[test]
    fn grid_mode_draws_bar_from_bottom() {
        let c = composer(ComposeMode::Grid);
        let frame = c.compose(&[0.5, 0.0, 0.0, 0.0], &[15.0, 0.0, 0.0, 0.0]);
        let grid = frame.grid().expect("grid mode materializes cells");

        // column 0: 8 cells lit from the bottom (rows 8..16), marker on top row
        assert_eq!(grid.cell(0, 15), BAR_COLOR);
        assert_eq!(grid.cell(0, 8), BAR_COLOR);
        assert_eq!(grid.cell(0, 7), BG_COLOR);
        assert_eq!(grid.cell(0, 0), DROPOFF_COLOR);
    }

    #[test]
    fn empty_column_still_draws_its_marker() {
        let c = composer(ComposeMode::Grid);
        let frame = c.compose(&[0.0; 4], &[3.0, 0.0, 0.0, 0.0]);
        let grid = frame.grid().unwrap();

        // no bar cells anywhere in column 0 except the marker
        assert_eq!(grid.cell(0, 12), DROPOFF_COLOR);
        for y in (0..16).filter(|&y| y != 12) {
            assert_eq!(grid.cell(0, y), BG_COLOR, "y = {y}");
        }
    }

    #[test]
    fn marker_overwrites_bar_cell() {
        let c = composer(ComposeMode::Grid);
        // full bar and marker inside it
        let frame = c.compose(&[0.99, 0.0, 0.0, 0.0], &[5.0, 0.0, 0.0, 0.0]);
        let grid = frame.grid().unwrap();
        assert_eq!(grid.cell(0, 10), DROPOFF_COLOR);
        assert_eq!(grid.cell(0, 9), BAR_COLOR);
        assert_eq!(grid.cell(0, 11), BAR_COLOR);
    }
}
