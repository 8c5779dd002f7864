//! Value-to-color render transform
//!
//! Free cells are painted on a four-band hue ramp (red, yellow, green, cyan,
//! blue) from the highest value to the lowest; walls are black.

use ndarray::{Array2, Zip};

use crate::error::{MazeError, Result};
use crate::grid::Grid;
use crate::types::{Cell, StateValueTable};

/// 8-bit RGB triple
pub type Rgb = [u8; 3];

/// Lowercase `rrggbb` hex string
pub fn to_hex(rgb: Rgb) -> String {
    format!("{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2])
}

/// Color of one band at hue position `x`
fn band(index: usize, x: f64) -> [f64; 3] {
    match index {
        0 => [1.0, x, 0.0],
        1 => [x, 1.0, 0.0],
        2 => [0.0, 1.0, x],
        _ => [0.0, x, 1.0],
    }
}

fn to_channel(value: f64) -> u8 {
    (value * 255.0).clamp(0.0, 255.0) as u8
}

impl Grid {
    /// Colors for every cell, row-major
    ///
    /// Without a value table free cells are white. With one, wall values are
    /// treated as zero when taking the table's range, and a table whose
    /// values are all equal leaves the free cells white.
    pub fn render_colors(&self, values: Option<&StateValueTable>) -> Result<Array2<Rgb>> {
        let mut colors = self.cells().map(|cell| match cell {
            Cell::Free => [1.0_f64; 3],
            Cell::Wall => [0.0_f64; 3],
        });

        if let Some(values) = values {
            if values.dim() != self.shape() {
                return Err(MazeError::ShapeMismatch {
                    expected: vec![self.rows(), self.cols()],
                    actual: values.shape().to_vec(),
                });
            }

            let masked = Zip::from(values)
                .and(self.cells())
                .map_collect(|&v, cell| if *cell == Cell::Wall { 0.0 } else { v });
            let max = masked.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let min = masked.iter().copied().fold(f64::INFINITY, f64::min);

            Zip::from(&mut colors)
                .and(&masked)
                .and(self.cells())
                .for_each(|color, &v, cell| {
                    if *cell == Cell::Wall {
                        return;
                    }
                    let h = (max - v) / (max - min) * 4.0;
                    let x = 1.0 - ((h % 2.0) - 1.0).abs();
                    // Later bands win where two bands meet
                    for i in 0..4 {
                        let lo = i as f64;
                        if lo <= h && h <= lo + 1.0 {
                            *color = band(i, x);
                        }
                    }
                });
        }

        Ok(colors.map(|c| [to_channel(c[0]), to_channel(c[1]), to_channel(c[2])]))
    }
}
