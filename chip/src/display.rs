//! The monochrome framebuffer of the chip.
use crate::definitions::display::{self, palette};

/// The pixel grid, indexed as `grid[y][x]`. Each entry is a palette index.
pub type Grid = [[u8; display::WIDTH]; display::HEIGHT];

/// The graphics of the Chip 8 are black and white and the screen has a total of `2048` pixels
/// `(64 x 32)`. Each pixel stores a palette index, the renderer maps those to colors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Display {
    grid: Box<Grid>,
    /// The palette index written for lit pixels
    foreground: u8,
}

impl Default for Display {
    fn default() -> Self {
        Self::new(palette::FOREGROUND)
    }
}

impl Display {
    pub fn new(foreground: u8) -> Self {
        Self {
            grid: Box::new([[palette::BACKGROUND; display::WIDTH]; display::HEIGHT]),
            foreground,
        }
    }

    /// Will reset all pixels to the background.
    pub fn clear(&mut self) {
        for row in self.grid.iter_mut() {
            row.fill(palette::BACKGROUND);
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.grid[y][x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: u8) {
        self.grid[y][x] = value;
    }

    #[inline]
    pub fn is_lit(&self, x: usize, y: usize) -> bool {
        self.grid[y][x] != palette::BACKGROUND
    }

    /// Will plot the sprite with its top left corner at `(x, y)`.
    ///
    /// The start coordinates wrap around the screen, the sprite itself does not. Columns past
    /// the right edge and rows past the bottom edge are clipped. Every set sprite bit flips the
    /// pixel below it.
    ///
    /// Returns `true` if a lit pixel was turned off.
    pub fn draw_sprite(&mut self, x: usize, y: usize, sprite: &[u8]) -> bool {
        const BYTE: usize = 8;

        let coorx = x % display::WIDTH;
        let coory = y % display::HEIGHT;
        let mut collision = false;

        for (i, &row) in sprite.iter().enumerate() {
            let y = coory + i;
            if y >= display::HEIGHT {
                break;
            }

            // most significant bit first
            for (m, j) in (0..BYTE).rev().zip(0..BYTE) {
                let x = coorx + j;
                if x >= display::WIDTH {
                    break;
                }

                if (row >> m) & 1 == 0 {
                    continue;
                }

                if self.is_lit(x, y) {
                    self.grid[y][x] = palette::BACKGROUND;
                    collision = true;
                } else {
                    self.grid[y][x] = self.foreground;
                }
            }
        }
        collision
    }

    /// A read only snapshot of the pixels for the renderer.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Will return the amount of rows a sprite starting at `y` can draw before it is clipped.
    pub fn visible_rows(y: usize, rows: usize) -> usize {
        rows.min(display::HEIGHT - y % display::HEIGHT)
    }
}
