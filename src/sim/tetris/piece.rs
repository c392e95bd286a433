//! Tetromino shapes and rotation

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::renderer::surface::{Color, rgb};

/// The seven tetromino kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tetromino {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
}

impl Tetromino {
    pub const ALL: [Tetromino; 7] = [
        Tetromino::I,
        Tetromino::J,
        Tetromino::L,
        Tetromino::O,
        Tetromino::S,
        Tetromino::T,
        Tetromino::Z,
    ];

    pub fn color(self) -> Color {
        match self {
            Tetromino::I => rgb(0x00f0f0),
            Tetromino::J => rgb(0x0000f0),
            Tetromino::L => rgb(0xf0a000),
            Tetromino::O => rgb(0xf0f000),
            Tetromino::S => rgb(0x00f000),
            Tetromino::T => rgb(0xa000f0),
            Tetromino::Z => rgb(0xf00000),
        }
    }

    /// Spawn orientation, padded to a square matrix
    fn rows(self) -> &'static [&'static [u8]] {
        match self {
            Tetromino::I => &[&[0, 0, 0, 0], &[1, 1, 1, 1], &[0, 0, 0, 0], &[0, 0, 0, 0]],
            Tetromino::J => &[&[1, 0, 0], &[1, 1, 1], &[0, 0, 0]],
            Tetromino::L => &[&[0, 0, 1], &[1, 1, 1], &[0, 0, 0]],
            Tetromino::O => &[&[1, 1], &[1, 1]],
            Tetromino::S => &[&[0, 1, 1], &[1, 1, 0], &[0, 0, 0]],
            Tetromino::T => &[&[0, 1, 0], &[1, 1, 1], &[0, 0, 0]],
            Tetromino::Z => &[&[1, 1, 0], &[0, 1, 1], &[0, 0, 0]],
        }
    }

    /// Uniform pick over the seven kinds
    pub fn random(rng: &mut impl Rng) -> Tetromino {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// A tetromino in some orientation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    pub kind: Tetromino,
    /// Square bit-matrix, row-major
    pub shape: Vec<Vec<bool>>,
}

impl Piece {
    pub fn new(kind: Tetromino) -> Self {
        let shape = kind
            .rows()
            .iter()
            .map(|row| row.iter().map(|&c| c != 0).collect())
            .collect();
        Self { kind, shape }
    }

    pub fn width(&self) -> usize {
        self.shape.first().map_or(0, Vec::len)
    }

    /// Offsets `(dx, dy)` of every filled cell
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, filled)| **filled)
                .map(move |(x, _)| (x as i32, y as i32))
        })
    }

    /// Quarter turn clockwise: transpose, then reverse each row
    pub fn rotated(&self) -> Piece {
        let n = self.shape.len();
        let mut shape = vec![vec![false; n]; n];
        for (y, row) in self.shape.iter().enumerate() {
            for (x, &filled) in row.iter().enumerate() {
                shape[x][y] = filled;
            }
        }
        for row in &mut shape {
            row.reverse();
        }
        Piece {
            kind: self.kind,
            shape,
        }
    }
}
