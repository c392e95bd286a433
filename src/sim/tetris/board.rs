//! Locked cells of the playfield

use super::piece::{Piece, Tetromino};

pub const BOARD_WIDTH: usize = 10;
pub const BOARD_HEIGHT: usize = 20;

pub type Row = [Option<Tetromino>; BOARD_WIDTH];

/// Board position of a piece's top-left matrix corner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Position {
        Position::new(self.x + dx, self.y + dy)
    }
}

/// Stamping would put a cell above the visible board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overflow;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// Top row first
    rows: Vec<Row>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub fn new() -> Self {
        Self {
            rows: vec![[None; BOARD_WIDTH]; BOARD_HEIGHT],
        }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn cell(&self, x: i32, y: i32) -> Option<Tetromino> {
        if x < 0 || y < 0 {
            return None;
        }
        self.rows
            .get(y as usize)
            .and_then(|row| row.get(x as usize))
            .copied()
            .flatten()
    }

    pub fn set(&mut self, x: usize, y: usize, kind: Option<Tetromino>) {
        self.rows[y][x] = kind;
    }

    /// Every filled cell inside the side walls and above the floor, on an
    /// empty cell. Rows above the board (y < 0) are open space.
    pub fn fits(&self, piece: &Piece, at: Position) -> bool {
        piece.cells().all(|(dx, dy)| {
            let x = at.x + dx;
            let y = at.y + dy;
            if x < 0 || x >= BOARD_WIDTH as i32 || y >= BOARD_HEIGHT as i32 {
                return false;
            }
            y < 0 || self.rows[y as usize][x as usize].is_none()
        })
    }

    /// Write the piece's cells into the board. Nothing is written if any
    /// cell lies above the top row.
    pub fn stamp(&mut self, piece: &Piece, at: Position) -> Result<(), Overflow> {
        if piece.cells().any(|(_, dy)| at.y + dy < 0) {
            return Err(Overflow);
        }
        for (dx, dy) in piece.cells() {
            let (x, y) = ((at.x + dx) as usize, (at.y + dy) as usize);
            if let Some(cell) = self.rows.get_mut(y).and_then(|row| row.get_mut(x)) {
                *cell = Some(piece.kind);
            }
        }
        Ok(())
    }

    pub fn is_row_full(row: &Row) -> bool {
        row.iter().all(Option::is_some)
    }

    /// Remove full rows, scanning bottom to top, and refill from the top.
    /// Returns the number of rows removed.
    pub fn clear_lines(&mut self) -> u32 {
        let mut cleared = 0;
        let mut y = self.rows.len();
        while y > 0 {
            if Self::is_row_full(&self.rows[y - 1]) {
                self.rows.remove(y - 1);
                self.rows.insert(0, [None; BOARD_WIDTH]);
                cleared += 1;
                // Re-check the same index, which now holds the row above
            } else {
                y -= 1;
            }
        }
        cleared
    }
}
