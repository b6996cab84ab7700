use std::fmt;
use std::str::FromStr;

use crate::game::error::ParsePositionError;

pub const BOARD_SIZE: i8 = 8;

/// A (row, column) coordinate on the board.
///
/// Row 0 is Black's back rank (`a8`..`h8`) and row 7 is White's (`a1`..`h1`).
/// Coordinates are signed so that candidate squares stepping off the edge can
/// be represented and then rejected with [`Position::is_on_board`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Position {
    pub row: i8,
    pub col: i8,
}

impl Position {
    pub const fn new(row: i8, col: i8) -> Self {
        Position { row, col }
    }

    pub const fn is_on_board(&self) -> bool {
        self.row >= 0 && self.row < BOARD_SIZE && self.col >= 0 && self.col < BOARD_SIZE
    }

    pub const fn offset(&self, d_row: i8, d_col: i8) -> Self {
        Position::new(self.row + d_row, self.col + d_col)
    }

    /// Grid indices for an on-board position.
    ///
    /// # Panics
    ///
    /// Panics if the position is off the board.
    pub fn index(&self) -> (usize, usize) {
        assert!(self.is_on_board(), "position {:?} is off the board", self);
        (self.row as usize, self.col as usize)
    }

    /// Every on-board square, row by row.
    pub fn all() -> impl Iterator<Item = Position> {
        (0..BOARD_SIZE).flat_map(|row| (0..BOARD_SIZE).map(move |col| Position::new(row, col)))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_on_board() {
            return write!(f, "({}, {})", self.row, self.col);
        }
        let file = (b'a' + self.col as u8) as char;
        let rank = BOARD_SIZE - self.row;
        write!(f, "{file}{rank}")
    }
}

impl FromStr for Position {
    type Err = ParsePositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParsePositionError(s.to_string());
        let mut chars = s.chars();
        let (Some(file), Some(rank), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(invalid());
        };

        let file = file.to_ascii_lowercase();
        let rank = rank.to_digit(10).ok_or_else(invalid)?;
        if !('a'..='h').contains(&file) || !(1..=8).contains(&rank) {
            return Err(invalid());
        }

        let col = (file as u8 - b'a') as i8;
        let row = BOARD_SIZE - rank as i8;
        Ok(Position::new(row, col))
    }
}
