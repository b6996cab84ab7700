use crate::game::error::MoveError;
use crate::game::piece::{Color, Piece, PieceType};
use crate::game::position::Position;

pub type Grid = [[Option<Piece>; 8]; 8];

const BACK_RANK: [PieceType; 8] = [
    PieceType::Rook,
    PieceType::Knight,
    PieceType::Bishop,
    PieceType::Queen,
    PieceType::King,
    PieceType::Bishop,
    PieceType::Knight,
    PieceType::Rook,
];

/// Owns the 8x8 grid. Placement goes through [`Board::set`] so every piece's
/// stored position matches the cell holding it.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Board {
    squares: Grid,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// A board in the standard starting position.
    pub fn new() -> Self {
        let mut board = Board::empty();
        board.setup();
        board
    }

    pub fn empty() -> Self {
        Board {
            squares: [[None; 8]; 8],
        }
    }

    /// Overwrites the whole grid with the starting position.
    pub fn setup(&mut self) {
        self.squares = [[None; 8]; 8];

        for color in [Color::White, Color::Black] {
            let back_row = color.back_row();
            let pawn_row = color.pawn_start_row();
            for (col, &piece_type) in (0i8..).zip(BACK_RANK.iter()) {
                let back = Position::new(back_row, col);
                let front = Position::new(pawn_row, col);
                self.set(back, Some(Piece::new(piece_type, color, back)));
                self.set(front, Some(Piece::new(PieceType::Pawn, color, front)));
            }
        }
    }

    /// # Panics
    ///
    /// Panics if `pos` is off the board; callers check [`Position::is_on_board`] first.
    pub fn get(&self, pos: Position) -> Option<&Piece> {
        let (row, col) = pos.index();
        self.squares[row][col].as_ref()
    }

    /// Raw placement with no legality check. Returns whatever was on the square.
    pub fn set(&mut self, pos: Position, piece: Option<Piece>) -> Option<Piece> {
        let (row, col) = pos.index();
        let piece = piece.map(|mut p| {
            p.position = pos;
            p
        });
        std::mem::replace(&mut self.squares[row][col], piece)
    }

    pub fn is_occupied_by(&self, pos: Position, color: Color) -> bool {
        self.get(pos).is_some_and(|p| p.color == color)
    }

    /// Moves the piece on `from` to `to` if its movement rules allow it,
    /// returning the captured piece. A rejected request leaves the grid as it was.
    pub fn relocate(&mut self, from: Position, to: Position) -> Result<Option<Piece>, MoveError> {
        if !from.is_on_board() {
            return Err(MoveError::OffBoard(from));
        }
        if !to.is_on_board() {
            return Err(MoveError::OffBoard(to));
        }

        let piece = *self.get(from).ok_or(MoveError::EmptySquare(from))?;
        if !piece.is_valid_move(to, self) {
            return Err(MoveError::IllegalMove {
                kind: piece.piece_type,
                from,
                to,
            });
        }

        self.set(from, None);
        Ok(self.set(to, Some(piece)))
    }

    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.squares.iter().flatten().flatten()
    }

    pub fn find_king(&self, color: Color) -> Option<Position> {
        self.pieces()
            .find(|p| p.piece_type == PieceType::King && p.color == color)
            .map(|p| p.position)
    }
}
