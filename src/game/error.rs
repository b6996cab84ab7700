use thiserror::Error;

use crate::game::piece::{Color, PieceType};
use crate::game::position::Position;

/// Why a move request had no effect on the board.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    #[error("{0} is off the board")]
    OffBoard(Position),
    #[error("no piece on {0}")]
    EmptySquare(Position),
    #[error("it is {to_move}'s turn, the piece on {from} is {found}")]
    WrongTurn {
        from: Position,
        to_move: Color,
        found: Color,
    },
    #[error("{kind:?} on {from} cannot move to {to}")]
    IllegalMove {
        kind: PieceType,
        from: Position,
        to: Position,
    },
    #[error("moving {from} to {to} leaves the {color} king in check")]
    LeavesKingInCheck {
        color: Color,
        from: Position,
        to: Position,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("expected a square like `e2`, got `{0}`")]
pub struct ParsePositionError(pub String);
