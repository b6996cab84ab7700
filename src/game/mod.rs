//! The rule engine: board, piece movement, turn order and check detection.

pub mod board;
pub mod error;
#[allow(clippy::module_inception)]
pub mod game;
pub mod movement;
pub mod piece;
pub mod position;
pub mod rules;

pub use board::Board;
pub use error::{MoveError, ParsePositionError};
pub use game::{Game, GameStatus};
pub use movement::Move;
pub use piece::{Color, Piece, PieceType};
pub use position::Position;
pub use rules::{MateDetection, Rules};
