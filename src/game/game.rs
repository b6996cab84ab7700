use tracing::{debug, info};

use crate::game::board::Board;
use crate::game::error::MoveError;
use crate::game::movement::Move;
use crate::game::piece::Color;
use crate::game::position::Position;
use crate::game::rules::{MateDetection, Rules};

/// Check state of the side to move, for the shell to show notices.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameStatus {
    Ongoing,
    Check(Color),
    Checkmate(Color),
}

/// Turn order, square selection and check detection over a [`Board`].
#[derive(Clone, Debug)]
pub struct Game {
    board: Board,
    current_turn: Color,
    selected_square: Option<Position>,
    rules: Rules,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    pub fn new() -> Self {
        Self::with_rules(Rules::default())
    }

    pub fn with_rules(rules: Rules) -> Self {
        Game {
            board: Board::new(),
            current_turn: Color::White,
            selected_square: None,
            rules,
        }
    }

    /// Starts a game from an arbitrary board, `to_move` playing first.
    pub fn from_board(board: Board, to_move: Color, rules: Rules) -> Self {
        Game {
            board,
            current_turn: to_move,
            selected_square: None,
            rules,
        }
    }

    pub fn reset(&mut self) {
        info!("resetting game");
        self.board = Board::new();
        self.current_turn = Color::White;
        self.selected_square = None;
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn rules(&self) -> Rules {
        self.rules
    }

    pub fn current_player(&self) -> Color {
        self.current_turn
    }

    pub fn is_selected(&self) -> bool {
        self.selected_square.is_some()
    }

    pub fn selected(&self) -> Option<Position> {
        self.selected_square
    }

    pub fn clear_selection(&mut self) {
        self.selected_square = None;
    }

    /// Feeds one square selection into the select-then-move workflow.
    ///
    /// With nothing selected, a square holding a piece of the side to move
    /// becomes the selection. With a selection, a move to `pos` is attempted
    /// and the selection is cleared whatever the outcome. Returns whether a
    /// move was made.
    pub fn select_square(&mut self, pos: Position) -> bool {
        if !pos.is_on_board() {
            return false;
        }

        match self.selected_square.take() {
            None => {
                if self.board.is_occupied_by(pos, self.current_turn) {
                    debug!(square = %pos, "selected");
                    self.selected_square = Some(pos);
                }
                false
            }
            Some(from) => self.make_move(from, pos),
        }
    }

    /// [`Game::try_move`], reduced to whether the move happened.
    pub fn make_move(&mut self, start: Position, end: Position) -> bool {
        match self.try_move(start, end) {
            Ok(_) => true,
            Err(err) => {
                debug!(%err, "move rejected");
                false
            }
        }
    }

    /// Moves a piece of the side to move and passes the turn.
    pub fn try_move(&mut self, start: Position, end: Position) -> Result<Move, MoveError> {
        if !start.is_on_board() {
            return Err(MoveError::OffBoard(start));
        }
        if !end.is_on_board() {
            return Err(MoveError::OffBoard(end));
        }

        let piece = *self.board.get(start).ok_or(MoveError::EmptySquare(start))?;
        if piece.color != self.current_turn {
            return Err(MoveError::WrongTurn {
                from: start,
                to_move: self.current_turn,
                found: piece.color,
            });
        }
        if !piece.is_valid_move(end, &self.board) {
            return Err(MoveError::IllegalMove {
                kind: piece.piece_type,
                from: start,
                to: end,
            });
        }
        if self.rules.king_safety && self.would_be_in_check_after(piece.color, start, end) {
            return Err(MoveError::LeavesKingInCheck {
                color: piece.color,
                from: start,
                to: end,
            });
        }

        let captured = self.board.relocate(start, end)?;
        self.current_turn = self.current_turn.opposite();
        debug!(from = %start, to = %end, ?captured, "moved {:?}", piece.piece_type);
        Ok(Move::new(start, end, captured))
    }

    /// Whether any opposing piece could move onto `color`'s king.
    ///
    /// # Panics
    ///
    /// Panics if `color` has no king on the board.
    pub fn is_in_check(&self, color: Color) -> bool {
        is_in_check_on(&self.board, color)
    }

    pub fn is_checkmate(&self, color: Color) -> bool {
        if !self.is_in_check(color) {
            return false;
        }

        let mate = match self.rules.mate_detection {
            MateDetection::KingSteps => !self.king_can_step_out(color),
            MateDetection::Full => !self.any_move_escapes(color),
        };
        debug!(%color, mate, "checkmate test");
        mate
    }

    /// Pseudo-legal destinations for the piece on `pos`, empty if there is none.
    pub fn legal_moves_for(&self, pos: Position) -> Vec<Position> {
        if !pos.is_on_board() {
            return Vec::new();
        }
        self.board
            .get(pos)
            .map(|piece| piece.candidate_moves(&self.board))
            .unwrap_or_default()
    }

    pub fn status(&self) -> GameStatus {
        let color = self.current_turn;
        if !self.is_in_check(color) {
            GameStatus::Ongoing
        } else if self.is_checkmate(color) {
            GameStatus::Checkmate(color)
        } else {
            GameStatus::Check(color)
        }
    }

    fn king_can_step_out(&self, color: Color) -> bool {
        let king_pos = king_position(&self.board, color);
        let Some(king) = self.board.get(king_pos).copied() else {
            return false;
        };

        for d_row in -1..=1 {
            for d_col in -1..=1 {
                if d_row == 0 && d_col == 0 {
                    continue;
                }
                let step = king_pos.offset(d_row, d_col);
                if step.is_on_board()
                    && king.is_valid_move(step, &self.board)
                    && !self.would_be_in_check_after(color, king_pos, step)
                {
                    return true;
                }
            }
        }
        false
    }

    fn any_move_escapes(&self, color: Color) -> bool {
        self.board
            .pieces()
            .filter(|p| p.color == color)
            .any(|piece| {
                piece
                    .candidate_moves(&self.board)
                    .into_iter()
                    .any(|to| !self.would_be_in_check_after(color, piece.position, to))
            })
    }

    /// Plays `from` -> `to` on a scratch copy of the board, without any
    /// legality check, and tests whether `color` is then in check.
    fn would_be_in_check_after(&self, color: Color, from: Position, to: Position) -> bool {
        let mut scratch = self.board.clone();
        let piece = scratch.set(from, None);
        scratch.set(to, piece);
        is_in_check_on(&scratch, color)
    }
}

fn king_position(board: &Board, color: Color) -> Position {
    board
        .find_king(color)
        .unwrap_or_else(|| panic!("no {color} king on the board"))
}

fn is_in_check_on(board: &Board, color: Color) -> bool {
    let king_pos = king_position(board, color);
    board
        .pieces()
        .filter(|p| p.color != color)
        .any(|p| p.is_valid_move(king_pos, board))
}
