use crate::game::board::Board;
use crate::game::piece::{Color, Piece, PieceType};
use crate::game::position::Position;

const ROOK_DIRECTIONS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (-1, -1), (1, -1), (-1, 1)];
const QUEEN_DIRECTIONS: [(i8, i8); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (-1, -1),
    (1, -1),
    (-1, 1),
];
const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (2, 1),
    (2, -1),
    (-2, 1),
    (-2, -1),
    (1, 2),
    (-1, 2),
    (1, -2),
    (-1, -2),
];

/// A completed move, as reported back to the caller.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Move {
    pub from: Position,
    pub to: Position,
    pub captured: Option<Piece>,
}

impl Move {
    pub fn new(from: Position, to: Position, captured: Option<Piece>) -> Self {
        Move { from, to, captured }
    }
}

impl Piece {
    /// Pseudo-legal check: geometry, path obstruction and destination only.
    /// Whether the move exposes this side's own king is not considered.
    /// A piece that is not standing on the board has no valid moves.
    pub fn is_valid_move(&self, target: Position, board: &Board) -> bool {
        if !self.position.is_on_board() || !target.is_on_board() || target == self.position {
            return false;
        }

        // never onto a piece of the same color
        if let Some(dest) = board.get(target) {
            if dest.color == self.color {
                return false;
            }
        }

        let from = self.position;
        match self.piece_type {
            PieceType::Pawn => validate_pawn_move(board, from, target, self.color),
            PieceType::Rook => validate_rook_move(board, from, target),
            PieceType::Knight => validate_knight_move(from, target),
            PieceType::Bishop => validate_bishop_move(board, from, target),
            PieceType::Queen => validate_queen_move(board, from, target),
            PieceType::King => validate_king_move(from, target),
        }
    }

    /// Every pseudo-legal destination, in a stable order used for highlighting.
    pub fn candidate_moves(&self, board: &Board) -> Vec<Position> {
        let mut moves = Vec::new();
        match self.piece_type {
            PieceType::Pawn => self.add_pawn_moves(board, &mut moves),
            PieceType::Rook => self.add_line_moves(board, &ROOK_DIRECTIONS, &mut moves),
            PieceType::Knight => self.add_single_moves(board, &KNIGHT_OFFSETS, &mut moves),
            PieceType::Bishop => self.add_line_moves(board, &BISHOP_DIRECTIONS, &mut moves),
            PieceType::Queen => self.add_line_moves(board, &QUEEN_DIRECTIONS, &mut moves),
            PieceType::King => self.add_single_moves(board, &QUEEN_DIRECTIONS, &mut moves),
        }
        moves
    }

    fn add_line_moves(&self, board: &Board, directions: &[(i8, i8)], moves: &mut Vec<Position>) {
        for &(d_row, d_col) in directions {
            let mut current = self.position.offset(d_row, d_col);
            while current.is_on_board() {
                match board.get(current) {
                    None => moves.push(current),
                    Some(other) => {
                        if other.color != self.color {
                            moves.push(current);
                        }
                        break;
                    }
                }
                current = current.offset(d_row, d_col);
            }
        }
    }

    fn add_single_moves(&self, board: &Board, offsets: &[(i8, i8)], moves: &mut Vec<Position>) {
        for &(d_row, d_col) in offsets {
            let target = self.position.offset(d_row, d_col);
            if target.is_on_board() && !board.is_occupied_by(target, self.color) {
                moves.push(target);
            }
        }
    }

    fn add_pawn_moves(&self, board: &Board, moves: &mut Vec<Position>) {
        let direction = self.color.pawn_direction();
        let step = self.position.offset(direction, 0);
        if step.is_on_board() && board.get(step).is_none() {
            moves.push(step);
        }

        if self.position.row == self.color.pawn_start_row() {
            let double = self.position.offset(2 * direction, 0);
            if double.is_on_board() && board.get(double).is_none() && board.get(step).is_none() {
                moves.push(double);
            }
        }

        for d_col in [-1, 1] {
            let capture = self.position.offset(direction, d_col);
            if capture.is_on_board() && board.is_occupied_by(capture, self.color.opposite()) {
                moves.push(capture);
            }
        }
    }
}

fn validate_pawn_move(board: &Board, from: Position, to: Position, color: Color) -> bool {
    let direction = color.pawn_direction();
    let row_diff = to.row - from.row;
    let col_diff = to.col - from.col;

    if col_diff == 0 {
        // move forward
        if row_diff == direction && board.get(to).is_none() {
            return true;
        }
        // double move from starting position only
        if from.row == color.pawn_start_row()
            && row_diff == 2 * direction
            && board.get(to).is_none()
            && board.get(from.offset(direction, 0)).is_none()
        {
            return true;
        }
        false
    } else if col_diff.abs() == 1 && row_diff == direction {
        // captures on the diagonals, the destination color was already checked
        board.get(to).is_some()
    } else {
        false
    }
}

fn validate_rook_move(board: &Board, from: Position, to: Position) -> bool {
    // horizontally or vertically but not diagonally
    if from.row != to.row && from.col != to.col {
        return false;
    }
    path_is_clear(board, from, to)
}

fn validate_knight_move(from: Position, to: Position) -> bool {
    let row_diff = (to.row - from.row).abs();
    let col_diff = (to.col - from.col).abs();

    (row_diff == 2 && col_diff == 1) || (row_diff == 1 && col_diff == 2)
}

fn validate_bishop_move(board: &Board, from: Position, to: Position) -> bool {
    let row_diff = (to.row - from.row).abs();
    let col_diff = (to.col - from.col).abs();

    if row_diff != col_diff {
        return false;
    }
    path_is_clear(board, from, to)
}

fn validate_queen_move(board: &Board, from: Position, to: Position) -> bool {
    validate_rook_move(board, from, to) || validate_bishop_move(board, from, to)
}

fn validate_king_move(from: Position, to: Position) -> bool {
    let row_diff = (to.row - from.row).abs();
    let col_diff = (to.col - from.col).abs();

    row_diff <= 1 && col_diff <= 1
}

/// Every square strictly between `from` and `to` is empty. Both must share a
/// row, column or diagonal.
fn path_is_clear(board: &Board, from: Position, to: Position) -> bool {
    let row_step = (to.row - from.row).signum();
    let col_step = (to.col - from.col).signum();

    let mut current = from.offset(row_step, col_step);
    while current != to {
        if board.get(current).is_some() {
            return false;
        }
        current = current.offset(row_step, col_step);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(board: &mut Board, kind: PieceType, color: Color, row: i8, col: i8) -> Piece {
        let at = Position::new(row, col);
        board.set(at, Some(Piece::new(kind, color, at)));
        *board.get(at).unwrap()
    }

    #[test]
    fn pawn_single_and_double_step() {
        let mut board = Board::empty();
        let pawn = place(&mut board, PieceType::Pawn, Color::White, 6, 4);

        assert!(pawn.is_valid_move(Position::new(5, 4), &board));
        assert!(pawn.is_valid_move(Position::new(4, 4), &board));
        assert!(!pawn.is_valid_move(Position::new(3, 4), &board));
        assert!(!pawn.is_valid_move(Position::new(7, 4), &board));
        assert!(!pawn.is_valid_move(Position::new(5, 5), &board));
    }

    #[test]
    fn pawn_double_step_needs_both_cells_empty() {
        let mut board = Board::empty();
        let pawn = place(&mut board, PieceType::Pawn, Color::White, 6, 4);
        place(&mut board, PieceType::Knight, Color::Black, 5, 4);
        assert!(!pawn.is_valid_move(Position::new(4, 4), &board));

        let mut board = Board::empty();
        let pawn = place(&mut board, PieceType::Pawn, Color::White, 6, 4);
        place(&mut board, PieceType::Knight, Color::Black, 4, 4);
        assert!(!pawn.is_valid_move(Position::new(4, 4), &board));
        assert!(pawn.is_valid_move(Position::new(5, 4), &board));
    }

    #[test]
    fn pawn_double_step_only_from_start_row() {
        let mut board = Board::empty();
        let pawn = place(&mut board, PieceType::Pawn, Color::Black, 2, 0);
        assert!(pawn.is_valid_move(Position::new(3, 0), &board));
        assert!(!pawn.is_valid_move(Position::new(4, 0), &board));
    }

    #[test]
    fn pawn_captures_diagonally_only_opposing_pieces() {
        let mut board = Board::empty();
        let pawn = place(&mut board, PieceType::Pawn, Color::Black, 3, 3);
        place(&mut board, PieceType::Rook, Color::White, 4, 4);
        place(&mut board, PieceType::Rook, Color::Black, 4, 2);
        place(&mut board, PieceType::Rook, Color::White, 4, 3);

        assert!(pawn.is_valid_move(Position::new(4, 4), &board));
        assert!(!pawn.is_valid_move(Position::new(4, 2), &board));
        // blocked straight ahead, and forward is never a capture
        assert!(!pawn.is_valid_move(Position::new(4, 3), &board));
        // backwards diagonal
        assert!(!pawn.is_valid_move(Position::new(2, 4), &board));
    }

    #[test]
    fn rook_stops_at_first_occupied_square() {
        let mut board = Board::empty();
        let rook = place(&mut board, PieceType::Rook, Color::White, 7, 0);
        place(&mut board, PieceType::Bishop, Color::White, 7, 3);

        assert!(rook.is_valid_move(Position::new(7, 1), &board));
        assert!(rook.is_valid_move(Position::new(7, 2), &board));
        assert!(!rook.is_valid_move(Position::new(7, 3), &board));
        assert!(!rook.is_valid_move(Position::new(7, 4), &board));
        assert!(rook.is_valid_move(Position::new(0, 0), &board));
        assert!(!rook.is_valid_move(Position::new(6, 1), &board));
    }

    #[test]
    fn bishop_moves_diagonally_and_captures() {
        let mut board = Board::empty();
        let bishop = place(&mut board, PieceType::Bishop, Color::Black, 0, 2);
        place(&mut board, PieceType::Pawn, Color::White, 3, 5);

        assert!(bishop.is_valid_move(Position::new(2, 4), &board));
        assert!(bishop.is_valid_move(Position::new(3, 5), &board));
        assert!(!bishop.is_valid_move(Position::new(4, 6), &board));
        assert!(!bishop.is_valid_move(Position::new(2, 2), &board));
    }

    #[test]
    fn queen_combines_rook_and_bishop() {
        let mut board = Board::empty();
        let queen = place(&mut board, PieceType::Queen, Color::White, 4, 4);

        assert!(queen.is_valid_move(Position::new(4, 0), &board));
        assert!(queen.is_valid_move(Position::new(0, 4), &board));
        assert!(queen.is_valid_move(Position::new(7, 7), &board));
        assert!(queen.is_valid_move(Position::new(1, 7), &board));
        assert!(!queen.is_valid_move(Position::new(2, 5), &board));
    }

    #[test]
    fn knight_jumps_over_pieces() {
        let board = Board::new();
        let knight = *board.get(Position::new(7, 1)).unwrap();

        assert!(knight.is_valid_move(Position::new(5, 0), &board));
        assert!(knight.is_valid_move(Position::new(5, 2), &board));
        // own pawn
        assert!(!knight.is_valid_move(Position::new(6, 3), &board));
        assert!(!knight.is_valid_move(Position::new(4, 1), &board));
    }

    #[test]
    fn king_steps_one_square() {
        let mut board = Board::empty();
        let king = place(&mut board, PieceType::King, Color::Black, 0, 4);
        place(&mut board, PieceType::Pawn, Color::Black, 1, 4);

        assert!(king.is_valid_move(Position::new(0, 3), &board));
        assert!(king.is_valid_move(Position::new(1, 5), &board));
        assert!(!king.is_valid_move(Position::new(1, 4), &board));
        assert!(!king.is_valid_move(Position::new(0, 6), &board));
        assert!(!king.is_valid_move(Position::new(0, 4), &board));
        assert!(!king.is_valid_move(Position::new(-1, 4), &board));
    }

    #[test]
    fn piece_off_the_board_has_no_moves() {
        let board = Board::empty();
        let stray = Piece::new(PieceType::Rook, Color::White, Position::new(-1, 0));
        assert!(!stray.is_valid_move(Position::new(3, 0), &board));
        assert!(!stray.is_valid_move(Position::new(0, 0), &board));
    }

    #[test]
    fn candidates_in_initial_position() {
        let board = Board::new();
        let pawn = *board.get(Position::new(6, 4)).unwrap();
        assert_eq!(
            pawn.candidate_moves(&board),
            vec![Position::new(5, 4), Position::new(4, 4)]
        );

        let knight = *board.get(Position::new(0, 6)).unwrap();
        assert_eq!(
            knight.candidate_moves(&board),
            vec![Position::new(2, 7), Position::new(2, 5)]
        );

        for col in [0, 2, 3, 4] {
            let piece = *board.get(Position::new(7, col)).unwrap();
            assert!(piece.candidate_moves(&board).is_empty(), "{piece:?}");
        }
    }

    #[test]
    fn line_candidates_include_capture_and_stop() {
        let mut board = Board::empty();
        let rook = place(&mut board, PieceType::Rook, Color::White, 7, 0);
        place(&mut board, PieceType::Pawn, Color::Black, 5, 0);
        place(&mut board, PieceType::Pawn, Color::White, 7, 2);

        assert_eq!(
            rook.candidate_moves(&board),
            vec![Position::new(6, 0), Position::new(5, 0), Position::new(7, 1)]
        );
    }

    #[test]
    fn candidates_agree_with_predicate() {
        let mut board = Board::new();
        place(&mut board, PieceType::Queen, Color::White, 4, 3);
        place(&mut board, PieceType::Knight, Color::Black, 3, 5);
        place(&mut board, PieceType::Pawn, Color::White, 2, 2);
        place(&mut board, PieceType::King, Color::Black, 3, 1);

        for from in Position::all() {
            let Some(piece) = board.get(from).copied() else {
                continue;
            };
            let candidates = piece.candidate_moves(&board);
            for to in Position::all() {
                assert_eq!(
                    candidates.contains(&to),
                    piece.is_valid_move(to, &board),
                    "{piece:?} to {to}"
                );
            }
        }
    }
}
