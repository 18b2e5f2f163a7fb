use tinyvec::TinyVec;

use crate::board::{is_valid_position, Board, Piece, Position, BOARD_SIZE};

/// A king in the open can see at most 13 squares, so moves stay inline.
pub type MoveList = TinyVec<[Position; 16]>;

/// Every square `piece` may move to this ply. The result is a set; callers
/// must not rely on its order. Neither input is mutated.
pub fn legal_moves(piece: &Piece, board: &Board) -> MoveList {
    let mut moves = MoveList::default();
    let forward = [piece.player.forward_row()];
    let row_directions: &[i8] = if piece.is_king { &[-1, 1] } else { &forward };

    for &row_direction in row_directions {
        for col_direction in [-1i8, 1] {
            if piece.is_king {
                king_ray_moves(piece, board, row_direction, col_direction, &mut moves);
            } else {
                man_moves(piece, board, row_direction, col_direction, &mut moves);
            }
        }
    }

    moves
}

/// Simple step and capture jump along one forward diagonal, evaluated
/// independently of each other. Off-board candidates are skipped.
fn man_moves(piece: &Piece, board: &Board, row_direction: i8, col_direction: i8, moves: &mut MoveList) {
    let step = Position {
        row: piece.position.row + row_direction,
        col: piece.position.col + col_direction,
    };
    if is_valid_position(step.row, step.col) && board.get_piece(step).is_none() {
        moves.push(step);
    }

    let jump = Position {
        row: piece.position.row + row_direction * 2,
        col: piece.position.col + col_direction * 2,
    };
    if is_valid_position(jump.row, jump.col) && board.get_piece(jump).is_none() {
        if let Some(between) = board.get_piece(step) {
            if between.player != piece.player {
                moves.push(jump);
            }
        }
    }
}

/// March outward along one diagonal. Empty squares accumulate as
/// destinations; the first occupied square ends the ray, yielding the square
/// beyond it as a capture when it holds an opponent and the landing square is
/// open. Own pieces are never jumped.
fn king_ray_moves(piece: &Piece, board: &Board, row_direction: i8, col_direction: i8, moves: &mut MoveList) {
    for distance in 1..BOARD_SIZE {
        let target = Position {
            row: piece.position.row + row_direction * distance,
            col: piece.position.col + col_direction * distance,
        };
        if !is_valid_position(target.row, target.col) {
            break;
        }

        match board.get_piece(target) {
            None => moves.push(target),
            Some(blocker) => {
                if blocker.player != piece.player {
                    let landing = Position {
                        row: target.row + row_direction,
                        col: target.col + col_direction,
                    };
                    if is_valid_position(landing.row, landing.col) && board.get_piece(landing).is_none() {
                        moves.push(landing);
                    }
                }
                break;
            }
        }
    }
}
