use log::{debug, trace};

use crate::board::{Board, Piece, Player, Position, BOARD_SIZE};
use crate::move_generator::{legal_moves, MoveList};

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct GameState {
    pub board: Board,
    pub current_player: Player,
    pub selected_piece: Option<Piece>,
    /// Destinations of the selected piece; empty while nothing is selected.
    pub legal_moves: MoveList,
    pub game_over: bool,
    pub winner: Option<Player>,
}

impl GameState {
    pub fn new() -> GameState {
        GameState {
            board: Board::starting_position(),
            current_player: Player::One,
            selected_piece: None,
            legal_moves: MoveList::default(),
            game_over: false,
            winner: None,
        }
    }

    /// One click on `position`, producing the next state. Selection,
    /// deselection and move execution all route through here; clicks after
    /// the game has ended change nothing.
    pub fn apply_click(&self, position: Position) -> GameState {
        if self.game_over {
            trace!("click at {position:?} ignored, game is over");
            return self.clone();
        }

        if let Some(selected) = self.selected_piece {
            if self.legal_moves.contains(&position) {
                debug!(
                    "player {} moves piece {} from {:?} to {position:?}",
                    self.current_player, selected.id, selected.position
                );
                return self.apply_move(position);
            }

            // Any other click drops the selection. Deliberately does not
            // re-select a clicked friendly piece.
            trace!("click at {position:?} clears selection of piece {}", selected.id);
            return GameState {
                selected_piece: None,
                legal_moves: MoveList::default(),
                ..self.clone()
            };
        }

        match self.board.get_piece(position) {
            Some(piece) if piece.player == self.current_player => {
                let moves = legal_moves(&piece, &self.board);
                debug!(
                    "player {} selects piece {} at {position:?} with {} moves",
                    self.current_player,
                    piece.id,
                    moves.len()
                );
                GameState {
                    selected_piece: Some(piece),
                    legal_moves: moves,
                    ..self.clone()
                }
            }
            _ => self.clone(),
        }
    }

    /// Executes the selected piece's move to `target` and returns the next
    /// state: piece relocated (kinged on either back rank), at most one
    /// jumped piece removed, turn flipped, selection cleared, winner
    /// recomputed.
    ///
    /// Precondition: a piece is selected and `target` is one of its
    /// `legal_moves`. That is not re-checked here; calling this with
    /// anything else is outside the contract.
    pub fn apply_move(&self, target: Position) -> GameState {
        let piece = self
            .selected_piece
            .expect("apply_move called without a selected piece");

        let mut board = self.board.clone();
        board.write_piece(None, piece.position);

        let moved = Piece {
            position: target,
            is_king: piece.is_king || target.row == 0 || target.row == BOARD_SIZE - 1,
            ..piece
        };
        board.write_piece(Some(moved), target);
        if moved.is_king && !piece.is_king {
            debug!("piece {} promoted to king at {target:?}", piece.id);
        }

        // Spanning more than one row means a jump. Remove the first piece
        // found between origin and target; exactly one per move.
        if (target.row - piece.position.row).abs() > 1 {
            let row_step = (target.row - piece.position.row).signum();
            let col_step = (target.col - piece.position.col).signum();
            let mut current = Position {
                row: piece.position.row + row_step,
                col: piece.position.col + col_step,
            };

            while current != target {
                if board.get_piece(current).is_some() {
                    debug!("piece at {current:?} captured");
                    board.write_piece(None, current);
                    break;
                }
                current = Position {
                    row: current.row + row_step,
                    col: current.col + col_step,
                };
            }
        }

        let (game_over, winner) = game_result(&board);

        GameState {
            board,
            current_player: self.current_player.opponent(),
            selected_piece: None,
            legal_moves: MoveList::default(),
            game_over,
            winner,
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

/// The game ends as soon as either side runs out of pieces.
fn game_result(board: &Board) -> (bool, Option<Player>) {
    let (one, two) = board.piece_counts();

    if one == 0 {
        (true, Some(Player::Two))
    } else if two == 0 {
        (true, Some(Player::One))
    } else {
        (false, None)
    }
}

#[cfg(test)]
mod game_tests {
    use super::*;

    fn pos(row: i8, col: i8) -> Position {
        Position { row, col }
    }

    fn place(board: &mut Board, player: Player, is_king: bool, row: i8, col: i8) -> Piece {
        let piece = Piece {
            id: (row * BOARD_SIZE + col) as u8,
            player,
            is_king,
            position: pos(row, col),
        };
        board.write_piece(Some(piece), piece.position);

        piece
    }

    fn state_with_board(board: Board, current_player: Player) -> GameState {
        GameState {
            board,
            current_player,
            selected_piece: None,
            legal_moves: MoveList::default(),
            game_over: false,
            winner: None,
        }
    }

    #[test]
    pub fn new_game_starts_with_player_one_and_no_selection() {
        let state = GameState::new();

        assert_eq!(Player::One, state.current_player);
        assert_eq!(None, state.selected_piece);
        assert!(state.legal_moves.is_empty());
        assert!(!state.game_over);
        assert_eq!(None, state.winner);
        assert_eq!((12, 12), state.board.piece_counts());
    }

    #[test]
    pub fn clicking_an_own_piece_selects_it() {
        let state = GameState::new().apply_click(pos(2, 1));

        let selected = state.selected_piece.expect("piece should be selected");
        assert_eq!(pos(2, 1), selected.position);
        let mut moves: Vec<Position> = state.legal_moves.to_vec();
        moves.sort_by_key(|m| (m.row, m.col));
        assert_eq!(vec![pos(3, 0), pos(3, 2)], moves);
    }

    #[test]
    pub fn clicking_an_opponent_piece_or_empty_square_does_nothing() {
        let state = GameState::new();

        assert_eq!(state, state.apply_click(pos(5, 0)));
        assert_eq!(state, state.apply_click(pos(4, 1)));
    }

    #[test]
    pub fn clicking_outside_legal_moves_deselects_without_reselecting() {
        let selected = GameState::new().apply_click(pos(2, 1));

        // (2, 3) holds another of player one's pieces; it is still only a
        // deselect, the clicked piece does not become selected.
        let state = selected.apply_click(pos(2, 3));

        assert_eq!(None, state.selected_piece);
        assert!(state.legal_moves.is_empty());
        assert_eq!(Player::One, state.current_player);
        assert_eq!(GameState::new().board, state.board);
    }

    #[test]
    pub fn reclicking_the_selected_piece_deselects_it() {
        let selected = GameState::new().apply_click(pos(2, 1));

        let state = selected.apply_click(pos(2, 1));

        assert_eq!(None, state.selected_piece);
        assert!(state.legal_moves.is_empty());
    }

    #[test]
    pub fn simple_move_relocates_the_piece_and_flips_the_turn() {
        let state = GameState::new().apply_click(pos(2, 1)).apply_click(pos(3, 2));

        let moved = state.board.get_piece(pos(3, 2)).expect("piece should have moved");
        assert_eq!(pos(3, 2), moved.position);
        assert!(!moved.is_king);
        assert_eq!(None, state.board.get_piece(pos(2, 1)));
        assert_eq!(Player::Two, state.current_player);
        assert_eq!(None, state.selected_piece);
        assert!(state.legal_moves.is_empty());
        assert_eq!((12, 12), state.board.piece_counts());
    }

    #[test]
    pub fn jump_removes_exactly_one_piece() {
        let mut board = Board::default();
        place(&mut board, Player::One, false, 2, 2);
        place(&mut board, Player::Two, false, 3, 3);
        place(&mut board, Player::Two, false, 7, 0);
        let state = state_with_board(board, Player::One);

        let state = state.apply_click(pos(2, 2)).apply_click(pos(4, 4));

        assert_eq!(None, state.board.get_piece(pos(3, 3)));
        assert!(state.board.get_piece(pos(4, 4)).is_some());
        assert_eq!((1, 1), state.board.piece_counts());
        assert!(!state.game_over);
    }

    #[test]
    pub fn capturing_the_last_piece_wins_the_game() {
        let mut board = Board::default();
        place(&mut board, Player::One, false, 2, 2);
        place(&mut board, Player::Two, false, 3, 3);
        let state = state_with_board(board, Player::One);

        let state = state.apply_click(pos(2, 2)).apply_click(pos(4, 4));

        assert!(state.game_over);
        assert_eq!(Some(Player::One), state.winner);
        assert_eq!((1, 0), state.board.piece_counts());
    }

    #[test]
    pub fn clicks_are_ignored_after_the_game_ends() {
        let mut board = Board::default();
        place(&mut board, Player::One, false, 3, 4);
        let mut state = state_with_board(board, Player::Two);
        state.game_over = true;
        state.winner = Some(Player::One);

        assert_eq!(state, state.apply_click(pos(3, 4)));
        assert_eq!(state, state.apply_click(pos(4, 5)));
    }

    #[test]
    pub fn player_one_promotes_on_the_far_rank() {
        let mut board = Board::default();
        place(&mut board, Player::One, false, 6, 2);
        place(&mut board, Player::Two, false, 0, 1);
        let state = state_with_board(board, Player::One);

        let state = state.apply_click(pos(6, 2)).apply_click(pos(7, 3));

        let king = state.board.get_piece(pos(7, 3)).expect("piece should have moved");
        assert!(king.is_king);
    }

    #[test]
    pub fn player_two_promotes_on_row_zero() {
        let mut board = Board::default();
        place(&mut board, Player::Two, false, 1, 2);
        place(&mut board, Player::One, false, 7, 6);
        let state = state_with_board(board, Player::Two);

        let state = state.apply_click(pos(1, 2)).apply_click(pos(0, 1));

        let king = state.board.get_piece(pos(0, 1)).expect("piece should have moved");
        assert!(king.is_king);
    }

    #[test]
    pub fn kinged_status_never_reverts() {
        // Promotion checks only the destination row, so any piece landing on
        // row 0 or 7 is kinged regardless of owner and a king re-entering a
        // back rank stays kinged. Current behavior, possibly non-standard
        // checkers.
        let mut board = Board::default();
        place(&mut board, Player::Two, true, 6, 2);
        place(&mut board, Player::One, false, 0, 5);
        let state = state_with_board(board, Player::Two);

        let state = state.apply_click(pos(6, 2)).apply_click(pos(7, 1));

        let king = state.board.get_piece(pos(7, 1)).expect("piece should have moved");
        assert!(king.is_king);
    }

    #[test]
    pub fn invalid_click_leaves_the_turn_unchanged() {
        let state = GameState::new().apply_click(pos(2, 1)).apply_click(pos(2, 2));

        assert_eq!(Player::One, state.current_player);
        assert_eq!(GameState::new().board, state.board);
    }

    #[test]
    pub fn king_jump_across_distance_removes_the_jumped_piece() {
        let mut board = Board::default();
        place(&mut board, Player::One, true, 1, 1);
        place(&mut board, Player::Two, false, 4, 4);
        place(&mut board, Player::Two, false, 7, 0);
        let state = state_with_board(board, Player::One);

        let state = state.apply_click(pos(1, 1)).apply_click(pos(5, 5));

        assert_eq!(None, state.board.get_piece(pos(4, 4)));
        assert!(state.board.get_piece(pos(5, 5)).is_some());
        assert_eq!((1, 1), state.board.piece_counts());
    }

    #[test]
    pub fn full_opening_exchange_keeps_all_pieces() {
        let mut state = GameState::new();

        // 2,1 -> 3,2 then 5,2 -> 4,1 mirrors an opening where nothing can
        // be captured.
        state = state.apply_click(pos(2, 1)).apply_click(pos(3, 2));
        assert_eq!(Player::Two, state.current_player);
        state = state.apply_click(pos(5, 2)).apply_click(pos(4, 1));
        assert_eq!(Player::One, state.current_player);

        assert_eq!((12, 12), state.board.piece_counts());
        assert!(!state.game_over);
    }
}
