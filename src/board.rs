use std::fmt::Debug;

use array_macro::array;

pub const BOARD_SIZE: i8 = 8;

/// True iff both coordinates index a square on the board.
#[inline]
pub fn is_valid_position(row: i8, col: i8) -> bool {
    row >= 0 && row < BOARD_SIZE && col >= 0 && col < BOARD_SIZE
}

/// Pieces only ever sit on dark squares.
#[inline]
pub fn is_dark_square(row: i8, col: i8) -> bool {
    (row + col) % 2 == 1
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Position {
    pub row: i8,
    pub col: i8,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Player {
    One,
    Two,
}

impl Player {
    pub fn opponent(self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// Row direction a non-king advances in. Player one starts on rows 0-2
    /// and moves toward row 7, player two the reverse.
    pub fn forward_row(self) -> i8 {
        match self {
            Player::One => 1,
            Player::Two => -1,
        }
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Player::One => write!(f, "1"),
            Player::Two => write!(f, "2"),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Piece {
    /// Unique for the lifetime of a game, derived from the starting square.
    pub id: u8,
    pub player: Player,
    pub is_king: bool,
    pub position: Position,
}

impl Piece {
    fn glyph(&self) -> char {
        match (self.player, self.is_king) {
            (Player::One, false) => 'r',
            (Player::One, true) => 'R',
            (Player::Two, false) => 'w',
            (Player::Two, true) => 'W',
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    squares: [[Option<Piece>; BOARD_SIZE as usize]; BOARD_SIZE as usize],
}

impl Board {
    /// The standard starting setup: 12 pieces per side on the dark squares
    /// of the first and last three rows, none of them kings.
    pub fn starting_position() -> Board {
        Board {
            squares: array![row => array![col => starting_piece(row as i8, col as i8); BOARD_SIZE as usize]; BOARD_SIZE as usize],
        }
    }

    /// Returns None for an empty square and for out-of-bounds coordinates,
    /// so lookups are always validated before indexing.
    pub fn get_piece(&self, position: Position) -> Option<Piece> {
        if !is_valid_position(position.row, position.col) {
            return None;
        }

        self.squares[position.row as usize][position.col as usize]
    }

    pub fn write_piece(&mut self, piece: Option<Piece>, position: Position) {
        debug_assert!(is_valid_position(position.row, position.col));
        self.squares[position.row as usize][position.col as usize] = piece;
    }

    /// Remaining piece counts as (player one, player two).
    pub fn piece_counts(&self) -> (u8, u8) {
        let mut one = 0;
        let mut two = 0;

        for row in self.squares.iter() {
            for piece in row.iter().flatten() {
                match piece.player {
                    Player::One => one += 1,
                    Player::Two => two += 1,
                }
            }
        }

        (one, two)
    }

    pub fn pretty_print(&self) -> String {
        let mut result = String::from("  0 1 2 3 4 5 6 7");

        for (row_index, row) in self.squares.iter().enumerate() {
            result.push('\n');
            result.push_str(&row_index.to_string());
            for (col_index, square) in row.iter().enumerate() {
                result.push(' ');
                result.push(match square {
                    Some(piece) => piece.glyph(),
                    None if is_dark_square(row_index as i8, col_index as i8) => '.',
                    None => ' ',
                });
            }
        }

        result
    }
}

impl Default for Board {
    fn default() -> Self {
        Self {
            squares: [[None; BOARD_SIZE as usize]; BOARD_SIZE as usize],
        }
    }
}

impl Debug for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\nsquares: \n{}", self.pretty_print())
    }
}

fn starting_piece(row: i8, col: i8) -> Option<Piece> {
    if !is_dark_square(row, col) {
        return None;
    }

    let player = if row < 3 {
        Player::One
    } else if row >= BOARD_SIZE - 3 {
        Player::Two
    } else {
        return None;
    };

    Some(Piece {
        id: (row * BOARD_SIZE + col) as u8,
        player,
        is_king: false,
        position: Position { row, col },
    })
}
