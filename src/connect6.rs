use crate::error::GameError;
use std::fmt;
use std::str::FromStr;

pub const BOARD_SIZE: usize = 19;
pub const WIN_LENGTH: usize = 6;

// Axes checked for a winning line: horizontal, vertical, diagonal down, diagonal up.
const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    One = 1,
    Two = 2,
}

impl Player {
    pub fn other(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    pub fn number(self) -> u8 {
        self as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty = 0,
    PlayerOne = 1,
    PlayerTwo = 2,
}

impl Cell {
    pub fn number(self) -> u8 {
        self as u8
    }
}

impl From<Player> for Cell {
    fn from(player: Player) -> Self {
        match player {
            Player::One => Cell::PlayerOne,
            Player::Two => Cell::PlayerTwo,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub row: usize,
    pub col: usize,
}

impl Move {
    pub fn new(row: i64, col: i64) -> Result<Self, GameError> {
        let in_range = |v: i64| (0..BOARD_SIZE as i64).contains(&v);
        if in_range(row) && in_range(col) {
            Ok(Self {
                row: row as usize,
                col: col as usize,
            })
        } else {
            Err(GameError::InvalidCoordinate { row, col })
        }
    }
}

/// Parses `"<row>,<col>"`. Whitespace around the text and each number is ignored.
impl FromStr for Move {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || GameError::MalformedCommand(s.to_string());
        let mut parts = s.trim().split(',');
        let (Some(row), Some(col), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(malformed());
        };
        let row = row.trim().parse::<i64>().map_err(|_| malformed())?;
        let col = col.trim().parse::<i64>().map_err(|_| malformed())?;
        Move::new(row, col)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.row, self.col)
    }
}

/// Board and turn state of a single Connect6 game.
///
/// PlayerOne opens with one stone, after which each side places two stones
/// per turn. `half_turn` is set when the turn holder is about to place the
/// first stone of a pair; the opening stone counts as a whole turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connect6 {
    board: [[Cell; BOARD_SIZE]; BOARD_SIZE],
    current_player: Player,
    half_turn: bool,
    finished: bool,
    winner: Option<Player>,
}

impl Default for Connect6 {
    fn default() -> Self {
        Self::new()
    }
}

impl Connect6 {
    pub fn new() -> Self {
        Self {
            board: [[Cell::Empty; BOARD_SIZE]; BOARD_SIZE],
            current_player: Player::One,
            half_turn: false,
            finished: false,
            winner: None,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn current_player(&self) -> Player {
        self.current_player
    }

    #[cfg(test)]
    pub fn half_turn(&self) -> bool {
        self.half_turn
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    #[cfg(test)]
    pub fn cell(&self, m: Move) -> Cell {
        self.board[m.row][m.col]
    }

    #[cfg(test)]
    pub fn stone_count(&self) -> usize {
        self.board
            .iter()
            .flatten()
            .filter(|&&cell| cell != Cell::Empty)
            .count()
    }

    /// Places the current player's stone and returns who placed it.
    ///
    /// A rejected move leaves the game untouched.
    pub fn apply_move(&mut self, m: Move) -> Result<Player, GameError> {
        if self.finished {
            return Err(GameError::GameFinished);
        }
        if m.row >= BOARD_SIZE || m.col >= BOARD_SIZE {
            return Err(GameError::InvalidCoordinate {
                row: m.row as i64,
                col: m.col as i64,
            });
        }
        if self.board[m.row][m.col] != Cell::Empty {
            return Err(GameError::CellOccupied);
        }

        let player = self.current_player;
        self.board[m.row][m.col] = Cell::from(player);

        if self.check_win(m) {
            self.finished = true;
            self.winner = Some(player);
            return Ok(player);
        }

        if !self.half_turn {
            self.current_player = player.other();
        }
        self.half_turn = !self.half_turn;
        Ok(player)
    }

    /// True when `m` is part of a line of at least six stones of the current
    /// player's colour.
    pub fn check_win(&self, m: Move) -> bool {
        let colour = Cell::from(self.current_player);
        DIRECTIONS.iter().any(|&(dr, dc)| {
            let mut run = 1;
            run += self.count_towards(m, (dr, dc), colour, WIN_LENGTH - run);
            run += self.count_towards(m, (-dr, -dc), colour, WIN_LENGTH - run);
            run >= WIN_LENGTH
        })
    }

    fn count_towards(&self, from: Move, (dr, dc): (isize, isize), colour: Cell, limit: usize) -> usize {
        let on_board = |v: isize| (0..BOARD_SIZE as isize).contains(&v);
        let mut count = 0;
        let mut row = from.row as isize + dr;
        let mut col = from.col as isize + dc;
        while count < limit
            && on_board(row)
            && on_board(col)
            && self.board[row as usize][col as usize] == colour
        {
            count += 1;
            row += dr;
            col += dc;
        }
        count
    }

    /// Ends the game in favour of the opponent of `player`.
    pub fn resign(&mut self, player: Player) -> Result<Player, GameError> {
        if self.finished {
            return Err(GameError::GameFinished);
        }
        let winner = player.other();
        self.finished = true;
        self.winner = Some(winner);
        Ok(winner)
    }

    /// `"<currentPlayer>,<halfTurn>,<cells...>"` with cells in row-major order.
    pub fn encode_state(&self) -> String {
        let mut state = String::with_capacity(4 + BOARD_SIZE * BOARD_SIZE * 2);
        state.push_str(&self.current_player.number().to_string());
        state.push_str(if self.half_turn { ",1" } else { ",0" });
        for cell in self.board.iter().flatten() {
            state.push(',');
            state.push(char::from(b'0' + cell.number()));
        }
        state
    }
}

impl fmt::Display for Connect6 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.board {
            for cell in row {
                let c = match cell {
                    Cell::Empty => '.',
                    Cell::PlayerOne => 'X',
                    Cell::PlayerTwo => 'O',
                };
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
