//! Core board types for trivia-gated tic-tac-toe.

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};

/// Marker a participant plays with.
///
/// The earlier-queued participant of a session always receives `Circle`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Symbol {
    /// Circle, assigned to the first player to queue.
    Circle,
    /// Cross, assigned to the second player to queue.
    Cross,
}

impl Symbol {
    /// Returns the opposing symbol.
    pub fn opponent(self) -> Self {
        match self {
            Symbol::Circle => Symbol::Cross,
            Symbol::Cross => Symbol::Circle,
        }
    }
}

/// One cell of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<Symbol>", into = "Option<Symbol>")]
pub enum Cell {
    /// No mark placed yet.
    Empty,
    /// Marked by the given symbol.
    Marked(Symbol),
}

impl From<Option<Symbol>> for Cell {
    fn from(value: Option<Symbol>) -> Self {
        match value {
            Some(symbol) => Cell::Marked(symbol),
            None => Cell::Empty,
        }
    }
}

impl From<Cell> for Option<Symbol> {
    fn from(cell: Cell) -> Self {
        match cell {
            Cell::Marked(symbol) => Some(symbol),
            Cell::Empty => None,
        }
    }
}

/// Errors raised when applying a move to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum MoveError {
    /// Row or column outside `[0, 2]`.
    #[display("target cell is outside the board")]
    OutOfBounds,
    /// Target cell already holds a mark.
    #[display("target cell is already taken")]
    CellTaken,
}

/// Terminal evaluation of a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// No complete line and at least one empty cell.
    InProgress,
    /// The given symbol completed a line.
    Won(Symbol),
    /// Board full with no complete line.
    Draw,
}

/// 3x3 tic-tac-toe board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// Cells in row-major order (0-8).
    cells: [Cell; 9],
}

/// The eight winning lines: three rows, three columns, two diagonals.
const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self {
            cells: [Cell::Empty; 9],
        }
    }

    /// Gets the cell at the given coordinates, if they are on the board.
    pub fn cell(&self, row: usize, col: usize) -> Option<Cell> {
        if row > 2 || col > 2 {
            return None;
        }
        Some(self.cells[row * 3 + col])
    }

    /// Places a mark, enforcing bounds and emptiness of the target cell.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::OutOfBounds`] when row or column exceed 2, and
    /// [`MoveError::CellTaken`] when the target cell already holds a mark.
    pub fn apply(&mut self, row: usize, col: usize, symbol: Symbol) -> Result<(), MoveError> {
        if row > 2 || col > 2 {
            return Err(MoveError::OutOfBounds);
        }
        let index = row * 3 + col;
        if self.cells[index] != Cell::Empty {
            return Err(MoveError::CellTaken);
        }
        self.cells[index] = Cell::Marked(symbol);
        Ok(())
    }

    /// Returns a row-major 3x3 snapshot of the board.
    pub fn grid(&self) -> [[Cell; 3]; 3] {
        let mut grid = [[Cell::Empty; 3]; 3];
        for row in 0..3 {
            for col in 0..3 {
                grid[row][col] = self.cells[row * 3 + col];
            }
        }
        grid
    }

    /// Checks if every cell holds a mark.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|cell| *cell != Cell::Empty)
    }

    /// Evaluates the board against the eight winning lines.
    ///
    /// At most one new line can be complete at the time a single move is
    /// applied, so the scan order does not affect the result.
    pub fn outcome(&self) -> Outcome {
        for [a, b, c] in LINES {
            if let Cell::Marked(symbol) = self.cells[a] {
                if self.cells[b] == self.cells[a] && self.cells[c] == self.cells[a] {
                    return Outcome::Won(symbol);
                }
            }
        }
        if self.is_full() {
            return Outcome::Draw;
        }
        Outcome::InProgress
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
