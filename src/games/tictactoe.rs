//! Local tic-tac-toe board mirror.
//!
//! The backend owns the game; this copy only guards against obviously
//! invalid clicks and renders the grid.

use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Mark placed on a cell. The player is always X, the backend AI is O.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    /// The human player.
    X,
    /// The computer.
    O,
}

impl Mark {
    /// Parses a wire cell value. Empty strings and unknown values are empty.
    pub fn from_cell(cell: &str) -> Option<Self> {
        match cell {
            "X" | "x" => Some(Self::X),
            "O" | "o" => Some(Self::O),
            _ => None,
        }
    }
}

/// A cell on the board (0-8, row-major).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    /// Top-left (position 0)
    TopLeft,
    /// Top-center (position 1)
    TopCenter,
    /// Top-right (position 2)
    TopRight,
    /// Middle-left (position 3)
    MiddleLeft,
    /// Center (position 4)
    Center,
    /// Middle-right (position 5)
    MiddleRight,
    /// Bottom-left (position 6)
    BottomLeft,
    /// Bottom-center (position 7)
    BottomCenter,
    /// Bottom-right (position 8)
    BottomRight,
}

impl Position {
    /// All 9 positions.
    pub const ALL: [Position; 9] = [
        Position::TopLeft,
        Position::TopCenter,
        Position::TopRight,
        Position::MiddleLeft,
        Position::Center,
        Position::MiddleRight,
        Position::BottomLeft,
        Position::BottomCenter,
        Position::BottomRight,
    ];

    /// Converts position to board index (0-8).
    pub fn to_index(self) -> usize {
        self as usize
    }

    /// Creates position from board index.
    #[instrument]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Filters positions by board state - returns only empty cells.
    #[instrument(skip(board))]
    pub fn valid_moves(board: &Board) -> Vec<Position> {
        Self::ALL
            .iter()
            .copied()
            .filter(|pos| board.is_empty(pos.to_index()))
            .collect()
    }
}

/// 3x3 board mirrored from the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    cells: [Option<Mark>; 9],
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a board from the wire representation (`""`, `"X"`, `"O"`).
    ///
    /// Missing trailing cells are treated as empty; extra cells are ignored.
    pub fn from_wire(cells: &[String]) -> Self {
        let mut board = Self::new();
        for (slot, cell) in board.cells.iter_mut().zip(cells) {
            *slot = Mark::from_cell(cell);
        }
        board
    }

    /// Gets the cell at the given index.
    pub fn get(&self, pos: usize) -> Option<Mark> {
        self.cells.get(pos).copied().flatten()
    }

    /// Places a mark. Out-of-range indices are ignored.
    pub fn set(&mut self, pos: usize, mark: Mark) {
        if let Some(cell) = self.cells.get_mut(pos) {
            *cell = Some(mark);
        }
    }

    /// True if `pos` is on the board and unoccupied.
    pub fn is_empty(&self, pos: usize) -> bool {
        matches!(self.cells.get(pos), Some(None))
    }

    /// True if every cell is occupied.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Formats the board as a human-readable string.
    pub fn display(&self) -> String {
        let mut result = String::new();
        for row in 0..3 {
            for col in 0..3 {
                let pos = row * 3 + col;
                let symbol = match self.cells[pos] {
                    None => pos.to_string(),
                    Some(Mark::X) => "X".to_string(),
                    Some(Mark::O) => "O".to_string(),
                };
                result.push_str(&symbol);
                if col < 2 {
                    result.push('|');
                }
            }
            if row < 2 {
                result.push_str("\n-+-+-\n");
            }
        }
        result
    }
}
