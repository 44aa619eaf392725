//! Error types shared by the board model, the parser and the search drivers.
//!
//! Running out of frontier is not an error: the search drivers report it as
//! `Ok(None)`.
use thiserror::Error;

/// A layout that breaks the puzzle invariants.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BoardError {
    /// A piece covers a cell outside the 4x5 grid.
    #[error("piece covers cell ({row}, {col}) outside the board")]
    OutOfBounds { row: usize, col: usize },
    /// Two pieces cover the same cell.
    #[error("pieces overlap at cell ({row}, {col})")]
    Overlap { row: usize, col: usize },
    #[error("board has no goal piece")]
    MissingGoal,
    #[error("board has more than one goal piece")]
    DuplicateGoal,
    /// The layout does not leave exactly two cells empty.
    #[error("board has {0} empty cells, expected 2")]
    EmptyCellCount(usize),
    /// A move refers to a piece index the board does not have.
    #[error("no piece with index {0}")]
    UnknownPiece(usize),
}

/// Failure to turn puzzle text into a `Board`.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("unrecognized character '{ch}' in row {row} col {col}")]
    UnrecognizedSymbol { ch: char, row: usize, col: usize },
    #[error("expected {expected} rows, found {found}")]
    RowCount { expected: usize, found: usize },
    #[error("row {row} has {found} characters (expected {expected})")]
    RowLength {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// The pieces read from the text draw a different picture than the text
    /// itself, e.g. a lone domino half or a misshapen goal block.
    #[error("cell ({row}, {col}) does not match the pieces placed on the board")]
    InconsistentLayout { row: usize, col: usize },
    #[error("invalid board: {0}")]
    Board(#[from] BoardError),
    #[error("failed to read puzzle file: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure of a search run. All variants abort the search.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SearchError {
    /// Move application produced an invalid board.
    #[error("successor generation failed: {0}")]
    Board(#[from] BoardError),
    /// Walking parent links from the goal did not reach the initial state.
    #[error("parent chain of goal at depth {goal_depth} does not lead back to the initial state")]
    BrokenParentChain { goal_depth: u32 },
    /// The configured expansion budget ran out before a goal was found.
    #[error("search stopped after expanding {expanded} states")]
    BudgetExceeded { expanded: usize },
}
