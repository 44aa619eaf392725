//! Board model for the Hua Rong Dao sliding-block puzzle.
//!
//! This module defines the game's fundamental components:
//! - `Symbol`: The closed alphabet used to draw a board, one symbol per cell.
//! - `Piece`: A placed block (the 2x2 goal block, a 1x2 domino, or a 1x1 single).
//! - `Board`: An immutable layout of pieces with its derived grid and canonical key.
//!   It provides empty-cell lookup, piece lookup from any occupied cell,
//!   the move legality checker and successor generation.
//!
//! The geometry is fixed: 4 columns by 5 rows, exactly one goal block and
//! exactly two empty cells.
use crate::error::BoardError;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Number of columns on the board.
pub const BOARD_WIDTH: usize = 4;
/// Number of rows on the board.
pub const BOARD_HEIGHT: usize = 5;
/// Total number of cells on the board.
pub const CELL_COUNT: usize = BOARD_WIDTH * BOARD_HEIGHT;
/// Number of cells that are empty on every valid board.
pub const EMPTY_CELLS: usize = 2;
/// Top-left cell the goal block must reach to solve the puzzle.
pub const GOAL_TARGET: Cell = (3, 1);

/// A `(row, column)` coordinate, 0-based from the top-left corner.
pub type Cell = (usize, usize);

/// Symbol drawn in a single cell of the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Symbol {
    /// An empty cell.
    Empty,
    /// Any of the four cells of the goal block.
    Goal,
    /// A 1x1 piece.
    Single,
    /// Left half of a horizontal domino.
    HorizontalLeft,
    /// Right half of a horizontal domino.
    HorizontalRight,
    /// Top half of a vertical domino.
    VerticalTop,
    /// Bottom half of a vertical domino.
    VerticalBottom,
}

impl Symbol {
    /// Converts the symbol to its character in the puzzle file format.
    ///
    /// # Examples
    ///
    /// ```
    /// use hrd_solver::engine::Symbol;
    /// assert_eq!(Symbol::Goal.to_char(), '1');
    /// assert_eq!(Symbol::Empty.to_char(), '.');
    /// ```
    pub fn to_char(self) -> char {
        match self {
            Symbol::Empty => '.',
            Symbol::Goal => '1',
            Symbol::Single => '2',
            Symbol::HorizontalLeft => '<',
            Symbol::HorizontalRight => '>',
            Symbol::VerticalTop => '^',
            Symbol::VerticalBottom => 'v',
        }
    }

    /// Parses a character of the puzzle file format. Returns `None` for any
    /// character outside the alphabet.
    pub fn from_char(ch: char) -> Option<Symbol> {
        match ch {
            '.' => Some(Symbol::Empty),
            '1' => Some(Symbol::Goal),
            '2' => Some(Symbol::Single),
            '<' => Some(Symbol::HorizontalLeft),
            '>' => Some(Symbol::HorizontalRight),
            '^' => Some(Symbol::VerticalTop),
            'v' => Some(Symbol::VerticalBottom),
            _ => None,
        }
    }
}

/// Direction a piece slides in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All four directions, in the order successors are discovered.
    pub const ALL: [Direction; 4] = [
        Direction::Down,
        Direction::Up,
        Direction::Right,
        Direction::Left,
    ];

    /// Row and column delta of a one-cell step in this direction.
    pub fn as_offset(self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Parses the single-letter form used by the interactive player
    /// (`u`, `d`, `l`, `r`).
    pub fn from_letter(letter: &str) -> Option<Direction> {
        match letter {
            "u" => Some(Direction::Up),
            "d" => Some(Direction::Down),
            "l" => Some(Direction::Left),
            "r" => Some(Direction::Right),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        };
        write!(f, "{}", s)
    }
}

/// Returns the cell one step away from `cell` in `direction`, or `None` if
/// that step leaves the board.
pub fn neighbor(cell: Cell, direction: Direction) -> Option<Cell> {
    let (dr, dc) = direction.as_offset();
    let row = cell.0.checked_add_signed(dr)?;
    let col = cell.1.checked_add_signed(dc)?;
    if row < BOARD_HEIGHT && col < BOARD_WIDTH {
        Some((row, col))
    } else {
        None
    }
}

/// Orientation of a 1x2 domino.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// Shape of a piece.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PieceKind {
    /// The 2x2 block that has to reach `GOAL_TARGET`.
    Goal,
    /// A 1x1 block.
    Single,
    /// A 1x2 block lying along the given axis.
    Domino(Orientation),
}

impl PieceKind {
    /// Footprint of the shape as `(rows, columns)`.
    pub fn size(self) -> (usize, usize) {
        match self {
            PieceKind::Goal => (2, 2),
            PieceKind::Single => (1, 1),
            PieceKind::Domino(Orientation::Horizontal) => (1, 2),
            PieceKind::Domino(Orientation::Vertical) => (2, 1),
        }
    }

    /// Symbol drawn at offset `(dr, dc)` from the piece's top-left cell.
    fn symbol_at(self, dr: usize, dc: usize) -> Symbol {
        match self {
            PieceKind::Goal => Symbol::Goal,
            PieceKind::Single => Symbol::Single,
            PieceKind::Domino(Orientation::Horizontal) if dc == 0 => Symbol::HorizontalLeft,
            PieceKind::Domino(Orientation::Horizontal) => Symbol::HorizontalRight,
            PieceKind::Domino(Orientation::Vertical) if dr == 0 => Symbol::VerticalTop,
            PieceKind::Domino(Orientation::Vertical) => Symbol::VerticalBottom,
        }
    }
}

/// A piece placed on the board, identified by its shape and top-left cell.
///
/// Pieces are plain values: moving one produces a new `Piece` and leaves the
/// original untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    kind: PieceKind,
    row: usize,
    col: usize,
}

impl Piece {
    /// Creates a piece of the given shape anchored at `(row, col)`.
    pub fn new(kind: PieceKind, row: usize, col: usize) -> Self {
        Piece { kind, row, col }
    }

    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    /// Top-left cell of the piece.
    pub fn anchor(&self) -> Cell {
        (self.row, self.col)
    }

    /// Every cell covered by the piece together with the symbol drawn there.
    /// Cells are listed row-major.
    pub fn footprint(&self) -> Vec<(Cell, Symbol)> {
        let (height, width) = self.kind.size();
        let mut cells = Vec::with_capacity(height * width);
        for dr in 0..height {
            for dc in 0..width {
                cells.push(((self.row + dr, self.col + dc), self.kind.symbol_at(dr, dc)));
            }
        }
        cells
    }

    /// Returns a copy of the piece moved one cell in `direction`, or `None`
    /// if any part of it would leave the board.
    pub fn shifted(&self, direction: Direction) -> Option<Piece> {
        let (row, col) = neighbor(self.anchor(), direction)?;
        let (height, width) = self.kind.size();
        if row + height > BOARD_HEIGHT || col + width > BOARD_WIDTH {
            return None;
        }
        Some(Piece::new(self.kind, row, col))
    }
}

/// A single move: the piece at index `piece` of `Board::pieces` slides one
/// cell in `direction`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub piece: usize,
    pub direction: Direction,
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "piece {} {}", self.piece, self.direction)
    }
}

/// Canonical key of a board: the row-major concatenation of its cell symbols.
///
/// Two boards are equal exactly when their keys are equal. Keys order
/// lexicographically by their bytes, which gives the A* frontier a tie-break
/// that is identical on every platform.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BoardKey([u8; CELL_COUNT]);

impl BoardKey {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for BoardKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &byte in &self.0 {
            write!(f, "{}", byte as char)?;
        }
        Ok(())
    }
}

impl fmt::Debug for BoardKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BoardKey({})", self)
    }
}

/// An immutable puzzle layout.
///
/// The grid and the canonical key are computed once from the piece list when
/// the board is built and never change afterwards. Moving a piece always
/// yields a new `Board`.
///
/// Every `Board` upholds the puzzle invariants: all pieces lie inside the
/// 4x5 grid, no two pieces overlap, there is exactly one goal block and
/// exactly two cells are empty.
#[derive(Clone, Debug)]
pub struct Board {
    pieces: Vec<Piece>,
    grid: [[Symbol; BOARD_WIDTH]; BOARD_HEIGHT],
    key: BoardKey,
    goal_index: usize,
}

impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Board {}

impl Hash for Board {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl Board {
    /// Lays the pieces out on the grid and derives the canonical key.
    ///
    /// # Arguments
    /// * `pieces`: The pieces of the layout. Their order is kept and defines
    ///   the piece indices used by `Move`.
    ///
    /// # Returns
    /// * `Ok(Board)` if the layout satisfies the puzzle invariants.
    /// * `Err(BoardError)` if a piece leaves the grid, two pieces overlap,
    ///   the goal block is missing or duplicated, or the number of empty
    ///   cells is not two.
    ///
    /// # Examples
    /// ```
    /// use hrd_solver::engine::{Board, Piece, PieceKind};
    ///
    /// let lonely_goal = Board::new(vec![Piece::new(PieceKind::Goal, 0, 0)]);
    /// assert!(lonely_goal.is_err()); // 16 empty cells
    ///
    /// let classic = Board::classic();
    /// assert_eq!(classic.key().to_string(), "^11^v11v^<>^v22v2..2");
    /// ```
    pub fn new(pieces: Vec<Piece>) -> Result<Self, BoardError> {
        let mut grid = [[Symbol::Empty; BOARD_WIDTH]; BOARD_HEIGHT];
        let mut goal_index = None;

        for (index, piece) in pieces.iter().enumerate() {
            if piece.kind == PieceKind::Goal && goal_index.replace(index).is_some() {
                return Err(BoardError::DuplicateGoal);
            }
            for ((row, col), symbol) in piece.footprint() {
                if row >= BOARD_HEIGHT || col >= BOARD_WIDTH {
                    return Err(BoardError::OutOfBounds { row, col });
                }
                if grid[row][col] != Symbol::Empty {
                    return Err(BoardError::Overlap { row, col });
                }
                grid[row][col] = symbol;
            }
        }

        let goal_index = goal_index.ok_or(BoardError::MissingGoal)?;

        let empty = grid
            .iter()
            .flatten()
            .filter(|&&symbol| symbol == Symbol::Empty)
            .count();
        if empty != EMPTY_CELLS {
            return Err(BoardError::EmptyCellCount(empty));
        }

        let mut key = [0u8; CELL_COUNT];
        for (slot, symbol) in key.iter_mut().zip(grid.iter().flatten()) {
            *slot = symbol.to_char() as u8;
        }

        Ok(Board {
            pieces,
            grid,
            key: BoardKey(key),
            goal_index,
        })
    }

    /// The traditional opening layout ("Heng Dao Li Ma"):
    ///
    /// ```text
    /// ^11^
    /// v11v
    /// ^<>^
    /// v22v
    /// 2..2
    /// ```
    pub fn classic() -> Self {
        use Orientation::{Horizontal, Vertical};
        let pieces = vec![
            Piece::new(PieceKind::Goal, 0, 1),
            Piece::new(PieceKind::Domino(Vertical), 0, 0),
            Piece::new(PieceKind::Domino(Vertical), 0, 3),
            Piece::new(PieceKind::Domino(Vertical), 2, 0),
            Piece::new(PieceKind::Domino(Horizontal), 2, 1),
            Piece::new(PieceKind::Domino(Vertical), 2, 3),
            Piece::new(PieceKind::Single, 3, 1),
            Piece::new(PieceKind::Single, 3, 2),
            Piece::new(PieceKind::Single, 4, 0),
            Piece::new(PieceKind::Single, 4, 3),
        ];
        Board::new(pieces).expect("classic layout satisfies the board invariants")
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    /// Returns an immutable reference to the derived symbol grid.
    pub fn grid(&self) -> &[[Symbol; BOARD_WIDTH]; BOARD_HEIGHT] {
        &self.grid
    }

    /// Returns the symbol at row `r`, column `c`, or `None` outside the board.
    pub fn symbol_at(&self, r: usize, c: usize) -> Option<Symbol> {
        self.grid.get(r).and_then(|row| row.get(c)).copied()
    }

    pub fn key(&self) -> &BoardKey {
        &self.key
    }

    /// The goal block. Every board has exactly one.
    pub fn goal_piece(&self) -> &Piece {
        &self.pieces[self.goal_index]
    }

    /// Top-left cell of the goal block.
    pub fn goal_anchor(&self) -> Cell {
        self.goal_piece().anchor()
    }

    /// Returns the two empty cells in row-major order.
    pub fn find_empty_cells(&self) -> [Cell; EMPTY_CELLS] {
        let mut found = [(0, 0); EMPTY_CELLS];
        let mut count = 0;
        for (r, row) in self.grid.iter().enumerate() {
            for (c, &symbol) in row.iter().enumerate() {
                if symbol == Symbol::Empty && count < EMPTY_CELLS {
                    found[count] = (r, c);
                    count += 1;
                }
            }
        }
        debug_assert_eq!(count, EMPTY_CELLS, "board built with a wrong empty-cell count");
        found
    }

    /// Identifies the piece covering cell `(row, col)`.
    ///
    /// The anchor is recovered from the symbol alone: the right or bottom half
    /// of a domino points one cell back, and a goal cell walks up and/or left
    /// while the neighbouring cell is also part of the goal block.
    ///
    /// # Returns
    /// `Some((index, anchor))` where `index` is the piece's position in
    /// `pieces()` and `anchor` its top-left cell, or `None` if the cell is
    /// empty or outside the board.
    pub fn locate_piece_at(&self, row: usize, col: usize) -> Option<(usize, Cell)> {
        let anchor = match self.symbol_at(row, col)? {
            Symbol::Empty => return None,
            Symbol::Single | Symbol::HorizontalLeft | Symbol::VerticalTop => (row, col),
            Symbol::HorizontalRight => (row, col.checked_sub(1)?),
            Symbol::VerticalBottom => (row.checked_sub(1)?, col),
            Symbol::Goal => {
                let top = if row > 0 && self.grid[row - 1][col] == Symbol::Goal {
                    row - 1
                } else {
                    row
                };
                let left = if col > 0 && self.grid[row][col - 1] == Symbol::Goal {
                    col - 1
                } else {
                    col
                };
                (top, left)
            }
        };

        self.pieces
            .iter()
            .position(|piece| piece.anchor() == anchor)
            .map(|index| (index, anchor))
    }

    /// Decides whether `piece` can slide one cell in `direction`.
    ///
    /// Only the cells the piece would newly cover need checking: the goal
    /// block needs the two cells along its leading edge, a domino moving
    /// across its axis needs two cells, and a single or a domino moving
    /// along its axis needs one. Moves leaving the board are illegal.
    ///
    /// This is a pure predicate and never modifies the board.
    pub fn is_legal(&self, piece: &Piece, direction: Direction) -> bool {
        use Orientation::{Horizontal, Vertical};

        let Some(moved) = piece.shifted(direction) else {
            return false;
        };
        let (r, c) = moved.anchor();

        let entering: Vec<Cell> = match (piece.kind, direction) {
            (PieceKind::Single, _) => vec![(r, c)],
            (PieceKind::Goal, Direction::Up) => vec![(r, c), (r, c + 1)],
            (PieceKind::Goal, Direction::Down) => vec![(r + 1, c), (r + 1, c + 1)],
            (PieceKind::Goal, Direction::Left) => vec![(r, c), (r + 1, c)],
            (PieceKind::Goal, Direction::Right) => vec![(r, c + 1), (r + 1, c + 1)],
            (PieceKind::Domino(Horizontal), Direction::Left) => vec![(r, c)],
            (PieceKind::Domino(Horizontal), Direction::Right) => vec![(r, c + 1)],
            (PieceKind::Domino(Horizontal), Direction::Up | Direction::Down) => {
                vec![(r, c), (r, c + 1)]
            }
            (PieceKind::Domino(Vertical), Direction::Up) => vec![(r, c)],
            (PieceKind::Domino(Vertical), Direction::Down) => vec![(r + 1, c)],
            (PieceKind::Domino(Vertical), Direction::Left | Direction::Right) => {
                vec![(r, c), (r + 1, c)]
            }
        };

        entering
            .into_iter()
            .all(|(row, col)| self.grid[row][col] == Symbol::Empty)
    }

    /// Lists every piece next to an empty cell together with the direction it
    /// would slide to fill that cell.
    ///
    /// A piece touching both empty cells from the same side is reported once.
    /// The list is not yet filtered for legality.
    pub fn candidate_moves(&self) -> Vec<Move> {
        let mut candidates = Vec::new();
        for empty in self.find_empty_cells() {
            for direction in Direction::ALL {
                // The piece sits on the side opposite to the way it travels.
                let Some((row, col)) = neighbor(empty, direction.opposite()) else {
                    continue;
                };
                if let Some((piece, _)) = self.locate_piece_at(row, col) {
                    let candidate = Move { piece, direction };
                    if !candidates.contains(&candidate) {
                        candidates.push(candidate);
                    }
                }
            }
        }
        candidates
    }

    /// Candidate moves that pass the legality checker.
    pub fn legal_moves(&self) -> Vec<Move> {
        self.candidate_moves()
            .into_iter()
            .filter(|mv| self.is_legal(&self.pieces[mv.piece], mv.direction))
            .collect()
    }

    /// Builds the board that results from applying `mv`.
    ///
    /// The moved piece keeps its index; all other pieces are copied unchanged.
    ///
    /// # Returns
    /// * `Ok(Board)` with the new layout.
    /// * `Err(BoardError)` if `mv` names no piece, pushes it off the board, or
    ///   lands it on another piece.
    pub fn apply_move(&self, mv: Move) -> Result<Board, BoardError> {
        let piece = self
            .pieces
            .get(mv.piece)
            .ok_or(BoardError::UnknownPiece(mv.piece))?;
        let (row, col) = piece.anchor();
        let moved = piece
            .shifted(mv.direction)
            .ok_or(BoardError::OutOfBounds { row, col })?;

        let mut pieces = self.pieces.clone();
        pieces[mv.piece] = moved;
        Board::new(pieces)
    }

    /// Every board reachable with one legal move, paired with that move.
    ///
    /// The result is empty when nothing can move.
    pub fn successors(&self) -> Result<Vec<(Move, Board)>, BoardError> {
        self.legal_moves()
            .into_iter()
            .map(|mv| self.apply_move(mv).map(|board| (mv, board)))
            .collect()
    }

    /// Plays `steps` random legal moves starting from this board.
    ///
    /// The walk is driven by a `SmallRng` seeded with `seed`, so the same seed
    /// always produces the same layout. Every board reached this way is
    /// solvable whenever the starting board is, since all moves are reversible.
    pub fn scramble(&self, steps: usize, seed: u64) -> Result<Board, BoardError> {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut board = self.clone();
        for _ in 0..steps {
            let moves = board.legal_moves();
            match moves.choose(&mut rng) {
                Some(&mv) => board = board.apply_move(mv)?,
                None => break,
            }
        }
        Ok(board)
    }
}

impl fmt::Display for Board {
    /// Draws the board in the puzzle file format, one newline-terminated line
    /// per row.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.grid {
            for symbol in row {
                write!(f, "{}", symbol.to_char())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
