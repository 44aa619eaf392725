use crate::engine::{Board, Orientation, Piece, PieceKind, Symbol, BOARD_HEIGHT, BOARD_WIDTH};
use crate::error::ParseError;
use std::fs;
use std::path::Path;

/// Parses the rows of a puzzle into a `Board`.
///
/// Each string slice is one row, top to bottom, using the puzzle alphabet:
/// - '1': a cell of the 2x2 goal block (its first occurrence in row-major
///   order is the block's top-left cell)
/// - '2': a 1x1 single
/// - '<' / '>': left / right half of a horizontal domino
/// - '^' / 'v': top / bottom half of a vertical domino
/// - '.': an empty cell
///
/// Exactly `BOARD_HEIGHT` rows of `BOARD_WIDTH` characters are required.
///
/// # Returns
/// * `Ok(Board)` if the text describes a valid layout.
/// * `Err(ParseError)` if the shape is wrong, a character is not in the
///   alphabet, the pieces break a board invariant, or the pieces found do
///   not redraw exactly the given text (a lone domino half, a goal block that
///   is not 2x2, ...).
///
/// # Examples
/// ```
/// use hrd_solver::utils::board_from_str_array;
/// use hrd_solver::engine::Board;
///
/// let board = board_from_str_array(&["^11^", "v11v", "^<>^", "v22v", "2..2"]).unwrap();
/// assert_eq!(board, Board::classic());
///
/// assert!(board_from_str_array(&["^11^", "v11v", "^<>^", "v22v", "2..X"]).is_err());
/// assert!(board_from_str_array(&["^11^", "v11v"]).is_err());
/// ```
pub fn board_from_str_array(s: &[&str]) -> Result<Board, ParseError> {
    if s.len() != BOARD_HEIGHT {
        return Err(ParseError::RowCount {
            expected: BOARD_HEIGHT,
            found: s.len(),
        });
    }

    let mut symbols = [[Symbol::Empty; BOARD_WIDTH]; BOARD_HEIGHT];
    let mut pieces = Vec::new();
    let mut goal_found = false;

    for (r, row_str) in s.iter().enumerate() {
        let length = row_str.chars().count();
        if length != BOARD_WIDTH {
            return Err(ParseError::RowLength {
                row: r,
                expected: BOARD_WIDTH,
                found: length,
            });
        }

        for (c, ch) in row_str.chars().enumerate() {
            let symbol = Symbol::from_char(ch).ok_or(ParseError::UnrecognizedSymbol {
                ch,
                row: r,
                col: c,
            })?;
            symbols[r][c] = symbol;

            // Only the top-left cell of each piece creates it.
            let kind = match symbol {
                Symbol::Goal if !goal_found => {
                    goal_found = true;
                    PieceKind::Goal
                }
                Symbol::Single => PieceKind::Single,
                Symbol::HorizontalLeft => PieceKind::Domino(Orientation::Horizontal),
                Symbol::VerticalTop => PieceKind::Domino(Orientation::Vertical),
                _ => continue,
            };
            pieces.push(Piece::new(kind, r, c));
        }
    }

    let board = Board::new(pieces)?;

    for (r, row) in symbols.iter().enumerate() {
        for (c, &symbol) in row.iter().enumerate() {
            if board.grid()[r][c] != symbol {
                return Err(ParseError::InconsistentLayout { row: r, col: c });
            }
        }
    }

    Ok(board)
}

/// Parses a whole puzzle text. Trailing whitespace and blank lines are ignored.
pub fn board_from_text(text: &str) -> Result<Board, ParseError> {
    let rows: Vec<&str> = text
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .collect();
    board_from_str_array(&rows)
}

/// Loads the initial board from a puzzle file.
pub fn read_puzzle(path: &Path) -> Result<Board, ParseError> {
    let content = fs::read_to_string(path)?;
    board_from_text(&content)
}

/// Renders a solution: every board in order, each followed by a blank line.
pub fn solution_to_string(boards: &[Board]) -> String {
    let mut output = String::new();
    for board in boards {
        output.push_str(&board.to_string());
        output.push('\n');
    }
    output
}

/// Writes a solution file in the format of `solution_to_string`.
pub fn write_solution(path: &Path, boards: &[Board]) -> std::io::Result<()> {
    fs::write(path, solution_to_string(boards))
}

/// Reads back the boards of a solution file. Boards are separated by blank
/// lines.
pub fn parse_solution(text: &str) -> Result<Vec<Board>, ParseError> {
    let mut boards = Vec::new();
    let mut rows: Vec<&str> = Vec::new();

    for line in text.lines().map(str::trim_end) {
        if line.is_empty() {
            if !rows.is_empty() {
                boards.push(board_from_str_array(&rows)?);
                rows.clear();
            }
        } else {
            rows.push(line);
        }
    }
    if !rows.is_empty() {
        boards.push(board_from_str_array(&rows)?);
    }

    Ok(boards)
}
