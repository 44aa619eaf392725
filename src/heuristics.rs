//! Goal test and cost-to-go estimates for the search drivers.
use crate::engine::{Board, GOAL_TARGET};

/// Signature shared by all heuristics: an estimate of the number of moves
/// still needed to solve `board`.
pub type HeuristicFn = fn(&Board) -> u32;

/// Returns `true` iff the goal block sits at `GOAL_TARGET`.
///
/// # Examples
/// ```
/// use hrd_solver::engine::Board;
/// use hrd_solver::heuristics::is_goal;
/// assert!(!is_goal(&Board::classic()));
/// ```
pub fn is_goal(board: &Board) -> bool {
    board.goal_anchor() == GOAL_TARGET
}

/// Manhattan distance from the goal block's top-left cell to `GOAL_TARGET`.
///
/// Every move shifts the goal block by at most one cell along one axis, so
/// this never overestimates the remaining moves. Unit move costs make it
/// consistent as well, which A* relies on for optimality.
pub fn manhattan_distance(board: &Board) -> u32 {
    let (row, col) = board.goal_anchor();
    (row.abs_diff(GOAL_TARGET.0) + col.abs_diff(GOAL_TARGET.1)) as u32
}

/// Always zero. A* with this heuristic degrades to uniform-cost search,
/// which is used as a reference for optimal solution lengths.
pub fn zero(_board: &Board) -> u32 {
    0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::board_from_str_array;

    #[test]
    fn test_manhattan_distance_classic() {
        // Goal block starts at (0, 1): three rows above the exit.
        assert_eq!(manhattan_distance(&Board::classic()), 3);
    }

    #[test]
    fn test_manhattan_distance_counts_both_axes() {
        let board = board_from_str_array(&["^^^^", "vvvv", "^2..", "v211", "<>11"]).unwrap();
        assert_eq!(board.goal_anchor(), (3, 2));
        assert_eq!(manhattan_distance(&board), 1);
        assert!(!is_goal(&board));
    }

    #[test]
    fn test_goal_reached() {
        let board = board_from_str_array(&["^^^^", "vvvv", "^..^", "v11v", "2112"]).unwrap();
        assert!(is_goal(&board));
        assert_eq!(manhattan_distance(&board), 0);
        assert_eq!(zero(&board), 0);
    }
}
