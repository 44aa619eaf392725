use crate::engine::{Board, BoardKey, Move};
use crate::error::SearchError;
use crate::heuristics::{is_goal, manhattan_distance, HeuristicFn};
use log::{debug, info, trace};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};
use std::fmt;

/// Search strategy selectable from the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Algorithm {
    /// A* with the Manhattan heuristic. Finds a shortest solution.
    #[value(name = "astar")]
    AStar,
    /// Depth-first search with duplicate pruning. Finds some solution.
    #[value(name = "dfs")]
    Dfs,
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::AStar => write!(f, "A*"),
            Algorithm::Dfs => write!(f, "DFS"),
        }
    }
}

/// Optional limits on a search run. The default imposes none.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchLimits {
    /// Abort with `SearchError::BudgetExceeded` once this many states have
    /// been expanded without reaching the goal.
    pub max_expansions: Option<usize>,
}

/// Counters collected during a search run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// States whose successors were generated.
    pub expanded: usize,
    /// Successor states added to the arena.
    pub generated: usize,
    /// Successors dropped (at generation or when popped) because their board
    /// had already been explored.
    pub duplicates_skipped: usize,
    /// Largest frontier size observed.
    pub max_frontier: usize,
}

impl fmt::Display for SearchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "expanded {}, generated {}, duplicates {}, max frontier {}",
            self.expanded, self.generated, self.duplicates_skipped, self.max_frontier
        )
    }
}

/// Stable handle of a `State` inside a `StateArena`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateId(usize);

/// A board plus search bookkeeping. States are never modified once stored.
#[derive(Clone, Debug)]
pub struct State {
    board: Board,
    depth: u32,
    heuristic: u32,
    parent: Option<StateId>,
    last_move: Option<Move>,
}

impl State {
    /// A root state: depth 0, no parent.
    pub fn initial(board: Board, heuristic: HeuristicFn) -> Self {
        let h = heuristic(&board);
        State {
            board,
            depth: 0,
            heuristic: h,
            parent: None,
            last_move: None,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Moves made from the initial state (the `g` cost).
    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn heuristic(&self) -> u32 {
        self.heuristic
    }

    /// `g + h`.
    pub fn f(&self) -> u32 {
        self.depth + self.heuristic
    }

    pub fn parent(&self) -> Option<StateId> {
        self.parent
    }

    /// The move that produced this state from its parent.
    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    /// Secondary frontier ordering for states with equal `f`.
    pub fn tie_break(&self) -> &BoardKey {
        self.board.key()
    }
}

/// Owns every state created during a search. Parent links are `StateId`s
/// into this arena, so ancestors live as long as the arena does.
#[derive(Debug, Default)]
pub struct StateArena {
    states: Vec<State>,
}

impl StateArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, state: State) -> StateId {
        self.states.push(state);
        StateId(self.states.len() - 1)
    }

    /// # Panics
    /// Panics if `id` was issued by a different arena.
    pub fn get(&self, id: StateId) -> &State {
        &self.states[id.0]
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

/// A solved puzzle.
#[derive(Clone, Debug)]
pub struct Solution {
    /// Boards from the initial layout to the goal layout, both inclusive.
    pub boards: Vec<Board>,
    /// The moves between consecutive boards; one shorter than `boards`.
    pub moves: Vec<Move>,
    /// Number of moves, equal to the goal state's depth.
    pub depth: u32,
    pub stats: SearchStats,
}

/// Walks parent links from `goal` back to `initial`.
///
/// The initial state is recognised by its handle, not by comparing boards.
///
/// # Returns
/// * `Ok(path)` with handles ordered from `initial` to `goal`, both inclusive.
/// * `Err(SearchError::BrokenParentChain)` if `initial` is not reached within
///   `depth(goal) + 1` steps.
pub fn reconstruct(
    arena: &StateArena,
    initial: StateId,
    goal: StateId,
) -> Result<Vec<StateId>, SearchError> {
    let goal_depth = arena.get(goal).depth;
    let limit = goal_depth as usize + 1;
    let mut path = Vec::with_capacity(limit);
    let mut current = Some(goal);

    while let Some(id) = current {
        if path.len() == limit {
            break;
        }
        path.push(id);
        if id == initial {
            path.reverse();
            return Ok(path);
        }
        current = arena.get(id).parent;
    }

    Err(SearchError::BrokenParentChain { goal_depth })
}

/// Returns `true` if every board in `boards` follows from the previous one by
/// exactly one legal move. A single board is a valid (empty) trajectory.
pub fn is_valid_trajectory(boards: &[Board]) -> bool {
    boards.windows(2).all(|pair| match pair[0].successors() {
        Ok(successors) => successors.iter().any(|(_, next)| next == &pair[1]),
        Err(_) => false,
    })
}

/// Shared state of one search run: the arena, the explored set and counters.
struct Search {
    arena: StateArena,
    explored: HashSet<BoardKey>,
    heuristic: HeuristicFn,
    limits: SearchLimits,
    stats: SearchStats,
}

impl Search {
    fn new(heuristic: HeuristicFn, limits: SearchLimits) -> Self {
        Search {
            arena: StateArena::new(),
            explored: HashSet::new(),
            heuristic,
            limits,
            stats: SearchStats::default(),
        }
    }

    fn root(&mut self, board: &Board) -> StateId {
        self.arena
            .insert(State::initial(board.clone(), self.heuristic))
    }

    /// Marks the state's board as explored. Returns `false` if it already was.
    fn mark_explored(&mut self, id: StateId) -> bool {
        let fresh = self.explored.insert(*self.arena.get(id).board.key());
        if !fresh {
            self.stats.duplicates_skipped += 1;
        }
        fresh
    }

    /// Generates the successors of `id` and stores them in the arena.
    /// Successors whose board is already explored are dropped right away.
    fn expand(&mut self, id: StateId) -> Result<Vec<StateId>, SearchError> {
        if let Some(limit) = self.limits.max_expansions {
            if self.stats.expanded >= limit {
                return Err(SearchError::BudgetExceeded {
                    expanded: self.stats.expanded,
                });
            }
        }
        self.stats.expanded += 1;

        let (depth, successors) = {
            let parent = self.arena.get(id);
            trace!("expanding state at depth {} (f = {})", parent.depth, parent.f());
            (parent.depth + 1, parent.board.successors()?)
        };

        let mut children = Vec::with_capacity(successors.len());
        for (mv, board) in successors {
            if self.explored.contains(board.key()) {
                self.stats.duplicates_skipped += 1;
                continue;
            }
            let heuristic = (self.heuristic)(&board);
            children.push(self.arena.insert(State {
                board,
                depth,
                heuristic,
                parent: Some(id),
                last_move: Some(mv),
            }));
        }
        self.stats.generated += children.len();
        Ok(children)
    }

    fn note_frontier(&mut self, size: usize) {
        self.stats.max_frontier = self.stats.max_frontier.max(size);
    }

    fn finish(self, initial: StateId, goal: StateId) -> Result<Solution, SearchError> {
        let path = reconstruct(&self.arena, initial, goal)?;
        let boards = path
            .iter()
            .map(|&id| self.arena.get(id).board.clone())
            .collect();
        let moves = path
            .iter()
            .filter_map(|&id| self.arena.get(id).last_move)
            .collect();
        Ok(Solution {
            boards,
            moves,
            depth: self.arena.get(goal).depth,
            stats: self.stats,
        })
    }
}

/// Depth-first search with duplicate pruning.
///
/// Uses a LIFO frontier and an explored set keyed by the canonical board key.
/// Returns the first goal reached in stack order, which is a valid solution
/// but usually not a shortest one.
///
/// # Returns
/// * `Ok(Some(solution))` when a goal layout is reached.
/// * `Ok(None)` when the frontier empties first.
/// * `Err(SearchError)` on budget exhaustion or an internal fault.
pub fn dfs(initial: &Board, limits: SearchLimits) -> Result<Option<Solution>, SearchError> {
    debug!("DFS search started from:\n{}", initial);
    let mut search = Search::new(manhattan_distance, limits);
    let root = search.root(initial);
    let mut frontier = vec![root];

    while let Some(id) = frontier.pop() {
        if !search.mark_explored(id) {
            continue;
        }
        if is_goal(search.arena.get(id).board()) {
            let solution = search.finish(root, id)?;
            info!("DFS found a {}-move solution ({})", solution.depth, solution.stats);
            return Ok(Some(solution));
        }
        frontier.extend(search.expand(id)?);
        search.note_frontier(frontier.len());
    }

    info!("DFS exhausted the frontier without a solution ({})", search.stats);
    Ok(None)
}

/// Frontier entry ordered by `f`, then the canonical board key, then
/// insertion order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct FrontierEntry {
    f: u32,
    tie_break: BoardKey,
    sequence: u64,
    id: StateId,
}

/// A* search.
///
/// The frontier is a min-priority queue ordered by `(f, canonical key,
/// insertion order)`, so runs on the same input always pop states in the
/// same order. With an admissible and consistent `heuristic` the first goal
/// popped has the smallest possible depth.
///
/// # Returns
/// * `Ok(Some(solution))` when a goal layout is reached.
/// * `Ok(None)` when the frontier empties first.
/// * `Err(SearchError)` on budget exhaustion or an internal fault.
pub fn astar(
    initial: &Board,
    heuristic: HeuristicFn,
    limits: SearchLimits,
) -> Result<Option<Solution>, SearchError> {
    debug!("A* search started from:\n{}", initial);
    let mut search = Search::new(heuristic, limits);
    let root = search.root(initial);

    let mut sequence = 0u64;
    let mut frontier = BinaryHeap::new();
    frontier.push(Reverse(entry(&search.arena, root, sequence)));

    while let Some(Reverse(FrontierEntry { id, .. })) = frontier.pop() {
        if !search.mark_explored(id) {
            continue;
        }
        if is_goal(search.arena.get(id).board()) {
            let solution = search.finish(root, id)?;
            info!("A* found a {}-move solution ({})", solution.depth, solution.stats);
            return Ok(Some(solution));
        }
        for child in search.expand(id)? {
            sequence += 1;
            frontier.push(Reverse(entry(&search.arena, child, sequence)));
        }
        search.note_frontier(frontier.len());
    }

    info!("A* exhausted the frontier without a solution ({})", search.stats);
    Ok(None)
}

fn entry(arena: &StateArena, id: StateId, sequence: u64) -> FrontierEntry {
    let state = arena.get(id);
    FrontierEntry {
        f: state.f(),
        tie_break: *state.tie_break(),
        sequence,
        id,
    }
}

/// Runs the selected algorithm. A* uses the Manhattan heuristic.
pub fn solve(
    initial: &Board,
    algorithm: Algorithm,
    limits: SearchLimits,
) -> Result<Option<Solution>, SearchError> {
    match algorithm {
        Algorithm::AStar => astar(initial, manhattan_distance, limits),
        Algorithm::Dfs => dfs(initial, limits),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heuristics::zero;
    use crate::utils::board_from_str_array;
    use std::collections::{HashMap, VecDeque};

    fn solved_board() -> Board {
        board_from_str_array(&["^^^^", "vvvv", "^..^", "v11v", "2112"]).unwrap()
    }

    fn one_move_board() -> Board {
        board_from_str_array(&["^^^^", "vvvv", "^11^", "v11v", "2..2"]).unwrap()
    }

    #[test]
    fn test_already_solved_needs_zero_moves() {
        let board = solved_board();
        for algorithm in [Algorithm::AStar, Algorithm::Dfs] {
            let solution = solve(&board, algorithm, SearchLimits::default())
                .unwrap()
                .expect("solved board has a solution");
            assert_eq!(solution.depth, 0, "{}", algorithm);
            assert_eq!(solution.boards, vec![board.clone()]);
            assert!(solution.moves.is_empty());
            assert_eq!(solution.stats.expanded, 0);
        }
    }

    #[test]
    fn test_astar_one_move_from_goal() {
        let board = one_move_board();
        assert_eq!(manhattan_distance(&board), 1);

        let solution = astar(&board, manhattan_distance, SearchLimits::default())
            .unwrap()
            .unwrap();
        assert_eq!(solution.depth, 1);
        assert_eq!(solution.boards.len(), 2);
        assert_eq!(solution.moves.len(), 1);
        assert!(is_goal(&solution.boards[1]));
        let goal_index = board
            .pieces()
            .iter()
            .position(|p| p == board.goal_piece())
            .unwrap();
        assert_eq!(solution.moves[0].piece, goal_index);
    }

    #[test]
    fn test_dfs_one_move_board_gives_valid_solution() {
        let board = one_move_board();
        let solution = dfs(&board, SearchLimits::default()).unwrap().unwrap();
        assert!(solution.depth >= 1);
        assert_eq!(solution.boards.len(), solution.depth as usize + 1);
        assert_eq!(solution.boards[0], board);
        assert!(is_goal(solution.boards.last().unwrap()));
        assert!(is_valid_trajectory(&solution.boards));
    }

    #[test]
    fn test_dfs_solves_classic_with_valid_trajectory() {
        let board = Board::classic();
        let solution = dfs(&board, SearchLimits::default()).unwrap().unwrap();
        assert_eq!(solution.boards[0], board);
        assert!(is_goal(solution.boards.last().unwrap()));
        assert_eq!(solution.moves.len(), solution.depth as usize);
        assert!(is_valid_trajectory(&solution.boards));
    }

    #[test]
    fn test_astar_matches_uniform_cost_depth() {
        let board = Board::classic().scramble(40, 3).unwrap();
        let astar_solution = astar(&board, manhattan_distance, SearchLimits::default())
            .unwrap()
            .unwrap();
        let ucs_solution = astar(&board, zero, SearchLimits::default())
            .unwrap()
            .unwrap();
        assert_eq!(astar_solution.depth, ucs_solution.depth);
        assert!(astar_solution.stats.expanded <= ucs_solution.stats.expanded);
        assert!(is_valid_trajectory(&astar_solution.boards));
    }

    #[test]
    fn test_heuristic_never_overestimates_on_reachable_boards() {
        // Enumerate every board reachable from the classic layout.
        let mut boards = vec![Board::classic()];
        let mut index: HashMap<BoardKey, usize> = HashMap::new();
        index.insert(*boards[0].key(), 0);
        let mut neighbours: Vec<Vec<usize>> = Vec::new();
        let mut next = 0;
        while next < boards.len() {
            let mut adjacent = Vec::new();
            for (_, board) in boards[next].successors().unwrap() {
                let id = match index.get(board.key()) {
                    Some(&id) => id,
                    None => {
                        index.insert(*board.key(), boards.len());
                        boards.push(board);
                        boards.len() - 1
                    }
                };
                adjacent.push(id);
            }
            neighbours.push(adjacent);
            next += 1;
        }

        // Moves are reversible, so a breadth-first sweep outwards from every
        // goal board yields the true remaining distance of each board.
        let mut distance: Vec<Option<u32>> = vec![None; boards.len()];
        let mut queue = VecDeque::new();
        for (id, board) in boards.iter().enumerate() {
            if is_goal(board) {
                distance[id] = Some(0);
                queue.push_back(id);
            }
        }
        while let Some(id) = queue.pop_front() {
            let d = distance[id].unwrap();
            for &other in &neighbours[id] {
                if distance[other].is_none() {
                    distance[other] = Some(d + 1);
                    queue.push_back(other);
                }
            }
        }

        for (board, d) in boards.iter().zip(&distance) {
            let d = d.expect("classic layout is solvable from every reachable board");
            assert!(
                manhattan_distance(board) <= d,
                "heuristic {} exceeds distance {} for\n{}",
                manhattan_distance(board),
                d,
                board
            );
        }
    }

    #[test]
    fn test_no_solution_returns_none() {
        // Without singles the goal block can never leave the top rows.
        let layouts = [
            ["11<>", "11<>", "<><>", "<><>", "<>.."],
            ["11^^", "11vv", "<><>", "<><>", "<>.."],
        ];
        for rows in layouts {
            let board = board_from_str_array(&rows).unwrap();
            let astar_result = astar(&board, manhattan_distance, SearchLimits::default());
            assert!(matches!(astar_result, Ok(None)), "A* on {:?}", rows);
            let dfs_result = dfs(&board, SearchLimits::default());
            assert!(matches!(dfs_result, Ok(None)), "DFS on {:?}", rows);
        }
    }

    #[test]
    fn test_astar_is_deterministic() {
        let board = Board::classic().scramble(25, 99).unwrap();
        let first = astar(&board, manhattan_distance, SearchLimits::default())
            .unwrap()
            .unwrap();
        let second = astar(&board, manhattan_distance, SearchLimits::default())
            .unwrap()
            .unwrap();
        assert_eq!(first.depth, second.depth);
        assert_eq!(first.boards, second.boards);
        assert_eq!(first.moves, second.moves);
        assert_eq!(first.stats, second.stats);
    }

    #[test]
    fn test_budget_exceeded() {
        let limits = SearchLimits {
            max_expansions: Some(5),
        };
        for algorithm in [Algorithm::AStar, Algorithm::Dfs] {
            let result = solve(&Board::classic(), algorithm, limits);
            assert_eq!(
                result.unwrap_err(),
                SearchError::BudgetExceeded { expanded: 5 },
                "{}",
                algorithm
            );
        }
    }

    #[test]
    fn test_reconstruct_follows_parent_links() {
        let mut arena = StateArena::new();
        let root = arena.insert(State::initial(one_move_board(), manhattan_distance));
        let (mv, board) = one_move_board().successors().unwrap().remove(0);
        let child = arena.insert(State {
            board,
            depth: 1,
            heuristic: 0,
            parent: Some(root),
            last_move: Some(mv),
        });
        assert_eq!(reconstruct(&arena, root, child).unwrap(), vec![root, child]);
        assert_eq!(reconstruct(&arena, root, root).unwrap(), vec![root]);
    }

    #[test]
    fn test_reconstruct_rejects_foreign_chain() {
        let mut arena = StateArena::new();
        let root = arena.insert(State::initial(Board::classic(), manhattan_distance));
        let stranger = arena.insert(State::initial(solved_board(), manhattan_distance));
        assert_eq!(
            reconstruct(&arena, root, stranger),
            Err(SearchError::BrokenParentChain { goal_depth: 0 })
        );
    }

    #[test]
    fn test_is_valid_trajectory_rejects_jumps() {
        let start = Board::classic();
        let far = start.scramble(10, 5).unwrap();
        assert!(is_valid_trajectory(&[start.clone()]));
        assert!(!is_valid_trajectory(&[start.clone(), start.clone()]));
        if far != start && !start.successors().unwrap().iter().any(|(_, b)| b == &far) {
            assert!(!is_valid_trajectory(&[start, far]));
        }
    }
}
