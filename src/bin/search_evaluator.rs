use hrd_solver::engine::Board;
use hrd_solver::error::SearchError;
use hrd_solver::heuristics::{manhattan_distance, zero};
use hrd_solver::solver::{astar, dfs, is_valid_trajectory, SearchLimits, Solution};

const NUM_SCRAMBLES_FOR_EVALUATION: usize = 20;
const SCRAMBLE_STEPS: usize = 60;
const START_SEED: u64 = 0;

type SearchFn = fn(&Board, SearchLimits) -> Result<Option<Solution>, SearchError>;

fn astar_manhattan(board: &Board, limits: SearchLimits) -> Result<Option<Solution>, SearchError> {
    astar(board, manhattan_distance, limits)
}

fn uniform_cost(board: &Board, limits: SearchLimits) -> Result<Option<Solution>, SearchError> {
    astar(board, zero, limits)
}

#[derive(Default)]
struct Totals {
    solved: usize,
    depth: u64,
    expanded: u64,
}

fn main() {
    env_logger::init();

    let strategies: Vec<(&str, SearchFn)> = vec![
        ("A*", astar_manhattan),
        ("UCS", uniform_cost),
        ("DFS", dfs),
    ];
    let mut totals: Vec<Totals> = strategies.iter().map(|_| Totals::default()).collect();

    println!(
        "Starting search evaluation for {} scrambles of {} moves...",
        NUM_SCRAMBLES_FOR_EVALUATION, SCRAMBLE_STEPS
    );

    for index in 0..NUM_SCRAMBLES_FOR_EVALUATION {
        let seed = START_SEED + index as u64;
        let board = match Board::classic().scramble(SCRAMBLE_STEPS, seed) {
            Ok(board) => board,
            Err(e) => {
                eprintln!("Error: scramble with seed {} failed: {}", seed, e);
                continue;
            }
        };

        println!("\nEvaluating scramble {} (Seed: {})\n{}", index, seed, board);

        for ((name, search), total) in strategies.iter().zip(totals.iter_mut()) {
            match search(&board, SearchLimits::default()) {
                Ok(Some(solution)) => {
                    if !is_valid_trajectory(&solution.boards) {
                        eprintln!(
                            "Error: {} produced an invalid trajectory for seed {}",
                            name, seed
                        );
                        continue;
                    }
                    println!(
                        "  Strategy: {:<5}, Moves: {:<6}, Expanded: {}",
                        name, solution.depth, solution.stats.expanded
                    );
                    total.solved += 1;
                    total.depth += u64::from(solution.depth);
                    total.expanded += solution.stats.expanded as u64;
                }
                Ok(None) => println!("  Strategy: {:<5}, no solution", name),
                Err(e) => eprintln!("Error: {} failed on seed {}: {}", name, seed, e),
            }
        }
    }

    println!("\n--- Evaluation Complete ---");
    println!("\n--- Averages over solved scrambles ---");
    for ((name, _), total) in strategies.iter().zip(&totals) {
        if total.solved == 0 {
            println!("Strategy {}: No solutions recorded.", name);
            continue;
        }
        let solved = total.solved as f64;
        println!(
            "Strategy {:<5}: Average Moves = {:.2}, Average Expanded = {:.1}",
            name,
            total.depth as f64 / solved,
            total.expanded as f64 / solved
        );
    }
}
