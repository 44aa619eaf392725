use clap::Parser;
use hrd_solver::solver::{solve, Algorithm, SearchLimits};
use hrd_solver::utils::{read_puzzle, write_solution};
use log::info;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// The input file that contains the puzzle
    #[clap(long)]
    inputfile: PathBuf,

    /// The output file that receives the solution
    #[clap(long)]
    outputfile: PathBuf,

    /// The searching algorithm
    #[clap(long, value_enum)]
    algo: Algorithm,

    /// Give up after expanding this many states
    #[clap(long)]
    max_expansions: Option<usize>,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let board = match read_puzzle(&args.inputfile) {
        Ok(board) => board,
        Err(e) => {
            eprintln!("Failed to read puzzle from {}: {}", args.inputfile.display(), e);
            return ExitCode::FAILURE;
        }
    };
    info!("Loaded board from {}:\n{}", args.inputfile.display(), board);

    let limits = SearchLimits {
        max_expansions: args.max_expansions,
    };
    let started = Instant::now();
    let result = solve(&board, args.algo, limits);
    info!("{} search finished in {:.2?}", args.algo, started.elapsed());

    match result {
        Ok(Some(solution)) => {
            if let Err(e) = write_solution(&args.outputfile, &solution.boards) {
                eprintln!("Failed to write solution to {}: {}", args.outputfile.display(), e);
                return ExitCode::FAILURE;
            }
            println!(
                "Solved with {} in {} moves ({}).",
                args.algo, solution.depth, solution.stats
            );
            ExitCode::SUCCESS
        }
        Ok(None) => {
            eprintln!("No solution found.");
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Search failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
