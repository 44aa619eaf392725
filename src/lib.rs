//! # Hua Rong Dao Solver Library
//!
//! This library solves the Hua Rong Dao (Klotski) sliding-block puzzle: a
//! 4x5 board holding one 2x2 goal block, 1x2 dominoes and 1x1 singles with
//! exactly two empty cells. A solution slides the goal block, one cell per
//! move, until its top-left cell reaches row 3, column 1.
//!
//! It is used by three binaries:
//! - `solve_puzzle`: Reads a puzzle file, solves it with A* or DFS and writes
//!   every board of the solution to an output file.
//! - `search_evaluator`: Compares the search strategies on seeded scrambles
//!   of the classic layout.
//! - `human_player`: Lets a person slide the pieces from the command line.
//!
//! ## Modules
//! - `engine`: The board model (`Board`, `Piece`, `Symbol`), piece lookup,
//!   the move legality checker and successor generation.
//! - `heuristics`: The goal test and the heuristics used by A*.
//! - `solver`: The state arena and the DFS and A* search drivers, plus
//!   solution reconstruction.
//! - `utils`: Parsing puzzle files and writing/reading solution files.
//! - `error`: Error types for invalid boards, bad input and failed searches.

pub mod engine;
pub mod error;
pub mod heuristics;
pub mod solver;
pub mod utils;
