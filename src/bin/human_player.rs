use hrd_solver::engine::{Board, Direction, Move};
use hrd_solver::heuristics::is_goal;
use std::io::{self, Write};

fn main() {
    let mut history: Vec<Board> = vec![Board::classic()];
    println!("Welcome to Hua Rong Dao! Slide the 1 block to the bottom exit.");

    loop {
        let Some(board) = history.last().cloned() else {
            break;
        };
        println!("---------------------");
        println!("Moves: {}", history.len() - 1);
        println!("{}", board);

        if is_goal(&board) {
            println!("---------------------");
            println!("🎉 SOLVED! 🎉");
            println!("Total Moves: {}", history.len() - 1);
            println!("---------------------");
            break;
        }

        print!("Enter your move (row col u/d/l/r), or 'z' to undo, 'q' to quit: ");
        if io::stdout().flush().is_err() {
            break;
        }

        let mut input = String::new();
        if io::stdin().read_line(&mut input).is_err() {
            println!("Error reading input. Please try again.");
            continue;
        }

        let trimmed_input = input.trim();

        if trimmed_input == "q" {
            println!("Thanks for playing!");
            break;
        }

        if trimmed_input == "z" {
            if history.len() > 1 {
                history.pop();
                println!("Move undone.");
            } else {
                println!("Cannot undo further (already at initial state).");
            }
            continue;
        }

        let parts: Vec<&str> = trimmed_input.split_whitespace().collect();
        if parts.len() != 3 {
            println!("Invalid input format. Use 'row col direction', 'z', or 'q'.");
            continue;
        }
        let (Ok(r), Ok(c), Some(direction)) = (
            parts[0].parse::<usize>(),
            parts[1].parse::<usize>(),
            Direction::from_letter(parts[2]),
        ) else {
            println!("Invalid input: expected e.g. '4 0 r' (row, column, one of u/d/l/r).");
            continue;
        };

        let Some((piece, _)) = board.locate_piece_at(r, c) else {
            println!("No piece at ({}, {}).", r, c);
            continue;
        };

        if !board.is_legal(&board.pieces()[piece], direction) {
            println!("That piece cannot move {}.", direction);
            continue;
        }

        match board.apply_move(Move { piece, direction }) {
            Ok(next) => history.push(next),
            Err(e) => println!("Move rejected: {}", e),
        }
    }
}
