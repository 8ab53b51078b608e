//! Command line game review

use std::env;
use std::process;

use chess_review_core::parser::parse_pgn_file;
use chess_review_core::{
    review_game, EngineConfig, MoveReview, MoveSpec, ReviewError, ReviewOptions, StockfishEngine,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 3 {
        print_usage(&args[0]);
        process::exit(1);
    }

    let config = EngineConfig::from_env();

    let code = match args[1].as_str() {
        "pgn" => review_pgn(&config, &args[2]).await,
        "moves" => {
            let moves: Vec<MoveSpec> = args[2..].iter().map(|m| MoveSpec::from(m.as_str())).collect();
            review_moves(&config, &moves).await
        }
        _ => {
            print_usage(&args[0]);
            1
        }
    };

    process::exit(code);
}

fn print_usage(program: &str) {
    println!("Usage: {} <command> [arguments]", program);
    println!();
    println!("Commands:");
    println!("  pgn <pgn_file>       Review every game in a PGN file");
    println!("  moves <m1> <m2> ...  Review one game given as SAN or UCI moves");
    println!();
    println!("Environment:");
    println!("  STOCKFISH_PATH, ENGINE_DEPTH, ENGINE_TIMEOUT_SECS");
    println!();
    println!("Examples:");
    println!("  {} pgn games.pgn", program);
    println!("  {} moves e4 e5 Nf3 Nc6 Bb5", program);
}

async fn start_engine(config: &EngineConfig) -> Option<StockfishEngine> {
    match StockfishEngine::spawn(config).await {
        Ok(engine) => {
            println!("[OK] {} ready (depth {})", engine.name(), config.depth);
            println!();
            Some(engine)
        }
        Err(e) => {
            println!("[ERROR] Failed to start engine: {}", e);
            println!();
            println!("Make sure Stockfish is installed or set STOCKFISH_PATH:");
            println!("  sudo apt install stockfish");
            None
        }
    }
}

async fn review_pgn(config: &EngineConfig, path: &str) -> i32 {
    let games = match parse_pgn_file(path) {
        Ok(g) => g,
        Err(e) => {
            println!("[ERROR] {}", e);
            return 1;
        }
    };

    println!("[OK] Found {} game(s) in {}", games.len(), path);

    let Some(mut engine) = start_engine(config).await else {
        return 1;
    };
    let options = ReviewOptions { depth: config.depth };

    let mut failures = 0;
    for (index, game) in games.iter().enumerate() {
        println!("================================================================");
        println!("Game {}: {} ({} moves)", index + 1, game.summary(), game.move_count());
        println!("================================================================");

        match review_game(&mut engine, &game.move_specs(), &options).await {
            Ok(reviews) => print_reviews(&reviews),
            Err(e) => {
                failures += 1;
                print_failure(&e);
                if e.is_timeout() {
                    // The engine is mid-search, start over with a fresh one
                    match start_engine(config).await {
                        Some(fresh) => engine = fresh,
                        None => return 1,
                    }
                }
            }
        }
        println!();
    }

    engine.quit().await;
    if failures == 0 { 0 } else { 1 }
}

async fn review_moves(config: &EngineConfig, moves: &[MoveSpec]) -> i32 {
    let Some(mut engine) = start_engine(config).await else {
        return 1;
    };
    let options = ReviewOptions { depth: config.depth };

    let code = match review_game(&mut engine, moves, &options).await {
        Ok(reviews) => {
            print_reviews(&reviews);
            0
        }
        Err(e) => {
            print_failure(&e);
            1
        }
    };

    engine.quit().await;
    code
}

fn print_reviews(reviews: &[MoveReview]) {
    for review in reviews {
        let prefix = if review.index % 2 == 0 {
            format!("{}.", review.move_number())
        } else {
            format!("{}...", review.move_number())
        };
        let best = review
            .best_move
            .as_deref()
            .map(|b| format!("  (best: {})", b))
            .unwrap_or_default();
        println!(
            "   {:<6} {:<8} {:<11} {:>7}{}",
            prefix,
            review.mv,
            review.tier.as_str(),
            review.evaluation(),
            best
        );
    }
}

fn print_failure(error: &ReviewError) {
    match error {
        ReviewError::IllegalMove(illegal) => {
            println!("[ERROR] Illegal move '{}' at index {}", illegal.mv, illegal.index);
            println!("   Position: {}", illegal.fen_before);
            println!("   Reason: {}", illegal.reason);
        }
        ReviewError::Engine { .. } => println!("[ERROR] {}", error),
    }
}
