//! Chess Review Core Library
//!
//! Replays a game move by move, asks a UCI engine for an evaluation before
//! and after each move, and grades every move from Best to Blunder.
//!
//! ```ignore
//! use chess_review_core::{review_game, EngineConfig, EnginePool, MoveSpec, ReviewOptions};
//!
//! let pool = EnginePool::new(EngineConfig::from_env());
//! let mut engine = pool.acquire().await?;
//! let moves: Vec<MoveSpec> = ["e4", "e5", "Nf3"].into_iter().map(MoveSpec::from).collect();
//! for review in review_game(&mut engine, &moves, &ReviewOptions::default()).await? {
//!     println!("{} {} {}", review.mv, review.tier, review.evaluation());
//! }
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod parser;
pub mod review;
pub mod rules;

pub use config::EngineConfig;
pub use engine::{EngineError, EngineLease, EnginePool, EvaluationResult, Evaluator, StockfishEngine};
pub use error::{Error, Result, ReviewError};
pub use review::{classify, review_game, MoveReview, ReviewOptions, Tier};
pub use rules::{IllegalMove, MoveSpec};
