//! Chess engine integration
//!
//! Provides interface to UCI-compatible engines like Stockfish.

pub mod analysis;
pub mod pool;
pub mod stockfish;
pub mod uci;

// Re-export main types for convenience
pub use analysis::{EvaluationResult, Evaluator, Score, MATE_CP};
pub use pool::{EngineLease, EnginePool};
pub use stockfish::{EngineError, StockfishEngine};
pub use uci::{parse_line, EngineEvent, InfoLine};
