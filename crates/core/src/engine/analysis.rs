//! Types for representing engine evaluations

use std::fmt;
use std::future::Future;

use shakmaty::Color;

use super::stockfish::EngineError;

/// Centipawn value used for a forced mate
pub const MATE_CP: i32 = 10_000;

/// Score as reported by the engine, relative to the side to move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Score {
    /// Centipawn score (positive = side to move is better)
    Centipawns(i32),
    /// Forced mate in N (positive = side to move mates, 0 or negative = side to move is mated)
    Mate(i32),
}

impl Score {
    /// Converts the score to centipawns, mapping mates to +/- [`MATE_CP`]
    pub fn as_centipawns(&self) -> i32 {
        match self {
            Score::Centipawns(cp) => *cp,
            Score::Mate(moves) if *moves > 0 => MATE_CP,
            Score::Mate(_) => -MATE_CP,
        }
    }

    /// Converts the score to pawns
    pub fn as_pawns(&self) -> f64 {
        self.as_centipawns() as f64 / 100.0
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Score::Centipawns(cp) => {
                let score = *cp as f64 / 100.0;
                if score >= 0.0 {
                    write!(f, "+{:.2}", score)
                } else {
                    write!(f, "{:.2}", score)
                }
            }
            Score::Mate(moves) => write!(f, "M{}", moves),
        }
    }
}

/// Result of evaluating one position
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvaluationResult {
    /// Last exact score seen before `bestmove`, if any
    pub score: Option<Score>,
    /// Principal move in UCI notation, empty when the engine had none
    pub best_move: String,
}

impl EvaluationResult {
    pub fn new(score: Option<Score>, best_move: impl Into<String>) -> Self {
        Self {
            score,
            best_move: best_move.into(),
        }
    }

    /// Centipawns for the side to move; a missing score counts as 0
    pub fn centipawns(&self) -> i32 {
        self.score.map(|s| s.as_centipawns()).unwrap_or(0)
    }

    /// Pawns for the side to move; a missing score counts as 0
    pub fn pawns(&self) -> f64 {
        self.centipawns() as f64 / 100.0
    }

    /// Centipawns from White's point of view, given who was to move
    pub fn white_centipawns(&self, turn: Color) -> i32 {
        match turn {
            Color::White => self.centipawns(),
            Color::Black => -self.centipawns(),
        }
    }
}

/// Anything that can evaluate a FEN position to a given depth
///
/// Implemented by a single engine process and by a pooled engine lease.
pub trait Evaluator {
    fn evaluate(
        &mut self,
        fen: &str,
        depth: u8,
    ) -> impl Future<Output = Result<EvaluationResult, EngineError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mate_scores_saturate() {
        assert_eq!(Score::Mate(3).as_centipawns(), MATE_CP);
        assert_eq!(Score::Mate(-1).as_centipawns(), -MATE_CP);
        // mate 0: side to move has been mated
        assert_eq!(Score::Mate(0).as_centipawns(), -MATE_CP);
        assert_eq!(Score::Mate(2).as_pawns(), 100.0);
    }

    #[test]
    fn test_missing_score_is_zero() {
        let result = EvaluationResult::new(None, "");
        assert_eq!(result.centipawns(), 0);
        assert_eq!(result.pawns(), 0.0);
    }

    #[test]
    fn test_white_perspective() {
        let result = EvaluationResult::new(Some(Score::Centipawns(45)), "e7e5");
        assert_eq!(result.white_centipawns(Color::White), 45);
        assert_eq!(result.white_centipawns(Color::Black), -45);
    }

    #[test]
    fn test_display() {
        assert_eq!(Score::Centipawns(35).to_string(), "+0.35");
        assert_eq!(Score::Centipawns(-120).to_string(), "-1.20");
        assert_eq!(Score::Mate(-4).to_string(), "M-4");
    }
}
