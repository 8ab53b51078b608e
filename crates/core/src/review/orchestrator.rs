//! Per-move game review loop

use shakmaty::Position;
use tracing::{debug, instrument};

use super::classify::{classify_move, Tier};
use crate::engine::Evaluator;
use crate::error::ReviewError;
use crate::rules::{apply_move, serialize, starting_position, MoveSpec};

/// Settings for one review
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewOptions {
    /// Search depth for every evaluation
    pub depth: u8,
}

impl Default for ReviewOptions {
    fn default() -> Self {
        Self { depth: 12 }
    }
}

/// Verdict on one played move
///
/// Evaluations are centipawns from White's point of view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveReview {
    /// Zero-based ply index
    pub index: usize,
    /// The move as submitted
    pub mv: String,
    /// The move in coordinate notation
    pub uci: String,
    pub tier: Tier,
    pub rationale: &'static str,
    pub cp_loss: i32,
    pub eval_before: i32,
    pub eval_after: i32,
    /// Engine's choice, only when it differs from the played move
    pub best_move: Option<String>,
    pub fen_before: String,
    pub fen_after: String,
}

impl MoveReview {
    /// Evaluation after the move in pawns, two decimals
    pub fn evaluation(&self) -> String {
        format!("{:.2}", self.eval_after as f64 / 100.0)
    }

    /// Move number as printed in PGN (1. e4 e5 2. Nf3 ...)
    pub fn move_number(&self) -> usize {
        self.index / 2 + 1
    }
}

/// Reviews a game from the standard starting position
///
/// Each move costs two evaluations, one before and one after it is played.
/// The first illegal move or engine failure aborts the review; no partial
/// result is returned.
#[instrument(skip_all, fields(moves = moves.len(), depth = options.depth))]
pub async fn review_game<E: Evaluator>(
    engine: &mut E,
    moves: &[MoveSpec],
    options: &ReviewOptions,
) -> Result<Vec<MoveReview>, ReviewError> {
    let mut reviews = Vec::with_capacity(moves.len());
    let mut before = starting_position();

    for (index, played) in moves.iter().enumerate() {
        let fen_before = serialize(&before);
        let eval_before = engine
            .evaluate(&fen_before, options.depth)
            .await
            .map_err(|source| ReviewError::Engine { index, source })?;

        let applied = apply_move(&before, index, played)?;

        let fen_after = serialize(&applied.position);
        let eval_after = engine
            .evaluate(&fen_after, options.depth)
            .await
            .map_err(|source| ReviewError::Engine { index, source })?;

        let cp_before = eval_before.white_centipawns(before.turn());
        let cp_after = eval_after.white_centipawns(applied.position.turn());
        let cp_loss = (cp_before - cp_after).abs();

        let classification = classify_move(cp_loss, &applied.uci, &eval_before.best_move);
        let best_move = Some(eval_before.best_move)
            .filter(|best| !best.is_empty() && *best != applied.uci);

        debug!(
            index,
            mv = %played,
            uci = %applied.uci,
            cp_before,
            cp_after,
            cp_loss,
            tier = %classification.tier,
            "move reviewed"
        );

        reviews.push(MoveReview {
            index,
            mv: played.to_string(),
            uci: applied.uci,
            tier: classification.tier,
            rationale: classification.rationale,
            cp_loss,
            eval_before: cp_before,
            eval_after: cp_after,
            best_move,
            fen_before,
            fen_after,
        });

        before = applied.position;
    }

    Ok(reviews)
}
