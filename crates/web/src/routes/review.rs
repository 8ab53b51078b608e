use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use shakmaty::Position;
use std::sync::Arc;

use chess_review_core::rules::{position_from_fen, serialize};
use chess_review_core::{review_game, Evaluator, MoveReview, MoveSpec, ReviewOptions, Tier};

use crate::error::AppError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeGameRequest {
    #[serde(default)]
    pub moves: Option<Vec<String>>,
    #[serde(default)]
    pub depth: Option<u8>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveReviewBody {
    #[serde(rename = "move")]
    pub mv: String,
    #[serde(rename = "type")]
    pub tier: Tier,
    pub explanation: String,
    pub evaluation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_move: Option<String>,
}

impl From<&MoveReview> for MoveReviewBody {
    fn from(review: &MoveReview) -> Self {
        Self {
            mv: review.mv.clone(),
            tier: review.tier,
            explanation: review.rationale.to_string(),
            evaluation: review.evaluation(),
            best_move: review.best_move.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct EvaluatePositionRequest {
    pub fen: String,
    #[serde(default)]
    pub depth: Option<u8>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluatePositionResponse {
    pub fen: String,
    pub evaluation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_move: Option<String>,
}

fn resolve_depth(requested: Option<u8>, default: u8) -> Result<u8, AppError> {
    match requested.unwrap_or(default) {
        0 => Err(AppError::MalformedRequest("depth must be at least 1".to_string())),
        depth => Ok(depth),
    }
}

pub async fn analyze_game(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AnalyzeGameRequest>, JsonRejection>,
) -> Result<Json<Vec<MoveReviewBody>>, AppError> {
    let Json(request) = payload?;
    let depth = resolve_depth(request.depth, state.depth)?;

    let moves: Vec<MoveSpec> = request
        .moves
        .unwrap_or_default()
        .into_iter()
        .map(MoveSpec::from)
        .collect();

    if moves.is_empty() {
        return Ok(Json(Vec::new()));
    }

    tracing::info!(moves = moves.len(), depth, "Reviewing game");

    let options = ReviewOptions { depth };
    let review = async {
        let mut engine = state.pool.acquire().await?;
        let reviews = review_game(&mut engine, &moves, &options).await?;
        Ok::<_, AppError>(reviews)
    };

    // The deadline covers waiting for a lease too. Dropping the review
    // future drops the lease, which discards a busy engine.
    let reviews = match state.deadline {
        Some(limit) => tokio::time::timeout(limit, review)
            .await
            .map_err(|_| AppError::Deadline(limit))??,
        None => review.await?,
    };

    Ok(Json(reviews.iter().map(MoveReviewBody::from).collect()))
}

pub async fn evaluate_position(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<EvaluatePositionRequest>, JsonRejection>,
) -> Result<Json<EvaluatePositionResponse>, AppError> {
    let Json(request) = payload?;
    let depth = resolve_depth(request.depth, state.depth)?;

    let position = position_from_fen(request.fen.trim())?;
    let fen = serialize(&position);

    let mut engine = state.pool.acquire().await?;
    let result = engine.evaluate(&fen, depth).await?;

    let white_cp = result.white_centipawns(position.turn());
    let best_move = Some(result.best_move).filter(|m| !m.is_empty());

    Ok(Json(EvaluatePositionResponse {
        fen,
        evaluation: format!("{:.2}", white_cp as f64 / 100.0),
        best_move,
    }))
}
