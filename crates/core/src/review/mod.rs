//! Game review: replay a game, evaluate every ply, grade every move

pub mod classify;
pub mod orchestrator;

pub use classify::{classify, classify_cp, classify_move, Classification, Tier};
pub use orchestrator::{review_game, MoveReview, ReviewOptions};
