//! Move application on top of shakmaty
//!
//! Accepts moves in SAN (`Nf3`, `exd8=Q+`, `O-O`) or coordinate notation
//! (`g1f3`, `e7e8q`) and reports every played move back in coordinate
//! notation so it can be compared against engine output.

use std::fmt;

use shakmaty::{
    fen::Fen, san::SanPlus, uci::UciMove, CastlingMode, Chess, EnPassantMode, Move, Position,
    Role, Square,
};
use thiserror::Error;

/// A move as supplied by the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveSpec {
    /// Structured origin/destination pair
    Coordinates {
        from: Square,
        to: Square,
        promotion: Option<Role>,
    },
    /// Algebraic token, SAN or coordinate notation
    Token(String),
}

impl MoveSpec {
    pub fn coordinates(from: Square, to: Square, promotion: Option<Role>) -> Self {
        MoveSpec::Coordinates { from, to, promotion }
    }

    /// Finds the legal move this denotes in `position`
    fn resolve(&self, position: &Chess) -> Result<Move, String> {
        match self {
            MoveSpec::Coordinates { from, to, promotion } => {
                let uci = UciMove::Normal {
                    from: *from,
                    to: *to,
                    promotion: *promotion,
                };
                uci.to_move(position).map_err(|e| e.to_string())
            }
            MoveSpec::Token(token) => resolve_token(token.trim(), position),
        }
    }
}

fn resolve_token(token: &str, position: &Chess) -> Result<Move, String> {
    if token.is_empty() {
        return Err("empty move".to_string());
    }

    if let Ok(uci) = token.parse::<UciMove>() {
        if matches!(uci, UciMove::Null) {
            return Err("null move".to_string());
        }
        return uci.to_move(position).map_err(|e| e.to_string());
    }

    let san: SanPlus = token
        .parse()
        .map_err(|_| format!("unrecognized move notation '{}'", token))?;
    san.san.to_move(position).map_err(|e| e.to_string())
}

impl From<&str> for MoveSpec {
    fn from(token: &str) -> Self {
        MoveSpec::Token(token.to_string())
    }
}

impl From<String> for MoveSpec {
    fn from(token: String) -> Self {
        MoveSpec::Token(token)
    }
}

impl fmt::Display for MoveSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveSpec::Token(token) => write!(f, "{}", token),
            MoveSpec::Coordinates { from, to, promotion } => {
                write!(f, "{}{}", from, to)?;
                if let Some(role) = promotion {
                    write!(f, "{}", role.char())?;
                }
                Ok(())
            }
        }
    }
}

/// A move that could not be applied, with the context to reproduce it
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("illegal move '{mv}' at index {index} ({reason}) in position {fen_before}")]
pub struct IllegalMove {
    /// The move as the caller supplied it
    pub mv: String,
    /// Zero-based index in the submitted move list
    pub index: usize,
    /// Position the move was attempted against
    pub fen_before: String,
    pub reason: String,
}

/// Result of a successfully applied move
#[derive(Debug, Clone)]
pub struct AppliedMove {
    pub position: Chess,
    /// Played move in coordinate notation, castling as king move (`e1g1`)
    pub uci: String,
}

/// Applies move number `index` of a game to `position`
pub fn apply_move(position: &Chess, index: usize, spec: &MoveSpec) -> Result<AppliedMove, IllegalMove> {
    let illegal = |reason: String| IllegalMove {
        mv: spec.to_string(),
        index,
        fen_before: serialize(position),
        reason,
    };

    let mv = spec.resolve(position).map_err(illegal)?;
    let uci = mv.to_uci(CastlingMode::Standard).to_string();

    let next = position
        .clone()
        .play(mv)
        .map_err(|e| illegal(e.to_string()))?;

    Ok(AppliedMove {
        position: next,
        uci,
    })
}

/// Serializes a position as FEN
pub fn serialize(position: &Chess) -> String {
    Fen::from_position(position, EnPassantMode::Legal).to_string()
}

/// Error for a FEN that does not describe a legal standard chess position
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid FEN '{fen}': {reason}")]
pub struct InvalidFen {
    pub fen: String,
    pub reason: String,
}

/// Parses a FEN string into a position
pub fn position_from_fen(fen: &str) -> Result<Chess, InvalidFen> {
    let invalid = |reason: String| InvalidFen {
        fen: fen.to_string(),
        reason,
    };
    let parsed: Fen = fen.trim().parse().map_err(|e| invalid(format!("{}", e)))?;
    parsed
        .into_position(CastlingMode::Standard)
        .map_err(|e| invalid(format!("{}", e)))
}

/// Creates the standard starting position
pub fn starting_position() -> Chess {
    Chess::default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shakmaty::Color;

    const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    fn play_all(moves: &[&str]) -> Result<Vec<AppliedMove>, IllegalMove> {
        let mut position = starting_position();
        let mut applied = Vec::new();
        for (index, token) in moves.iter().enumerate() {
            let step = apply_move(&position, index, &MoveSpec::from(*token))?;
            position = step.position.clone();
            applied.push(step);
        }
        Ok(applied)
    }

    #[test]
    fn test_serialize_start() {
        assert_eq!(serialize(&starting_position()), START_FEN);
    }

    #[test]
    fn test_san_and_uci_normalize_to_same_move() {
        let start = starting_position();
        let san = apply_move(&start, 0, &"Nf3".into()).unwrap();
        let uci = apply_move(&start, 0, &"g1f3".into()).unwrap();
        assert_eq!(san.uci, "g1f3");
        assert_eq!(uci.uci, "g1f3");
        assert_eq!(serialize(&san.position), serialize(&uci.position));
        assert_eq!(san.position.turn(), Color::Black);
    }

    #[test]
    fn test_structured_move() {
        let spec = MoveSpec::coordinates(Square::E2, Square::E4, None);
        assert_eq!(spec.to_string(), "e2e4");
        let applied = apply_move(&starting_position(), 0, &spec).unwrap();
        assert_eq!(applied.uci, "e2e4");
    }

    #[test]
    fn test_castling_is_king_move() {
        let applied = play_all(&["e4", "e5", "Nf3", "Nc6", "Bc4", "Bc5", "O-O"]).unwrap();
        assert_eq!(applied.last().unwrap().uci, "e1g1");
    }

    #[test]
    fn test_check_suffix_accepted() {
        let applied = play_all(&["e4", "f5", "Qh5+"]).unwrap();
        assert_eq!(applied[2].uci, "d1h5");
    }

    #[test]
    fn test_promotion_letter() {
        let position = position_from_fen("8/4P3/8/8/8/8/k7/4K3 w - - 0 1").unwrap();
        let applied = apply_move(&position, 0, &"e8=Q".into()).unwrap();
        assert_eq!(applied.uci, "e7e8q");
        let spec = MoveSpec::coordinates(Square::E7, Square::E8, Some(Role::Knight));
        assert_eq!(spec.to_string(), "e7e8n");
        assert_eq!(apply_move(&position, 0, &spec).unwrap().uci, "e7e8n");
    }

    #[test]
    fn test_illegal_move_carries_context() {
        let err = play_all(&["e4", "e5", "Ke2", "Ke2"]).unwrap_err();
        assert_eq!(err.index, 3);
        assert_eq!(err.mv, "Ke2");
        assert_eq!(
            err.fen_before,
            "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPPKPPP/RNBQ1BNR b kq - 1 2"
        );
    }

    #[test]
    fn test_garbage_tokens_are_illegal() {
        let start = starting_position();
        for token in ["", "zz9", "0000", "e2e5", "Qd4"] {
            assert!(
                apply_move(&start, 0, &MoveSpec::from(token)).is_err(),
                "{token:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_invalid_fen() {
        assert!(position_from_fen("not a fen").is_err());
        assert!(position_from_fen(START_FEN).is_ok());
    }
}
