//! Move quality classification

use std::fmt;

use serde::{Deserialize, Serialize};

/// Quality tier assigned to a played move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    /// < 30 centipawn loss
    Best,
    /// 30-69 centipawn loss
    Average,
    /// 70-99 centipawn loss
    Inaccuracy,
    /// 100-199 centipawn loss
    Mistake,
    /// >= 200 centipawn loss
    Blunder,
}

impl Tier {
    pub const ALL: [Tier; 5] = [
        Tier::Best,
        Tier::Average,
        Tier::Inaccuracy,
        Tier::Mistake,
        Tier::Blunder,
    ];

    pub fn from_cp_loss(cp_loss: i32) -> Self {
        match cp_loss.abs() {
            l if l >= 200 => Tier::Blunder,
            l if l >= 100 => Tier::Mistake,
            l if l >= 70 => Tier::Inaccuracy,
            l if l >= 30 => Tier::Average,
            _ => Tier::Best,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Best => "Best",
            Tier::Average => "Average",
            Tier::Inaccuracy => "Inaccuracy",
            Tier::Mistake => "Mistake",
            Tier::Blunder => "Blunder",
        }
    }

    pub fn rationale(&self) -> &'static str {
        match self {
            Tier::Best => "Excellent move",
            Tier::Average => "Solid, but not optimal",
            Tier::Inaccuracy => "Inaccuracy, this could be improved",
            Tier::Mistake => "Mistake, a better move existed",
            Tier::Blunder => "Blunder, loses a significant advantage",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tier together with its human readable explanation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub tier: Tier,
    pub rationale: &'static str,
}

impl From<Tier> for Classification {
    fn from(tier: Tier) -> Self {
        Classification {
            tier,
            rationale: tier.rationale(),
        }
    }
}

/// Classifies an evaluation loss given in centipawns
pub fn classify_cp(cp_loss: i32) -> Classification {
    Tier::from_cp_loss(cp_loss).into()
}

/// Classifies an evaluation loss given in pawns
///
/// The loss is rounded to whole centipawns first, so 0.30 lands on the
/// Average side of the boundary however it was computed.
pub fn classify(loss: f64) -> Classification {
    classify_cp((loss * 100.0).round() as i32)
}

/// Classifies a played move, forcing Best when it matches the engine's choice
pub fn classify_move(cp_loss: i32, played: &str, principal: &str) -> Classification {
    if !principal.is_empty() && played == principal {
        return Tier::Best.into();
    }
    classify_cp(cp_loss)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries_fall_in_higher_tier() {
        assert_eq!(classify(0.29).tier, Tier::Best);
        assert_eq!(classify(0.30).tier, Tier::Average);
        assert_eq!(classify(0.69).tier, Tier::Average);
        assert_eq!(classify(0.70).tier, Tier::Inaccuracy);
        assert_eq!(classify(0.99).tier, Tier::Inaccuracy);
        assert_eq!(classify(1.00).tier, Tier::Mistake);
        assert_eq!(classify(1.99).tier, Tier::Mistake);
        assert_eq!(classify(2.00).tier, Tier::Blunder);
        assert_eq!(classify(100.0).tier, Tier::Blunder);
    }

    #[test]
    fn test_float_noise_at_boundary() {
        // 0.7 - 0.4 is 0.29999999999999993 in binary floating point
        assert_eq!(classify(0.7 - 0.4).tier, Tier::Average);
        assert_eq!(classify(0.0).tier, Tier::Best);
    }

    #[test]
    fn test_rationale_matches_tier() {
        assert_eq!(classify(0.1).rationale, "Excellent move");
        assert_eq!(classify(0.5).rationale, "Solid, but not optimal");
        assert_eq!(classify(0.8).rationale, "Inaccuracy, this could be improved");
        assert_eq!(classify(1.5).rationale, "Mistake, a better move existed");
        assert_eq!(classify(3.0).rationale, "Blunder, loses a significant advantage");
    }

    #[test]
    fn test_principal_move_override() {
        let c = classify_move(850, "e2e4", "e2e4");
        assert_eq!(c.tier, Tier::Best);
        assert_eq!(c.rationale, "Excellent move");

        assert_eq!(classify_move(850, "d2d4", "e2e4").tier, Tier::Blunder);
        // An empty principal move never matches
        assert_eq!(classify_move(850, "", "").tier, Tier::Blunder);
    }

    #[test]
    fn test_tier_display() {
        let names: Vec<String> = Tier::ALL.iter().map(|t| t.to_string()).collect();
        assert_eq!(names, ["Best", "Average", "Inaccuracy", "Mistake", "Blunder"]);
    }
}
