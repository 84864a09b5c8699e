//! Operating regimes.

use serde::{Deserialize, Serialize};

/// Operating context that sets how strict quality gating is.
///
/// Variants are ordered from most permissive to most strict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Regime {
    /// Ambiguous intent; wider search, lower bar.
    Exploration,
    /// Partially specified intent; tuned alternatives.
    Optimization,
    /// Fully specified, high-certainty intent; only proven plans.
    Stabilization,
}

impl Regime {
    pub const ALL: [Regime; 3] = [
        Regime::Exploration,
        Regime::Optimization,
        Regime::Stabilization,
    ];

    /// Share of calls expected to land in this regime over the long run.
    pub fn target_frequency(&self) -> f64 {
        match self {
            Regime::Exploration => 0.30,
            Regime::Optimization => 0.20,
            Regime::Stabilization => 0.50,
        }
    }

    /// Steps between two regimes: 0 same, 1 adjacent, 2 opposite.
    pub fn distance(&self, other: &Regime) -> u8 {
        (self.rank() as i8 - other.rank() as i8).unsigned_abs()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Regime::Exploration => "exploration",
            Regime::Optimization => "optimization",
            Regime::Stabilization => "stabilization",
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Regime::Exploration => 0,
            Regime::Optimization => 1,
            Regime::Stabilization => 2,
        }
    }
}

impl std::fmt::Display for Regime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_frequencies_sum_to_one() {
        let total: f64 = Regime::ALL.iter().map(Regime::target_frequency).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_distance() {
        assert_eq!(Regime::Exploration.distance(&Regime::Exploration), 0);
        assert_eq!(Regime::Exploration.distance(&Regime::Optimization), 1);
        assert_eq!(Regime::Stabilization.distance(&Regime::Exploration), 2);
        assert!(Regime::Exploration < Regime::Stabilization);
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Regime::Stabilization).unwrap();
        assert_eq!(json, "\"stabilization\"");
    }
}
