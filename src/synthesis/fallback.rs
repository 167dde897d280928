//! Rule-based synthesis
//!
//! Four boolean signals read off the two summaries; the decision depends
//! on nothing but how many of them hold.

use crate::models::{Decision, Recommendation};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    StrongQualitative,
    MarketOpportunity,
    PositiveGrowth,
    StablePerformance,
}

impl Signal {
    pub const ALL: [Signal; 4] = [
        Signal::StrongQualitative,
        Signal::MarketOpportunity,
        Signal::PositiveGrowth,
        Signal::StablePerformance,
    ];

    /// Justification phrase appended when the signal holds
    pub fn phrase(&self) -> &'static str {
        match self {
            Signal::StrongQualitative => "Strong qualitative indicators",
            Signal::MarketOpportunity => "Market opportunity identified",
            Signal::PositiveGrowth => "Positive growth metrics",
            Signal::StablePerformance => "Stable financial performance",
        }
    }

    /// Both inputs must already be lower-cased.
    fn detect(&self, qualitative: &str, quantitative: &str) -> bool {
        match self {
            Signal::StrongQualitative => contains_any(
                qualitative,
                &["strong", "experienced", "expert", "innovative"],
            ),
            Signal::MarketOpportunity => {
                contains_any(qualitative, &["market", "opportunity", "growth"])
            }
            Signal::PositiveGrowth => {
                quantitative.contains("growth") && !quantitative.contains("decline")
            }
            Signal::StablePerformance => contains_any(quantitative, &["stable", "consistent"]),
        }
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

/// Which signals hold, in `Signal::ALL` order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Signals([bool; 4]);

impl Signals {
    pub fn new(flags: [bool; 4]) -> Self {
        Self(flags)
    }

    pub fn detect(qualitative: &str, quantitative: &str) -> Self {
        let qualitative = qualitative.to_lowercase();
        let quantitative = quantitative.to_lowercase();

        let mut flags = [false; 4];
        for (flag, signal) in flags.iter_mut().zip(Signal::ALL) {
            *flag = signal.detect(&qualitative, &quantitative);
        }
        Self(flags)
    }

    pub fn active(&self) -> impl Iterator<Item = Signal> + '_ {
        Signal::ALL
            .into_iter()
            .zip(self.0)
            .filter_map(|(signal, on)| on.then_some(signal))
    }

    pub fn count(&self) -> usize {
        self.0.iter().filter(|on| **on).count()
    }

    /// 3+ signals invest, exactly 2 monitor, otherwise pass.
    pub fn decide(&self) -> Decision {
        match self.count() {
            n if n >= 3 => Decision::Invest,
            2 => Decision::Monitor,
            _ => Decision::Pass,
        }
    }

    pub fn recommendation(&self) -> Recommendation {
        let decision = self.decide();
        let phrases: Vec<&str> = self.active().map(|s| s.phrase()).collect();
        let reasons = if phrases.is_empty() {
            "no positive indicators".to_string()
        } else {
            phrases.join(", ")
        };

        Recommendation {
            decision,
            justification: format!("Rule-based analysis: {}. Decision: {}.", reasons, decision),
        }
    }
}

/// Deterministic recommendation from the two summaries.
pub fn rule_based_recommendation(qualitative: &str, quantitative: &str) -> Recommendation {
    Signals::detect(qualitative, quantitative).recommendation()
}
