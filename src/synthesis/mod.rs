//! Synthesis engine
//!
//! Combines the two branch summaries into a final recommendation.
//! Generative first; any service failure drops to the rule-based path.

use crate::config::AnalystConfig;
use crate::error::AnalystError;
use crate::models::{ComponentStatus, Recommendation};
use crate::reasoning::{complete_within, Reasoner};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

pub mod fallback;
pub mod parser;

pub use fallback::{rule_based_recommendation, Signal, Signals};
pub use parser::parse_recommendation;

pub struct SynthesisEngine {
    reasoner: Arc<dyn Reasoner>,
    reasoning_timeout: Duration,
}

impl SynthesisEngine {
    pub fn new(reasoner: Arc<dyn Reasoner>, config: &AnalystConfig) -> Self {
        Self {
            reasoner,
            reasoning_timeout: config.reasoning_timeout,
        }
    }

    /// Never fails: every error path ends in a recommendation.
    pub async fn synthesize(&self, qualitative: &str, quantitative: &str) -> Recommendation {
        let prompt = build_synthesis_prompt(qualitative, quantitative);

        match complete_within(self.reasoner.as_ref(), &prompt, self.reasoning_timeout).await {
            Ok(response) => {
                let recommendation = parse_recommendation(&response);
                info!(decision = %recommendation.decision, method = "llm", "Synthesis complete");
                recommendation
            }
            Err(AnalystError::ServiceUnavailable(reason)) => {
                info!(%reason, "Reasoning unavailable, using rule-based synthesis");
                self.fallback(qualitative, quantitative)
            }
            Err(e) => {
                warn!(error = %e, "Synthesis call failed, using rule-based synthesis");
                self.fallback(qualitative, quantitative)
            }
        }
    }

    fn fallback(&self, qualitative: &str, quantitative: &str) -> Recommendation {
        let recommendation = rule_based_recommendation(qualitative, quantitative);
        info!(decision = %recommendation.decision, method = "rules", "Synthesis complete");
        recommendation
    }

    pub async fn status(&self) -> ComponentStatus {
        ComponentStatus::operational()
            .with("llm", self.reasoner.describe())
            .with("synthesis_method", "LLM-based with fallback rules")
    }
}

pub fn build_synthesis_prompt(qualitative: &str, quantitative: &str) -> String {
    format!(
        r#"You are an experienced venture capitalist. Given the following qualitative and quantitative summaries, provide a final investment recommendation. State whether you would 'Invest', 'Pass', or 'Monitor', and provide a 2-3 sentence justification for your decision.

QUALITATIVE SUMMARY:
{qualitative}

QUANTITATIVE SUMMARY:
{quantitative}

Provide your final investment recommendation in the following format:

DECISION: [Choose exactly one: "Invest", "Pass", or "Monitor"]

JUSTIFICATION: [Provide a 2-3 sentence justification explaining your decision, referencing specific factors from both analyses]"#,
        qualitative = qualitative,
        quantitative = quantitative,
    )
}
