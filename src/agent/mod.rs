//! Main orchestrator - scatter/gather over the two analysis branches
//!
//! MEMO ─┐
//!       ├─ try_join ─→ SYNTHESIZE ─→ RESULT
//! CSV  ─┘

use crate::config::AnalystConfig;
use crate::error::AnalystError;
use crate::models::{AnalysisResult, DocumentSource, StatusReport};
use crate::numeric::FinancialAnalyzer;
use crate::reasoning::{DisabledReasoner, GeminiReasoner, Reasoner};
use crate::retrieval::{InMemoryBackend, RetrievalBackend};
use crate::synthesis::SynthesisEngine;
use crate::text::TextAnalyzer;
use crate::Result;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

pub const QUALITATIVE_BRANCH: &str = "qualitative";
pub const QUANTITATIVE_BRANCH: &str = "quantitative";

/// Coordinates both branches and the synthesis step
pub struct Orchestrator {
    text: TextAnalyzer,
    numeric: FinancialAnalyzer,
    synthesis: SynthesisEngine,
}

impl Orchestrator {
    pub fn new(text: TextAnalyzer, numeric: FinancialAnalyzer, synthesis: SynthesisEngine) -> Self {
        Self {
            text,
            numeric,
            synthesis,
        }
    }

    /// Wire every component from config. The reasoner variant is fixed here.
    pub fn from_config(config: &AnalystConfig) -> Result<Self> {
        config.validate()?;

        let reasoner: Arc<dyn Reasoner> = match GeminiReasoner::from_config(config)? {
            Some(live) => {
                info!(model = %config.model, "Reasoning service enabled");
                Arc::new(live)
            }
            None => {
                warn!("No API key configured, running in fallback mode");
                Arc::new(DisabledReasoner)
            }
        };

        Ok(Self::with_services(reasoner, Arc::new(InMemoryBackend::default()), config))
    }

    /// Wire components around explicit services (tests inject mocks here).
    pub fn with_services(
        reasoner: Arc<dyn Reasoner>,
        retrieval: Arc<dyn RetrievalBackend>,
        config: &AnalystConfig,
    ) -> Self {
        Self::new(
            TextAnalyzer::new(reasoner.clone(), retrieval, config),
            FinancialAnalyzer::new(),
            SynthesisEngine::new(reasoner, config),
        )
    }

    /// Run both branches concurrently, then synthesize.
    ///
    /// The first branch failure aborts the run; the other branch is dropped.
    pub async fn run_analysis(
        &self,
        memo: &DocumentSource,
        financials: &DocumentSource,
    ) -> Result<AnalysisResult> {
        let analysis_id = Uuid::new_v4();
        let span = info_span!("analysis", %analysis_id);

        async move {
            let start_time = Instant::now();
            info!("Starting analysis");

            let qualitative = async {
                self.text
                    .analyze_memo(memo)
                    .await
                    .map_err(|e| AnalystError::branch(QUALITATIVE_BRANCH, e))
            };
            let quantitative = async {
                self.numeric
                    .analyze_source(financials)
                    .await
                    .map_err(|e| AnalystError::branch(QUANTITATIVE_BRANCH, e))
            };

            let (qualitative_summary, quantitative_summary) =
                match tokio::try_join!(qualitative, quantitative) {
                    Ok(summaries) => summaries,
                    Err(e) => {
                        warn!(
                            error = %e,
                            elapsed_ms = start_time.elapsed().as_millis() as u64,
                            "Analysis aborted"
                        );
                        return Err(e);
                    }
                };

            let final_recommendation = self
                .synthesis
                .synthesize(&qualitative_summary, &quantitative_summary)
                .await;

            info!(
                decision = %final_recommendation.decision,
                elapsed_ms = start_time.elapsed().as_millis() as u64,
                "Analysis complete"
            );

            Ok(AnalysisResult {
                qualitative_summary,
                quantitative_summary,
                final_recommendation,
            })
        }
        .instrument(span)
        .await
    }

    /// Poll every component concurrently.
    pub async fn status(&self) -> StatusReport {
        let (qualitative, quantitative, synthesis) = tokio::join!(
            self.text.status(),
            self.numeric.status(),
            self.synthesis.status()
        );

        StatusReport::from([
            ("qualitative_analyzer".to_string(), qualitative),
            ("quantitative_analyzer".to_string(), quantitative),
            ("synthesis_engine".to_string(), synthesis),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Decision;
    use crate::reasoning::MockReasoner;

    const MEMO: &str = "Our mission is to solve X. Our team is experienced and strong. \
Market opportunity is large.";
    const CSV: &str = "month,revenue\n2024-01,100\n2024-02,120\n2024-03,140\n2024-04,160\n";

    fn fallback_orchestrator() -> Orchestrator {
        Orchestrator::from_config(&AnalystConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_fallback_run_invests_on_steady_growth() {
        let result = fallback_orchestrator()
            .run_analysis(&MEMO.into(), &CSV.into())
            .await
            .unwrap();

        assert!(result
            .quantitative_summary
            .contains("with consistent revenue streams"));
        assert_eq!(result.final_recommendation.decision, Decision::Invest);
        assert!(result
            .final_recommendation
            .justification
            .starts_with("Rule-based analysis:"));
    }

    #[tokio::test]
    async fn test_numeric_failure_is_branch_failed() {
        let err = fallback_orchestrator()
            .run_analysis(&MEMO.into(), &"month,revenue\n".into())
            .await
            .unwrap_err();

        match err {
            AnalystError::BranchFailed { branch, source } => {
                assert_eq!(branch, QUANTITATIVE_BRANCH);
                assert!(matches!(*source, AnalystError::ValidationError(_)));
            }
            other => panic!("expected BranchFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_memo_is_branch_failed() {
        let err = fallback_orchestrator()
            .run_analysis(&"   ".into(), &CSV.into())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AnalystError::BranchFailed { branch: QUALITATIVE_BRANCH, .. }
        ));
    }

    #[tokio::test]
    async fn test_one_reasoner_serves_both_steps() {
        let mock = Arc::new(MockReasoner::new(vec![
            Ok("A generated memo summary.".to_string()),
            Ok("DECISION: Monitor\nJUSTIFICATION: Needs more data.".to_string()),
        ]));
        let orchestrator = Orchestrator::with_services(
            mock.clone(),
            Arc::new(InMemoryBackend::default()),
            &AnalystConfig::default(),
        );

        let result = orchestrator
            .run_analysis(&MEMO.into(), &CSV.into())
            .await
            .unwrap();

        assert_eq!(result.qualitative_summary, "A generated memo summary.");
        assert_eq!(result.final_recommendation.decision, Decision::Monitor);
        assert_eq!(result.final_recommendation.justification, "Needs more data.");
        assert_eq!(mock.prompts().len(), 2);
    }

    #[tokio::test]
    async fn test_status_has_three_components() {
        let report = fallback_orchestrator().status().await;
        let keys: Vec<&str> = report.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec!["qualitative_analyzer", "quantitative_analyzer", "synthesis_engine"]
        );
        assert!(report.values().all(|s| s.status == "operational"));
    }
}
