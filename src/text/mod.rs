//! Qualitative (memo) analysis branch
//!
//! Chunk → index → retrieve → generate, with a keyword summary whenever the
//! generative path cannot produce a result. Only an unreadable source or an
//! empty memo fails this branch.

use crate::config::AnalystConfig;
use crate::error::AnalystError;
use crate::models::{AnalysisSummary, Chunk, ComponentStatus, DocumentSource};
use crate::reasoning::{complete_within, Reasoner};
use crate::retrieval::RetrievalBackend;
use crate::Result;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub mod chunker;
pub use chunker::chunk_text;

/// Fixed retrieval query used to pick context for the prompt.
pub const ANALYSIS_QUERY: &str = "Based on the memo, what is the company's core mission, \
the problem it solves, and the strength of the team? Summarize the potential and risks.";

/// Keyword sets per category (matched against the lower-cased memo)
const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    ("mission", &["mission", "vision", "goal", "purpose"]),
    ("problem", &["problem", "solve", "challenge", "pain point"]),
    ("team", &["team", "founder", "ceo", "cto", "experience"]),
    ("market", &["market", "industry", "sector", "opportunity"]),
    ("risk", &["risk", "challenge", "competition", "uncertainty"]),
];

pub struct TextAnalyzer {
    reasoner: Arc<dyn Reasoner>,
    retrieval: Arc<dyn RetrievalBackend>,
    chunk_size: usize,
    chunk_overlap: usize,
    top_k: usize,
    reasoning_timeout: Duration,
    retrieval_timeout: Duration,
}

impl TextAnalyzer {
    pub fn new(
        reasoner: Arc<dyn Reasoner>,
        retrieval: Arc<dyn RetrievalBackend>,
        config: &AnalystConfig,
    ) -> Self {
        Self {
            reasoner,
            retrieval,
            chunk_size: config.chunk_size,
            chunk_overlap: config.chunk_overlap,
            top_k: config.retrieval_top_k,
            reasoning_timeout: config.reasoning_timeout,
            retrieval_timeout: config.retrieval_timeout,
        }
    }

    /// Read a memo and analyze it
    pub async fn analyze_memo(&self, source: &DocumentSource) -> Result<AnalysisSummary> {
        let text = source.read_text().await?;
        self.analyze_text(&text).await
    }

    pub async fn analyze_text(&self, text: &str) -> Result<AnalysisSummary> {
        let chunks = chunk_text(text, self.chunk_size, self.chunk_overlap);

        if chunks.is_empty() {
            return Err(AnalystError::AnalysisError(
                "memo produced no chunks (empty or whitespace-only input)".to_string(),
            ));
        }

        info!(
            memo_digest = %memo_digest(text),
            chunk_count = chunks.len(),
            "Analyzing memo"
        );

        match self.generate_summary(text, &chunks).await {
            Ok(summary) => Ok(summary),
            Err(AnalystError::ServiceUnavailable(reason)) => {
                info!(%reason, "Reasoning unavailable, using keyword summary");
                Ok(keyword_summary(text))
            }
            Err(e) => {
                warn!(error = %e, "Generative memo analysis failed, using keyword summary");
                Ok(keyword_summary(text))
            }
        }
    }

    /// Retrieval-augmented generation path
    async fn generate_summary(&self, text: &str, chunks: &[Chunk]) -> Result<String> {
        let context = self.retrieve_context(chunks).await?;

        debug!(
            retrieved = ?context.iter().map(|c| c.id).collect::<Vec<_>>(),
            "Retrieved memo context"
        );

        let prompt = build_analysis_prompt(&context, text);
        let summary =
            complete_within(self.reasoner.as_ref(), &prompt, self.reasoning_timeout).await?;

        let summary = summary.trim();
        if summary.is_empty() {
            return Err(AnalystError::LlmError(
                "reasoning service returned an empty summary".to_string(),
            ));
        }

        Ok(summary.to_string())
    }

    /// Build a fresh index for this call only and pull the top chunks.
    async fn retrieve_context(&self, chunks: &[Chunk]) -> Result<Vec<Chunk>> {
        let mut index = self.retrieval.new_index();
        let k = self.top_k.min(chunks.len());

        let lookup = async {
            match index.index(chunks).await {
                Ok(()) => index.query(ANALYSIS_QUERY, k).await,
                Err(e) => Err(e),
            }
        };

        tokio::time::timeout(self.retrieval_timeout, lookup)
            .await
            .map_err(|_| {
                AnalystError::RetrievalError(format!(
                    "retrieval exceeded {:?}",
                    self.retrieval_timeout
                ))
            })?
    }

    pub async fn status(&self) -> ComponentStatus {
        ComponentStatus::operational()
            .with("vector_store", self.retrieval.store_kind())
            .with("embedding_model", self.retrieval.embedding_model())
            .with("llm", self.reasoner.describe())
    }
}

fn memo_digest(text: &str) -> String {
    let digest = hex::encode(Sha256::digest(text.as_bytes()));
    digest[..16].to_string()
}

/// Prompt for the generative summary
pub fn build_analysis_prompt(context: &[Chunk], memo: &str) -> String {
    let context_text = context
        .iter()
        .map(|c| c.text.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are an expert venture capital analyst. Analyze the following company memo and provide a comprehensive qualitative summary.

SPECIFIC QUESTION TO ANSWER:
"{query}"

RELEVANT CONTEXT FROM THE MEMO:
{context}

FULL COMPANY MEMO:
{memo}

Based on this memo and the retrieved context, provide an analysis covering:
1. Company's core mission and vision
2. The problem they are solving and their approach
3. Team strength and expertise
4. Market opportunity and competitive landscape
5. Potential risks and challenges
6. Overall assessment of the company's potential

Write a concise but comprehensive summary (2-3 paragraphs) of the qualitative factors that would influence an investment decision."#,
        query = ANALYSIS_QUERY,
        context = context_text,
        memo = memo,
    )
}

/// Deterministic keyword summary. Same text in, same summary out.
pub fn keyword_summary(text: &str) -> String {
    let lowered = text.to_lowercase();

    let categories: Vec<String> = CATEGORY_KEYWORDS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|k| lowered.contains(k)))
        .map(|(category, _)| format!("Contains {}-related content", category))
        .collect();

    let mut metrics = Vec::new();
    if text.contains("ARR") || lowered.contains("annual recurring revenue") {
        metrics.push("ARR mentioned");
    }
    if lowered.contains("customers") {
        metrics.push("Customer metrics mentioned");
    }
    if lowered.contains("growth") {
        metrics.push("Growth metrics mentioned");
    }

    let mut summary = if categories.is_empty() {
        "The memo provides little detail on mission, problem, team, market or risk. ".to_string()
    } else {
        format!(
            "The company demonstrates strong market positioning with {}. ",
            categories.join(", ")
        )
    };

    if !metrics.is_empty() {
        summary.push_str(&format!("Key metrics include: {}. ", metrics.join(", ")));
    }

    summary.push_str(
        "The company shows potential for growth but requires further due diligence for investment consideration.",
    );

    summary
}
