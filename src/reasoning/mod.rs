//! Reasoning service trait and implementations
//!
//! Both the text branch and synthesis hand a prompt to a `Reasoner`.
//! The concrete variant is picked once at startup; callers treat any
//! error as "service failed" and take their deterministic path.

use crate::error::AnalystError;
use crate::Result;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;
use tracing::warn;

pub mod gemini;
pub use gemini::GeminiReasoner;

/// Single-shot text completion (LLM controlled)
#[async_trait]
pub trait Reasoner: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Human readable description for status reporting
    fn describe(&self) -> String;
}

/// Run a completion under a time budget. Elapsed budget counts as unavailable.
pub async fn complete_within(
    reasoner: &dyn Reasoner,
    prompt: &str,
    budget: Duration,
) -> Result<String> {
    match tokio::time::timeout(budget, reasoner.complete(prompt)).await {
        Ok(result) => result,
        Err(_) => {
            warn!(budget_ms = budget.as_millis() as u64, "Reasoning call timed out");
            Err(AnalystError::ServiceUnavailable(format!(
                "reasoning call exceeded {:?}",
                budget
            )))
        }
    }
}

/// Reasoner used when no API key is configured.
/// Always unavailable, so every caller takes its rule-based path.
pub struct DisabledReasoner;

#[async_trait]
impl Reasoner for DisabledReasoner {
    async fn complete(&self, _prompt: &str) -> Result<String> {
        Err(AnalystError::ServiceUnavailable(
            "no reasoning service configured".to_string(),
        ))
    }

    fn describe(&self) -> String {
        "Fallback mode (no API key)".to_string()
    }
}

/// Mock reasoner for development & testing.
/// Replays scripted responses in order; an exhausted script is unavailable.
pub struct MockReasoner {
    responses: Mutex<VecDeque<Result<String>>>,
    prompts: Mutex<Vec<String>>,
    delay: Option<Duration>,
}

impl MockReasoner {
    pub fn new(responses: Vec<Result<String>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            prompts: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    /// Always answer with the same text.
    pub fn replying(text: &str, times: usize) -> Self {
        Self::new((0..times).map(|_| Ok(text.to_string())).collect())
    }

    /// Sleep before answering (exercises timeouts).
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Prompts seen so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Reasoner for MockReasoner {
    async fn complete(&self, prompt: &str) -> Result<String> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let next = self
            .responses
            .lock()
            .ok()
            .and_then(|mut queue| queue.pop_front());

        next.unwrap_or_else(|| {
            Err(AnalystError::ServiceUnavailable(
                "mock script exhausted".to_string(),
            ))
        })
    }

    fn describe(&self) -> String {
        "Mock reasoner".to_string()
    }
}
