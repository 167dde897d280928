//! Hybrid Analyst
//!
//! Vets a startup from two inputs analyzed side by side:
//! - a plain-text memo (chunked, retrieved over, summarized)
//! - a monthly revenue CSV (cleaned, measured, templated)
//!
//! Both summaries feed a synthesis step that returns Invest, Pass or Monitor.
//! Every generative step has a deterministic fallback, so the pipeline runs
//! with or without a reasoning service.
//!
//! FLOW:
//! (MEMO ∥ CSV) → SYNTHESIZE → RESULT

pub mod agent;
pub mod api;
pub mod config;
pub mod error;
pub mod gemini;
pub mod logging;
pub mod models;
pub mod numeric;
pub mod reasoning;
pub mod retrieval;
pub mod synthesis;
pub mod text;

pub use error::{AnalystError, Result};

// Re-export common types
pub use agent::Orchestrator;
pub use config::AnalystConfig;
pub use models::*;
