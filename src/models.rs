//! Core data models for the hybrid analyst

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

//
// ================= Enums =================
//

/// Final investment decision. Never anything but these three.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Decision {
    Invest,
    Pass,
    Monitor,
}

impl Decision {
    pub const ALL: [Decision; 3] = [Decision::Invest, Decision::Pass, Decision::Monitor];

    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Invest => "Invest",
            Decision::Pass => "Pass",
            Decision::Monitor => "Monitor",
        }
    }

    /// Case-insensitive match on the bare word.
    pub fn from_word(word: &str) -> Option<Self> {
        Decision::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(word))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TrendDirection {
    #[serde(rename = "increasing")]
    Increasing,
    #[serde(rename = "decreasing")]
    Decreasing,
    #[serde(rename = "insufficient data")]
    InsufficientData,
}

//
// ================= Sources =================
//

/// Where a document comes from: a file on disk or an uploaded buffer.
#[derive(Debug, Clone)]
pub enum DocumentSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

impl DocumentSource {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        DocumentSource::Path(path.into())
    }

    /// Read the whole source as raw bytes.
    pub async fn read_bytes(&self) -> crate::Result<Vec<u8>> {
        match self {
            DocumentSource::Path(path) => Ok(tokio::fs::read(path).await?),
            DocumentSource::Bytes(bytes) => Ok(bytes.clone()),
        }
    }

    /// Read the whole source as UTF-8 text.
    pub async fn read_text(&self) -> crate::Result<String> {
        let bytes = self.read_bytes().await?;
        String::from_utf8(bytes).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e).into()
        })
    }
}

impl From<String> for DocumentSource {
    fn from(text: String) -> Self {
        DocumentSource::Bytes(text.into_bytes())
    }
}

impl From<&str> for DocumentSource {
    fn from(text: &str) -> Self {
        DocumentSource::Bytes(text.as_bytes().to_vec())
    }
}

//
// ================= Text =================
//

/// Sentence-aligned slice of a memo; lives only for one analysis call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub id: usize,
    pub text: String,
}

//
// ================= Financials =================
//

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialRecord {
    /// First day of the calendar month.
    pub month: NaiveDate,
    pub revenue: f64,
}

/// Raw tabular input before validation.
#[derive(Debug, Clone, Default)]
pub struct FinancialTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialMetrics {
    pub total_revenue: f64,
    pub avg_monthly_revenue: f64,
    pub revenue_volatility: f64,
    pub num_months: usize,
    pub mom_growth_rates: Vec<f64>,
    pub avg_mom_growth: f64,
    pub positive_growth_months: usize,
    pub growth_consistency: f64,
    pub trend_slope: f64,
    pub trend_direction: TrendDirection,
    pub recent_vs_early_ratio: f64,
}

//
// ================= Results =================
//

/// Narrative produced by either branch. Opaque to the orchestrator.
pub type AnalysisSummary = String;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub decision: Decision,
    pub justification: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub qualitative_summary: AnalysisSummary,
    pub quantitative_summary: AnalysisSummary,
    pub final_recommendation: Recommendation,
}

//
// ================= Status =================
//

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentStatus {
    pub status: String,
    #[serde(flatten)]
    pub details: BTreeMap<String, Value>,
}

impl ComponentStatus {
    pub fn operational() -> Self {
        Self {
            status: "operational".to_string(),
            details: BTreeMap::new(),
        }
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.details.insert(key.to_string(), value.into());
        self
    }
}

pub type StatusReport = BTreeMap<String, ComponentStatus>;

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TrendDirection::Increasing => "increasing",
            TrendDirection::Decreasing => "decreasing",
            TrendDirection::InsufficientData => "insufficient data",
        };
        write!(f, "{}", s)
    }
}
