//! Quantitative (revenue CSV) analysis branch
//!
//! Fully deterministic: load, clean, compute metrics, render one sentence.

use crate::models::{AnalysisSummary, ComponentStatus, DocumentSource, FinancialMetrics, FinancialTable};
use crate::Result;
use tracing::{debug, info};

pub mod loader;
pub mod metrics;
pub mod summary;

pub use loader::{clean_records, parse_csv};
pub use metrics::compute_metrics;
pub use summary::{render_summary, select_template, SummaryTemplate};

/// Metrics this branch reports, in status order.
pub const METRICS_CALCULATED: &[&str] = &[
    "total_revenue",
    "month_over_month_growth",
    "revenue_volatility",
    "trend_analysis",
    "growth_consistency",
];

#[derive(Debug, Clone, Default)]
pub struct FinancialAnalyzer;

impl FinancialAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Read a CSV source and analyze it
    pub async fn analyze_source(&self, source: &DocumentSource) -> Result<AnalysisSummary> {
        let bytes = source.read_bytes().await?;
        let table = parse_csv(&bytes)?;
        self.analyze_financials(&table)
    }

    pub fn analyze_financials(&self, table: &FinancialTable) -> Result<AnalysisSummary> {
        let metrics = self.metrics(table)?;
        let summary = render_summary(&metrics);

        info!(
            months = metrics.num_months,
            template = ?select_template(
                metrics.avg_mom_growth * 100.0,
                metrics.growth_consistency * 100.0,
                metrics.num_months
            ),
            "Financial analysis complete"
        );

        Ok(summary)
    }

    /// Cleaned metrics without the rendered sentence
    pub fn metrics(&self, table: &FinancialTable) -> Result<FinancialMetrics> {
        let records = clean_records(table)?;
        let metrics = compute_metrics(&records);

        debug!(
            total_revenue = metrics.total_revenue,
            avg_mom_growth = metrics.avg_mom_growth,
            growth_consistency = metrics.growth_consistency,
            trend = ?metrics.trend_direction,
            "Computed revenue metrics"
        );

        Ok(metrics)
    }

    pub async fn status(&self) -> ComponentStatus {
        ComponentStatus::operational()
            .with("data_processing", "csv")
            .with("metrics_calculated", METRICS_CALCULATED)
    }
}
