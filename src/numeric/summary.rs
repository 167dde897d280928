//! One-sentence revenue summary from computed metrics

use crate::models::FinancialMetrics;

/// Consistency (percent of positive months) needed to call growth consistent.
pub const CONSISTENCY_THRESHOLD_PCT: f64 = 80.0;

/// Average growth (percent) at or below which a decline is significant.
pub const SIGNIFICANT_DECLINE_PCT: f64 = -5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryTemplate {
    InsufficientData,
    ConsistentGrowth,
    InconsistentGrowth,
    ModerateDecline,
    SignificantDecline,
}

/// Pick a template. Growth boundaries: `> 0` grows, `(-5, 0]` moderate,
/// `<= -5` significant. Consistency `>= 80` counts as consistent.
pub fn select_template(avg_growth_pct: f64, consistency_pct: f64, count: usize) -> SummaryTemplate {
    if count <= 1 {
        SummaryTemplate::InsufficientData
    } else if avg_growth_pct > 0.0 {
        if consistency_pct >= CONSISTENCY_THRESHOLD_PCT {
            SummaryTemplate::ConsistentGrowth
        } else {
            SummaryTemplate::InconsistentGrowth
        }
    } else if avg_growth_pct > SIGNIFICANT_DECLINE_PCT {
        SummaryTemplate::ModerateDecline
    } else {
        SummaryTemplate::SignificantDecline
    }
}

pub fn render_summary(metrics: &FinancialMetrics) -> String {
    let growth = metrics.avg_mom_growth * 100.0;
    let consistency = metrics.growth_consistency * 100.0;
    let total = format_currency(metrics.total_revenue);
    let months = metrics.num_months;

    match select_template(growth, consistency, months) {
        SummaryTemplate::InsufficientData => format!(
            "The company has total revenue of {} over {} month(s) with insufficient data for growth analysis.",
            total, months
        ),
        SummaryTemplate::ConsistentGrowth => format!(
            "The company shows strong MoM growth of {:.1}% with consistent revenue streams and total revenue of {} over {} months.",
            growth, total, months
        ),
        SummaryTemplate::InconsistentGrowth => format!(
            "The company shows strong MoM growth of {:.1}% but has inconsistent revenue streams with total revenue of {} over {} months.",
            growth, total, months
        ),
        SummaryTemplate::ModerateDecline => format!(
            "The company shows moderate decline of {:.1}% with total revenue of {} over {} months.",
            growth.abs(),
            total,
            months
        ),
        SummaryTemplate::SignificantDecline => format!(
            "The company shows significant decline of {:.1}% with total revenue of {} over {} months.",
            growth.abs(),
            total,
            months
        ),
    }
}

/// `$` amount rounded to whole units with comma thousands separators.
pub fn format_currency(amount: f64) -> String {
    let rounded = format!("{:.0}", amount.abs());
    let mut grouped = String::with_capacity(rounded.len() + rounded.len() / 3);

    for (i, digit) in rounded.chars().enumerate() {
        if i > 0 && (rounded.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    if amount < 0.0 && rounded != "0" {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}
