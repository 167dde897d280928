//! Descriptive and trend metrics over a cleaned monthly series

use crate::models::{FinancialMetrics, FinancialRecord, TrendDirection};

/// Minimum series length for trend and half-over-half metrics.
pub const MIN_TREND_MONTHS: usize = 3;

pub fn compute_metrics(records: &[FinancialRecord]) -> FinancialMetrics {
    let revenues: Vec<f64> = records.iter().map(|r| r.revenue).collect();
    let n = revenues.len();

    let total_revenue: f64 = revenues.iter().sum();
    let avg_monthly_revenue = mean(&revenues);
    let revenue_volatility = sample_std(&revenues);

    let mom_growth_rates: Vec<f64> = revenues
        .windows(2)
        .map(|w| growth_rate(w[0], w[1]))
        .collect();

    let positive_growth_months = mom_growth_rates.iter().filter(|g| **g > 0.0).count();

    let (avg_mom_growth, growth_consistency) = if n > 1 {
        (
            mean(&mom_growth_rates),
            positive_growth_months as f64 / (n - 1) as f64,
        )
    } else {
        (0.0, 0.0)
    };

    let (trend_slope, trend_direction, recent_vs_early_ratio) = if n >= MIN_TREND_MONTHS {
        let slope = ols_slope(&revenues);
        let direction = if slope > 0.0 {
            TrendDirection::Increasing
        } else {
            TrendDirection::Decreasing
        };

        let mid = n / 2;
        let early = mean(&revenues[..mid]);
        let recent = mean(&revenues[mid..]);
        let ratio = if early > 0.0 { recent / early } else { 1.0 };

        (slope, direction, ratio)
    } else {
        (0.0, TrendDirection::InsufficientData, 1.0)
    };

    FinancialMetrics {
        total_revenue,
        avg_monthly_revenue,
        revenue_volatility,
        num_months: n,
        mom_growth_rates,
        avg_mom_growth,
        positive_growth_months,
        growth_consistency,
        trend_slope,
        trend_direction,
        recent_vs_early_ratio,
    }
}

/// Fractional change from `previous` to `current`.
/// From zero: flat stays 0, any revenue counts as 100% growth.
fn growth_rate(previous: f64, current: f64) -> f64 {
    if previous == 0.0 {
        if current == 0.0 {
            0.0
        } else {
            1.0
        }
    } else {
        (current - previous) / previous
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Sample standard deviation (n - 1); zero below two points.
fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    var.sqrt()
}

/// Least-squares slope of values against their index.
fn ols_slope(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let x_mean = (n - 1.0) / 2.0;
    let y_mean = mean(values);

    let (num, den) = values
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(num, den), (i, y)| {
            let dx = i as f64 - x_mean;
            (num + dx * (y - y_mean), den + dx * dx)
        });

    if den == 0.0 {
        0.0
    } else {
        num / den
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn series(revenues: &[f64]) -> Vec<FinancialRecord> {
        revenues
            .iter()
            .enumerate()
            .map(|(i, r)| FinancialRecord {
                month: NaiveDate::from_ymd_opt(2024, 1, 1)
                    .unwrap()
                    .checked_add_months(chrono::Months::new(i as u32))
                    .unwrap(),
                revenue: *r,
            })
            .collect()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_steady_growth_series() {
        let m = compute_metrics(&series(&[100.0, 120.0, 140.0, 160.0]));

        assert!(approx(m.total_revenue, 520.0));
        assert!(approx(m.avg_monthly_revenue, 130.0));
        assert_eq!(m.num_months, 4);
        assert_eq!(m.mom_growth_rates.len(), 3);
        assert!(approx(m.mom_growth_rates[0], 0.2));
        assert_eq!(m.positive_growth_months, 3);
        assert!(approx(m.growth_consistency, 1.0));
        assert!(approx(m.trend_slope, 20.0));
        assert_eq!(m.trend_direction, TrendDirection::Increasing);
        // (140 + 160) / 2 over (100 + 120) / 2
        assert!(approx(m.recent_vs_early_ratio, 150.0 / 110.0));
        // sample std of 100,120,140,160
        assert!(approx(m.revenue_volatility, (2000.0f64 / 3.0).sqrt()));
    }

    #[test]
    fn test_single_month_has_no_growth() {
        let m = compute_metrics(&series(&[500.0]));

        assert!(m.mom_growth_rates.is_empty());
        assert_eq!(m.growth_consistency, 0.0);
        assert_eq!(m.avg_mom_growth, 0.0);
        assert_eq!(m.trend_slope, 0.0);
        assert_eq!(m.trend_direction, TrendDirection::InsufficientData);
        assert_eq!(m.recent_vs_early_ratio, 1.0);
        assert_eq!(m.revenue_volatility, 0.0);
    }

    #[test]
    fn test_two_months_skip_trend() {
        let m = compute_metrics(&series(&[100.0, 50.0]));
        assert_eq!(m.mom_growth_rates, vec![-0.5]);
        assert_eq!(m.trend_direction, TrendDirection::InsufficientData);
    }

    #[test]
    fn test_flat_series_is_decreasing() {
        // slope must be strictly positive to count as increasing
        let m = compute_metrics(&series(&[10.0, 10.0, 10.0]));
        assert_eq!(m.trend_slope, 0.0);
        assert_eq!(m.trend_direction, TrendDirection::Decreasing);
    }

    #[test]
    fn test_direction_matches_slope_sign() {
        for revenues in [
            vec![5.0, 1.0, 9.0],
            vec![9.0, 1.0, 5.0],
            vec![3.0, 4.0, 2.0, 8.0, 1.0],
            vec![1.0, 1.0, 1.0, 1.5],
        ] {
            let m = compute_metrics(&series(&revenues));
            assert_eq!(
                m.trend_direction == TrendDirection::Increasing,
                m.trend_slope > 0.0,
                "revenues {:?}",
                revenues
            );
        }
    }

    #[test]
    fn test_zero_early_half_ratio_is_one() {
        let m = compute_metrics(&series(&[0.0, 0.0, 10.0, 20.0]));
        assert_eq!(m.recent_vs_early_ratio, 1.0);
        assert_eq!(m.mom_growth_rates, vec![0.0, 1.0, 1.0]);
    }
}
