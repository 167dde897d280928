//! CSV loading and series cleaning

use crate::error::AnalystError;
use crate::models::{FinancialRecord, FinancialTable};
use crate::Result;
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Full-date formats, tried first.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d %B %Y", "%B %d, %Y"];

/// Month-only formats, tried after a day is spliced in.
const MONTH_FORMATS: &[(&str, &str, &str)] = &[
    // (prefix, suffix, format over prefix + raw + suffix)
    ("", "-01", "%Y-%m-%d"),
    ("", "/01", "%Y/%m/%d"),
    ("01/", "", "%d/%m/%Y"),
    ("01 ", "", "%d %B %Y"),
    ("01-", "", "%d-%b-%y"),
    ("01-", "", "%d-%B-%Y"),
];

/// Parse CSV bytes (header row required) into a raw table
pub fn parse_csv(bytes: &[u8]) -> Result<FinancialTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let headers = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        if record.iter().all(|cell| cell.is_empty()) {
            continue;
        }
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(FinancialTable { headers, rows })
}

fn csv_error(e: csv::Error) -> AnalystError {
    match e.into_kind() {
        csv::ErrorKind::Io(io) => AnalystError::IoError(io),
        other => AnalystError::ValidationError(format!("Malformed CSV: {:?}", other)),
    }
}

/// Locate (month, revenue) columns: by name, else the first two positions.
fn resolve_columns(table: &FinancialTable) -> Result<(usize, usize)> {
    let find = |name: &str| {
        table
            .headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    };

    if let (Some(month), Some(revenue)) = (find("month"), find("revenue")) {
        return Ok((month, revenue));
    }

    let width = if table.headers.is_empty() {
        table.rows.first().map(Vec::len).unwrap_or(0)
    } else {
        table.headers.len()
    };

    if width >= 2 {
        debug!(headers = ?table.headers, "No month/revenue headers, using first two columns");
        Ok((0, 1))
    } else {
        Err(AnalystError::ValidationError(
            "Missing required columns: month, revenue".to_string(),
        ))
    }
}

/// Validate and clean a raw table into a unique, ascending monthly series.
pub fn clean_records(table: &FinancialTable) -> Result<Vec<FinancialRecord>> {
    if table.rows.is_empty() {
        return Err(AnalystError::ValidationError(
            "CSV file is empty".to_string(),
        ));
    }

    let (month_idx, revenue_idx) = resolve_columns(table)?;

    let mut by_month: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    let mut dropped = 0usize;
    let mut merged = 0usize;

    for row in &table.rows {
        let month = row.get(month_idx).and_then(|v| parse_month(v));
        let revenue = row.get(revenue_idx).and_then(|v| parse_revenue(v));

        match (month, revenue) {
            (Some(month), Some(revenue)) => {
                if by_month.contains_key(&month) {
                    merged += 1;
                }
                *by_month.entry(month).or_insert(0.0) += revenue;
            }
            _ => dropped += 1,
        }
    }

    if dropped > 0 {
        warn!(dropped, "Dropped rows with unparseable month or missing revenue");
    }
    if merged > 0 {
        warn!(merged, "Merged rows sharing a month");
    }

    if by_month.is_empty() {
        return Err(AnalystError::ValidationError(
            "No valid data after cleaning".to_string(),
        ));
    }

    Ok(by_month
        .into_iter()
        .map(|(month, revenue)| FinancialRecord { month, revenue })
        .collect())
}

/// Parse a month cell, normalized to the first day of that month.
pub fn parse_month(raw: &str) -> Option<NaiveDate> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    let date = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .or_else(|| {
            MONTH_FORMATS.iter().find_map(|(prefix, suffix, fmt)| {
                NaiveDate::parse_from_str(&format!("{}{}{}", prefix, value, suffix), fmt).ok()
            })
        })?;

    NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
}

/// Parse a revenue cell. Blank, negative and non-finite values are missing.
pub fn parse_revenue(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | '_' | ' '))
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    cleaned
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(headers: &[&str], rows: &[&[&str]]) -> FinancialTable {
        FinancialTable {
            headers: headers.iter().map(|s| s.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        }
    }

    fn ymd(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }

    #[test]
    fn test_parse_month_formats() {
        assert_eq!(parse_month("2024-03"), Some(ymd(2024, 3)));
        assert_eq!(parse_month("2024/03"), Some(ymd(2024, 3)));
        assert_eq!(parse_month("2024-03-17"), Some(ymd(2024, 3)));
        assert_eq!(parse_month("03/2024"), Some(ymd(2024, 3)));
        assert_eq!(parse_month("03/17/2024"), Some(ymd(2024, 3)));
        assert_eq!(parse_month("Mar 2024"), Some(ymd(2024, 3)));
        assert_eq!(parse_month("March 2024"), Some(ymd(2024, 3)));
        assert_eq!(parse_month("Mar-24"), Some(ymd(2024, 3)));
        assert_eq!(parse_month("not a month"), None);
        assert_eq!(parse_month(""), None);
    }

    #[test]
    fn test_parse_revenue() {
        assert_eq!(parse_revenue("1200"), Some(1200.0));
        assert_eq!(parse_revenue("$1,200.50"), Some(1200.5));
        assert_eq!(parse_revenue(""), None);
        assert_eq!(parse_revenue("n/a"), None);
        assert_eq!(parse_revenue("-5"), None);
        assert_eq!(parse_revenue("NaN"), None);
    }

    #[test]
    fn test_named_columns_in_any_order() {
        let t = table(
            &["Revenue", "Month"],
            &[&["200", "2024-02"], &["100", "2024-01"]],
        );
        let records = clean_records(&t).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].month, ymd(2024, 1));
        assert_eq!(records[0].revenue, 100.0);
    }

    #[test]
    fn test_positional_inference_when_names_absent() {
        let t = table(&["date", "sales", "notes"], &[&["2024-01", "10", "x"]]);
        let records = clean_records(&t).unwrap();
        assert_eq!(records[0].revenue, 10.0);
    }

    #[test]
    fn test_single_column_is_rejected() {
        let t = table(&["value"], &[&["10"]]);
        let err = clean_records(&t).unwrap_err();
        assert!(err.to_string().contains("Missing required columns"));
    }

    #[test]
    fn test_empty_table_is_rejected() {
        let err = clean_records(&table(&["month", "revenue"], &[])).unwrap_err();
        assert!(matches!(err, AnalystError::ValidationError(_)));
    }

    #[test]
    fn test_bad_rows_dropped_and_all_bad_rejected() {
        let t = table(
            &["month", "revenue"],
            &[&["garbage", "10"], &["2024-01", ""], &["2024-02", "30"]],
        );
        let records = clean_records(&t).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].month, ymd(2024, 2));

        let all_bad = table(&["month", "revenue"], &[&["garbage", "10"]]);
        let err = clean_records(&all_bad).unwrap_err();
        assert!(err.to_string().contains("No valid data after cleaning"));
    }

    #[test]
    fn test_duplicate_months_are_summed() {
        let t = table(
            &["month", "revenue"],
            &[&["2024-01-05", "10"], &["2024-01-20", "15"], &["2023-12", "1"]],
        );
        let records = clean_records(&t).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].month, ymd(2023, 12));
        assert_eq!(records[1].revenue, 25.0);
    }

    #[test]
    fn test_parse_csv_reads_headers_and_rows() {
        let csv = b"month,revenue\n2024-01,100\n\n2024-02, 120 \n";
        let t = parse_csv(csv).unwrap();
        assert_eq!(t.headers, vec!["month", "revenue"]);
        assert_eq!(t.rows.len(), 2);
        assert_eq!(t.rows[1][1], "120");
    }

    #[test]
    fn test_parse_csv_empty_input_has_no_rows() {
        let t = parse_csv(b"").unwrap();
        assert!(t.rows.is_empty());
        assert!(clean_records(&t).is_err());
    }
}
