#![allow(dead_code)]

use hybrid_analyst::{AnalystConfig, Orchestrator};
use std::io::Write;
use tempfile::NamedTempFile;

pub const MEMO: &str = "Our mission is to solve X. Our team is experienced and strong. \
Market opportunity is large.";

pub const GROWTH_CSV: &str = "month,revenue\n2024-01,100\n2024-02,120\n2024-03,140\n2024-04,160\n";

pub const SINGLE_MONTH_CSV: &str = "month,revenue\n2024-01,500\n";

/// Orchestrator with no API key: every generative step takes its fallback.
pub fn fallback_orchestrator() -> Orchestrator {
    Orchestrator::from_config(&AnalystConfig::default()).unwrap()
}

pub fn temp_file(suffix: &str, contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}
