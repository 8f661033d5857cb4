use serde::Serialize;

use super::open_tracker;
use actinurse_core::Summary;

#[derive(Serialize)]
struct SummaryReport {
    #[serde(flatten)]
    summary: Summary,
    completion_pct: f64,
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let tracker = open_tracker()?;
    let summary = tracker.summary();
    let report = SummaryReport {
        completion_pct: (summary.completion_pct() * 10.0).round() / 10.0,
        summary,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
