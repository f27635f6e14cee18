use serde::Serialize;
use time::Date;

use crate::progress::repo_types::DailyProgress;

/// Window averages. Every average divides by the window length, so
/// untracked days count as zero.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct ProgressSummary {
    pub days: u32,
    pub days_tracked: usize,
    pub avg_calories: f64,
    pub avg_protein: f64,
    pub avg_adherence: f64,
}

#[derive(Debug, Serialize)]
pub struct ProgressResponse {
    pub from: Date,
    pub to: Date,
    pub records: Vec<DailyProgress>,
    pub summary: Option<ProgressSummary>,
}
