// History listing display and CSV export persistence.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::error::ClientResult;
use crate::models::{HistoryItem, HistoryPage};
use crate::reliability_api::ReliabilityApi;

// One table row; every cell is already display text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRow {
    pub date: String,
    pub vehicle: String,
    pub year: String,
    pub mileage_range: String,
    pub score: String,
}

impl From<&HistoryItem> for HistoryRow {
    fn from(item: &HistoryItem) -> Self {
        let vehicle = [&item.make, &item.model, &item.sub_model]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ");
        HistoryRow {
            date: item.date.clone().unwrap_or_default(),
            vehicle,
            year: item.year.map(|y| y.to_string()).unwrap_or_default(),
            mileage_range: item.mileage_range.clone().unwrap_or_default(),
            score: item
                .base_score_calculated
                .as_ref()
                .and_then(|s| s.as_f64())
                .filter(|s| *s != 0.0)
                .map(|s| format!("{}", s.round() as i64))
                .unwrap_or_else(|| "N/A".to_string()),
        }
    }
}

pub fn rows(page: &HistoryPage) -> Vec<HistoryRow> {
    page.items.iter().map(HistoryRow::from).collect()
}

// history_YYYY-MM-DD.csv
pub fn export_file_name(date: NaiveDate) -> String {
    format!("history_{}.csv", date.format("%Y-%m-%d"))
}

/// Downloads the CSV export and writes it, byte for byte, into `dir` under a
/// name derived from `date`. Returns the written path.
pub async fn export_to_dir(api: &ReliabilityApi, dir: &Path, date: NaiveDate) -> ClientResult<PathBuf> {
    let bytes = api.export_history().await?;
    let path = dir.join(export_file_name(date));
    tokio::fs::create_dir_all(dir).await?;
    tokio::fs::write(&path, &bytes).await?;
    tracing::info!("Saved history export ({} bytes) to {}", bytes.len(), path.display());
    Ok(path)
}
