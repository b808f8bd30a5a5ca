use pnm_reader::SortStage;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn default_log_level() -> String {
    "info".to_string()
}

fn default_precision() -> u32 {
    2
}

fn default_sort_stages() -> Vec<SortStage> {
    vec![SortStage::GroupByChannel, SortStage::SortByCaptureTimeAscending]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReaderConfig {
    pub capture_dir: PathBuf,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Decimal places kept in min/avg/max results
    #[serde(default = "default_precision")]
    pub precision: u32,
    #[serde(default = "default_sort_stages")]
    pub sort_stages: Vec<SortStage>,
    #[serde(default)]
    pub output: Option<PathBuf>,
}
