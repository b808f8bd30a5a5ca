use anyhow::{Context, Result};
use std::str::FromStr;
use tokio::fs;
use tracing::Level;

use crate::models::config_model::ReaderConfig;

pub const DEFAULT_CONFIG_PATH: &str = "pnm_reader.json";

pub async fn load_config(file_path: &str) -> Result<ReaderConfig> {
    let data = fs::read_to_string(file_path)
        .await
        .with_context(|| format!("File read error: {file_path}"))?;

    parse_config(&data)
}

pub fn parse_config(data: &str) -> Result<ReaderConfig> {
    let config: ReaderConfig = serde_json::from_str(data).context("JSON parse error")?;

    // Validate early so a typo fails before any capture is read
    log_level(&config)?;

    Ok(config)
}

pub fn log_level(config: &ReaderConfig) -> Result<Level> {
    Level::from_str(&config.log_level)
        .map_err(|_| anyhow::anyhow!("Invalid log level: {}", config.log_level))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pnm_reader::SortStage;

    #[test]
    fn test_defaults_fill_in() {
        let config = parse_config(r#"{ "capture_dir": "/var/pnm" }"#).unwrap();
        assert_eq!(config.precision, 2);
        assert_eq!(config.log_level, "info");
        assert!(config.output.is_none());
        assert_eq!(
            config.sort_stages,
            vec![SortStage::GroupByChannel, SortStage::SortByCaptureTimeAscending]
        );
    }

    #[test]
    fn test_full_config() {
        let config = parse_config(
            r#"{
                "capture_dir": "captures",
                "log_level": "debug",
                "precision": 3,
                "sort_stages": ["sort_by_file_type", "sort_mac_keys_lexically"],
                "output": "report.json"
            }"#,
        )
        .unwrap();
        assert_eq!(log_level(&config).unwrap(), Level::DEBUG);
        assert_eq!(
            config.sort_stages,
            vec![SortStage::SortByFileType, SortStage::SortMacKeysLexically]
        );
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(parse_config(r#"{ "capture_dir": "x", "log_level": "loud" }"#).is_err());
        assert!(parse_config(r#"{ "capture_dir": "x", "sort_stages": ["shuffle"] }"#).is_err());
        assert!(parse_config(r#"{ "precision": 2 }"#).is_err());
    }
}
