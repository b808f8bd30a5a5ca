use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{error, info, warn};

mod models;
mod utils;

use pnm_reader::core::collection::ChannelSummary;
use pnm_reader::core::format::ProfileTotals;
use pnm_reader::loader::load_capture_dir;
use pnm_reader::{
    build_index, CaptureIndex, DecodedCapture, FecSummaryAggregator, MacAddress, MinAvgMax,
    RxMerAggregator,
};

use crate::models::config_model::ReaderConfig;
use crate::utils::conf_helper::{load_config, log_level, DEFAULT_CONFIG_PATH};

#[derive(Serialize)]
struct FecReport {
    mac_address: MacAddress,
    channel_id: u8,
    profiles: Vec<ProfileTotals>,
}

#[derive(Serialize)]
struct Report {
    generated_at: String,
    capture_count: usize,
    channels: Vec<ChannelSummary>,
    rxmer: Vec<MinAvgMax>,
    fec: Vec<FecReport>,
}

/// Feeds every decodable capture of the index into one aggregator per device.
fn aggregate(
    index: &CaptureIndex,
) -> (
    BTreeMap<MacAddress, RxMerAggregator>,
    BTreeMap<MacAddress, FecSummaryAggregator>,
) {
    let mut rxmer: BTreeMap<MacAddress, RxMerAggregator> = BTreeMap::new();
    let mut fec: BTreeMap<MacAddress, FecSummaryAggregator> = BTreeMap::new();

    for entry in index.iter() {
        let result = match entry.decode() {
            Ok(DecodedCapture::RxMer(record)) => {
                rxmer.entry(entry.mac_address).or_default().add(record)
            }
            Ok(DecodedCapture::FecSummary(record)) => {
                fec.entry(entry.mac_address).or_default().add(record)
            }
            Ok(_) => Ok(()),
            Err(e) => Err(e),
        };
        if let Err(e) = result {
            warn!("not aggregating {}: {}", entry.file_name, e);
        }
    }

    (rxmer, fec)
}

fn build_report(index: &CaptureIndex, config: &ReaderConfig) -> Report {
    let (rxmer_aggregators, fec_aggregators) = aggregate(index);

    let mut rxmer = Vec::new();
    for (mac, aggregator) in &rxmer_aggregators {
        for channel_id in aggregator.channels() {
            match aggregator.min_avg_max(channel_id, config.precision) {
                Ok(result) => {
                    info!(
                        "{} channel {}: {} RxMER captures, mean of averages {:.2} dB",
                        mac, channel_id, result.capture_count, result.avg_stats.mean
                    );
                    rxmer.push(result);
                }
                Err(e) => error!("{} channel {}: {}", mac, channel_id, e),
            }
        }
    }

    let mut fec = Vec::new();
    for (mac, aggregator) in &fec_aggregators {
        for channel_id in aggregator.channels() {
            match aggregator.profile_totals(channel_id) {
                Ok(profiles) => fec.push(FecReport {
                    mac_address: *mac,
                    channel_id,
                    profiles,
                }),
                Err(e) => error!("{} channel {}: {}", mac, channel_id, e),
            }
        }
    }

    Report {
        generated_at: chrono::Utc::now().to_rfc3339(),
        capture_count: index.len(),
        channels: index.summary(),
        rxmer,
        fec,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    // === CONFIG + LOGGING ===
    let config = load_config(&config_path).await?;

    tracing_subscriber::fmt()
        .with_max_level(log_level(&config)?)
        .init();

    info!("Reading captures from {}", config.capture_dir.display());

    // === LOAD + INDEX ===
    let capture_dir = config.capture_dir.clone();
    let files = tokio::task::spawn_blocking(move || load_capture_dir(capture_dir))
        .await
        .context("capture loader task failed")?
        .context("failed to read capture directory")?;

    let file_count = files.len();
    let mut index = build_index(files);
    index.apply_stages(&config.sort_stages);
    info!("Indexed {} of {} files", index.len(), file_count);

    for row in index.summary() {
        info!(
            "{} channel {}: {} captures ({} .. {})",
            row.mac_address,
            row.channel_id,
            row.capture_count,
            row.first_capture.as_deref().unwrap_or("-"),
            row.last_capture.as_deref().unwrap_or("-"),
        );
    }

    // === AGGREGATE + REPORT ===
    let report = build_report(&index, &config);

    if let Some(output) = &config.output {
        let json = serde_json::to_string_pretty(&report).context("JSON serialize error")?;
        tokio::fs::write(output, json)
            .await
            .with_context(|| format!("failed to write report {}", output.display()))?;
        info!("Report written to {}", output.display());
    }

    Ok(())
}
