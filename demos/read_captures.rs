// Walks the library API over synthetic captures built in memory

use num_complex::Complex64;
use pnm_reader::core::constants::Q_2_13;
use pnm_reader::core::fixed_point::encode_complex_stream;
use pnm_reader::core::format::ComplexSeries;
use pnm_reader::core::header::HeaderVariant;
use pnm_reader::{
    build_index, decode_bytes, DecodedCapture, PnmHeader, Result, RxMerAggregator, SortStage,
};
use tracing::{info, Level};

const MAC: [u8; 6] = [0x00, 0x50, 0xf1, 0x12, 0x34, 0x56];

fn capture(version: u8, capture_time: u32, payload: Vec<u8>) -> Vec<u8> {
    PnmHeader {
        file_type_tag: "PNN".to_string(),
        file_type_version: version,
        major_version: 1,
        minor_version: 0,
        capture_time,
        variant: HeaderVariant::for_discriminant(version),
        payload,
    }
    .to_bytes()
}

fn subcarrier_payload(channel_id: u8, data: &[u8]) -> Vec<u8> {
    let mut p = vec![channel_id];
    p.extend_from_slice(&MAC);
    p.extend_from_slice(&(690_000_000u32).to_be_bytes());
    p.extend_from_slice(&(148u16).to_be_bytes());
    p.push(50);
    p.extend_from_slice(&(data.len() as u32).to_be_bytes());
    p.extend_from_slice(data);
    p
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .init();

    // Three RxMER captures and one channel estimate on channel 33
    let mut files = Vec::new();
    for (i, offset) in [0u8, 8, 4].iter().enumerate() {
        let mer: Vec<u8> = (0..16).map(|sc| 140 + offset + sc).collect();
        files.push((
            format!("rxmer_{}.bin", i),
            capture(4, 1_700_000_000 + 600 * i as u32, subcarrier_payload(33, &mer)),
        ));
    }

    let taps: Vec<Complex64> = (0..16)
        .map(|k| Complex64::from_polar(1.0 - k as f64 / 32.0, k as f64 * 0.1))
        .collect();
    files.push((
        "chan_est.bin".to_string(),
        capture(2, 1_700_000_300, subcarrier_payload(33, &encode_complex_stream(&taps, Q_2_13)?)),
    ));
    files.push(("broken.bin".to_string(), b"PN".to_vec()));

    // Index without touching coefficient data
    let mut index = build_index(files);
    index.apply_stages(&[SortStage::SortByCaptureTimeAscending, SortStage::SortByFileType]);
    for entry in index.iter() {
        info!(
            "{} {} channel {} at {}",
            entry.file_name, entry.file_type, entry.channel_id, entry.capture_time
        );
    }

    // Full decode and aggregation
    let mut aggregator = RxMerAggregator::new();
    for entry in index.iter() {
        match decode_bytes(&entry.raw_bytes)? {
            DecodedCapture::RxMer(rxmer) => {
                info!("RxMER mean {:.2} dB", rxmer.mean_db());
                aggregator.add(rxmer)?;
            }
            DecodedCapture::ChannelEstimate(estimate) => {
                let mags = estimate.magnitudes_db();
                info!(
                    "channel estimate: {} taps, first {:.2} dB, last {:.2} dB",
                    mags.len(),
                    mags[0],
                    mags[mags.len() - 1]
                );
            }
            other => info!("skipping {}", other.file_type()),
        }
    }

    let result = aggregator.min_avg_max(33, 2)?;
    info!("min: {:?}", result.min);
    info!("avg: {:?}", result.avg);
    info!("max: {:?}", result.max);
    info!(
        "avg stats: mean {:.3}, std {:.3}, p2p {:.3}",
        result.avg_stats.mean, result.avg_stats.std_dev, result.avg_stats.peak_to_peak
    );

    Ok(())
}
