// Per-device accumulators over decoded captures.
//
// An aggregator is bound to one cable modem: the first capture fixes its
// MAC address and any later capture from a different device is refused.
// Captures are keyed by channel and capture time; inserting at an
// existing key replaces the earlier capture. Reads return owned copies,
// ordered by capture time.
//
// Aggregators are single-writer. Share one across threads behind a lock.

use crate::core::error::{PnmError, Result};
use crate::core::format::{
    ChannelEstimate, ComplexSeries, FecSummary, HasChannelAndMac, ProfileTotals, RxMer,
};
use crate::core::mac::MacAddress;
use crate::core::statistics::{round_to, SignalStatistics};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// A capture that reduces to one real value per subcarrier.
pub trait SignalSeries: HasChannelAndMac + Clone {
    fn series(&self) -> Vec<f64>;
}

impl SignalSeries for RxMer {
    fn series(&self) -> Vec<f64> {
        self.values_db.clone()
    }
}

impl SignalSeries for ChannelEstimate {
    fn series(&self) -> Vec<f64> {
        self.magnitudes_db()
    }
}

/// Channel → capture time → capture, with the single-device guard.
#[derive(Debug, Clone)]
struct CaptureStore<T> {
    mac_address: Option<MacAddress>,
    channels: BTreeMap<u8, BTreeMap<u32, T>>,
}

impl<T: HasChannelAndMac + Clone> CaptureStore<T> {
    fn new() -> Self {
        Self {
            mac_address: None,
            channels: BTreeMap::new(),
        }
    }

    fn add(&mut self, capture: T) -> Result<()> {
        let mac = capture.mac_address();
        match self.mac_address {
            Some(expected) if expected != mac => {
                return Err(PnmError::MacMismatch { expected, got: mac });
            }
            Some(_) => {}
            None => {
                debug!("aggregator bound to {}", mac);
                self.mac_address = Some(mac);
            }
        }

        let channel_id = capture.channel_id();
        let capture_time = capture.capture_time();
        let replaced = self
            .channels
            .entry(channel_id)
            .or_default()
            .insert(capture_time, capture);
        if replaced.is_some() {
            debug!(
                "replaced capture on channel {} at time {}",
                channel_id, capture_time
            );
        }
        Ok(())
    }

    fn channel(&self, channel_id: u8) -> Result<&BTreeMap<u32, T>> {
        self.channels
            .get(&channel_id)
            .ok_or(PnmError::ChannelNotFound(channel_id))
    }

    fn channels(&self) -> Vec<u8> {
        self.channels.keys().copied().collect()
    }

    fn captures(&self, channel_id: u8) -> Vec<T> {
        self.channels
            .get(&channel_id)
            .map(|by_time| by_time.values().cloned().collect())
            .unwrap_or_default()
    }

    fn capture_times(&self, channel_id: u8) -> Vec<u32> {
        self.channels
            .get(&channel_id)
            .map(|by_time| by_time.keys().copied().collect())
            .unwrap_or_default()
    }

    fn len(&self) -> usize {
        self.channels.values().map(BTreeMap::len).sum()
    }
}

/// Elementwise min/avg/max across a channel's captures, with statistics of
/// each resulting array.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MinAvgMax {
    pub channel_id: u8,
    pub capture_count: usize,
    pub min: Vec<f64>,
    pub avg: Vec<f64>,
    pub max: Vec<f64>,
    pub min_stats: SignalStatistics,
    pub avg_stats: SignalStatistics,
    pub max_stats: SignalStatistics,
}

impl MinAvgMax {
    pub fn compute(channel_id: u8, series: &[Vec<f64>], precision: u32) -> Result<Self> {
        let width = series.first().map(Vec::len).unwrap_or(0);
        if let Some(bad) = series.iter().find(|s| s.len() != width) {
            return Err(PnmError::LengthMismatch(format!(
                "channel {} captures carry {} and {} values",
                channel_id,
                width,
                bad.len()
            )));
        }

        let count = series.len() as f64;
        let mut min = vec![f64::INFINITY; width];
        let mut max = vec![f64::NEG_INFINITY; width];
        let mut sum = vec![0.0; width];
        for values in series {
            for (i, &v) in values.iter().enumerate() {
                min[i] = min[i].min(v);
                max[i] = max[i].max(v);
                sum[i] += v;
            }
        }

        let min: Vec<f64> = min.into_iter().map(|v| round_to(v, precision)).collect();
        let max: Vec<f64> = max.into_iter().map(|v| round_to(v, precision)).collect();
        let avg: Vec<f64> = sum
            .into_iter()
            .map(|s| round_to(s / count, precision))
            .collect();

        Ok(Self {
            channel_id,
            capture_count: series.len(),
            min_stats: SignalStatistics::compute(&min),
            avg_stats: SignalStatistics::compute(&avg),
            max_stats: SignalStatistics::compute(&max),
            min,
            avg,
            max,
        })
    }
}

/// Aggregator for any capture type that yields a per-subcarrier series.
#[derive(Debug, Clone)]
pub struct SignalAggregator<T> {
    store: CaptureStore<T>,
}

pub type RxMerAggregator = SignalAggregator<RxMer>;
pub type ChannelEstimateAggregator = SignalAggregator<ChannelEstimate>;

impl<T: SignalSeries> SignalAggregator<T> {
    pub fn new() -> Self {
        Self {
            store: CaptureStore::new(),
        }
    }

    pub fn add(&mut self, capture: T) -> Result<()> {
        self.store.add(capture)
    }

    pub fn mac_address(&self) -> Option<MacAddress> {
        self.store.mac_address
    }

    pub fn channels(&self) -> Vec<u8> {
        self.store.channels()
    }

    pub fn captures(&self, channel_id: u8) -> Vec<T> {
        self.store.captures(channel_id)
    }

    pub fn capture_times(&self, channel_id: u8) -> Vec<u32> {
        self.store.capture_times(channel_id)
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn min_avg_max(&self, channel_id: u8, precision: u32) -> Result<MinAvgMax> {
        let series: Vec<Vec<f64>> = self
            .store
            .channel(channel_id)?
            .values()
            .map(T::series)
            .collect();
        MinAvgMax::compute(channel_id, &series, precision)
    }
}

impl<T: SignalSeries> Default for SignalAggregator<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Codeword totals per channel and profile across FEC summary captures.
#[derive(Debug, Clone)]
pub struct FecSummaryAggregator {
    store: CaptureStore<FecSummary>,
}

impl FecSummaryAggregator {
    pub fn new() -> Self {
        Self {
            store: CaptureStore::new(),
        }
    }

    pub fn add(&mut self, capture: FecSummary) -> Result<()> {
        self.store.add(capture)
    }

    pub fn mac_address(&self) -> Option<MacAddress> {
        self.store.mac_address
    }

    pub fn channels(&self) -> Vec<u8> {
        self.store.channels()
    }

    pub fn captures(&self, channel_id: u8) -> Vec<FecSummary> {
        self.store.captures(channel_id)
    }

    pub fn capture_times(&self, channel_id: u8) -> Vec<u32> {
        self.store.capture_times(channel_id)
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn profile_totals(&self, channel_id: u8) -> Result<Vec<ProfileTotals>> {
        let mut merged: BTreeMap<u8, ProfileTotals> = BTreeMap::new();
        for summary in self.store.channel(channel_id)?.values() {
            for totals in summary.profile_totals() {
                merged
                    .entry(totals.profile_id)
                    .or_insert_with(|| ProfileTotals::new(totals.profile_id))
                    .merge(&totals);
            }
        }
        Ok(merged.into_values().collect())
    }
}

impl Default for FecSummaryAggregator {
    fn default() -> Self {
        Self::new()
    }
}
