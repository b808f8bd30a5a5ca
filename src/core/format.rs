// Decoded record types for every PNM capture format

use crate::core::constants::MAGNITUDE_DB_FLOOR;
use crate::core::file_type::PnmFileType;
use crate::core::header::{capture_datetime, PnmHeader};
use crate::core::mac::MacAddress;
use chrono::{DateTime, Utc};
use num_complex::Complex64;
use serde::Serialize;
use std::collections::BTreeMap;

/// The header fields every decoded record keeps, minus the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HeaderFields {
    pub file_type: PnmFileType,
    pub major_version: u8,
    pub minor_version: u8,
    pub capture_time: u32,
}

impl HeaderFields {
    pub fn new(header: &PnmHeader, file_type: PnmFileType) -> Self {
        Self {
            file_type,
            major_version: header.major_version,
            minor_version: header.minor_version,
            capture_time: header.capture_time,
        }
    }

    pub fn capture_datetime(&self) -> Option<DateTime<Utc>> {
        capture_datetime(self.capture_time)
    }
}

/// Fields the index and aggregators need from any record.
pub trait HasChannelAndMac {
    fn channel_id(&self) -> u8;
    fn mac_address(&self) -> MacAddress;
    fn header(&self) -> &HeaderFields;

    fn capture_time(&self) -> u32 {
        self.header().capture_time
    }
}

macro_rules! impl_has_channel_and_mac {
    ($ty:ty, $mac:ident) => {
        impl HasChannelAndMac for $ty {
            fn channel_id(&self) -> u8 {
                self.channel_id
            }
            fn mac_address(&self) -> MacAddress {
                self.$mac
            }
            fn header(&self) -> &HeaderFields {
                &self.header
            }
        }
    };
}

/// OFDM subcarrier addressing shared by the per-subcarrier formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SubcarrierLayout {
    pub zero_frequency_hz: u32,
    pub first_active_subcarrier: u16,
    pub spacing_khz: u8,
}

impl SubcarrierLayout {
    pub fn frequency_hz(&self, index: usize) -> u64 {
        let subcarrier = u64::from(self.first_active_subcarrier) + index as u64;
        u64::from(self.zero_frequency_hz) + subcarrier * u64::from(self.spacing_khz) * 1000
    }

    pub fn frequencies_hz(&self, count: usize) -> Vec<u64> {
        (0..count).map(|i| self.frequency_hz(i)).collect()
    }
}

/// Magnitude/phase views over records carrying IQ data.
pub trait ComplexSeries {
    fn coefficients(&self) -> &[Complex64];

    fn magnitudes(&self) -> Vec<f64> {
        self.coefficients().iter().map(|c| c.norm()).collect()
    }

    /// 20·log10|c|, floored so empty taps stay finite.
    fn magnitudes_db(&self) -> Vec<f64> {
        self.coefficients()
            .iter()
            .map(|c| magnitude_db(c.norm()))
            .collect()
    }

    fn phases(&self) -> Vec<f64> {
        self.coefficients().iter().map(|c| c.arg()).collect()
    }
}

pub fn magnitude_db(magnitude: f64) -> f64 {
    if magnitude > 0.0 {
        (20.0 * magnitude.log10()).max(MAGNITUDE_DB_FLOOR)
    } else {
        MAGNITUDE_DB_FLOOR
    }
}

// =======================
// PNN1 symbol capture
// =======================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SymbolCapture {
    pub header: HeaderFields,
    pub channel_id: u8,
    pub mac_address: MacAddress,
    pub sample_rate_hz: u32,
    pub fft_length: u16,
    pub trigger_group_id: u32,
    pub samples: Vec<Complex64>,
}

impl_has_channel_and_mac!(SymbolCapture, mac_address);

impl ComplexSeries for SymbolCapture {
    fn coefficients(&self) -> &[Complex64] {
        &self.samples
    }
}

// =======================
// PNN2 channel estimate
// =======================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelEstimate {
    pub header: HeaderFields,
    pub channel_id: u8,
    pub mac_address: MacAddress,
    pub layout: SubcarrierLayout,
    pub coefficients: Vec<Complex64>,
}

impl_has_channel_and_mac!(ChannelEstimate, mac_address);

impl ComplexSeries for ChannelEstimate {
    fn coefficients(&self) -> &[Complex64] {
        &self.coefficients
    }
}

impl ChannelEstimate {
    pub fn frequencies_hz(&self) -> Vec<u64> {
        self.layout.frequencies_hz(self.coefficients.len())
    }
}

// =======================
// PNN3 constellation display
// =======================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstellationDisplay {
    pub header: HeaderFields,
    pub channel_id: u8,
    pub mac_address: MacAddress,
    pub zero_frequency_hz: u32,
    pub modulation_order: u16,
    pub num_sample_symbols: u16,
    pub spacing_khz: u8,
    pub soft_decisions: Vec<Complex64>,
}

impl_has_channel_and_mac!(ConstellationDisplay, mac_address);

impl ComplexSeries for ConstellationDisplay {
    fn coefficients(&self) -> &[Complex64] {
        &self.soft_decisions
    }
}

// =======================
// PNN4 RxMER
// =======================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RxMer {
    pub header: HeaderFields,
    pub channel_id: u8,
    pub mac_address: MacAddress,
    pub layout: SubcarrierLayout,
    /// Per-subcarrier MER in dB, within [0, 63.5]
    pub values_db: Vec<f64>,
}

impl_has_channel_and_mac!(RxMer, mac_address);

impl RxMer {
    pub fn frequencies_hz(&self) -> Vec<u64> {
        self.layout.frequencies_hz(self.values_db.len())
    }

    pub fn mean_db(&self) -> f64 {
        if self.values_db.is_empty() {
            return 0.0;
        }
        self.values_db.iter().sum::<f64>() / self.values_db.len() as f64
    }

    /// Shannon limit per subcarrier, log2(1 + SNR) in bits per symbol.
    pub fn shannon_bits(&self) -> Vec<f64> {
        self.values_db
            .iter()
            .map(|db| (1.0 + 10f64.powf(db / 10.0)).log2())
            .collect()
    }
}

// =======================
// PNN5 histogram
// =======================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Histogram {
    pub header: HeaderFields,
    pub mac_address: MacAddress,
    pub symmetry: u8,
    pub dwell_counts: Vec<u32>,
    pub hit_counts: Vec<u32>,
}

impl HasChannelAndMac for Histogram {
    // Histograms are not tied to a channel
    fn channel_id(&self) -> u8 {
        0
    }
    fn mac_address(&self) -> MacAddress {
        self.mac_address
    }
    fn header(&self) -> &HeaderFields {
        &self.header
    }
}

impl Histogram {
    pub fn total_hits(&self) -> u64 {
        self.hit_counts.iter().map(|&h| u64::from(h)).sum()
    }
}

// =======================
// PNN6 / PNN7 upstream pre-equalization
// =======================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpstreamPreEqualization {
    pub header: HeaderFields,
    pub channel_id: u8,
    pub cm_mac_address: MacAddress,
    pub cmts_mac_address: MacAddress,
    pub layout: SubcarrierLayout,
    pub coefficients: Vec<Complex64>,
}

impl_has_channel_and_mac!(UpstreamPreEqualization, cm_mac_address);

impl ComplexSeries for UpstreamPreEqualization {
    fn coefficients(&self) -> &[Complex64] {
        &self.coefficients
    }
}

impl UpstreamPreEqualization {
    pub fn is_last_update(&self) -> bool {
        self.header.file_type == PnmFileType::UpstreamPreEqualizerCoefficientsLastUpdate
    }

    pub fn frequencies_hz(&self) -> Vec<u64> {
        self.layout.frequencies_hz(self.coefficients.len())
    }

    /// Index of the strongest tap.
    pub fn main_tap_index(&self) -> Option<usize> {
        self.coefficients
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.norm_sqr().total_cmp(&b.norm_sqr()))
            .map(|(i, _)| i)
    }

    /// Main-tap energy over total tap energy, in dB.
    pub fn main_tap_energy_ratio_db(&self) -> Option<f64> {
        let main = self.coefficients.get(self.main_tap_index()?)?.norm_sqr();
        let total: f64 = self.coefficients.iter().map(|c| c.norm_sqr()).sum();
        if total == 0.0 {
            return None;
        }
        Some(10.0 * (main / total).log10())
    }
}

// =======================
// PNN8 FEC summary
// =======================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FecSummaryType {
    TenMinute,
    TwentyFourHour,
    Other(u8),
}

impl FecSummaryType {
    pub fn from_u8(val: u8) -> Self {
        match val {
            2 => FecSummaryType::TenMinute,
            3 => FecSummaryType::TwentyFourHour,
            other => FecSummaryType::Other(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CodewordSet {
    pub timestamp: u32,
    pub total_codewords: u32,
    pub corrected: u32,
    pub uncorrectable: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FecProfile {
    pub profile_id: u8,
    pub sets: Vec<CodewordSet>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProfileTotals {
    pub profile_id: u8,
    pub total_codewords: u64,
    pub corrected: u64,
    pub uncorrectable: u64,
}

impl ProfileTotals {
    pub fn new(profile_id: u8) -> Self {
        Self {
            profile_id,
            total_codewords: 0,
            corrected: 0,
            uncorrectable: 0,
        }
    }

    pub fn accumulate(&mut self, set: &CodewordSet) {
        self.total_codewords += u64::from(set.total_codewords);
        self.corrected += u64::from(set.corrected);
        self.uncorrectable += u64::from(set.uncorrectable);
    }

    pub fn merge(&mut self, other: &ProfileTotals) {
        self.total_codewords += other.total_codewords;
        self.corrected += other.corrected;
        self.uncorrectable += other.uncorrectable;
    }

    pub fn uncorrectable_ratio(&self) -> f64 {
        if self.total_codewords == 0 {
            return 0.0;
        }
        self.uncorrectable as f64 / self.total_codewords as f64
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FecSummary {
    pub header: HeaderFields,
    pub channel_id: u8,
    pub mac_address: MacAddress,
    pub summary_type: FecSummaryType,
    pub profiles: Vec<FecProfile>,
}

impl_has_channel_and_mac!(FecSummary, mac_address);

impl FecSummary {
    /// Codeword counters summed per profile, ordered by profile id.
    pub fn profile_totals(&self) -> Vec<ProfileTotals> {
        let mut totals: BTreeMap<u8, ProfileTotals> = BTreeMap::new();
        for profile in &self.profiles {
            let entry = totals
                .entry(profile.profile_id)
                .or_insert_with(|| ProfileTotals::new(profile.profile_id));
            for set in &profile.sets {
                entry.accumulate(set);
            }
        }
        totals.into_values().collect()
    }
}

// =======================
// PNN9 spectrum analysis
// =======================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpectrumAnalysis {
    pub header: HeaderFields,
    pub channel_id: u8,
    pub mac_address: MacAddress,
    pub first_segment_center_hz: u32,
    pub last_segment_center_hz: u32,
    pub segment_span_hz: u32,
    pub bins_per_segment: u16,
    pub noise_bandwidth: u16,
    pub window_function: u16,
    /// Amplitudes in dB, one vector per segment; the last may be short
    pub segments: Vec<Vec<f64>>,
}

impl_has_channel_and_mac!(SpectrumAnalysis, mac_address);

impl SpectrumAnalysis {
    pub fn amplitudes_db(&self) -> Vec<f64> {
        self.segments.iter().flatten().copied().collect()
    }

    pub fn segment_centers_hz(&self) -> Vec<f64> {
        let n = self.segments.len();
        let first = f64::from(self.first_segment_center_hz);
        let last = f64::from(self.last_segment_center_hz);
        if n <= 1 {
            return vec![first; n];
        }
        let step = (last - first) / (n - 1) as f64;
        (0..n).map(|k| first + k as f64 * step).collect()
    }

    /// Bin frequencies, flattened in the same order as [`amplitudes_db`](Self::amplitudes_db).
    pub fn frequencies_hz(&self) -> Vec<f64> {
        let span = f64::from(self.segment_span_hz);
        let bins = f64::from(self.bins_per_segment.max(1));
        let bin_width = span / bins;

        self.segment_centers_hz()
            .iter()
            .zip(&self.segments)
            .flat_map(|(center, segment)| {
                let start = center - span / 2.0;
                (0..segment.len()).map(move |j| start + j as f64 * bin_width)
            })
            .collect()
    }
}

// =======================
// PNN10 modulation profile
// =======================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ModulationScheme {
    Range {
        modulation: u8,
        num_subcarriers: u16,
    },
    Skip {
        main_modulation: u8,
        skip_modulation: u8,
        num_subcarriers: u16,
    },
}

impl ModulationScheme {
    pub fn num_subcarriers(&self) -> u16 {
        match self {
            ModulationScheme::Range {
                num_subcarriers, ..
            }
            | ModulationScheme::Skip {
                num_subcarriers, ..
            } => *num_subcarriers,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModulationProfileEntry {
    pub profile_id: u8,
    pub schemes: Vec<ModulationScheme>,
}

impl ModulationProfileEntry {
    pub fn total_subcarriers(&self) -> u32 {
        self.schemes
            .iter()
            .map(|s| u32::from(s.num_subcarriers()))
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModulationProfile {
    pub header: HeaderFields,
    pub channel_id: u8,
    pub mac_address: MacAddress,
    pub layout: SubcarrierLayout,
    pub profiles: Vec<ModulationProfileEntry>,
}

impl_has_channel_and_mac!(ModulationProfile, mac_address);

// =======================
// Sum type
// =======================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "record", rename_all = "snake_case")]
pub enum DecodedCapture {
    SymbolCapture(SymbolCapture),
    ChannelEstimate(ChannelEstimate),
    Constellation(ConstellationDisplay),
    RxMer(RxMer),
    Histogram(Histogram),
    UpstreamPreEqualization(UpstreamPreEqualization),
    FecSummary(FecSummary),
    SpectrumAnalysis(SpectrumAnalysis),
    ModulationProfile(ModulationProfile),
}

impl DecodedCapture {
    fn inner(&self) -> &dyn HasChannelAndMac {
        match self {
            DecodedCapture::SymbolCapture(r) => r,
            DecodedCapture::ChannelEstimate(r) => r,
            DecodedCapture::Constellation(r) => r,
            DecodedCapture::RxMer(r) => r,
            DecodedCapture::Histogram(r) => r,
            DecodedCapture::UpstreamPreEqualization(r) => r,
            DecodedCapture::FecSummary(r) => r,
            DecodedCapture::SpectrumAnalysis(r) => r,
            DecodedCapture::ModulationProfile(r) => r,
        }
    }

    pub fn file_type(&self) -> PnmFileType {
        self.header().file_type
    }
}

impl HasChannelAndMac for DecodedCapture {
    fn channel_id(&self) -> u8 {
        self.inner().channel_id()
    }
    fn mac_address(&self) -> MacAddress {
        self.inner().mac_address()
    }
    fn header(&self) -> &HeaderFields {
        self.inner().header()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn fields(file_type: PnmFileType) -> HeaderFields {
        HeaderFields {
            file_type,
            major_version: 1,
            minor_version: 0,
            capture_time: 42,
        }
    }

    #[test]
    fn test_subcarrier_frequencies() {
        let layout = SubcarrierLayout {
            zero_frequency_hz: 100_000_000,
            first_active_subcarrier: 10,
            spacing_khz: 50,
        };
        assert_eq!(
            layout.frequencies_hz(3),
            vec![100_500_000, 100_550_000, 100_600_000]
        );
    }

    #[test]
    fn test_magnitude_db_floor() {
        assert_eq!(magnitude_db(0.0), MAGNITUDE_DB_FLOOR);
        assert_relative_eq!(magnitude_db(1.0), 0.0, epsilon = 1e-12);
        assert_relative_eq!(magnitude_db(0.1), -20.0, epsilon = 1e-9);
    }

    #[test]
    fn test_pre_eq_main_tap() {
        let eq = UpstreamPreEqualization {
            header: fields(PnmFileType::UpstreamPreEqualizerCoefficients),
            channel_id: 1,
            cm_mac_address: MacAddress::new([1; 6]),
            cmts_mac_address: MacAddress::new([2; 6]),
            layout: SubcarrierLayout {
                zero_frequency_hz: 0,
                first_active_subcarrier: 0,
                spacing_khz: 50,
            },
            coefficients: vec![
                Complex64::new(0.0, 0.0),
                Complex64::new(1.0, 0.0),
                Complex64::new(0.0, 0.0),
            ],
        };
        assert_eq!(eq.main_tap_index(), Some(1));
        assert_eq!(eq.main_tap_energy_ratio_db(), Some(0.0));
        assert!(!eq.is_last_update());
    }

    #[test]
    fn test_fec_profile_totals_merge_repeated_ids() {
        let set = |t, c, u| CodewordSet {
            timestamp: 0,
            total_codewords: t,
            corrected: c,
            uncorrectable: u,
        };
        let summary = FecSummary {
            header: fields(PnmFileType::OfdmFecSummary),
            channel_id: 3,
            mac_address: MacAddress::new([1; 6]),
            summary_type: FecSummaryType::TenMinute,
            profiles: vec![
                FecProfile {
                    profile_id: 5,
                    sets: vec![set(100, 2, 1), set(50, 0, 0)],
                },
                FecProfile {
                    profile_id: 0,
                    sets: vec![set(10, 1, 1)],
                },
            ],
        };
        let totals = summary.profile_totals();
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].profile_id, 0);
        assert_eq!(totals[1].total_codewords, 150);
        assert_relative_eq!(totals[0].uncorrectable_ratio(), 0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_spectrum_frequencies() {
        let spectrum = SpectrumAnalysis {
            header: fields(PnmFileType::SpectrumAnalysis),
            channel_id: 0,
            mac_address: MacAddress::new([1; 6]),
            first_segment_center_hz: 1_000,
            last_segment_center_hz: 2_000,
            segment_span_hz: 1_000,
            bins_per_segment: 2,
            noise_bandwidth: 0,
            window_function: 0,
            segments: vec![vec![-1.0, -2.0], vec![-3.0]],
        };
        assert_eq!(spectrum.segment_centers_hz(), vec![1_000.0, 2_000.0]);
        assert_eq!(spectrum.frequencies_hz(), vec![500.0, 1_000.0, 1_500.0]);
        assert_eq!(spectrum.amplitudes_db(), vec![-1.0, -2.0, -3.0]);
    }

    #[test]
    fn test_decoded_capture_exposes_common_fields() {
        let capture = DecodedCapture::Histogram(Histogram {
            header: fields(PnmFileType::DownstreamHistogram),
            mac_address: MacAddress::new([9; 6]),
            symmetry: 1,
            dwell_counts: vec![1, 1],
            hit_counts: vec![3, 4],
        });
        assert_eq!(capture.channel_id(), 0);
        assert_eq!(capture.mac_address(), MacAddress::new([9; 6]));
        assert_eq!(capture.capture_time(), 42);
        assert_eq!(capture.file_type(), PnmFileType::DownstreamHistogram);
    }
}
