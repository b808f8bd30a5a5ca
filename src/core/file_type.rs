// Registry of PNM file types keyed by tag + version

use serde::Serialize;
use std::fmt;

/// Every capture kind a modem can produce. Ordering follows the code table,
/// which is also the order `SortByFileType` uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PnmFileType {
    SymbolCapture,
    OfdmChannelEstimateCoefficient,
    DownstreamConstellationDisplay,
    ReceiveModulationErrorRatio,
    DownstreamHistogram,
    UpstreamPreEqualizerCoefficients,
    UpstreamPreEqualizerCoefficientsLastUpdate,
    OfdmFecSummary,
    SpectrumAnalysis,
    OfdmModulationProfile,
    LatencyReport,
}

impl PnmFileType {
    pub const ALL: [PnmFileType; 11] = [
        PnmFileType::SymbolCapture,
        PnmFileType::OfdmChannelEstimateCoefficient,
        PnmFileType::DownstreamConstellationDisplay,
        PnmFileType::ReceiveModulationErrorRatio,
        PnmFileType::DownstreamHistogram,
        PnmFileType::UpstreamPreEqualizerCoefficients,
        PnmFileType::UpstreamPreEqualizerCoefficientsLastUpdate,
        PnmFileType::OfdmFecSummary,
        PnmFileType::SpectrumAnalysis,
        PnmFileType::OfdmModulationProfile,
        PnmFileType::LatencyReport,
    ];

    /// Tag + decimal version, as it appears in the lookup table.
    pub fn code(&self) -> &'static str {
        match self {
            PnmFileType::SymbolCapture => "PNN1",
            PnmFileType::OfdmChannelEstimateCoefficient => "PNN2",
            PnmFileType::DownstreamConstellationDisplay => "PNN3",
            PnmFileType::ReceiveModulationErrorRatio => "PNN4",
            PnmFileType::DownstreamHistogram => "PNN5",
            PnmFileType::UpstreamPreEqualizerCoefficients => "PNN6",
            PnmFileType::UpstreamPreEqualizerCoefficientsLastUpdate => "PNN7",
            PnmFileType::OfdmFecSummary => "PNN8",
            PnmFileType::SpectrumAnalysis => "PNN9",
            PnmFileType::OfdmModulationProfile => "PNN10",
            PnmFileType::LatencyReport => "LLD01",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PnmFileType::SymbolCapture => "SYMBOL_CAPTURE",
            PnmFileType::OfdmChannelEstimateCoefficient => "OFDM_CHANNEL_ESTIMATE_COEFFICIENT",
            PnmFileType::DownstreamConstellationDisplay => "DOWNSTREAM_CONSTELLATION_DISPLAY",
            PnmFileType::ReceiveModulationErrorRatio => "RECEIVE_MODULATION_ERROR_RATIO",
            PnmFileType::DownstreamHistogram => "DOWNSTREAM_HISTOGRAM",
            PnmFileType::UpstreamPreEqualizerCoefficients => "UPSTREAM_PRE_EQUALIZER_COEFFICIENTS",
            PnmFileType::UpstreamPreEqualizerCoefficientsLastUpdate => {
                "UPSTREAM_PRE_EQUALIZER_COEFFICIENTS_LAST_UPDATE"
            }
            PnmFileType::OfdmFecSummary => "OFDM_FEC_SUMMARY",
            PnmFileType::SpectrumAnalysis => "SPECTRUM_ANALYSIS",
            PnmFileType::OfdmModulationProfile => "OFDM_MODULATION_PROFILE",
            PnmFileType::LatencyReport => "LATENCY_REPORT",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.code() == code)
    }
}

impl fmt::Display for PnmFileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.code())
    }
}

/// Builds the lookup key for a raw tag and version byte.
pub fn lookup_key(tag: &str, version: u8) -> String {
    let tag = tag.trim_end_matches(|c: char| c.is_ascii_whitespace() || c == '\0');
    format!("{}{}", tag, version)
}

/// Resolves a header's tag and version to a file type. Unknown
/// combinations never fall back to a default.
pub fn resolve(tag: &str, version: u8) -> Option<PnmFileType> {
    PnmFileType::from_code(&lookup_key(tag, version))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_codes() {
        assert_eq!(resolve("PNN", 4), Some(PnmFileType::ReceiveModulationErrorRatio));
        assert_eq!(resolve("PNN", 10), Some(PnmFileType::OfdmModulationProfile));
        assert_eq!(resolve("LLD", 1), None);
        assert_eq!(PnmFileType::from_code("LLD01"), Some(PnmFileType::LatencyReport));
    }

    #[test]
    fn test_resolve_trims_trailing_padding() {
        assert_eq!(resolve("PN\0", 4), None);
        assert_eq!(lookup_key("PNN\0", 2), "PNN2");
        assert_eq!(lookup_key("PN ", 2), "PN2");
    }

    #[test]
    fn test_unknown_never_falls_back() {
        assert_eq!(resolve("ZZZ", 99), None);
        assert_eq!(resolve("PNN", 0), None);
        assert_eq!(resolve("PNN", 11), None);
    }

    #[test]
    fn test_every_code_round_trips() {
        for t in PnmFileType::ALL {
            assert_eq!(PnmFileType::from_code(t.code()), Some(t));
        }
    }

    #[test]
    fn test_ordering_follows_code_table() {
        assert!(PnmFileType::SymbolCapture < PnmFileType::ReceiveModulationErrorRatio);
        assert!(PnmFileType::OfdmModulationProfile < PnmFileType::LatencyReport);
    }
}
