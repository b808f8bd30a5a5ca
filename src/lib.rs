// PNM capture reader
// Main library entry point

pub mod core;
pub mod loader;

// Re-export main types
pub use crate::core::aggregator::{
    ChannelEstimateAggregator, FecSummaryAggregator, MinAvgMax, RxMerAggregator,
    SignalAggregator, SignalSeries,
};
pub use crate::core::collection::{build_index, CaptureIndex, CaptureIndexEntry, SortStage};
pub use crate::core::decoders::{decode_bytes, decode_capture, identify};
pub use crate::core::error::{PnmError, Result};
pub use crate::core::file_type::{resolve, PnmFileType};
pub use crate::core::fixed_point::{decode_complex_stream, decode_fixed_point, FixedPointFormat};
pub use crate::core::format::{DecodedCapture, HasChannelAndMac};
pub use crate::core::header::{parse_header, PnmHeader};
pub use crate::core::mac::MacAddress;
pub use crate::core::statistics::SignalStatistics;

#[cfg(test)]
mod tests {
    #[test]
    fn test_constants() {
        use crate::core::constants::*;
        assert_eq!(COMPACT_HEADER_SIZE, 6);
        assert_eq!(STANDARD_HEADER_SIZE, 10);
        assert_eq!(Q_2_13.total_bits(), 16);
        assert_eq!(Q_1_14.total_bits(), 16);
    }
}
