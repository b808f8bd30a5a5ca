// Wire-level constants for PNM capture files

use crate::core::fixed_point::FixedPointFormat;

// Byte 3 of every capture selects the header layout
pub const DISCRIMINANT_OFFSET: usize = 3;
pub const COMPACT_DISCRIMINANT: u8 = 8;

// Compact header: tag(3) version(u8) major(u8) minor(u8)
pub const COMPACT_HEADER_SIZE: usize = 3 + 1 + 1 + 1; // 6 bytes

// Standard header: tag(3) version(u8) major(u8) minor(u8) capture_time(u32 BE)
pub const STANDARD_HEADER_SIZE: usize = 3 + 1 + 1 + 1 + 4; // 10 bytes

pub const FILE_TYPE_TAG_SIZE: usize = 3;
pub const MAC_ADDRESS_SIZE: usize = 6;

// IQ sample encodings
pub const Q_2_13: FixedPointFormat = FixedPointFormat::new(2, 13);
pub const Q_1_14: FixedPointFormat = FixedPointFormat::new(1, 14);

// RxMER: quarter-dB steps, clamped at 63.5 dB
pub const RXMER_STEP_DIVISOR: f64 = 4.0;
pub const RXMER_MAX_DB: f64 = 63.5;

// Spectrum amplitudes are signed hundredths of a dB
pub const SPECTRUM_AMPLITUDE_DIVISOR: f64 = 100.0;
pub const SPECTRUM_BIN_SIZE: usize = 2;

// Histogram counters are u32
pub const HISTOGRAM_COUNTER_SIZE: usize = 4;

// Floor used when a magnitude of zero is converted to dB
pub const MAGNITUDE_DB_FLOOR: f64 = -200.0;

// Modulation profile scheme types
pub const SCHEME_RANGE: u8 = 0;
pub const SCHEME_SKIP: u8 = 1;
