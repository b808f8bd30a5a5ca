// Error handling for PNM capture decoding and aggregation

use crate::core::file_type::PnmFileType;
use crate::core::mac::MacAddress;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PnmError>;

#[derive(Error, Debug)]
pub enum PnmError {
    #[error("Truncated header: need {needed} bytes, got {got}")]
    TruncatedHeader { needed: usize, got: usize },

    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("Wrong file type for decoder: expected {expected}, got {got}")]
    WrongFileTypeForDecoder {
        expected: PnmFileType,
        got: PnmFileType,
    },

    #[error("Truncated payload: {field} needs {needed} bytes, {available} available")]
    TruncatedPayload {
        field: &'static str,
        needed: usize,
        available: usize,
    },

    #[error("Length mismatch: {0}")]
    LengthMismatch(String),

    #[error("MAC address mismatch: aggregator holds {expected}, capture has {got}")]
    MacMismatch { expected: MacAddress, got: MacAddress },

    #[error("Invalid fixed-point format Q({int_bits},{frac_bits}): total bits must be byte aligned and at most 64")]
    InvalidFixedPointFormat { int_bits: u32, frac_bits: u32 },

    #[error("Corrupted data: {0}")]
    CorruptedData(String),

    #[error("Channel not found: {0}")]
    ChannelNotFound(u8),

    #[error("Invalid MAC address: {0}")]
    InvalidMacAddress(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported compression: {0}")]
    UnsupportedCompression(String),

    #[error("Decompression failed: {0}")]
    DecompressionFailed(String),
}
