// Common PNM header parsing

use crate::core::constants::*;
use crate::core::error::{PnmError, Result};
use crate::core::file_type::{resolve, PnmFileType};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Header layout, selected by the discriminant byte alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HeaderVariant {
    /// 6 bytes, no capture time
    Compact,
    /// 10 bytes, big-endian capture time
    Standard,
}

impl HeaderVariant {
    pub fn for_discriminant(byte: u8) -> Self {
        if byte == COMPACT_DISCRIMINANT {
            HeaderVariant::Compact
        } else {
            HeaderVariant::Standard
        }
    }

    pub fn size(&self) -> usize {
        match self {
            HeaderVariant::Compact => COMPACT_HEADER_SIZE,
            HeaderVariant::Standard => STANDARD_HEADER_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PnmHeader {
    pub file_type_tag: String,
    pub file_type_version: u8,
    pub major_version: u8,
    pub minor_version: u8,
    /// Epoch seconds, 0 for compact headers
    pub capture_time: u32,
    pub variant: HeaderVariant,
    pub payload: Vec<u8>,
}

impl PnmHeader {
    pub fn file_type(&self) -> Option<PnmFileType> {
        resolve(&self.file_type_tag, self.file_type_version)
    }

    /// Like [`file_type`](Self::file_type) but unknown types become an error.
    pub fn require_file_type(&self) -> Result<PnmFileType> {
        self.file_type().ok_or_else(|| {
            PnmError::UnsupportedFileType(format!(
                "{}{}",
                self.file_type_tag, self.file_type_version
            ))
        })
    }

    pub fn capture_datetime(&self) -> Option<DateTime<Utc>> {
        capture_datetime(self.capture_time)
    }

    /// Serializes the header back to wire form. The layout follows the
    /// version byte exactly as `parse_header` reads it, so a version of 8
    /// always drops the capture time.
    pub fn to_bytes(&self) -> Vec<u8> {
        let variant = HeaderVariant::for_discriminant(self.file_type_version);
        let mut out = Vec::with_capacity(variant.size() + self.payload.len());

        let mut tag = [b' '; FILE_TYPE_TAG_SIZE];
        for (dst, src) in tag.iter_mut().zip(self.file_type_tag.bytes()) {
            *dst = src;
        }
        out.extend_from_slice(&tag);
        out.push(self.file_type_version);
        out.push(self.major_version);
        out.push(self.minor_version);
        if variant == HeaderVariant::Standard {
            out.extend_from_slice(&self.capture_time.to_be_bytes());
        }
        out.extend_from_slice(&self.payload);
        out
    }
}

/// Capture times of 0 mean "not recorded".
pub fn capture_datetime(capture_time: u32) -> Option<DateTime<Utc>> {
    if capture_time == 0 {
        return None;
    }
    DateTime::<Utc>::from_timestamp(i64::from(capture_time), 0)
}

pub fn parse_header(bytes: &[u8]) -> Result<PnmHeader> {
    if bytes.len() <= DISCRIMINANT_OFFSET {
        return Err(PnmError::TruncatedHeader {
            needed: DISCRIMINANT_OFFSET + 1,
            got: bytes.len(),
        });
    }

    let variant = HeaderVariant::for_discriminant(bytes[DISCRIMINANT_OFFSET]);
    let size = variant.size();
    if bytes.len() < size {
        return Err(PnmError::TruncatedHeader {
            needed: size,
            got: bytes.len(),
        });
    }

    let file_type_tag = String::from_utf8_lossy(&bytes[0..FILE_TYPE_TAG_SIZE]).into_owned();
    let file_type_version = bytes[3];
    let major_version = bytes[4];
    let minor_version = bytes[5];
    let capture_time = match variant {
        HeaderVariant::Compact => 0,
        HeaderVariant::Standard => u32::from_be_bytes([bytes[6], bytes[7], bytes[8], bytes[9]]),
    };

    Ok(PnmHeader {
        file_type_tag,
        file_type_version,
        major_version,
        minor_version,
        capture_time,
        variant,
        payload: bytes[size..].to_vec(),
    })
}
