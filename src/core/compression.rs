// Decompression of archived capture files

use crate::core::error::{PnmError, Result};
use flate2::read::{GzDecoder, ZlibDecoder};
use std::io::Read;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionType {
    None,
    Gzip,
    Zlib,
    Lz4,
    Zstd,
}

impl CompressionType {
    /// Picks the codec from the file extension; anything unrecognised is
    /// treated as a raw capture.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("gz") => CompressionType::Gzip,
            Some(ext) if ext.eq_ignore_ascii_case("zlib") => CompressionType::Zlib,
            Some(ext) if ext.eq_ignore_ascii_case("lz4") => CompressionType::Lz4,
            Some(ext) if ext.eq_ignore_ascii_case("zst") => CompressionType::Zstd,
            _ => CompressionType::None,
        }
    }
}

fn read_all<R: Read>(mut reader: R, codec: &str) -> Result<Vec<u8>> {
    let mut decompressed = Vec::new();
    reader
        .read_to_end(&mut decompressed)
        .map_err(|e| PnmError::DecompressionFailed(format!("{}: {}", codec, e)))?;
    Ok(decompressed)
}

pub fn decompress(data: &[u8], compression: CompressionType) -> Result<Vec<u8>> {
    match compression {
        CompressionType::None => Ok(data.to_vec()),

        CompressionType::Gzip => read_all(GzDecoder::new(data), "Gzip"),

        CompressionType::Zlib => read_all(ZlibDecoder::new(data), "Zlib"),

        #[cfg(feature = "lz4")]
        CompressionType::Lz4 => {
            let decoder = lz4::Decoder::new(data)
                .map_err(|e| PnmError::DecompressionFailed(format!("LZ4: {}", e)))?;
            read_all(decoder, "LZ4")
        }

        #[cfg(not(feature = "lz4"))]
        CompressionType::Lz4 => Err(PnmError::UnsupportedCompression("lz4".to_string())),

        #[cfg(feature = "zstd")]
        CompressionType::Zstd => zstd::decode_all(data)
            .map_err(|e| PnmError::DecompressionFailed(format!("Zstd: {}", e))),

        #[cfg(not(feature = "zstd"))]
        CompressionType::Zstd => Err(PnmError::UnsupportedCompression("zstd".to_string())),
    }
}
