// Loading capture files from disk

use crate::core::compression::{decompress, CompressionType};
use crate::core::error::Result;
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

/// Reads one capture, decompressing it if the extension names a codec.
/// Returns the bare file name alongside the capture bytes.
pub fn load_capture<P: AsRef<Path>>(path: P) -> Result<(String, Vec<u8>)> {
    let path = path.as_ref();
    let mut file = File::open(path)?;

    let mut raw = Vec::new();
    file.read_to_end(&mut raw)?;

    let compression = CompressionType::from_path(path);
    let bytes = decompress(&raw, compression)?;
    debug!(
        "loaded {} ({:?}, {} -> {} bytes)",
        path.display(),
        compression,
        raw.len(),
        bytes.len()
    );

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    Ok((file_name, bytes))
}

/// Loads every regular file in `dir`, sorted by name. Files that cannot be
/// read are logged and left out.
pub fn load_capture_dir<P: AsRef<Path>>(dir: P) -> Result<Vec<(String, Vec<u8>)>> {
    let mut paths: Vec<_> = fs::read_dir(dir.as_ref())?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    paths.sort();

    let mut captures = Vec::with_capacity(paths.len());
    for path in paths {
        match load_capture(&path) {
            Ok(capture) => captures.push(capture),
            Err(e) => warn!("failed to load {}: {}", path.display(), e),
        }
    }
    Ok(captures)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    #[test]
    fn test_load_plain_and_gzip() {
        let dir = tempfile::tempdir().unwrap();
        let capture = b"PNN\x04\x01\x00\x00\x00\x00\x01".to_vec();

        fs::write(dir.path().join("b_rxmer.bin"), &capture).unwrap();
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&capture).unwrap();
        fs::write(dir.path().join("a_rxmer.bin.gz"), encoder.finish().unwrap()).unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();

        let loaded = load_capture_dir(dir.path()).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].0, "a_rxmer.bin.gz");
        assert_eq!(loaded[0].1, capture);
        assert_eq!(loaded[1].0, "b_rxmer.bin");
        assert_eq!(loaded[1].1, capture);
    }

    #[test]
    fn test_corrupt_archive_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bad.gz"), b"not gzip").unwrap();
        fs::write(dir.path().join("good.bin"), b"PNN").unwrap();

        let loaded = load_capture_dir(dir.path()).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].0, "good.bin");
    }

    #[test]
    fn test_missing_file() {
        assert!(load_capture("/nonexistent/pnm/capture.bin").is_err());
    }
}
