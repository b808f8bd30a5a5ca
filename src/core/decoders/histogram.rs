// PNN5: downstream histogram, two length-prefixed u32 arrays

use crate::core::constants::HISTOGRAM_COUNTER_SIZE;
use crate::core::cursor::ByteCursor;
use crate::core::decoders::expect_file_type;
use crate::core::error::{PnmError, Result};
use crate::core::file_type::PnmFileType;
use crate::core::format::Histogram;
use crate::core::header::PnmHeader;

fn counters(data: &[u8], field: &str) -> Result<Vec<u32>> {
    if data.len() % HISTOGRAM_COUNTER_SIZE != 0 {
        return Err(PnmError::LengthMismatch(format!(
            "{} of {} bytes is not a multiple of {}",
            field,
            data.len(),
            HISTOGRAM_COUNTER_SIZE
        )));
    }
    Ok(data
        .chunks_exact(HISTOGRAM_COUNTER_SIZE)
        .map(|c| u32::from_be_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

pub fn decode(header: &PnmHeader) -> Result<Histogram> {
    let fields = expect_file_type(header, PnmFileType::DownstreamHistogram)?;
    let mut cursor = ByteCursor::new(&header.payload);

    let mac_address = cursor.read_mac("mac_address")?;
    let symmetry = cursor.read_u8("symmetry")?;
    let dwell = cursor.read_declared("dwell_count_len")?;
    let hits = cursor.read_declared("hit_count_len")?;
    cursor.finish("histogram hit counts")?;

    Ok(Histogram {
        header: fields,
        mac_address,
        symmetry,
        dwell_counts: counters(dwell, "dwell counts")?,
        hit_counts: counters(hits, "hit counts")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::decoders::test_support::{header, MAC};

    fn payload(dwell: &[u32], hits: &[u32]) -> Vec<u8> {
        let mut p = MAC.to_vec();
        p.push(1);
        p.extend_from_slice(&((dwell.len() * 4) as u32).to_be_bytes());
        dwell.iter().for_each(|d| p.extend_from_slice(&d.to_be_bytes()));
        p.extend_from_slice(&((hits.len() * 4) as u32).to_be_bytes());
        hits.iter().for_each(|h| p.extend_from_slice(&h.to_be_bytes()));
        p
    }

    #[test]
    fn test_decode_histogram() {
        let rec = decode(&header(5, 11, payload(&[1000, 1000], &[5, 70000, 3]))).unwrap();
        assert_eq!(rec.symmetry, 1);
        assert_eq!(rec.dwell_counts, vec![1000, 1000]);
        assert_eq!(rec.hit_counts, vec![5, 70000, 3]);
        assert_eq!(rec.total_hits(), 70008);
    }

    #[test]
    fn test_empty_arrays() {
        let rec = decode(&header(5, 11, payload(&[], &[]))).unwrap();
        assert!(rec.dwell_counts.is_empty());
        assert!(rec.hit_counts.is_empty());
    }

    #[test]
    fn test_unaligned_length_rejected() {
        let mut p = MAC.to_vec();
        p.push(0);
        p.extend_from_slice(&3u32.to_be_bytes());
        p.extend_from_slice(&[0, 0, 1]);
        p.extend_from_slice(&0u32.to_be_bytes());
        let err = decode(&header(5, 11, p)).unwrap_err();
        assert!(matches!(err, PnmError::LengthMismatch(_)));
    }

    #[test]
    fn test_missing_hit_array() {
        let mut p = payload(&[1], &[]);
        p.truncate(p.len() - 4);
        let err = decode(&header(5, 11, p)).unwrap_err();
        assert!(matches!(err, PnmError::TruncatedPayload { field: "hit_count_len", .. }));
    }
}
