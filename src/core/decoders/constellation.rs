// PNN3: downstream constellation display soft decisions, Q(2,13)

use crate::core::constants::Q_2_13;
use crate::core::cursor::ByteCursor;
use crate::core::decoders::expect_file_type;
use crate::core::error::Result;
use crate::core::file_type::PnmFileType;
use crate::core::fixed_point::decode_complex_stream;
use crate::core::format::ConstellationDisplay;
use crate::core::header::PnmHeader;

pub fn decode(header: &PnmHeader) -> Result<ConstellationDisplay> {
    let fields = expect_file_type(header, PnmFileType::DownstreamConstellationDisplay)?;
    let mut cursor = ByteCursor::new(&header.payload);

    let channel_id = cursor.read_u8("channel_id")?;
    let mac_address = cursor.read_mac("mac_address")?;
    let zero_frequency_hz = cursor.read_u32("zero_frequency_hz")?;
    let modulation_order = cursor.read_u16("modulation_order")?;
    let num_sample_symbols = cursor.read_u16("num_sample_symbols")?;
    let spacing_khz = cursor.read_u8("spacing_khz")?;
    let data = cursor.read_declared("data_len")?;
    cursor.finish("constellation soft decisions")?;

    Ok(ConstellationDisplay {
        header: fields,
        channel_id,
        mac_address,
        zero_frequency_hz,
        modulation_order,
        num_sample_symbols,
        spacing_khz,
        soft_decisions: decode_complex_stream(data, Q_2_13, true)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::decoders::test_support::{header, MAC};
    use crate::core::error::PnmError;
    use num_complex::Complex64;

    fn payload(data: &[u8], trailing: &[u8]) -> Vec<u8> {
        let mut p = vec![4];
        p.extend_from_slice(&MAC);
        p.extend_from_slice(&600_000_000u32.to_be_bytes());
        p.extend_from_slice(&4096u16.to_be_bytes());
        p.extend_from_slice(&8192u16.to_be_bytes());
        p.push(50);
        p.extend_from_slice(&(data.len() as u32).to_be_bytes());
        p.extend_from_slice(data);
        p.extend_from_slice(trailing);
        p
    }

    #[test]
    fn test_decode_constellation() {
        // (0.5, -0.5): 0x1000 and 0xf000, little-endian
        let rec = decode(&header(3, 7, payload(&[0x00, 0x10, 0x00, 0xf0], &[]))).unwrap();
        assert_eq!(rec.modulation_order, 4096);
        assert_eq!(rec.num_sample_symbols, 8192);
        assert_eq!(rec.spacing_khz, 50);
        assert_eq!(rec.soft_decisions, vec![Complex64::new(0.5, -0.5)]);
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let err = decode(&header(3, 7, payload(&[0, 0, 0, 0], &[0xaa]))).unwrap_err();
        assert!(matches!(err, PnmError::LengthMismatch(_)));
    }
}
