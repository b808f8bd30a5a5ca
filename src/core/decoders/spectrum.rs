// PNN9: spectrum analysis, segments of signed hundredth-dB bins

use crate::core::constants::{SPECTRUM_AMPLITUDE_DIVISOR, SPECTRUM_BIN_SIZE};
use crate::core::cursor::ByteCursor;
use crate::core::decoders::expect_file_type;
use crate::core::error::{PnmError, Result};
use crate::core::file_type::PnmFileType;
use crate::core::format::SpectrumAnalysis;
use crate::core::header::PnmHeader;

fn segments(data: &[u8], bins_per_segment: u16) -> Result<Vec<Vec<f64>>> {
    if data.len() % SPECTRUM_BIN_SIZE != 0 {
        return Err(PnmError::LengthMismatch(format!(
            "spectrum data of {} bytes is not a whole number of i16 bins",
            data.len()
        )));
    }
    if data.is_empty() {
        return Ok(Vec::new());
    }
    if bins_per_segment == 0 {
        return Err(PnmError::LengthMismatch(
            "spectrum data present but bins_per_segment is 0".to_string(),
        ));
    }

    let amplitudes: Vec<f64> = data
        .chunks_exact(SPECTRUM_BIN_SIZE)
        .map(|b| f64::from(i16::from_be_bytes([b[0], b[1]])) / SPECTRUM_AMPLITUDE_DIVISOR)
        .collect();

    Ok(amplitudes
        .chunks(usize::from(bins_per_segment))
        .map(<[f64]>::to_vec)
        .collect())
}

pub fn decode(header: &PnmHeader) -> Result<SpectrumAnalysis> {
    let fields = expect_file_type(header, PnmFileType::SpectrumAnalysis)?;
    let mut cursor = ByteCursor::new(&header.payload);

    let channel_id = cursor.read_u8("channel_id")?;
    let mac_address = cursor.read_mac("mac_address")?;
    let first_segment_center_hz = cursor.read_u32("first_segment_center_hz")?;
    let last_segment_center_hz = cursor.read_u32("last_segment_center_hz")?;
    let segment_span_hz = cursor.read_u32("segment_span_hz")?;
    let bins_per_segment = cursor.read_u16("bins_per_segment")?;
    let noise_bandwidth = cursor.read_u16("noise_bandwidth")?;
    let window_function = cursor.read_u16("window_function")?;
    let data = cursor.read_declared("data_len")?;
    cursor.finish("spectrum amplitudes")?;

    Ok(SpectrumAnalysis {
        header: fields,
        channel_id,
        mac_address,
        first_segment_center_hz,
        last_segment_center_hz,
        segment_span_hz,
        bins_per_segment,
        noise_bandwidth,
        window_function,
        segments: segments(data, bins_per_segment)?,
    })
}
