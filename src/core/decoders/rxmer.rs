// PNN4: receive modulation error ratio, one byte per subcarrier

use crate::core::constants::{RXMER_MAX_DB, RXMER_STEP_DIVISOR};
use crate::core::cursor::ByteCursor;
use crate::core::decoders::expect_file_type;
use crate::core::error::Result;
use crate::core::file_type::PnmFileType;
use crate::core::format::{RxMer, SubcarrierLayout};
use crate::core::header::PnmHeader;

/// Quarter-dB code to dB, clamped to [0, 63.5].
pub fn mer_db(code: u8) -> f64 {
    (f64::from(code) / RXMER_STEP_DIVISOR).clamp(0.0, RXMER_MAX_DB)
}

pub fn decode_values(data: &[u8]) -> Vec<f64> {
    data.iter().map(|&b| mer_db(b)).collect()
}

pub fn decode(header: &PnmHeader) -> Result<RxMer> {
    let fields = expect_file_type(header, PnmFileType::ReceiveModulationErrorRatio)?;
    let mut cursor = ByteCursor::new(&header.payload);

    let channel_id = cursor.read_u8("channel_id")?;
    let mac_address = cursor.read_mac("mac_address")?;
    let layout = SubcarrierLayout {
        zero_frequency_hz: cursor.read_u32("zero_frequency_hz")?,
        first_active_subcarrier: cursor.read_u16("first_active_subcarrier")?,
        spacing_khz: cursor.read_u8("spacing_khz")?,
    };
    let data = cursor.read_declared("data_len")?;
    cursor.finish("RxMER data")?;

    Ok(RxMer {
        header: fields,
        channel_id,
        mac_address,
        layout,
        values_db: decode_values(data),
    })
}
