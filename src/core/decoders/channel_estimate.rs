// PNN2: OFDM downstream channel estimate coefficients, Q(2,13)

use crate::core::constants::Q_2_13;
use crate::core::cursor::ByteCursor;
use crate::core::decoders::expect_file_type;
use crate::core::error::Result;
use crate::core::file_type::PnmFileType;
use crate::core::fixed_point::decode_complex_stream;
use crate::core::format::{ChannelEstimate, SubcarrierLayout};
use crate::core::header::PnmHeader;

pub fn decode(header: &PnmHeader) -> Result<ChannelEstimate> {
    let fields = expect_file_type(header, PnmFileType::OfdmChannelEstimateCoefficient)?;
    let mut cursor = ByteCursor::new(&header.payload);

    let channel_id = cursor.read_u8("channel_id")?;
    let mac_address = cursor.read_mac("mac_address")?;
    let layout = SubcarrierLayout {
        zero_frequency_hz: cursor.read_u32("zero_frequency_hz")?,
        first_active_subcarrier: cursor.read_u16("first_active_subcarrier")?,
        spacing_khz: cursor.read_u8("spacing_khz")?,
    };
    let data = cursor.read_declared("coefficient_len")?;
    cursor.finish("channel estimate coefficients")?;

    Ok(ChannelEstimate {
        header: fields,
        channel_id,
        mac_address,
        layout,
        coefficients: decode_complex_stream(data, Q_2_13, true)?,
    })
}
