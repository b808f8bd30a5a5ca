// PNN6 / PNN7: upstream pre-equalizer taps, Q(1,14)

use crate::core::constants::Q_1_14;
use crate::core::cursor::ByteCursor;
use crate::core::decoders::expect_one_of;
use crate::core::error::Result;
use crate::core::file_type::PnmFileType;
use crate::core::fixed_point::decode_complex_stream;
use crate::core::format::{SubcarrierLayout, UpstreamPreEqualization};
use crate::core::header::PnmHeader;

const ACCEPTED: [PnmFileType; 2] = [
    PnmFileType::UpstreamPreEqualizerCoefficients,
    PnmFileType::UpstreamPreEqualizerCoefficientsLastUpdate,
];

pub fn decode(header: &PnmHeader) -> Result<UpstreamPreEqualization> {
    let fields = expect_one_of(header, &ACCEPTED)?;
    let mut cursor = ByteCursor::new(&header.payload);

    let channel_id = cursor.read_u8("channel_id")?;
    let cm_mac_address = cursor.read_mac("cm_mac_address")?;
    let cmts_mac_address = cursor.read_mac("cmts_mac_address")?;
    let layout = SubcarrierLayout {
        zero_frequency_hz: cursor.read_u32("zero_frequency_hz")?,
        first_active_subcarrier: cursor.read_u16("first_active_subcarrier")?,
        spacing_khz: cursor.read_u8("spacing_khz")?,
    };
    let data = cursor.read_declared("equalizer_len")?;
    cursor.finish("pre-equalizer coefficients")?;

    Ok(UpstreamPreEqualization {
        header: fields,
        channel_id,
        cm_mac_address,
        cmts_mac_address,
        layout,
        coefficients: decode_complex_stream(data, Q_1_14, true)?,
    })
}
