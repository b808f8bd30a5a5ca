// PNN1: raw OFDM symbol capture, Q(2,13) IQ samples

use crate::core::constants::Q_2_13;
use crate::core::cursor::ByteCursor;
use crate::core::decoders::expect_file_type;
use crate::core::error::Result;
use crate::core::file_type::PnmFileType;
use crate::core::fixed_point::decode_complex_stream;
use crate::core::format::SymbolCapture;
use crate::core::header::PnmHeader;

pub fn decode(header: &PnmHeader) -> Result<SymbolCapture> {
    let fields = expect_file_type(header, PnmFileType::SymbolCapture)?;
    let mut cursor = ByteCursor::new(&header.payload);

    let channel_id = cursor.read_u8("channel_id")?;
    let mac_address = cursor.read_mac("mac_address")?;
    let sample_rate_hz = cursor.read_u32("sample_rate_hz")?;
    let fft_length = cursor.read_u16("fft_length")?;
    let trigger_group_id = cursor.read_u32("trigger_group_id")?;
    let data = cursor.read_declared("data_len")?;
    cursor.finish("symbol capture samples")?;

    Ok(SymbolCapture {
        header: fields,
        channel_id,
        mac_address,
        sample_rate_hz,
        fft_length,
        trigger_group_id,
        samples: decode_complex_stream(data, Q_2_13, true)?,
    })
}
