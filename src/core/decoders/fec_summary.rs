// PNN8: OFDM FEC summary, profiles of codeword counter sets

use crate::core::cursor::ByteCursor;
use crate::core::decoders::expect_file_type;
use crate::core::error::Result;
use crate::core::file_type::PnmFileType;
use crate::core::format::{CodewordSet, FecProfile, FecSummary, FecSummaryType};
use crate::core::header::PnmHeader;

pub fn decode(header: &PnmHeader) -> Result<FecSummary> {
    let fields = expect_file_type(header, PnmFileType::OfdmFecSummary)?;
    let mut cursor = ByteCursor::new(&header.payload);

    let channel_id = cursor.read_u8("channel_id")?;
    let mac_address = cursor.read_mac("mac_address")?;
    let summary_type = FecSummaryType::from_u8(cursor.read_u8("summary_type")?);
    let num_profiles = cursor.read_u8("num_profiles")?;

    let mut profiles = Vec::with_capacity(usize::from(num_profiles));
    for _ in 0..num_profiles {
        let profile_id = cursor.read_u8("profile_id")?;
        let num_sets = cursor.read_u16("num_sets")?;

        let mut sets = Vec::with_capacity(usize::from(num_sets).min(cursor.remaining() / 16));
        for _ in 0..num_sets {
            sets.push(CodewordSet {
                timestamp: cursor.read_u32("codeword_set.timestamp")?,
                total_codewords: cursor.read_u32("codeword_set.total_codewords")?,
                corrected: cursor.read_u32("codeword_set.corrected")?,
                uncorrectable: cursor.read_u32("codeword_set.uncorrectable")?,
            });
        }
        profiles.push(FecProfile { profile_id, sets });
    }
    cursor.finish("FEC summary profiles")?;

    Ok(FecSummary {
        header: fields,
        channel_id,
        mac_address,
        summary_type,
        profiles,
    })
}
