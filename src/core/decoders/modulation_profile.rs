// PNN10: OFDM modulation profiles, range and skip schemes

use crate::core::constants::{SCHEME_RANGE, SCHEME_SKIP};
use crate::core::cursor::ByteCursor;
use crate::core::decoders::expect_file_type;
use crate::core::error::{PnmError, Result};
use crate::core::file_type::PnmFileType;
use crate::core::format::{
    ModulationProfile, ModulationProfileEntry, ModulationScheme, SubcarrierLayout,
};
use crate::core::header::PnmHeader;

fn schemes(data: &[u8]) -> Result<Vec<ModulationScheme>> {
    let mut cursor = ByteCursor::new(data);
    let mut out = Vec::new();

    while cursor.remaining() > 0 {
        let scheme = match cursor.read_u8("scheme_type")? {
            SCHEME_RANGE => ModulationScheme::Range {
                modulation: cursor.read_u8("range.modulation")?,
                num_subcarriers: cursor.read_u16("range.num_subcarriers")?,
            },
            SCHEME_SKIP => ModulationScheme::Skip {
                main_modulation: cursor.read_u8("skip.main_modulation")?,
                skip_modulation: cursor.read_u8("skip.skip_modulation")?,
                num_subcarriers: cursor.read_u16("skip.num_subcarriers")?,
            },
            other => {
                return Err(PnmError::CorruptedData(format!(
                    "unknown modulation scheme type {}",
                    other
                )))
            }
        };
        out.push(scheme);
    }
    Ok(out)
}

fn profiles(data: &[u8]) -> Result<Vec<ModulationProfileEntry>> {
    let mut cursor = ByteCursor::new(data);
    let mut out = Vec::new();

    while cursor.remaining() > 0 {
        let profile_id = cursor.read_u8("profile_id")?;
        let len = usize::from(cursor.read_u16("profile_len")?);
        let body = cursor.take(len, "profile_len")?;
        out.push(ModulationProfileEntry {
            profile_id,
            schemes: schemes(body)?,
        });
    }
    Ok(out)
}

pub fn decode(header: &PnmHeader) -> Result<ModulationProfile> {
    let fields = expect_file_type(header, PnmFileType::OfdmModulationProfile)?;
    let mut cursor = ByteCursor::new(&header.payload);

    let channel_id = cursor.read_u8("channel_id")?;
    let mac_address = cursor.read_mac("mac_address")?;
    let layout = SubcarrierLayout {
        zero_frequency_hz: cursor.read_u32("zero_frequency_hz")?,
        first_active_subcarrier: cursor.read_u16("first_active_subcarrier")?,
        spacing_khz: cursor.read_u8("spacing_khz")?,
    };
    let data = cursor.read_declared("data_len")?;
    cursor.finish("modulation profile data")?;

    Ok(ModulationProfile {
        header: fields,
        channel_id,
        mac_address,
        layout,
        profiles: profiles(data)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::decoders::test_support::{header, MAC};

    fn payload(data: &[u8]) -> Vec<u8> {
        let mut p = vec![33];
        p.extend_from_slice(&MAC);
        p.extend_from_slice(&0u32.to_be_bytes());
        p.extend_from_slice(&74u16.to_be_bytes());
        p.push(50);
        p.extend_from_slice(&(data.len() as u32).to_be_bytes());
        p.extend_from_slice(data);
        p
    }

    #[test]
    fn test_decode_profiles() {
        let mut data = vec![0, 0, 9];
        data.extend_from_slice(&[SCHEME_RANGE, 12]);
        data.extend_from_slice(&3000u16.to_be_bytes());
        data.extend_from_slice(&[SCHEME_SKIP, 10, 8]);
        data.extend_from_slice(&800u16.to_be_bytes());
        data.extend_from_slice(&[1, 0, 0]);

        let rec = decode(&header(10, 20, payload(&data))).unwrap();
        assert_eq!(rec.profiles.len(), 2);
        assert_eq!(
            rec.profiles[0].schemes,
            vec![
                ModulationScheme::Range {
                    modulation: 12,
                    num_subcarriers: 3000
                },
                ModulationScheme::Skip {
                    main_modulation: 10,
                    skip_modulation: 8,
                    num_subcarriers: 800
                },
            ]
        );
        assert_eq!(rec.profiles[0].total_subcarriers(), 3800);
        assert_eq!(rec.profiles[1].profile_id, 1);
        assert!(rec.profiles[1].schemes.is_empty());
    }

    #[test]
    fn test_unknown_scheme_rejected() {
        let data = [0, 0, 4, 7, 0, 0, 0];
        let err = decode(&header(10, 20, payload(&data))).unwrap_err();
        assert!(matches!(err, PnmError::CorruptedData(_)));
    }

    #[test]
    fn test_profile_overruns_data() {
        let data = [0, 0, 9, SCHEME_RANGE, 1, 0, 1];
        let err = decode(&header(10, 20, payload(&data))).unwrap_err();
        assert!(matches!(err, PnmError::TruncatedPayload { field: "profile_len", .. }));
    }
}
