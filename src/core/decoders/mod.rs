// Per-format payload decoders and the dispatcher that routes a parsed
// header to the right one.
//
// Every decoder first checks that the header resolves to its own file
// type, then unpacks a fixed big-endian prefix, then interprets the rest
// of the payload according to the declared length fields. A payload that
// is longer or shorter than what the fields declare is rejected.

pub mod channel_estimate;
pub mod constellation;
pub mod fec_summary;
pub mod histogram;
pub mod modulation_profile;
pub mod pre_equalization;
pub mod rxmer;
pub mod spectrum;
pub mod symbol_capture;

use crate::core::cursor::ByteCursor;
use crate::core::error::{PnmError, Result};
use crate::core::file_type::PnmFileType;
use crate::core::format::{DecodedCapture, HeaderFields};
use crate::core::header::{parse_header, PnmHeader};
use crate::core::mac::MacAddress;
use tracing::debug;

/// Checks that `header` resolves to `expected` and returns the fields every
/// record keeps.
pub(crate) fn expect_file_type(header: &PnmHeader, expected: PnmFileType) -> Result<HeaderFields> {
    let got = header.require_file_type()?;
    if got != expected {
        return Err(PnmError::WrongFileTypeForDecoder { expected, got });
    }
    Ok(HeaderFields::new(header, got))
}

/// Same as [`expect_file_type`] for decoders that accept more than one type.
pub(crate) fn expect_one_of(header: &PnmHeader, accepted: &[PnmFileType]) -> Result<HeaderFields> {
    let got = header.require_file_type()?;
    match accepted.iter().find(|t| **t == got) {
        Some(_) => Ok(HeaderFields::new(header, got)),
        None => Err(PnmError::WrongFileTypeForDecoder {
            expected: accepted[0],
            got,
        }),
    }
}

/// Decodes a parsed header with the decoder registered for its type.
pub fn decode_capture(header: &PnmHeader) -> Result<DecodedCapture> {
    let file_type = header.require_file_type()?;
    debug!(
        "decoding {} ({} payload bytes)",
        file_type.code(),
        header.payload.len()
    );

    let capture = match file_type {
        PnmFileType::SymbolCapture => DecodedCapture::SymbolCapture(symbol_capture::decode(header)?),
        PnmFileType::OfdmChannelEstimateCoefficient => {
            DecodedCapture::ChannelEstimate(channel_estimate::decode(header)?)
        }
        PnmFileType::DownstreamConstellationDisplay => {
            DecodedCapture::Constellation(constellation::decode(header)?)
        }
        PnmFileType::ReceiveModulationErrorRatio => DecodedCapture::RxMer(rxmer::decode(header)?),
        PnmFileType::DownstreamHistogram => DecodedCapture::Histogram(histogram::decode(header)?),
        PnmFileType::UpstreamPreEqualizerCoefficients
        | PnmFileType::UpstreamPreEqualizerCoefficientsLastUpdate => {
            DecodedCapture::UpstreamPreEqualization(pre_equalization::decode(header)?)
        }
        PnmFileType::OfdmFecSummary => DecodedCapture::FecSummary(fec_summary::decode(header)?),
        PnmFileType::SpectrumAnalysis => DecodedCapture::SpectrumAnalysis(spectrum::decode(header)?),
        PnmFileType::OfdmModulationProfile => {
            DecodedCapture::ModulationProfile(modulation_profile::decode(header)?)
        }
        PnmFileType::LatencyReport => {
            return Err(PnmError::UnsupportedFileType(format!(
                "{}: no binary decoder",
                file_type.code()
            )))
        }
    };
    Ok(capture)
}

/// Parses the header and decodes the payload in one step.
pub fn decode_bytes(bytes: &[u8]) -> Result<DecodedCapture> {
    let header = parse_header(bytes)?;
    decode_capture(&header)
}

/// Identity of a capture: just enough to place it in an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureIdentity {
    pub file_type: PnmFileType,
    pub channel_id: u8,
    pub mac_address: MacAddress,
    pub capture_time: u32,
}

/// Reads only the leading channel/MAC fields of the payload, leaving
/// coefficient data untouched.
pub fn identify(header: &PnmHeader) -> Result<CaptureIdentity> {
    let file_type = header.require_file_type()?;
    let mut cursor = ByteCursor::new(&header.payload);

    let (channel_id, mac_address) = match file_type {
        PnmFileType::DownstreamHistogram => (0, cursor.read_mac("mac_address")?),
        PnmFileType::LatencyReport => {
            return Err(PnmError::UnsupportedFileType(format!(
                "{}: no binary decoder",
                file_type.code()
            )))
        }
        _ => {
            let channel_id = cursor.read_u8("channel_id")?;
            (channel_id, cursor.read_mac("mac_address")?)
        }
    };

    Ok(CaptureIdentity {
        file_type,
        channel_id,
        mac_address,
        capture_time: header.capture_time,
    })
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    fn rxmer_payload(channel: u8, values: &[u8]) -> Vec<u8> {
        let mut p = vec![channel];
        p.extend_from_slice(&MAC);
        p.extend_from_slice(&0u32.to_be_bytes());
        p.extend_from_slice(&0u16.to_be_bytes());
        p.push(50);
        p.extend_from_slice(&(values.len() as u32).to_be_bytes());
        p.extend_from_slice(values);
        p
    }

    #[test]
    fn test_dispatch_routes_by_type() {
        let header = header(4, 100, rxmer_payload(7, &[40, 80]));
        let capture = decode_capture(&header).unwrap();
        assert!(matches!(capture, DecodedCapture::RxMer(ref r) if r.values_db == vec![10.0, 20.0]));
    }

    #[test]
    fn test_dispatch_unknown_type() {
        let mut h = header(4, 0, vec![]);
        h.file_type_tag = "ZZZ".to_string();
        h.file_type_version = 99;
        assert!(matches!(decode_capture(&h), Err(PnmError::UnsupportedFileType(_))));
    }

    #[test]
    fn test_dispatch_latency_report_is_unsupported() {
        let mut h = header(1, 0, vec![0; 16]);
        h.file_type_tag = "LLD".to_string();
        // LLD01 is keyed with a zero-padded version, which no single byte produces
        assert!(matches!(decode_capture(&h), Err(PnmError::UnsupportedFileType(_))));
    }

    #[test]
    fn test_wrong_decoder_is_rejected() {
        let h = header(4, 0, rxmer_payload(1, &[1]));
        let err = channel_estimate::decode(&h).unwrap_err();
        assert!(matches!(
            err,
            PnmError::WrongFileTypeForDecoder {
                expected: PnmFileType::OfdmChannelEstimateCoefficient,
                got: PnmFileType::ReceiveModulationErrorRatio
            }
        ));
    }

    #[test]
    fn test_identify_reads_prefix_only() {
        // data_len claims far more than is present; identify must not care
        let mut payload = vec![9];
        payload.extend_from_slice(&MAC);
        payload.extend_from_slice(&[0xff; 4]);
        let id = identify(&header(2, 55, payload)).unwrap();
        assert_eq!(id.channel_id, 9);
        assert_eq!(id.mac_address, MacAddress::new(MAC));
        assert_eq!(id.capture_time, 55);
        assert_eq!(id.file_type, PnmFileType::OfdmChannelEstimateCoefficient);
    }

    #[test]
    fn test_identify_histogram_has_no_channel() {
        let mut payload = MAC.to_vec();
        payload.push(1);
        let id = identify(&header(5, 1, payload)).unwrap();
        assert_eq!(id.channel_id, 0);
        assert_eq!(id.mac_address, MacAddress::new(MAC));
    }

    #[test]
    fn test_decode_bytes_end_to_end() {
        let bytes = header(4, 1_000, rxmer_payload(3, &[0, 255])).to_bytes();
        let capture = decode_bytes(&bytes).unwrap();
        match capture {
            DecodedCapture::RxMer(r) => {
                assert_eq!(r.channel_id, 3);
                assert_eq!(r.header.capture_time, 1_000);
                assert_eq!(r.values_db, vec![0.0, 63.5]);
            }
            other => panic!("unexpected capture {:?}", other),
        }
    }
}
