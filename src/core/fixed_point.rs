// Fixed-point and complex sample decoding.
//
// Modems write IQ data as pairs of Q(a,b) fixed-point words: `a` integer
// bits, `b` fractional bits and one sign bit. Each component is a
// little-endian byte run; the real run precedes the imaginary run.

use crate::core::error::{PnmError, Result};
use num_complex::Complex64;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FixedPointFormat {
    pub int_bits: u32,
    pub frac_bits: u32,
}

impl FixedPointFormat {
    pub const fn new(int_bits: u32, frac_bits: u32) -> Self {
        Self {
            int_bits,
            frac_bits,
        }
    }

    /// Integer bits + fractional bits + the sign bit.
    pub const fn total_bits(&self) -> u32 {
        self.int_bits + self.frac_bits + 1
    }

    /// Width in bytes of one component; fails unless the word is byte aligned
    /// and fits in 64 bits.
    pub fn byte_width(&self) -> Result<usize> {
        let total = self.total_bits();
        if total % 8 != 0 || total > 64 {
            return Err(PnmError::InvalidFixedPointFormat {
                int_bits: self.int_bits,
                frac_bits: self.frac_bits,
            });
        }
        Ok((total / 8) as usize)
    }

    fn scale(&self) -> f64 {
        2f64.powi(self.frac_bits as i32)
    }
}

fn mask(total_bits: u32) -> u64 {
    if total_bits >= 64 {
        u64::MAX
    } else {
        (1u64 << total_bits) - 1
    }
}

pub fn decode_fixed_point(raw: u64, format: FixedPointFormat, signed: bool) -> f64 {
    let total = format.total_bits();
    let raw = raw & mask(total);

    let sign_set = total <= 64 && (raw >> (total - 1)) & 1 == 1;
    let value = if signed && sign_set {
        i128::from(raw) - (1i128 << total)
    } else {
        i128::from(raw)
    };

    value as f64 / format.scale()
}

/// Inverse of [`decode_fixed_point`] for signed formats. Values outside the
/// representable range saturate.
pub fn encode_fixed_point(value: f64, format: FixedPointFormat) -> u64 {
    let total = format.total_bits().min(64);
    let max = (1i128 << (total - 1)) - 1;
    let min = -(1i128 << (total - 1));

    let code = ((value * format.scale()).round() as i128).clamp(min, max);
    (code as u64) & mask(total)
}

fn read_le(run: &[u8]) -> u64 {
    run.iter()
        .rev()
        .fold(0u64, |acc, &b| (acc << 8) | u64::from(b))
}

pub fn decode_complex_stream(
    bytes: &[u8],
    format: FixedPointFormat,
    signed: bool,
) -> Result<Vec<Complex64>> {
    let width = format.byte_width()?;
    let stride = 2 * width;

    if bytes.len() % stride != 0 {
        return Err(PnmError::LengthMismatch(format!(
            "{} bytes is not a whole number of {}-byte complex samples",
            bytes.len(),
            stride
        )));
    }

    Ok(bytes
        .chunks_exact(stride)
        .map(|sample| {
            let re = decode_fixed_point(read_le(&sample[..width]), format, signed);
            let im = decode_fixed_point(read_le(&sample[width..]), format, signed);
            Complex64::new(re, im)
        })
        .collect())
}

/// Packs complex values into the wire layout `decode_complex_stream` reads.
pub fn encode_complex_stream(values: &[Complex64], format: FixedPointFormat) -> Result<Vec<u8>> {
    let width = format.byte_width()?;
    let mut out = Vec::with_capacity(values.len() * width * 2);
    for v in values {
        for component in [v.re, v.im] {
            let code = encode_fixed_point(component, format);
            out.extend_from_slice(&code.to_le_bytes()[..width]);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::{Q_1_14, Q_2_13};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::HashSet;

    #[test]
    fn test_decode_q_2_13_extremes() {
        assert_eq!(decode_fixed_point(0x0000, Q_2_13, true), 0.0);
        assert_eq!(decode_fixed_point(0x2000, Q_2_13, true), 1.0);
        assert_eq!(decode_fixed_point(0x7fff, Q_2_13, true), 32767.0 / 8192.0);
        assert_eq!(decode_fixed_point(0x8000, Q_2_13, true), -4.0);
        assert_eq!(decode_fixed_point(0xffff, Q_2_13, true), -1.0 / 8192.0);
    }

    #[test]
    fn test_unsigned_ignores_sign_bit() {
        assert_eq!(decode_fixed_point(0x8000, Q_1_14, false), 2.0);
        assert_eq!(decode_fixed_point(0x8000, Q_1_14, true), -2.0);
    }

    #[test]
    fn test_every_raw_code_is_distinct_and_round_trips() {
        let mut seen = HashSet::new();
        for raw in 0u64..=0xffff {
            let value = decode_fixed_point(raw, Q_1_14, true);
            assert!(seen.insert(value.to_bits()));
            assert_eq!(encode_fixed_point(value, Q_1_14), raw);
        }
        assert_eq!(seen.len(), 1 << 16);
    }

    #[test]
    fn test_random_formats_round_trip() {
        let mut rng = StdRng::seed_from_u64(7);
        let formats = [
            FixedPointFormat::new(0, 7),
            FixedPointFormat::new(3, 20),
            FixedPointFormat::new(10, 21),
        ];
        for format in formats {
            let total = format.total_bits();
            for _ in 0..1000 {
                let raw = rng.gen::<u64>() & mask(total);
                let value = decode_fixed_point(raw, format, true);
                assert_eq!(encode_fixed_point(value, format), raw);
            }
        }
    }

    #[test]
    fn test_complex_stream_layout() {
        // re = 1.0 (0x2000 LE), im = -1.0 (0xe000 LE)
        let bytes = [0x00, 0x20, 0x00, 0xe0, 0x00, 0x00, 0x00, 0x10];
        let out = decode_complex_stream(&bytes, Q_2_13, true).unwrap();
        assert_eq!(out, vec![Complex64::new(1.0, -1.0), Complex64::new(0.0, 0.5)]);
    }

    #[test]
    fn test_complex_stream_rejects_partial_sample() {
        let err = decode_complex_stream(&[0u8; 6], Q_2_13, true).unwrap_err();
        assert!(matches!(err, PnmError::LengthMismatch(_)));
    }

    #[test]
    fn test_complex_stream_rejects_unaligned_format() {
        let err = decode_complex_stream(&[0u8; 8], FixedPointFormat::new(2, 12), true).unwrap_err();
        assert!(matches!(
            err,
            PnmError::InvalidFixedPointFormat {
                int_bits: 2,
                frac_bits: 12
            }
        ));
    }

    #[test]
    fn test_encode_complex_stream_inverts_decode() {
        let values = vec![Complex64::new(0.25, -0.75), Complex64::new(-1.5, 1.0)];
        let bytes = encode_complex_stream(&values, Q_1_14).unwrap();
        assert_eq!(bytes.len(), 8);
        assert_eq!(decode_complex_stream(&bytes, Q_1_14, true).unwrap(), values);
    }
}
