// Descriptive statistics over a real-valued signal.
//
// All moments are population moments. Kurtosis is reported as excess
// kurtosis (a normal distribution scores 0). Degenerate inputs (empty or
// constant) yield zeros rather than NaN.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SignalStatistics {
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub variance: f64,
    /// Mean of squares
    pub power: f64,
    pub peak_to_peak: f64,
    /// Mean absolute deviation from the mean
    pub mean_abs_deviation: f64,
    pub skewness: f64,
    pub kurtosis: f64,
    /// Peak |x| over RMS
    pub crest_factor: f64,
    pub zero_crossing_rate: f64,
    pub zero_crossings: usize,
}

impl SignalStatistics {
    pub fn compute(values: &[f64]) -> Self {
        let n = values.len();
        if n == 0 {
            return Self::default();
        }
        let nf = n as f64;

        let mean = values.iter().sum::<f64>() / nf;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / nf;
        let std_dev = variance.sqrt();
        let power = values.iter().map(|v| v * v).sum::<f64>() / nf;
        let mean_abs_deviation = values.iter().map(|v| (v - mean).abs()).sum::<f64>() / nf;

        let (min, max) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });

        let (skewness, kurtosis) = if std_dev > 0.0 {
            let m3 = values.iter().map(|v| (v - mean).powi(3)).sum::<f64>() / nf;
            let m4 = values.iter().map(|v| (v - mean).powi(4)).sum::<f64>() / nf;
            (m3 / std_dev.powi(3), m4 / variance.powi(2) - 3.0)
        } else {
            (0.0, 0.0)
        };

        let rms = power.sqrt();
        let peak = values.iter().fold(0.0f64, |acc, v| acc.max(v.abs()));
        let crest_factor = if rms > 0.0 { peak / rms } else { 0.0 };

        let zero_crossings = values
            .windows(2)
            .filter(|w| (w[0] >= 0.0) != (w[1] >= 0.0))
            .count();
        let zero_crossing_rate = if n > 1 {
            zero_crossings as f64 / (n - 1) as f64
        } else {
            0.0
        };

        Self {
            mean,
            median: median(values),
            std_dev,
            variance,
            power,
            peak_to_peak: max - min,
            mean_abs_deviation,
            skewness,
            kurtosis,
            crest_factor,
            zero_crossing_rate,
            zero_crossings,
        }
    }
}

pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Rounds to `precision` decimal places. Past the range f64 can scale,
/// the value comes back unchanged.
pub fn round_to(value: f64, precision: u32) -> f64 {
    let scale = 10f64.powi(precision.min(i32::MAX as u32) as i32);
    let scaled = value * scale;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_basic_moments() {
        let s = SignalStatistics::compute(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_relative_eq!(s.mean, 5.0, epsilon = 1e-9);
        assert_relative_eq!(s.variance, 4.0, epsilon = 1e-9);
        assert_relative_eq!(s.std_dev, 2.0, epsilon = 1e-9);
        assert_relative_eq!(s.median, 4.5, epsilon = 1e-9);
        assert_relative_eq!(s.peak_to_peak, 7.0, epsilon = 1e-9);
        assert_relative_eq!(s.mean_abs_deviation, 1.5, epsilon = 1e-9);
        assert_relative_eq!(s.power, 29.0, epsilon = 1e-9);
        assert_relative_eq!(s.crest_factor, 9.0 / 29f64.sqrt(), epsilon = 1e-9);
        assert_eq!(s.zero_crossings, 0);
    }

    #[test]
    fn test_symmetric_signal_has_no_skew() {
        let s = SignalStatistics::compute(&[-2.0, -1.0, 0.0, 1.0, 2.0]);
        assert_relative_eq!(s.skewness, 0.0, epsilon = 1e-9);
        // uniform-ish five points: m4 / m2^2 = 6.8 / 4 = 1.7
        assert_relative_eq!(s.kurtosis, 1.7 - 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_zero_crossings() {
        let s = SignalStatistics::compute(&[1.0, -1.0, 1.0, -1.0, -1.0]);
        assert_eq!(s.zero_crossings, 3);
        assert_relative_eq!(s.zero_crossing_rate, 0.75, epsilon = 1e-9);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert_eq!(SignalStatistics::compute(&[]), SignalStatistics::default());
        let s = SignalStatistics::compute(&[3.0, 3.0]);
        assert_eq!(s.skewness, 0.0);
        assert_eq!(s.kurtosis, 0.0);
        assert_relative_eq!(s.crest_factor, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.23456, 2), 1.23);
        assert_eq!(round_to(2.5, 0), 3.0);
        assert_eq!(round_to(-0.125, 1), -0.1);
    }

    #[test]
    fn test_round_to_extreme_precision() {
        assert_eq!(round_to(1.5, 400), 1.5);
        assert_eq!(round_to(0.0, 400), 0.0);
        assert_eq!(round_to(1e300, 20), 1e300);
        assert_eq!(round_to(-2.25, u32::MAX), -2.25);
    }
}
