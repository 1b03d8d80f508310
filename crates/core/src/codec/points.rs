//! Sortable encoding of ranking points.
//!
//! Points are stored at centipoint (two decimal place) precision. The
//! encoder scales a value to an integer number of centipoints, adds a bias
//! so negative values land in the positive range, and zero-pads to a fixed
//! width. The resulting strings are all-digit and equal-length, so the
//! store's lexicographic comparison orders them exactly like the numbers
//! they encode.

use super::error::{DecodingError, EncodingError};

/// Centipoints per point.
const PRECISION: f64 = 100.0;

/// Bias added to the centipoint value; bounds the encodable range to
/// (-10^10, 10^10) points.
const BIAS: i64 = 1_000_000_000_000;

/// Fixed width of every encoded value, enough for `2 * BIAS - 1`.
const WIDTH: usize = 13;

/// Encodes a points value as a fixed-width, order-preserving string.
///
/// Values are rounded to centipoint precision before encoding. Fails with
/// [`EncodingError::PointsOutOfRange`] on non-finite input or magnitudes of
/// 10^10 points and beyond.
pub fn encode_points(points: f64) -> Result<String, EncodingError> {
    if !points.is_finite() {
        return Err(EncodingError::PointsOutOfRange { points });
    }
    let centi = (points * PRECISION).round();
    if centi <= -(BIAS as f64) || centi >= BIAS as f64 {
        return Err(EncodingError::PointsOutOfRange { points });
    }
    Ok(format!("{:0width$}", centi as i64 + BIAS, width = WIDTH))
}

/// Exact inverse of [`encode_points`].
///
/// Fails with [`DecodingError::MalformedPoints`] on any input that
/// [`encode_points`] could not have produced.
pub fn decode_points(encoded: &str) -> Result<f64, DecodingError> {
    let malformed = || DecodingError::MalformedPoints {
        value: encoded.to_string(),
    };
    if encoded.len() != WIDTH || !encoded.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }
    let biased: i64 = encoded.parse().map_err(|_| malformed())?;
    let centi = biased - BIAS;
    if centi <= -BIAS || centi >= BIAS {
        return Err(malformed());
    }
    Ok(centi as f64 / PRECISION)
}
