//! Encoded polyline decoding (precision 5).

use reveal_core::{GeoPoint, RouteError};

/// Largest step between two vertices, in 1e-5 degrees (a full sweep of longitude).
const MAX_DELTA: i64 = 360 * 100_000;
const MAX_LAT: i64 = 90 * 100_000;
const MAX_LON: i64 = 180 * 100_000;

/// Decode an encoded polyline string into points.
pub fn decode(encoded: &str) -> Result<Vec<GeoPoint>, RouteError> {
    let bytes = encoded.as_bytes();
    let mut index = 0;
    let mut lat: i64 = 0;
    let mut lon: i64 = 0;
    let mut points = Vec::new();

    while index < bytes.len() {
        lat = accumulate(lat, next_value(bytes, &mut index)?, MAX_LAT)?;
        lon = accumulate(lon, next_value(bytes, &mut index)?, MAX_LON)?;
        points.push(GeoPoint {
            lat: lat as f64 / 1e5,
            lon: lon as f64 / 1e5,
        });
    }

    Ok(points)
}

fn accumulate(total: i64, delta: i64, limit: i64) -> Result<i64, RouteError> {
    total
        .checked_add(delta)
        .filter(|v| v.abs() <= limit)
        .ok_or_else(|| RouteError::Decode("polyline coordinate out of range".to_string()))
}

fn next_value(bytes: &[u8], index: &mut usize) -> Result<i64, RouteError> {
    let mut result: i64 = 0;
    let mut shift = 0;

    loop {
        let byte = *bytes
            .get(*index)
            .ok_or_else(|| RouteError::Decode("truncated polyline".to_string()))?;
        *index += 1;

        let chunk = i64::from(byte)
            .checked_sub(63)
            .filter(|c| (0..64).contains(c))
            .ok_or_else(|| RouteError::Decode(format!("invalid polyline byte {}", byte)))?;
        if shift > 60 {
            return Err(RouteError::Decode("polyline value overflow".to_string()));
        }
        result |= (chunk & 0x1f) << shift;
        shift += 5;

        if chunk < 0x20 {
            break;
        }
    }

    let value = if result & 1 == 1 { !(result >> 1) } else { result >> 1 };
    if value.abs() > MAX_DELTA {
        return Err(RouteError::Decode("polyline value overflow".to_string()));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_reference_polyline() {
        let points = decode("_p~iF~ps|U_ulLnnqC_mqNvxq`@").unwrap();
        assert_eq!(
            points,
            vec![
                GeoPoint::new(38.5, -120.2),
                GeoPoint::new(40.7, -120.95),
                GeoPoint::new(43.252, -126.453),
            ]
        );
    }

    #[test]
    fn empty_string_is_empty_path() {
        assert!(decode("").unwrap().is_empty());
    }

    #[test]
    fn truncated_input_is_an_error() {
        assert!(matches!(decode("_p~iF~ps|"), Err(RouteError::Decode(_))));
    }

    /// Encode one raw (already sign-folded) value as polyline chunks.
    fn encode_raw(mut raw: u64) -> String {
        let mut out = String::new();
        while raw >= 0x20 {
            out.push(char::from((((raw & 0x1f) | 0x20) + 63) as u8));
            raw >>= 5;
        }
        out.push(char::from((raw + 63) as u8));
        out
    }

    fn encode_value(value: i64) -> String {
        let folded = if value < 0 { !(value << 1) } else { value << 1 };
        encode_raw(folded as u64)
    }

    #[test]
    fn oversized_values_are_an_error_not_an_overflow() {
        let huge = encode_raw(0x7FFF_FFFF_FFFF_FFFE);
        assert_eq!(huge.len(), 13);
        let encoded = huge.repeat(6);
        assert!(matches!(decode(&encoded), Err(RouteError::Decode(_))));
    }

    #[test]
    fn coordinates_leaving_the_globe_are_rejected() {
        // 80 degrees north, then another 20
        let encoded = [
            encode_value(8_000_000),
            encode_value(0),
            encode_value(2_000_000),
            encode_value(0),
        ]
        .concat();
        assert!(matches!(decode(&encoded), Err(RouteError::Decode(_))));
    }

    #[test]
    fn full_longitude_sweep_is_accepted() {
        let encoded = [
            encode_value(0),
            encode_value(-18_000_000),
            encode_value(0),
            encode_value(36_000_000),
        ]
        .concat();
        assert_eq!(
            decode(&encoded).unwrap(),
            vec![GeoPoint::new(0.0, -180.0), GeoPoint::new(0.0, 180.0)]
        );
    }

    #[test]
    fn bytes_outside_alphabet_are_rejected() {
        assert!(matches!(decode("_p~iF ps|U"), Err(RouteError::Decode(_))));
    }
}
