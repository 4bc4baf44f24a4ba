//! Google encoded-polyline decoding (precision 5).

use crate::error::LookupError;

const PRECISION: f64 = 1e5;

/// Decode `encoded` into `[lat, lon]` pairs.
pub fn decode_polyline(encoded: &str) -> Result<Vec<[f64; 2]>, LookupError> {
    let bytes = encoded.as_bytes();
    let mut points = Vec::with_capacity(bytes.len() / 4);
    let mut pos = 0;
    let mut lat: i64 = 0;
    let mut lon: i64 = 0;

    while pos < bytes.len() {
        lat = accumulate(lat, next_delta(bytes, &mut pos)?)?;
        lon = accumulate(lon, next_delta(bytes, &mut pos)?)?;
        #[allow(clippy::cast_precision_loss)]
        points.push([lat as f64 / PRECISION, lon as f64 / PRECISION]);
    }

    Ok(points)
}

fn accumulate(total: i64, delta: i64) -> Result<i64, LookupError> {
    total
        .checked_add(delta)
        .ok_or_else(|| malformed("coordinate out of range"))
}

fn next_delta(bytes: &[u8], pos: &mut usize) -> Result<i64, LookupError> {
    let mut result: i64 = 0;
    let mut shift = 0;

    loop {
        let Some(&byte) = bytes.get(*pos) else {
            return Err(malformed("truncated coordinate"));
        };
        *pos += 1;

        let chunk = i64::from(byte)
            .checked_sub(63)
            .filter(|c| (0..64).contains(c))
            .ok_or_else(|| malformed("character outside the polyline alphabet"))?;
        if shift > 60 {
            return Err(malformed("coordinate too long"));
        }

        result |= (chunk & 0x1f) << shift;
        shift += 5;
        if chunk < 0x20 {
            break;
        }
    }

    Ok(if result & 1 == 1 {
        !(result >> 1)
    } else {
        result >> 1
    })
}

fn malformed(reason: &str) -> LookupError {
    LookupError::Decode {
        service: "polyline",
        message: reason.to_string(),
    }
}
