use crate::cities::lookup_city;
use crate::geo::Coordinate;

/// Map free text to a coordinate: city table first, then an in-range `"<lat>, <lon>"`
/// literal.
///
/// `None` is an expected outcome and sends the estimator down the fallback
/// distance path.
pub fn resolve_location(input: &str) -> Option<Coordinate> {
    let normalized = input.trim().to_lowercase();
    if normalized.is_empty() {
        return None;
    }
    lookup_city(&normalized).or_else(|| parse_coordinate_literal(&normalized))
}

/// Parse `"<float>, <float>"` where each number carries a decimal point.
///
/// Well-formed literals outside latitude [-90, 90] or longitude [-180, 180], such as
/// `"95.0, 10.0"`, are rejected and stay unresolved.
pub fn parse_coordinate_literal(input: &str) -> Option<Coordinate> {
    let (lat, lon) = input.split_once(',')?;
    let coord = Coordinate {
        lat: parse_decimal(lat.trim())?,
        lon: parse_decimal(lon.trim())?,
    };
    coord.is_valid().then_some(coord)
}

pub fn format_coordinate_literal(coord: Coordinate) -> String {
    format!("{:.5}, {:.5}", coord.lat, coord.lon)
}

fn parse_decimal(raw: &str) -> Option<f64> {
    let unsigned = raw.strip_prefix(['-', '+']).unwrap_or(raw);
    let (int_part, frac_part) = unsigned.split_once('.')?;
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(int_part) || !all_digits(frac_part) {
        return None;
    }
    raw.parse().ok()
}
