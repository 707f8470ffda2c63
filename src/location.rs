//! Coordinate extraction from free text.
//!
//! Users sometimes paste a map link or a raw `lat,lng` pair instead of
//! sharing a location pin. Extraction looks for a coordinate inside a
//! mapping URL first (`@lat,lng`, `q=lat,lng`, `ll=lat,lng`), then for a
//! bare decimal pair. Both coordinates must carry a decimal point, which
//! keeps house-number lists like "123, 456" from being read as a position.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // URL forms may be signed; Google Maps writes southern latitudes as @-33.8,151.2
    static ref MAP_URL_RE: Regex = Regex::new(r"(?:@|[?&]q=|[?&]ll=)(-?\d{1,2}\.\d+),(-?\d{1,3}\.\d+)")
        .expect("map URL coordinate pattern should be valid");
    // Bare pairs are hand-typed; decimals required on both sides
    static ref PAIR_RE: Regex = Regex::new(r"\b(\d{1,2}\.\d+)\s*,\s*(\d{1,3}\.\d+)\b")
        .expect("coordinate pair pattern should be valid");
}

/// A latitude/longitude pair pulled out of message text
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    fn in_range(&self) -> bool {
        self.lat.abs() <= 90.0 && self.lng.abs() <= 180.0
    }
}

/// Extract a coordinate pair from free text, if one is present.
///
/// # Examples
///
/// ```rust
/// use labline::location::extract_coordinates;
///
/// let coords = extract_coordinates("https://maps.google.com/@13.7563,100.5018,17z").unwrap();
/// assert_eq!(coords.lat, 13.7563);
///
/// let coords = extract_coordinates("อยู่ที่ 13.7563, 100.5018 ครับ").unwrap();
/// assert_eq!(coords.lng, 100.5018);
///
/// assert!(extract_coordinates("บ้านเลขที่ 123, หมู่ 4").is_none());
/// ```
pub fn extract_coordinates(text: &str) -> Option<Coordinates> {
    for re in [&*MAP_URL_RE, &*PAIR_RE] {
        if let Some(caps) = re.captures(text) {
            let lat = caps.get(1)?.as_str().parse::<f64>().ok()?;
            let lng = caps.get(2)?.as_str().parse::<f64>().ok()?;
            let coords = Coordinates { lat, lng };
            if coords.in_range() {
                return Some(coords);
            }
        }
    }

    None
}
