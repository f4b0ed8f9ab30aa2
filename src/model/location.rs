//! Where an entry was written.

use serde::Serialize;

/// A point on the globe, in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

/// A circular area around an optional center point.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Region {
    pub center: Option<Coordinate>,
    /// Radius in meters.
    pub radius: f64,
}

/// A named place.
///
/// The coordinate is embedded: its latitude and longitude keys sit at the
/// same level as the other location keys in the document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Location {
    pub administrative_area: String,
    pub country: String,
    pub locality: String,
    pub place_name: String,
    pub foursquare_id: String,
    pub region: Option<Region>,
    #[serde(flatten)]
    pub coordinate: Coordinate,
}
