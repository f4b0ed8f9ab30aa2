//! Weather conditions at the time of an entry.

use jiff::Timestamp;
use serde::Serialize;

/// Weather conditions as reported by a weather service.
///
/// Temperatures are kept as the strings the service reported.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Weather {
    pub celsius: String,
    pub fahrenheit: String,
    pub description: String,
    pub icon_name: String,
    pub service: String,
    pub pressure_mb: f64,
    pub relative_humidity: f64,
    pub visibility_km: f64,
    pub wind_speed_kph: f64,
    /// Degrees clockwise from north.
    pub wind_bearing: u64,
    pub wind_chill_celsius: i64,
    pub sunrise_date: Option<Timestamp>,
    pub sunset_date: Option<Timestamp>,
}
