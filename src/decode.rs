//! Mapping a property-list value tree onto the typed entry schema.
//!
//! Each record is decoded by walking its dictionary and dispatching on the
//! literal key labels used in entry files (`"Entry Text"`, `"Sunrise Date"`,
//! ...). Every assignment checks the node's kind and reports a
//! [`DecodeError`] carrying the dotted path of the field on mismatch.
//!
//! Numeric weather readings are stored inconsistently by property-list
//! encoders: the same pressure may arrive as `<integer>1017</integer>` or
//! `<real>1017.0</real>`. Those fields accept either kind as long as the
//! conversion is exact.
//!
//! Keys with no mapping are handled by [`UnknownFields`], applied the same
//! way at every nesting level.

mod error;

pub use error::DecodeError;

use std::collections::BTreeMap;

use jiff::Timestamp;
use serde::Deserialize;

use crate::model::{Coordinate, Creator, Entry, Location, Music, Region, Weather};
use crate::value::{Kind, Value};

type Result<T> = core::result::Result<T, DecodeError>;

type Dictionary = BTreeMap<String, Value>;

/// Largest magnitude an integer may have and still convert to `f64` exactly.
const MAX_EXACT_INTEGER: u64 = 1 << f64::MANTISSA_DIGITS;

/// What to do with a dictionary key that has no field mapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnknownFields {
    /// Fail with [`DecodeError::UnknownField`].
    #[default]
    Reject,
    /// Skip the key.
    Ignore,
}

/// Decodes value trees into entries under a fixed unknown-key policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct Decoder {
    unknown_fields: UnknownFields,
}

impl Decoder {
    #[must_use]
    pub fn new(unknown_fields: UnknownFields) -> Self {
        Self { unknown_fields }
    }

    #[must_use]
    pub fn unknown_fields(&self) -> UnknownFields {
        self.unknown_fields
    }

    /// Decode a document root into an [`Entry`].
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::MalformedDocument`] if the root is not a
    /// dictionary, or the first field-level error found otherwise.
    pub fn decode(&self, root: Value) -> Result<Entry> {
        let dict = match root {
            Value::Dictionary(dict) => dict,
            other => return Err(DecodeError::MalformedDocument { found: other.kind() }),
        };
        let scope = Scope {
            path: String::new(),
            unknown_fields: self.unknown_fields,
        };
        entry(dict, &scope)
    }
}

/// Decode a document root with the default policy (reject unknown keys).
///
/// # Errors
///
/// See [`Decoder::decode`].
pub fn decode(root: Value) -> Result<Entry> {
    Decoder::default().decode(root)
}

fn entry(dict: Dictionary, scope: &Scope) -> Result<Entry> {
    let mut entry = Entry::default();
    for (key, value) in dict {
        match key.as_str() {
            "UUID" => entry.id = scope.string(&key, value)?,
            "Entry Text" => entry.text = scope.string(&key, value)?,
            "Activity" => entry.activity = scope.string(&key, value)?,
            "Time Zone" => entry.time_zone = scope.string(&key, value)?,
            "Publish URL" => entry.publish_url = Some(scope.string(&key, value)?),
            "Ignore Step Count" => entry.ignore_step_count = scope.boolean(&key, value)?,
            "Starred" => entry.starred = scope.boolean(&key, value)?,
            "Step Count" => entry.step_count = scope.unsigned(&key, value)?,
            "Creation Date" => entry.creation_date = Some(scope.date(&key, value)?),
            "Tags" => entry.tags = scope.strings(&key, value)?,
            "Creator" => {
                let dict = scope.dictionary(&key, value)?;
                entry.creator = Some(creator(dict, &scope.child(&key))?);
            }
            "Location" => {
                let dict = scope.dictionary(&key, value)?;
                entry.location = Some(location(dict, &scope.child(&key))?);
            }
            "Weather" => {
                let dict = scope.dictionary(&key, value)?;
                entry.weather = Some(weather(dict, &scope.child(&key))?);
            }
            "Music" => {
                let dict = scope.dictionary(&key, value)?;
                entry.music = Some(music(dict, &scope.child(&key))?);
            }
            _ => scope.unknown(&key)?,
        }
    }
    Ok(entry)
}

fn creator(dict: Dictionary, scope: &Scope) -> Result<Creator> {
    let mut creator = Creator::default();
    for (key, value) in dict {
        match key.as_str() {
            "Device Agent" => creator.device_agent = scope.string(&key, value)?,
            "Host Name" => creator.host_name = scope.string(&key, value)?,
            "OS Agent" => creator.os_agent = scope.string(&key, value)?,
            "Software Agent" => creator.software_agent = scope.string(&key, value)?,
            "Generation Date" => creator.generation_date = Some(scope.date(&key, value)?),
            _ => scope.unknown(&key)?,
        }
    }
    Ok(creator)
}

fn location(dict: Dictionary, scope: &Scope) -> Result<Location> {
    let mut location = Location::default();
    for (key, value) in dict {
        match key.as_str() {
            "Administrative Area" => location.administrative_area = scope.string(&key, value)?,
            "Country" => location.country = scope.string(&key, value)?,
            "Locality" => location.locality = scope.string(&key, value)?,
            "Place Name" => location.place_name = scope.string(&key, value)?,
            "Foursquare ID" => location.foursquare_id = scope.string(&key, value)?,
            "Latitude" => location.coordinate.latitude = scope.real(&key, value)?,
            "Longitude" => location.coordinate.longitude = scope.real(&key, value)?,
            "Region" => {
                let dict = scope.dictionary(&key, value)?;
                location.region = Some(region(dict, &scope.child(&key))?);
            }
            _ => scope.unknown(&key)?,
        }
    }
    Ok(location)
}

fn region(dict: Dictionary, scope: &Scope) -> Result<Region> {
    let mut region = Region::default();
    for (key, value) in dict {
        match key.as_str() {
            "Radius" => region.radius = scope.real(&key, value)?,
            "Center" => {
                let dict = scope.dictionary(&key, value)?;
                region.center = Some(coordinate(dict, &scope.child(&key))?);
            }
            _ => scope.unknown(&key)?,
        }
    }
    Ok(region)
}

fn coordinate(dict: Dictionary, scope: &Scope) -> Result<Coordinate> {
    let mut coordinate = Coordinate::default();
    for (key, value) in dict {
        match key.as_str() {
            "Latitude" => coordinate.latitude = scope.real(&key, value)?,
            "Longitude" => coordinate.longitude = scope.real(&key, value)?,
            _ => scope.unknown(&key)?,
        }
    }
    Ok(coordinate)
}

fn weather(dict: Dictionary, scope: &Scope) -> Result<Weather> {
    let mut weather = Weather::default();
    for (key, value) in dict {
        match key.as_str() {
            "Celsius" => weather.celsius = scope.string(&key, value)?,
            "Fahrenheit" => weather.fahrenheit = scope.string(&key, value)?,
            "Description" => weather.description = scope.string(&key, value)?,
            "IconName" => weather.icon_name = scope.string(&key, value)?,
            "Service" => weather.service = scope.string(&key, value)?,
            "Pressure MB" => weather.pressure_mb = scope.number(&key, value)?,
            "Relative Humidity" => weather.relative_humidity = scope.number(&key, value)?,
            "Visibility KM" => weather.visibility_km = scope.number(&key, value)?,
            "Wind Speed KPH" => weather.wind_speed_kph = scope.number(&key, value)?,
            "Wind Bearing" => weather.wind_bearing = scope.unsigned(&key, value)?,
            "Wind Chill Celsius" => weather.wind_chill_celsius = scope.integer(&key, value)?,
            "Sunrise Date" => weather.sunrise_date = Some(scope.date(&key, value)?),
            "Sunset Date" => weather.sunset_date = Some(scope.date(&key, value)?),
            _ => scope.unknown(&key)?,
        }
    }
    Ok(weather)
}

fn music(dict: Dictionary, scope: &Scope) -> Result<Music> {
    let mut music = Music::default();
    for (key, value) in dict {
        match key.as_str() {
            "Album" => music.album = scope.string(&key, value)?,
            "Artist" => music.artist = scope.string(&key, value)?,
            "Track" => music.track = scope.string(&key, value)?,
            "Album Year" => music.album_year = scope.string(&key, value)?,
            _ => scope.unknown(&key)?,
        }
    }
    Ok(music)
}

/// The record currently being decoded: its path and the unknown-key policy.
struct Scope {
    path: String,
    unknown_fields: UnknownFields,
}

impl Scope {
    fn child(&self, key: &str) -> Self {
        Self {
            path: self.field(key),
            unknown_fields: self.unknown_fields,
        }
    }

    fn field(&self, key: &str) -> String {
        if self.path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{key}", self.path)
        }
    }

    fn mismatch(&self, key: &str, expected: Kind, found: &Value) -> DecodeError {
        DecodeError::TypeMismatch {
            path: self.field(key),
            index: None,
            expected,
            found: found.kind(),
        }
    }

    fn unrepresentable(&self, key: &str, expected: Kind) -> DecodeError {
        DecodeError::Unrepresentable {
            path: self.field(key),
            expected,
        }
    }

    fn unknown(&self, key: &str) -> Result<()> {
        match self.unknown_fields {
            UnknownFields::Reject => Err(DecodeError::UnknownField {
                path: self.field(key),
                key: key.to_string(),
            }),
            UnknownFields::Ignore => {
                tracing::trace!(field = %self.field(key), "ignoring unknown field");
                Ok(())
            }
        }
    }

    fn string(&self, key: &str, value: Value) -> Result<String> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(self.mismatch(key, Kind::String, &other)),
        }
    }

    fn boolean(&self, key: &str, value: Value) -> Result<bool> {
        match value {
            Value::Boolean(b) => Ok(b),
            other => Err(self.mismatch(key, Kind::Boolean, &other)),
        }
    }

    fn unsigned(&self, key: &str, value: Value) -> Result<u64> {
        match value {
            Value::UnsignedInteger(n) => Ok(n),
            other => Err(self.mismatch(key, Kind::UnsignedInteger, &other)),
        }
    }

    fn real(&self, key: &str, value: Value) -> Result<f64> {
        match value {
            Value::Real(r) => Ok(r),
            other => Err(self.mismatch(key, Kind::Real, &other)),
        }
    }

    /// A real that may have been encoded as an integer of either sign.
    #[allow(clippy::cast_precision_loss)]
    fn number(&self, key: &str, value: Value) -> Result<f64> {
        match value {
            Value::Real(r) => Ok(r),
            Value::UnsignedInteger(n) if n <= MAX_EXACT_INTEGER => Ok(n as f64),
            Value::SignedInteger(n) if n.unsigned_abs() <= MAX_EXACT_INTEGER => Ok(n as f64),
            Value::UnsignedInteger(_) | Value::SignedInteger(_) => {
                Err(self.unrepresentable(key, Kind::Real))
            }
            other => Err(self.mismatch(key, Kind::Number, &other)),
        }
    }

    /// A signed integer that may have been encoded unsigned or as a whole real.
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    fn integer(&self, key: &str, value: Value) -> Result<i64> {
        match value {
            Value::SignedInteger(n) => Ok(n),
            Value::UnsignedInteger(n) => {
                i64::try_from(n).map_err(|_| self.unrepresentable(key, Kind::SignedInteger))
            }
            Value::Real(r) => {
                let exact = r.fract() == 0.0 && r.abs() <= MAX_EXACT_INTEGER as f64;
                if exact {
                    Ok(r as i64)
                } else {
                    Err(self.unrepresentable(key, Kind::SignedInteger))
                }
            }
            other => Err(self.mismatch(key, Kind::Number, &other)),
        }
    }

    fn date(&self, key: &str, value: Value) -> Result<Timestamp> {
        match value {
            Value::Date(t) => Ok(t),
            other => Err(self.mismatch(key, Kind::Date, &other)),
        }
    }

    fn dictionary(&self, key: &str, value: Value) -> Result<Dictionary> {
        match value {
            Value::Dictionary(d) => Ok(d),
            other => Err(self.mismatch(key, Kind::Dictionary, &other)),
        }
    }

    fn strings(&self, key: &str, value: Value) -> Result<Vec<String>> {
        let items = match value {
            Value::Array(items) => items,
            other => return Err(self.mismatch(key, Kind::Array, &other)),
        };
        items
            .into_iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::String(s) => Ok(s),
                other => Err(DecodeError::TypeMismatch {
                    path: self.field(key),
                    index: Some(index),
                    expected: Kind::String,
                    found: other.kind(),
                }),
            })
            .collect()
    }
}
