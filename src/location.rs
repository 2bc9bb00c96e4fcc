//! Site location records
//!
//! A [`Location`] describes where a measurement series was recorded. It can
//! be built from defaults or parsed from an EnergyPlus-style
//! `Site:Location` text block, and formats back to that same block, so a
//! parse/format round trip preserves the city, latitude, longitude, time
//! zone, and elevation fields.
//!
//! # Example
//!
//! ```rust
//! use zephyr_ts::Location;
//!
//! let block = "Site:Location,\n\
//!     Chicago,\n\
//!     41.98,      !Latitude\n\
//!     -87.92,     !Longitude\n\
//!     -6.0,     !Time Zone\n\
//!     201.0;       !Elevation";
//!
//! let location = Location::from_ep_string(block).unwrap();
//! assert_eq!(location.city, "Chicago");
//! assert_eq!(location.latitude, 41.98);
//! ```

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

lazy_static! {
    /// One field of an EP location block: leading newlines, the field text,
    /// then the `,` or `;` terminator. Comment text after the terminator
    /// never matches because `!` and spaces are outside the field class.
    static ref EP_FIELD: Regex =
        Regex::new(r"[\r\n]*([a-zA-Z0-9.:_\-]*)[,;]").expect("EP field pattern is valid");
}

/// A measurement site: coordinates, time zone, and provenance labels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// City name
    pub city: String,
    /// Country name
    pub country: String,
    /// Latitude in degrees, north positive
    pub latitude: f64,
    /// Longitude in degrees, east positive
    pub longitude: f64,
    /// Offset from UTC in hours
    pub time_zone: f64,
    /// Elevation above sea level in meters
    pub elevation: f64,
    /// Data source label
    pub source: String,
    /// Weather station identifier
    pub station_id: String,
}

impl Default for Location {
    fn default() -> Self {
        Self {
            city: String::new(),
            country: String::new(),
            latitude: 0.0,
            longitude: 0.0,
            time_zone: 0.0,
            elevation: 0.0,
            source: String::new(),
            station_id: String::new(),
        }
    }
}

impl Location {
    /// Parse a location from an EnergyPlus `Site:Location` text block
    ///
    /// The block carries six comma/semicolon-terminated fields: the
    /// `Site:Location` tag, city, latitude, longitude, time zone, and
    /// elevation. Country, source, and station id are not part of the
    /// block and stay at their defaults.
    pub fn from_ep_string(ep_string: &str) -> Result<Self> {
        let fields: Vec<&str> = EP_FIELD
            .captures_iter(ep_string)
            .filter_map(|caps| caps.get(1))
            .map(|field| field.as_str())
            .collect();
        if fields.len() < 6 {
            return Err(Error::LocationParse(format!(
                "expected 6 fields in location block, found {}",
                fields.len()
            )));
        }

        Ok(Self {
            city: fields[1].to_string(),
            latitude: parse_field(fields[2], "latitude")?,
            longitude: parse_field(fields[3], "longitude")?,
            time_zone: parse_field(fields[4], "time zone")?,
            elevation: parse_field(fields[5], "elevation")?,
            ..Self::default()
        })
    }

    /// Structural deep copy; no shared mutable state with the original
    pub fn duplicate(&self) -> Self {
        self.clone()
    }

    /// Format back to the EnergyPlus `Site:Location` block
    pub fn to_ep_string(&self) -> String {
        format!(
            "Site:Location,\n\
             {},\n\
             {},      !Latitude\n\
             {},     !Longitude\n\
             {},     !Time Zone\n\
             {};       !Elevation",
            self.city, self.latitude, self.longitude, self.time_zone, self.elevation
        )
    }
}

/// Coerce one numeric field of the block, naming the field on failure
fn parse_field(raw: &str, field: &str) -> Result<f64> {
    raw.trim().parse::<f64>().map_err(|_| {
        Error::LocationParse(format!("field '{}' is not numeric: '{}'", field, raw))
    })
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_ep_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EP_BLOCK: &str = "Site:Location,\n\
        Chicago,\n\
        41.98,      !Latitude\n\
        -87.92,     !Longitude\n\
        -6.0,     !Time Zone\n\
        201.0;       !Elevation";

    #[test]
    fn test_parse_ep_block() {
        let location = Location::from_ep_string(EP_BLOCK).unwrap();
        assert_eq!(location.city, "Chicago");
        assert_eq!(location.latitude, 41.98);
        assert_eq!(location.longitude, -87.92);
        assert_eq!(location.time_zone, -6.0);
        assert_eq!(location.elevation, 201.0);
        assert_eq!(location.country, "");
    }

    #[test]
    fn test_round_trip() {
        let location = Location::from_ep_string(EP_BLOCK).unwrap();
        let reparsed = Location::from_ep_string(&location.to_ep_string()).unwrap();
        assert_eq!(location, reparsed);
    }

    #[test]
    fn test_non_numeric_field_is_an_error() {
        let block = "Site:Location,\n\
            Chicago,\n\
            north,      !Latitude\n\
            -87.92,     !Longitude\n\
            -6.0,     !Time Zone\n\
            201.0;       !Elevation";
        let err = Location::from_ep_string(block).unwrap_err();
        assert!(matches!(err, Error::LocationParse(_)));
        assert!(err.to_string().contains("latitude"));
    }

    #[test]
    fn test_truncated_block_is_an_error() {
        assert!(matches!(
            Location::from_ep_string("Site:Location,\nChicago,"),
            Err(Error::LocationParse(_))
        ));
    }

    #[test]
    fn test_default_location() {
        let location = Location::default();
        assert_eq!(location.latitude, 0.0);
        assert_eq!(location.city, "");
    }
}
