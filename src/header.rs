//! Series provenance headers
//!
//! A [`Header`] records where a series came from and what it measures:
//! location label, data type, unit, sampling frequency, and the analysis
//! period the data covers. Headers are immutable by convention — callers
//! duplicate then edit, they never mutate a header shared with a series
//! they do not own. Each header is owned exclusively by its series.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::time::AnalysisPeriod;

/// Schema tag emitted as the first entry of a flattened header row
pub const HEADER_SCHEMA_TAG: &str = "location|dataType|units|frequency|dataPeriod";

// ============================================================================
// Frequency
// ============================================================================

/// Sampling frequency of a series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Frequency {
    /// One sample per hour
    Hourly,
    /// One sample per day
    Daily,
    /// One sample per month
    Monthly,
    /// One sample per year
    Annual,
    /// Not calendar-regular (e.g. after a predicate filter)
    NotApplicable,
    /// Frequency not recorded
    #[default]
    Unknown,
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Frequency::Hourly => "Hourly",
            Frequency::Daily => "Daily",
            Frequency::Monthly => "Monthly",
            Frequency::Annual => "Annual",
            Frequency::NotApplicable => "N/A",
            Frequency::Unknown => "unknown",
        };
        write!(f, "{}", label)
    }
}

impl FromStr for Frequency {
    type Err = Error;

    fn from_str(label: &str) -> Result<Self, Error> {
        match label {
            "Hourly" => Ok(Frequency::Hourly),
            "Daily" => Ok(Frequency::Daily),
            "Monthly" => Ok(Frequency::Monthly),
            "Annual" => Ok(Frequency::Annual),
            "N/A" => Ok(Frequency::NotApplicable),
            "unknown" => Ok(Frequency::Unknown),
            other => Err(Error::UnknownFrequency(other.to_string())),
        }
    }
}

// ============================================================================
// DataPeriod
// ============================================================================

/// The analysis period a header describes, or a sentinel when none applies
///
/// Filtering adjusts this field on the result's header: a period filter
/// records the filter period, an hour-of-year filter resets it to
/// `Unknown` (the retained hours need not be contiguous), and predicate or
/// mask filters set `NotApplicable` (the retained set is not
/// calendar-contiguous by construction).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub enum DataPeriod {
    /// A concrete analysis period
    Known(AnalysisPeriod),
    /// Period not recorded
    #[default]
    Unknown,
    /// No calendar-contiguous period describes the data
    NotApplicable,
}

impl From<AnalysisPeriod> for DataPeriod {
    fn from(period: AnalysisPeriod) -> Self {
        DataPeriod::Known(period)
    }
}

impl fmt::Display for DataPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataPeriod::Known(period) => write!(f, "{}", period),
            DataPeriod::Unknown => write!(f, "unknown"),
            DataPeriod::NotApplicable => write!(f, "N/A"),
        }
    }
}

// ============================================================================
// Header
// ============================================================================

/// Provenance record attached to a series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    /// Location label (usually a city name)
    pub location: String,
    /// Data type label (e.g. "Dry Bulb Temperature")
    pub data_type: String,
    /// Unit label for the values (e.g. "C")
    pub unit: String,
    /// Sampling frequency
    pub frequency: Frequency,
    /// Analysis period the data covers
    pub period: DataPeriod,
}

impl Default for Header {
    fn default() -> Self {
        Self {
            location: "unknown".to_string(),
            data_type: "unknown".to_string(),
            unit: "unknown".to_string(),
            frequency: Frequency::Unknown,
            period: DataPeriod::Unknown,
        }
    }
}

impl Header {
    /// Create a header
    pub fn new(
        location: impl Into<String>,
        data_type: impl Into<String>,
        unit: impl Into<String>,
        frequency: Frequency,
        period: DataPeriod,
    ) -> Self {
        Self {
            location: location.into(),
            data_type: data_type.into(),
            unit: unit.into(),
            frequency,
            period,
        }
    }

    /// Structural deep copy; no shared mutable state with the original
    pub fn duplicate(&self) -> Self {
        self.clone()
    }

    /// Flatten to a fixed-order descriptive row
    ///
    /// Order: schema tag, location, data type, unit, frequency, period.
    /// Used when a caller wants metadata alongside raw values in one
    /// sequence.
    pub fn to_row(&self) -> [String; 6] {
        [
            HEADER_SCHEMA_TAG.to_string(),
            self.location.clone(),
            self.data_type.clone(),
            self.unit.clone(),
            self.frequency.to_string(),
            self.period.to_string(),
        ]
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} for {} during {}",
            self.data_type, self.location, self.period
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::AnalysisPeriod;

    #[test]
    fn test_frequency_labels_round_trip() {
        for frequency in [
            Frequency::Hourly,
            Frequency::Daily,
            Frequency::Monthly,
            Frequency::Annual,
            Frequency::NotApplicable,
            Frequency::Unknown,
        ] {
            assert_eq!(frequency.to_string().parse::<Frequency>().unwrap(), frequency);
        }
        assert!(matches!(
            "Fortnightly".parse::<Frequency>(),
            Err(Error::UnknownFrequency(_))
        ));
    }

    #[test]
    fn test_duplicate_is_independent() {
        let original = Header::new(
            "Chicago",
            "Dry Bulb Temperature",
            "C",
            Frequency::Hourly,
            DataPeriod::Known(AnalysisPeriod::default()),
        );
        let mut copy = original.duplicate();
        copy.period = DataPeriod::NotApplicable;
        copy.unit = "F".to_string();
        assert_eq!(original.unit, "C");
        assert!(matches!(original.period, DataPeriod::Known(_)));
    }

    #[test]
    fn test_to_row_order() {
        let header = Header::new("Chicago", "Irradiance", "W/m2", Frequency::Hourly, DataPeriod::Unknown);
        let row = header.to_row();
        assert_eq!(row[0], HEADER_SCHEMA_TAG);
        assert_eq!(row[1], "Chicago");
        assert_eq!(row[2], "Irradiance");
        assert_eq!(row[3], "W/m2");
        assert_eq!(row[4], "Hourly");
        assert_eq!(row[5], "unknown");
    }

    #[test]
    fn test_default_header() {
        let header = Header::default();
        assert_eq!(header.location, "unknown");
        assert_eq!(header.frequency, Frequency::Unknown);
        assert_eq!(header.period, DataPeriod::Unknown);
    }
}
