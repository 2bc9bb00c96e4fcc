//! zephyr-ts — annual environmental measurement series
//!
//! This library models annual, sub-hourly environmental measurement series
//! (temperature, irradiance, wind, …) tagged with provenance metadata, and
//! provides the querying primitives downstream analysis builds on:
//!
//! - **Grouping** by calendar unit: month, day of year, hour of day
//! - **Filtering** by analysis period, hour-of-year set, restricted
//!   conditional statement, or boolean mask
//! - **Bulk update**: in-place value replacement keyed by hour of year
//! - **Aggregation**: arithmetic means, monthly and monthly-per-hour
//!
//! The calendar model is the 8760-hour model year: 365 days, hours 1-24,
//! leap days ignored. Everything is synchronous and single-threaded, and
//! all containers are value-like — filters allocate new series, updates
//! mutate only the receiver's own storage.
//!
//! # Example
//!
//! ```rust
//! use zephyr_ts::{Header, Sample, TimeSeries, Timestamp};
//!
//! let data = (1..=48)
//!     .map(|hoy| Sample::new(hoy as f64, Timestamp::from_hour_of_year(hoy).unwrap()))
//!     .collect();
//! let mut series = TimeSeries::new(data, Header::default());
//!
//! // Pure filters return new series with period-adjusted headers
//! let cold_snaps = series.filter_by_statement("x < 10 or x > 40").unwrap();
//! assert_eq!(cold_snaps.len(), 17);
//!
//! // Bulk updates mutate in place and report the touched count
//! let touched = series.update_for_hour(0.0, 24).unwrap();
//! assert_eq!(touched, 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod header;
pub mod location;
pub mod sample;
pub mod series;
pub mod statement;
pub mod time;

pub use error::{Error, Result};
pub use header::{DataPeriod, Frequency, Header, HEADER_SCHEMA_TAG};
pub use location::Location;
pub use sample::{DirectionalSample, Sample, Vector3};
pub use series::TimeSeries;
pub use statement::{Statement, StatementError};
pub use time::{day_of_year, AnalysisPeriod, Timestamp, DAYS_PER_YEAR, HOURS_PER_YEAR};
