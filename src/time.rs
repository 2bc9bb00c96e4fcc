//! Calendar timestamps and analysis periods
//!
//! The calendar model is the 365-day, 8760-hour model year: leap days are
//! ignored and hours of the day run from 1 to 24. Two types live here:
//!
//! - **`Timestamp`**: a month/day/hour point in the model year, with
//!   day-of-year (1-365) and hour-of-year (1-8760) derivations
//! - **`AnalysisPeriod`**: a calendar date/time range plus a sampling step,
//!   with an inclusion test and an ordered hourly timestamp enumeration
//!
//! # Example
//!
//! ```rust
//! use zephyr_ts::{AnalysisPeriod, Timestamp};
//!
//! let noon_midsummer = Timestamp::new(6, 21, 12).unwrap();
//! assert_eq!(noon_midsummer.day_of_year(), 172);
//! assert_eq!(noon_midsummer.hour_of_year(), 4116);
//!
//! // Start of Feb to end of Mar, all hours
//! let period = AnalysisPeriod::new(2, 1, 1, 3, 31, 24).unwrap();
//! assert!(!period.is_time_included(&noon_midsummer));
//! assert_eq!(period.total_num_of_hours(), 59 * 24);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// Number of hours in the model year (365 days, leap days ignored)
pub const HOURS_PER_YEAR: u32 = 8760;

/// Number of days in the model year
pub const DAYS_PER_YEAR: u16 = 365;

/// Days in each month, leap days ignored
const DAYS_PER_MONTH: [u8; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Cumulative day count before the start of each month
const DAYS_BEFORE_MONTH: [u16; 12] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];

/// Day of year (1-365) for a month/day pair, leap days ignored
///
/// # Panics
///
/// Panics if `month` is outside 1-12. Use [`Timestamp::new`] when the
/// inputs are not already validated.
pub fn day_of_year(month: u8, day: u8) -> u16 {
    DAYS_BEFORE_MONTH[(month - 1) as usize] + day as u16
}

// ============================================================================
// Timestamp
// ============================================================================

/// A point in the model year: month, day, and hour of day
///
/// Hours run 1-24, so hour-of-year values run 1-8760 with no gaps. The
/// all-zero [`Timestamp::sentinel`] marks samples that are not time-indexed
/// (direction-indexed sky patch samples); its derivations return 0 and no
/// analysis period ever includes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Timestamp {
    month: u8,
    day: u8,
    hour: u8,
}

impl Timestamp {
    /// Create a validated timestamp
    ///
    /// # Arguments
    ///
    /// * `month` - 1-12
    /// * `day` - 1 to the month's length (Feb caps at 28)
    /// * `hour` - hour of day, 1-24
    pub fn new(month: u8, day: u8, hour: u8) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(Error::InvalidTimestamp { month, day, hour });
        }
        if day < 1 || day > DAYS_PER_MONTH[(month - 1) as usize] {
            return Err(Error::InvalidTimestamp { month, day, hour });
        }
        if !(1..=24).contains(&hour) {
            return Err(Error::InvalidTimestamp { month, day, hour });
        }
        Ok(Self { month, day, hour })
    }

    /// Create a timestamp from a day of year (1-365) and hour of day (1-24)
    pub fn from_day_of_year(doy: u16, hour: u8) -> Result<Self> {
        if !(1..=DAYS_PER_YEAR).contains(&doy) {
            return Err(Error::InvalidPeriod(format!(
                "day of year {} out of range 1-{}",
                doy, DAYS_PER_YEAR
            )));
        }
        let month = month_of_doy(doy);
        let day = (doy - DAYS_BEFORE_MONTH[(month - 1) as usize]) as u8;
        Self::new(month, day, hour)
    }

    /// Create a timestamp from an hour-of-year index (1-8760)
    pub fn from_hour_of_year(hoy: u32) -> Result<Self> {
        if !(1..=HOURS_PER_YEAR).contains(&hoy) {
            return Err(Error::InvalidPeriod(format!(
                "hour of year {} out of range 1-{}",
                hoy, HOURS_PER_YEAR
            )));
        }
        let doy = ((hoy - 1) / 24) as u16 + 1;
        let hour = ((hoy - 1) % 24) as u8 + 1;
        Self::from_day_of_year(doy, hour)
    }

    /// The all-zero timestamp carried by direction-indexed samples
    pub fn sentinel() -> Self {
        Self {
            month: 0,
            day: 0,
            hour: 0,
        }
    }

    /// True for the sentinel timestamp
    pub fn is_sentinel(&self) -> bool {
        self.month == 0
    }

    /// Month, 1-12 (0 for the sentinel)
    pub fn month(&self) -> u8 {
        self.month
    }

    /// Day of month (0 for the sentinel)
    pub fn day(&self) -> u8 {
        self.day
    }

    /// Hour of day, 1-24 (0 for the sentinel)
    pub fn hour(&self) -> u8 {
        self.hour
    }

    /// Day of year, 1-365 (0 for the sentinel)
    pub fn day_of_year(&self) -> u16 {
        if self.is_sentinel() {
            return 0;
        }
        day_of_year(self.month, self.day)
    }

    /// Hour of year, 1-8760 (0 for the sentinel)
    pub fn hour_of_year(&self) -> u32 {
        if self.is_sentinel() {
            return 0;
        }
        (self.day_of_year() as u32 - 1) * 24 + self.hour as u32
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_sentinel() {
            return write!(f, "-/- -:00");
        }
        write!(f, "{}/{} {}:00", self.month, self.day, self.hour)
    }
}

// ============================================================================
// AnalysisPeriod
// ============================================================================

/// A calendar date/time range plus a sampling step
///
/// The period covers every day from the start date to the end date, and on
/// each covered day the hours from the start hour to the end hour. A start
/// date after the end date wraps over the year end (e.g. Nov 1 to Feb 28
/// covers the winter). The start hour may not come after the end hour.
///
/// `timestep` records samples per hour (1-60). The enumeration the engine
/// consumes is hour-grained: [`AnalysisPeriod::timestamps`] and
/// [`AnalysisPeriod::total_num_of_hours`] describe the hourly grid.
///
/// `Clone` is the duplication contract: a structural copy sharing no
/// mutable state with the original.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisPeriod {
    st_month: u8,
    st_day: u8,
    st_hour: u8,
    end_month: u8,
    end_day: u8,
    end_hour: u8,
    timestep: u8,
}

impl Default for AnalysisPeriod {
    /// The whole model year: 1 Jan hour 1 through 31 Dec hour 24, hourly
    fn default() -> Self {
        Self {
            st_month: 1,
            st_day: 1,
            st_hour: 1,
            end_month: 12,
            end_day: 31,
            end_hour: 24,
            timestep: 1,
        }
    }
}

impl AnalysisPeriod {
    /// Create an hourly analysis period
    ///
    /// # Arguments
    ///
    /// * `st_month`, `st_day`, `st_hour` - start of the period
    /// * `end_month`, `end_day`, `end_hour` - end of the period (inclusive)
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        st_month: u8,
        st_day: u8,
        st_hour: u8,
        end_month: u8,
        end_day: u8,
        end_hour: u8,
    ) -> Result<Self> {
        Self::with_timestep(st_month, st_day, st_hour, end_month, end_day, end_hour, 1)
    }

    /// Create an analysis period with an explicit sampling step (1-60)
    #[allow(clippy::too_many_arguments)]
    pub fn with_timestep(
        st_month: u8,
        st_day: u8,
        st_hour: u8,
        end_month: u8,
        end_day: u8,
        end_hour: u8,
        timestep: u8,
    ) -> Result<Self> {
        Timestamp::new(st_month, st_day, st_hour)?;
        Timestamp::new(end_month, end_day, end_hour)?;
        if !(1..=60).contains(&timestep) {
            return Err(Error::InvalidPeriod(format!(
                "timestep {} out of range 1-60",
                timestep
            )));
        }
        if st_hour > end_hour {
            return Err(Error::InvalidPeriod(format!(
                "start hour {} comes after end hour {}",
                st_hour, end_hour
            )));
        }
        Ok(Self {
            st_month,
            st_day,
            st_hour,
            end_month,
            end_day,
            end_hour,
            timestep,
        })
    }

    /// Start month, 1-12
    pub fn st_month(&self) -> u8 {
        self.st_month
    }

    /// Start day of month
    pub fn st_day(&self) -> u8 {
        self.st_day
    }

    /// Start hour of day, 1-24
    pub fn st_hour(&self) -> u8 {
        self.st_hour
    }

    /// End month, 1-12
    pub fn end_month(&self) -> u8 {
        self.end_month
    }

    /// End day of month
    pub fn end_day(&self) -> u8 {
        self.end_day
    }

    /// End hour of day, 1-24
    pub fn end_hour(&self) -> u8 {
        self.end_hour
    }

    /// Samples per hour, 1-60
    pub fn timestep(&self) -> u8 {
        self.timestep
    }

    /// True when the period covers the whole year at every hour
    pub fn is_annual(&self) -> bool {
        self.st_month == 1
            && self.st_day == 1
            && self.st_hour == 1
            && self.end_month == 12
            && self.end_day == 31
            && self.end_hour == 24
    }

    /// True when the period wraps over the year end (start date after end date)
    pub fn is_over_year_end(&self) -> bool {
        self.st_doy() > self.end_doy()
    }

    fn st_doy(&self) -> u16 {
        day_of_year(self.st_month, self.st_day)
    }

    fn end_doy(&self) -> u16 {
        day_of_year(self.end_month, self.end_day)
    }

    /// Check whether a timestamp falls inside the period
    ///
    /// The day of year must lie in the start..end day band (wrapping over
    /// the year end when the period does) and the hour of day must lie in
    /// the start..end hour band. The sentinel timestamp is never included.
    pub fn is_time_included(&self, time: &Timestamp) -> bool {
        if time.is_sentinel() {
            return false;
        }
        let doy = time.day_of_year();
        let day_included = if self.is_over_year_end() {
            doy >= self.st_doy() || doy <= self.end_doy()
        } else {
            (self.st_doy()..=self.end_doy()).contains(&doy)
        };
        day_included && (self.st_hour..=self.end_hour).contains(&time.hour())
    }

    /// Ordered list of the days of year the period covers
    fn days_of_year(&self) -> Vec<u16> {
        if self.is_over_year_end() {
            (self.st_doy()..=DAYS_PER_YEAR).chain(1..=self.end_doy()).collect()
        } else {
            (self.st_doy()..=self.end_doy()).collect()
        }
    }

    /// Ordered hourly timestamp enumeration of the period
    pub fn timestamps(&self) -> Vec<Timestamp> {
        let mut stamps = Vec::with_capacity(self.total_num_of_hours());
        for doy in self.days_of_year() {
            let month = month_of_doy(doy);
            let day = (doy - DAYS_BEFORE_MONTH[(month - 1) as usize]) as u8;
            for hour in self.st_hour..=self.end_hour {
                stamps.push(Timestamp { month, day, hour });
            }
        }
        stamps
    }

    /// Ordered hour-of-year enumeration of the period
    pub fn hours_of_year(&self) -> Vec<u32> {
        let hours_per_day = (self.end_hour - self.st_hour + 1) as u32;
        let mut hours = Vec::with_capacity(self.days_of_year().len() * hours_per_day as usize);
        for doy in self.days_of_year() {
            for hour in self.st_hour..=self.end_hour {
                hours.push((doy as u32 - 1) * 24 + hour as u32);
            }
        }
        hours
    }

    /// Number of hours in the hourly enumeration
    pub fn total_num_of_hours(&self) -> usize {
        let days = if self.is_over_year_end() {
            (DAYS_PER_YEAR - self.st_doy() + 1 + self.end_doy()) as usize
        } else {
            (self.end_doy() - self.st_doy() + 1) as usize
        };
        days * (self.end_hour - self.st_hour + 1) as usize
    }
}

/// Month (1-12) containing a day of year; expects a validated input
fn month_of_doy(doy: u16) -> u8 {
    for (index, cumulative) in DAYS_BEFORE_MONTH.iter().enumerate().skip(1) {
        if doy <= *cumulative {
            return index as u8;
        }
    }
    12
}

impl fmt::Display for AnalysisPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} to {}/{} between {} and {} @{}",
            self.st_month,
            self.st_day,
            self.end_month,
            self.end_day,
            self.st_hour,
            self.end_hour,
            self.timestep
        )
    }
}
