//! The time series engine
//!
//! A [`TimeSeries`] is an ordered collection of [`Sample`]s plus an owned
//! [`Header`]. Order is insertion order: nothing requires the samples to be
//! chronological or contiguous, and every operation preserves the order it
//! was given.
//!
//! Operations come in two flavors:
//!
//! - **Pure**: grouping, filtering, and aggregation read the series and
//!   return fresh containers. Filters duplicate the header and adjust its
//!   period to describe the retained samples; the receiver is never touched.
//! - **Mutating**: the bulk update operations overwrite sample values in
//!   place, keyed by hour of year, and report how many samples they
//!   touched. They never change sample identity, order, or the header.
//!
//! No two series ever share backing storage, so a filtered series can be
//! mutated freely without affecting its parent.
//!
//! # Example
//!
//! ```rust
//! use zephyr_ts::{Header, Sample, TimeSeries, Timestamp};
//!
//! let data = vec![
//!     Sample::new(20.0, Timestamp::new(1, 1, 1).unwrap()),
//!     Sample::new(25.0, Timestamp::new(1, 1, 2).unwrap()),
//!     Sample::new(30.0, Timestamp::new(6, 21, 13).unwrap()),
//! ];
//! let series = TimeSeries::new(data, Header::default());
//!
//! let warm = series.filter_by_statement("x > 22").unwrap();
//! assert_eq!(warm.values(), vec![25.0, 30.0]);
//!
//! let by_month = series.group_by_month();
//! assert_eq!(by_month[&1].len(), 2);
//! assert_eq!(by_month[&6].len(), 1);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::ops::{Index, IndexMut, RangeInclusive};
use tracing::debug;

use crate::error::{Error, Result};
use crate::header::{DataPeriod, Header};
use crate::sample::Sample;
use crate::statement::Statement;
use crate::time::{AnalysisPeriod, Timestamp};

/// An ordered series of timestamped samples with provenance metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimeSeries {
    data: Vec<Sample>,
    header: Header,
}

impl TimeSeries {
    // ========================================================================
    // Construction and access
    // ========================================================================

    /// Create a series from samples and a header
    ///
    /// Construction is faithful: the samples keep the order they were
    /// given, and an empty vector yields an empty series.
    pub fn new(data: Vec<Sample>, header: Header) -> Self {
        Self { data, header }
    }

    /// Create a series with a default header
    pub fn from_data(data: Vec<Sample>) -> Self {
        Self::new(data, Header::default())
    }

    /// The samples, in insertion order
    pub fn samples(&self) -> &[Sample] {
        &self.data
    }

    /// The sample values, in insertion order
    pub fn values(&self) -> Vec<f64> {
        self.data.iter().map(Sample::value).collect()
    }

    /// The sample timestamps, in insertion order
    pub fn timestamps(&self) -> Vec<Timestamp> {
        self.data.iter().map(Sample::time).collect()
    }

    /// The header
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Append one sample, preserving insertion order
    pub fn append(&mut self, sample: Sample) {
        self.data.push(sample);
    }

    /// Append a batch of samples, preserving insertion order
    pub fn extend(&mut self, samples: impl IntoIterator<Item = Sample>) {
        self.data.extend(samples);
    }

    /// Structural deep copy of the samples and the header
    pub fn duplicate(&self) -> Self {
        self.clone()
    }

    // ========================================================================
    // Container protocol
    // ========================================================================

    /// Number of samples
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when the series holds no samples
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Remove and return the sample at an index
    ///
    /// # Panics
    ///
    /// Panics if the index is out of bounds.
    pub fn remove(&mut self, index: usize) -> Sample {
        self.data.remove(index)
    }

    /// Iterate over the samples in insertion order
    ///
    /// Restartable: iterating twice yields the same sequence unless the
    /// series was mutated in between.
    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.data.iter()
    }

    /// Iterate over the samples in reverse insertion order
    ///
    /// Returns samples only: the header's period is not reversed or
    /// otherwise adjusted, a known limitation kept as defined behavior.
    pub fn reversed(&self) -> impl Iterator<Item = Sample> + '_ {
        self.data.iter().rev().copied()
    }

    // ========================================================================
    // Grouping
    // ========================================================================

    /// Group the series' samples by month (1-12)
    pub fn group_by_month(&self) -> BTreeMap<u8, Vec<Sample>> {
        Self::group_samples_by_month(&self.data, 1..=12)
    }

    /// Group the series' samples by month, keeping only a month range
    pub fn group_by_month_in(&self, months: RangeInclusive<u8>) -> BTreeMap<u8, Vec<Sample>> {
        Self::group_samples_by_month(&self.data, months)
    }

    /// Group any sample list by month, keeping only a month range
    ///
    /// Samples whose month falls outside the range are dropped. Buckets
    /// are created lazily, so only months with at least one matching
    /// sample appear; within a bucket, order matches the input order.
    pub fn group_samples_by_month(
        samples: &[Sample],
        months: RangeInclusive<u8>,
    ) -> BTreeMap<u8, Vec<Sample>> {
        let mut buckets: BTreeMap<u8, Vec<Sample>> = BTreeMap::new();
        for sample in samples {
            let month = sample.time().month();
            if !months.contains(&month) {
                continue;
            }
            buckets.entry(month).or_default().push(*sample);
        }
        debug!(months = buckets.len(), "grouped samples by month");
        buckets
    }

    /// Group the series' samples by day of year (1-365)
    pub fn group_by_day(&self) -> BTreeMap<u16, Vec<Sample>> {
        Self::group_samples_by_day(&self.data, 1..=365)
    }

    /// Group the series' samples by day of year, keeping only a day range
    pub fn group_by_day_in(&self, days: RangeInclusive<u16>) -> BTreeMap<u16, Vec<Sample>> {
        Self::group_samples_by_day(&self.data, days)
    }

    /// Group any sample list by day of year, keeping only a day range
    ///
    /// Same bucket policy as [`TimeSeries::group_samples_by_month`].
    pub fn group_samples_by_day(
        samples: &[Sample],
        days: RangeInclusive<u16>,
    ) -> BTreeMap<u16, Vec<Sample>> {
        let mut buckets: BTreeMap<u16, Vec<Sample>> = BTreeMap::new();
        for sample in samples {
            let doy = sample.time().day_of_year();
            if !days.contains(&doy) {
                continue;
            }
            buckets.entry(doy).or_default().push(*sample);
        }
        debug!(days = buckets.len(), "grouped samples by day of year");
        buckets
    }

    /// Group the series' samples by hour of day (1-24)
    pub fn group_by_hour(&self) -> BTreeMap<u8, Vec<Sample>> {
        Self::group_samples_by_hour(&self.data, 1..=24)
    }

    /// Group the series' samples by hour of day, keeping only an hour range
    pub fn group_by_hour_in(&self, hours: RangeInclusive<u8>) -> BTreeMap<u8, Vec<Sample>> {
        Self::group_samples_by_hour(&self.data, hours)
    }

    /// Group any sample list by hour of day, keeping only an hour range
    ///
    /// Same bucket policy as [`TimeSeries::group_samples_by_month`].
    pub fn group_samples_by_hour(
        samples: &[Sample],
        hours: RangeInclusive<u8>,
    ) -> BTreeMap<u8, Vec<Sample>> {
        let mut buckets: BTreeMap<u8, Vec<Sample>> = BTreeMap::new();
        for sample in samples {
            let hour = sample.time().hour();
            if !hours.contains(&hour) {
                continue;
            }
            buckets.entry(hour).or_default().push(*sample);
        }
        debug!(hours = buckets.len(), "grouped samples by hour of day");
        buckets
    }

    // ========================================================================
    // Filtering
    // ========================================================================

    /// New series with a duplicated, period-adjusted header
    fn filtered(&self, data: Vec<Sample>, period: DataPeriod) -> TimeSeries {
        let mut header = self.header.duplicate();
        header.period = period;
        TimeSeries::new(data, header)
    }

    /// Keep samples whose timestamp lies within an analysis period
    ///
    /// An absent or whole-year period restricts nothing, so the result is
    /// a copy of the receiver, header included. Otherwise the result's
    /// header records the filter period.
    pub fn filter_by_analysis_period(&self, period: Option<&AnalysisPeriod>) -> TimeSeries {
        let period = match period {
            Some(period) if !period.is_annual() => period,
            _ => {
                debug!("no restricting analysis period, returning the series as is");
                return self.clone();
            }
        };
        let data: Vec<Sample> = self
            .data
            .iter()
            .filter(|sample| period.is_time_included(&sample.time()))
            .copied()
            .collect();
        debug!(
            kept = data.len(),
            total = self.data.len(),
            "filtered by analysis period"
        );
        self.filtered(data, DataPeriod::Known(period.clone()))
    }

    /// Keep samples whose hour of year is in a set
    ///
    /// The result's header period is reset to unknown: the retained hours
    /// need not be contiguous.
    pub fn filter_by_hoys(&self, hoys: &[u32]) -> TimeSeries {
        let wanted: HashSet<u32> = hoys.iter().copied().collect();
        let data: Vec<Sample> = self
            .data
            .iter()
            .filter(|sample| wanted.contains(&sample.time().hour_of_year()))
            .copied()
            .collect();
        debug!(
            kept = data.len(),
            total = self.data.len(),
            "filtered by hours of year"
        );
        self.filtered(data, DataPeriod::Unknown)
    }

    /// Keep samples whose value satisfies a conditional statement
    ///
    /// The statement (e.g. `"x > 25 and x % 5 == 0"`) is compiled once up
    /// front; a statement outside the restricted grammar is rejected
    /// before any sample is evaluated. The result's header period is
    /// N/A: the retained set is not calendar-contiguous by construction.
    pub fn filter_by_statement(&self, statement: &str) -> Result<TimeSeries> {
        let compiled = Statement::parse(statement)?;
        let data: Vec<Sample> = self
            .data
            .iter()
            .filter(|sample| compiled.eval(sample.value()))
            .copied()
            .collect();
        debug!(
            statement = %compiled,
            kept = data.len(),
            total = self.data.len(),
            "filtered by conditional statement"
        );
        Ok(self.filtered(data, DataPeriod::NotApplicable))
    }

    /// Keep the i-th sample iff the i-th mask entry is true
    ///
    /// The mask length must equal the series length; a mismatch is an
    /// error, never a silent truncation. The result's header period is
    /// N/A.
    pub fn filter_by_pattern(&self, pattern: &[bool]) -> Result<TimeSeries> {
        if pattern.len() != self.data.len() {
            return Err(Error::LengthMismatch {
                expected: self.data.len(),
                actual: pattern.len(),
            });
        }
        let data: Vec<Sample> = self
            .data
            .iter()
            .zip(pattern)
            .filter(|(_, keep)| **keep)
            .map(|(sample, _)| *sample)
            .collect();
        debug!(
            kept = data.len(),
            total = self.data.len(),
            "filtered by boolean pattern"
        );
        Ok(self.filtered(data, DataPeriod::NotApplicable))
    }

    // ========================================================================
    // Bulk update
    // ========================================================================

    /// Overwrite values keyed by hour of year
    fn apply_hoy_values(&mut self, new_values: &HashMap<u32, f64>) -> usize {
        let mut updated = 0;
        for sample in &mut self.data {
            if let Some(value) = new_values.get(&sample.time().hour_of_year()) {
                sample.set_value(*value);
                updated += 1;
            }
        }
        debug!(
            updated,
            total = self.data.len(),
            "updated sample values by hour of year"
        );
        updated
    }

    /// Replace values for every hour of an analysis period
    ///
    /// The value count must equal the period's hour count (an absent
    /// period means the whole year); the check runs before any mutation.
    /// The period's ordered hours are zipped with the values, and every
    /// sample whose hour of year appears in that mapping is overwritten.
    /// Samples with no matching hour are left untouched — partial coverage
    /// is expected, not an error. Returns the number of samples updated.
    pub fn update_for_analysis_period(
        &mut self,
        values: &[f64],
        period: Option<&AnalysisPeriod>,
    ) -> Result<usize> {
        let whole_year;
        let period = match period {
            Some(period) => period,
            None => {
                whole_year = AnalysisPeriod::default();
                &whole_year
            }
        };
        let expected = period.total_num_of_hours();
        if values.len() != expected {
            return Err(Error::LengthMismatch {
                expected,
                actual: values.len(),
            });
        }
        let new_values: HashMap<u32, f64> = period
            .hours_of_year()
            .into_iter()
            .zip(values.iter().copied())
            .collect();
        Ok(self.apply_hoy_values(&new_values))
    }

    /// Replace values for an explicit hour-of-year list
    ///
    /// `values` and `hoys` must have equal lengths; the check runs before
    /// any mutation. Returns the number of samples updated.
    pub fn update_for_hours_of_year(&mut self, values: &[f64], hoys: &[u32]) -> Result<usize> {
        if values.len() != hoys.len() {
            return Err(Error::LengthMismatch {
                expected: hoys.len(),
                actual: values.len(),
            });
        }
        let new_values: HashMap<u32, f64> =
            hoys.iter().copied().zip(values.iter().copied()).collect();
        Ok(self.apply_hoy_values(&new_values))
    }

    /// Replace the value for a single hour of year
    pub fn update_for_hour(&mut self, value: f64, hour_of_year: u32) -> Result<usize> {
        self.update_for_hours_of_year(&[value], &[hour_of_year])
    }

    // ========================================================================
    // Aggregation
    // ========================================================================

    /// Arithmetic mean of a sample list
    ///
    /// The mean of zero samples is undefined: empty input is an error,
    /// never 0 or NaN.
    pub fn average(samples: &[Sample]) -> Result<f64> {
        if samples.is_empty() {
            return Err(Error::EmptyAverage);
        }
        Ok(samples.iter().map(|sample| sample.value()).sum::<f64>() / samples.len() as f64)
    }

    /// Mean value for each month with data
    pub fn average_monthly(&self) -> BTreeMap<u8, f64> {
        Self::average_monthly_for_samples(&self.data)
    }

    /// Mean value for each month with data, over any sample list
    pub fn average_monthly_for_samples(samples: &[Sample]) -> BTreeMap<u8, f64> {
        Self::group_samples_by_month(samples, 1..=12)
            .into_iter()
            .map(|(month, bucket)| (month, bucket_mean(&bucket)))
            .collect()
    }

    /// Mean value for each hour of day within each month with data
    ///
    /// Two-level mapping: month to hour of day to mean. Only (month, hour)
    /// pairs with at least one sample appear.
    pub fn average_monthly_per_hour(&self) -> BTreeMap<u8, BTreeMap<u8, f64>> {
        let mut averages = BTreeMap::new();
        for (month, monthly) in self.group_by_month() {
            let hourly = Self::group_samples_by_hour(&monthly, 1..=24)
                .into_iter()
                .map(|(hour, bucket)| (hour, bucket_mean(&bucket)))
                .collect();
            averages.insert(month, hourly);
        }
        averages
    }
}

/// Mean of a grouping bucket; buckets are non-empty by construction
fn bucket_mean(bucket: &[Sample]) -> f64 {
    bucket.iter().map(|sample| sample.value()).sum::<f64>() / bucket.len() as f64
}

impl Index<usize> for TimeSeries {
    type Output = Sample;

    fn index(&self, index: usize) -> &Sample {
        &self.data[index]
    }
}

impl IndexMut<usize> for TimeSeries {
    fn index_mut(&mut self, index: usize) -> &mut Sample {
        &mut self.data[index]
    }
}

impl<'a> IntoIterator for &'a TimeSeries {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

impl IntoIterator for TimeSeries {
    type Item = Sample;
    type IntoIter = std::vec::IntoIter<Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}

impl fmt::Display for TimeSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TimeSeries[{}] ({} samples)",
            self.header.data_type,
            self.data.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::Frequency;

    fn sample(value: f64, month: u8, day: u8, hour: u8) -> Sample {
        Sample::new(value, Timestamp::new(month, day, hour).unwrap())
    }

    fn winter_summer_series() -> TimeSeries {
        TimeSeries::new(
            vec![
                sample(-2.0, 1, 10, 1),
                sample(1.5, 1, 10, 13),
                sample(24.0, 6, 21, 13),
                sample(31.0, 7, 3, 15),
            ],
            Header::new(
                "Chicago",
                "Dry Bulb Temperature",
                "C",
                Frequency::Hourly,
                DataPeriod::Unknown,
            ),
        )
    }

    #[test]
    fn test_construction_is_faithful() {
        let series = winter_summer_series();
        assert_eq!(series.values(), vec![-2.0, 1.5, 24.0, 31.0]);
        assert_eq!(series.len(), 4);
        assert!(!series.is_empty());
        assert!(TimeSeries::from_data(vec![]).is_empty());
    }

    #[test]
    fn test_grouping_by_month_is_stable() {
        let series = winter_summer_series();
        let buckets = series.group_by_month();
        assert_eq!(buckets.keys().copied().collect::<Vec<_>>(), vec![1, 6, 7]);
        assert_eq!(buckets[&1][0].value(), -2.0);
        assert_eq!(buckets[&1][1].value(), 1.5);
    }

    #[test]
    fn test_grouping_range_drops_outside() {
        let series = winter_summer_series();
        let buckets = series.group_by_month_in(6..=7);
        assert!(!buckets.contains_key(&1));
        assert_eq!(buckets.len(), 2);
    }

    #[test]
    fn test_grouping_by_day() {
        let series = winter_summer_series();
        let buckets = series.group_by_day();
        assert_eq!(buckets[&10].len(), 2); // Jan 10
        assert_eq!(buckets[&172].len(), 1); // Jun 21
    }

    #[test]
    fn test_filter_by_period_adjusts_header() {
        let series = winter_summer_series();
        let june = AnalysisPeriod::new(6, 1, 1, 6, 30, 24).unwrap();
        let filtered = series.filter_by_analysis_period(Some(&june));
        assert_eq!(filtered.values(), vec![24.0]);
        assert_eq!(filtered.header().period, DataPeriod::Known(june));
        // the receiver and its header are untouched
        assert_eq!(series.len(), 4);
        assert_eq!(series.header().period, DataPeriod::Unknown);
    }

    #[test]
    fn test_filter_by_hoys_resets_period() {
        let series = winter_summer_series();
        let hoy = Timestamp::new(1, 10, 13).unwrap().hour_of_year();
        let filtered = series.filter_by_hoys(&[hoy]);
        assert_eq!(filtered.values(), vec![1.5]);
        assert_eq!(filtered.header().period, DataPeriod::Unknown);
    }

    #[test]
    fn test_filter_by_pattern_checks_length() {
        let series = winter_summer_series();
        let filtered = series.filter_by_pattern(&[true, false, false, true]).unwrap();
        assert_eq!(filtered.values(), vec![-2.0, 31.0]);
        assert_eq!(filtered.header().period, DataPeriod::NotApplicable);

        assert!(matches!(
            series.filter_by_pattern(&[true, false]),
            Err(Error::LengthMismatch {
                expected: 4,
                actual: 2
            })
        ));
    }

    #[test]
    fn test_filter_by_statement_rejects_bad_input_up_front() {
        let series = winter_summer_series();
        assert!(matches!(
            series.filter_by_statement("value > 3"),
            Err(Error::Statement(_))
        ));
    }

    #[test]
    fn test_update_for_hours_of_year() {
        let mut series = winter_summer_series();
        let hoy = Timestamp::new(6, 21, 13).unwrap().hour_of_year();
        let updated = series.update_for_hours_of_year(&[99.0], &[hoy]).unwrap();
        assert_eq!(updated, 1);
        assert_eq!(series.values(), vec![-2.0, 1.5, 99.0, 31.0]);
        // order and timestamps unchanged
        assert_eq!(series[2].time(), Timestamp::new(6, 21, 13).unwrap());

        assert!(matches!(
            series.update_for_hours_of_year(&[1.0, 2.0], &[5]),
            Err(Error::LengthMismatch { .. })
        ));
    }

    #[test]
    fn test_update_for_period_partial_coverage() {
        let mut series = winter_summer_series();
        let january = AnalysisPeriod::new(1, 1, 1, 1, 31, 24).unwrap();
        let values: Vec<f64> = vec![0.5; january.total_num_of_hours()];
        let updated = series.update_for_analysis_period(&values, Some(&january)).unwrap();
        // only the two January samples match
        assert_eq!(updated, 2);
        assert_eq!(series.values(), vec![0.5, 0.5, 24.0, 31.0]);
    }

    #[test]
    fn test_update_length_checked_before_mutation() {
        let mut series = winter_summer_series();
        let before = series.values();
        let result = series.update_for_analysis_period(&[1.0, 2.0], None);
        assert!(matches!(
            result,
            Err(Error::LengthMismatch {
                expected: 8760,
                actual: 2
            })
        ));
        assert_eq!(series.values(), before);
    }

    #[test]
    fn test_average_monthly() {
        let series = winter_summer_series();
        let monthly = series.average_monthly();
        assert_eq!(monthly[&1], -0.25);
        assert_eq!(monthly[&6], 24.0);
        assert_eq!(monthly[&7], 31.0);
    }

    #[test]
    fn test_container_protocol() {
        let mut series = winter_summer_series();
        series[0].set_value(7.0);
        assert_eq!(series[0].value(), 7.0);

        let removed = series.remove(0);
        assert_eq!(removed.value(), 7.0);
        assert_eq!(series.len(), 3);

        let forward: Vec<f64> = series.iter().map(|s| s.value()).collect();
        let again: Vec<f64> = series.iter().map(|s| s.value()).collect();
        assert_eq!(forward, again);

        let mut backward: Vec<f64> = series.reversed().map(|s| s.value()).collect();
        backward.reverse();
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_append_and_extend() {
        let mut series = TimeSeries::from_data(vec![]);
        series.append(sample(1.0, 1, 1, 1));
        series.extend(vec![sample(2.0, 1, 1, 2), sample(3.0, 1, 1, 3)]);
        assert_eq!(series.values(), vec![1.0, 2.0, 3.0]);
    }
}
