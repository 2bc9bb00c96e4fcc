//! Timestamped measurement samples
//!
//! A [`Sample`] binds one numeric value to a point in the model year and
//! behaves as its bare value in expressions: comparisons and arithmetic
//! against `f64` work with the sample on either side of the operator, so
//! `5.0 - sample` and `sample - 5.0` both do what they look like.
//!
//! [`DirectionalSample`] is the direction-indexed variant (sky patch data).
//! It is a distinct type rather than a `Sample` wrapper so that it can never
//! be inserted into a time-ordered series: its timestamp is always the
//! sentinel and carries no calendar meaning.
//!
//! # Example
//!
//! ```rust
//! use zephyr_ts::{Sample, Timestamp};
//!
//! let sample = Sample::new(21.5, Timestamp::new(6, 21, 12).unwrap());
//! assert!(sample > 20.0);
//! assert_eq!(sample + 0.5, 22.0);
//! assert_eq!(30.0 - sample, 8.5);
//! assert_eq!(sample.to_string(), "21.5");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Div, Mul, Rem, Sub};

use crate::time::Timestamp;

// ============================================================================
// Sample
// ============================================================================

/// A numeric sample bound to a point in time
///
/// `Copy`, 24 bytes. The value is the only mutable part; the timestamp is
/// fixed at construction. Equality and ordering compare values only.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Sample {
    value: f64,
    time: Timestamp,
}

impl Sample {
    /// Create a sample
    pub fn new(value: f64, time: Timestamp) -> Self {
        Self { value, time }
    }

    /// The numeric value
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Replace the value, leaving the timestamp untouched
    ///
    /// This is the sole mutation point used by the bulk update operations.
    pub fn set_value(&mut self, value: f64) {
        self.value = value;
    }

    /// The timestamp
    pub fn time(&self) -> Timestamp {
        self.time
    }

    /// Raise the value to a power
    pub fn powf(&self, exp: f64) -> f64 {
        self.value.powf(exp)
    }
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl From<Sample> for f64 {
    fn from(sample: Sample) -> f64 {
        sample.value
    }
}

// Equality and ordering delegate to the value, in both operand orders.

impl PartialEq for Sample {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl PartialEq<f64> for Sample {
    fn eq(&self, other: &f64) -> bool {
        self.value == *other
    }
}

impl PartialEq<Sample> for f64 {
    fn eq(&self, other: &Sample) -> bool {
        *self == other.value
    }
}

impl PartialOrd for Sample {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.value.partial_cmp(&other.value)
    }
}

impl PartialOrd<f64> for Sample {
    fn partial_cmp(&self, other: &f64) -> Option<std::cmp::Ordering> {
        self.value.partial_cmp(other)
    }
}

impl PartialOrd<Sample> for f64 {
    fn partial_cmp(&self, other: &Sample) -> Option<std::cmp::Ordering> {
        self.partial_cmp(&other.value)
    }
}

/// Forward, sample-sample, and reflected arithmetic, all producing `f64`
macro_rules! impl_sample_op {
    ($trait:ident, $method:ident, $op:tt) => {
        impl $trait<f64> for Sample {
            type Output = f64;
            fn $method(self, rhs: f64) -> f64 {
                self.value $op rhs
            }
        }

        impl $trait<Sample> for Sample {
            type Output = f64;
            fn $method(self, rhs: Sample) -> f64 {
                self.value $op rhs.value
            }
        }

        impl $trait<Sample> for f64 {
            type Output = f64;
            fn $method(self, rhs: Sample) -> f64 {
                self $op rhs.value
            }
        }
    };
}

impl_sample_op!(Add, add, +);
impl_sample_op!(Sub, sub, -);
impl_sample_op!(Mul, mul, *);
impl_sample_op!(Div, div, /);
impl_sample_op!(Rem, rem, %);

// ============================================================================
// Vector3
// ============================================================================

/// A 3-component spatial vector used to tag directional samples
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    /// X component
    pub x: f64,
    /// Y component
    pub y: f64,
    /// Z component
    pub z: f64,
}

impl Vector3 {
    /// Create a vector
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean length
    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

// ============================================================================
// DirectionalSample
// ============================================================================

/// A sample indexed by direction rather than by time
///
/// Carries a fixed direction vector and the sentinel zero timestamp. Being
/// a separate type from [`Sample`] keeps direction-indexed data out of
/// time-ordered series at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DirectionalSample {
    value: f64,
    direction: Vector3,
    time: Timestamp,
}

impl DirectionalSample {
    /// Create a directional sample; the timestamp is always the sentinel
    pub fn new(value: f64, direction: Vector3) -> Self {
        Self {
            value,
            direction,
            time: Timestamp::sentinel(),
        }
    }

    /// The numeric value
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Replace the value
    pub fn set_value(&mut self, value: f64) {
        self.value = value;
    }

    /// The direction vector
    pub fn direction(&self) -> Vector3 {
        self.direction
    }

    /// The sentinel timestamp
    pub fn time(&self) -> Timestamp {
        self.time
    }
}

impl fmt::Display for DirectionalSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.value, self.direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::Timestamp;

    fn sample(value: f64) -> Sample {
        Sample::new(value, Timestamp::new(1, 1, 1).unwrap())
    }

    #[test]
    fn test_comparisons_both_orders() {
        let s = sample(21.5);
        assert!(s > 20.0);
        assert!(s <= 21.5);
        assert!(20.0 < s);
        assert!(21.5 == s);
        assert!(s != 0.0);
        assert!(sample(1.0) < sample(2.0));
        assert_eq!(sample(3.0), sample(3.0));
    }

    #[test]
    fn test_arithmetic_both_orders() {
        let s = sample(10.0);
        assert_eq!(s + 5.0, 15.0);
        assert_eq!(5.0 + s, 15.0);
        assert_eq!(s - 4.0, 6.0);
        assert_eq!(4.0 - s, -6.0);
        assert_eq!(s * 2.0, 20.0);
        assert_eq!(2.0 * s, 20.0);
        assert_eq!(s / 4.0, 2.5);
        assert_eq!(40.0 / s, 4.0);
        assert_eq!(s % 3.0, 1.0);
        assert_eq!(23.0 % s, 3.0);
        assert_eq!(s.powf(2.0), 100.0);
        assert_eq!(sample(6.0) + sample(4.0), 10.0);
    }

    #[test]
    fn test_coercion_and_display() {
        let s = sample(21.5);
        let raw: f64 = s.into();
        assert_eq!(raw, 21.5);
        assert_eq!(s.to_string(), "21.5");
    }

    #[test]
    fn test_set_value_keeps_timestamp() {
        let mut s = Sample::new(1.0, Timestamp::new(6, 21, 12).unwrap());
        let before = s.time();
        s.set_value(2.0);
        assert_eq!(s.value(), 2.0);
        assert_eq!(s.time(), before);
    }

    #[test]
    fn test_directional_sample_sentinel() {
        let patch = DirectionalSample::new(340.0, Vector3::new(0.0, 0.0, 1.0));
        assert!(patch.time().is_sentinel());
        assert_eq!(patch.time().hour_of_year(), 0);
        assert_eq!(patch.direction().magnitude(), 1.0);
    }
}
