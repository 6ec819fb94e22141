use serde::{Deserialize, Serialize};
use std::fmt;

/// A usage percentage, always within `[0, 100]`.
///
/// Every widget goes through this type before classifying or drawing a value,
/// so out-of-range input (`value > max`, negative values, NaN) can never reach
/// a colour threshold or a width attribute.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Percentage(f64);

impl Percentage {
    pub const ZERO: Percentage = Percentage(0.0);
    pub const FULL: Percentage = Percentage(100.0);

    /// Creates a percentage, clamping it into `[0, 100]`. NaN becomes 0.
    pub fn new(value: f64) -> Self {
        Self(clamp_percentage(value))
    }

    /// Computes `value / max * 100`, clamped. A non-positive or non-finite
    /// `max` yields 0.
    pub fn from_ratio(value: f64, max: f64) -> Self {
        if !max.is_finite() || max <= 0.0 || !value.is_finite() {
            return Self::ZERO;
        }
        Self::new(value / max * 100.0)
    }

    /// Creates a percentage from a 0.0 - 1.0 fraction (the form Proxmox uses for CPU).
    pub fn from_fraction(fraction: f64) -> Self {
        Self::new(fraction * 100.0)
    }

    pub fn get(&self) -> f64 {
        self.0
    }
}

/// Clamps a raw percentage into `[0, 100]`.
fn clamp_percentage(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

impl From<f64> for Percentage {
    fn from(value: f64) -> Self {
        Percentage::new(value)
    }
}

impl From<Percentage> for f64 {
    fn from(p: Percentage) -> Self {
        p.0
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}%", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamps_out_of_range() {
        assert_eq!(Percentage::new(-5.0).get(), 0.0);
        assert_eq!(Percentage::new(150.0).get(), 100.0);
        assert_eq!(Percentage::new(f64::NAN).get(), 0.0);
        assert_eq!(Percentage::new(f64::INFINITY).get(), 100.0);
        assert_eq!(Percentage::new(42.5).get(), 42.5);
    }

    #[test]
    fn test_from_ratio() {
        assert_eq!(Percentage::from_ratio(50.0, 200.0).get(), 25.0);
        assert_eq!(Percentage::from_ratio(300.0, 200.0).get(), 100.0);
        assert_eq!(Percentage::from_ratio(-10.0, 200.0).get(), 0.0);
        assert_eq!(Percentage::from_ratio(10.0, 0.0).get(), 0.0);
        assert_eq!(Percentage::from_ratio(10.0, -1.0).get(), 0.0);
    }

    #[test]
    fn test_from_fraction() {
        assert_eq!(Percentage::from_fraction(0.5).get(), 50.0);
        assert_eq!(Percentage::from_fraction(1.7).get(), 100.0);
    }

    #[test]
    fn test_display() {
        assert_eq!(Percentage::new(12.345).to_string(), "12.3%");
    }
}
