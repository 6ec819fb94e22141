//! Usage colour classification shared by every widget.

use crate::core::domain::value_object::Percentage;

/// Colour class of a usage value.
///
/// `[0,50)` success, `[50,75)` info, `[75,90)` warning, `[90,100]` danger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UsageLevel {
    Success,
    Info,
    Warning,
    Danger,
}

impl UsageLevel {
    pub fn from_percentage(percentage: Percentage) -> Self {
        let value = percentage.get();
        if value < 50.0 {
            UsageLevel::Success
        } else if value < 75.0 {
            UsageLevel::Info
        } else if value < 90.0 {
            UsageLevel::Warning
        } else {
            UsageLevel::Danger
        }
    }

    /// Classifies a raw percentage, clamping it first.
    pub fn classify(raw: f64) -> Self {
        Self::from_percentage(Percentage::new(raw))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UsageLevel::Success => "success",
            UsageLevel::Info => "info",
            UsageLevel::Warning => "warning",
            UsageLevel::Danger => "danger",
        }
    }

    /// Class name under a styling prefix, e.g. `bg-warning`.
    pub fn class_name(&self, prefix: &str) -> String {
        format!("{}-{}", prefix, self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds() {
        assert_eq!(UsageLevel::classify(0.0), UsageLevel::Success);
        assert_eq!(UsageLevel::classify(49.99), UsageLevel::Success);
        assert_eq!(UsageLevel::classify(50.0), UsageLevel::Info);
        assert_eq!(UsageLevel::classify(74.9), UsageLevel::Info);
        assert_eq!(UsageLevel::classify(75.0), UsageLevel::Warning);
        assert_eq!(UsageLevel::classify(89.9), UsageLevel::Warning);
        assert_eq!(UsageLevel::classify(90.0), UsageLevel::Danger);
        assert_eq!(UsageLevel::classify(100.0), UsageLevel::Danger);
    }

    #[test]
    fn test_out_of_range_is_clamped_before_classification() {
        for raw in [-1000.0, -0.1, f64::NEG_INFINITY, f64::NAN] {
            assert_eq!(UsageLevel::classify(raw), UsageLevel::Success, "raw {}", raw);
        }
        for raw in [100.1, 250.0, f64::INFINITY] {
            assert_eq!(UsageLevel::classify(raw), UsageLevel::Danger, "raw {}", raw);
        }
    }

    #[test]
    fn test_class_name() {
        assert_eq!(UsageLevel::Warning.class_name("bg"), "bg-warning");
        assert_eq!(UsageLevel::Danger.class_name("stroke"), "stroke-danger");
    }
}
