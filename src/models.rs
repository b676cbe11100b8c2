//! Domain types shared across the service.

use std::fmt;

/// The first forecast period, reduced to what the response needs.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSummary {
    /// Short human-readable description, e.g. "Sunny"
    pub short_forecast: String,
    /// Temperature in Fahrenheit
    pub temperature: f64,
}

/// Three-valued comfort classification of a Fahrenheit temperature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comfort {
    Cold,
    Moderate,
    Hot,
}

impl Comfort {
    /// Classify a Fahrenheit temperature: below 40 is cold, below 80 is
    /// moderate, everything else is hot. Exactly 40 is moderate and
    /// exactly 80 is hot.
    #[must_use]
    pub fn from_fahrenheit(temperature: f64) -> Self {
        if temperature < 40.0 {
            Comfort::Cold
        } else if temperature < 80.0 {
            Comfort::Moderate
        } else {
            Comfort::Hot
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Comfort::Cold => "cold",
            Comfort::Moderate => "moderate",
            Comfort::Hot => "hot",
        }
    }
}

impl fmt::Display for Comfort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(100.0, Comfort::Hot)]
    #[case(72.0, Comfort::Moderate)]
    #[case(-1_398_123.3, Comfort::Cold)]
    #[case(39.999, Comfort::Cold)]
    #[case(40.0, Comfort::Moderate)]
    #[case(79.999, Comfort::Moderate)]
    #[case(80.0, Comfort::Hot)]
    fn test_comfort_thresholds(#[case] temperature: f64, #[case] expected: Comfort) {
        assert_eq!(Comfort::from_fahrenheit(temperature), expected);
    }

    #[rstest]
    #[case(Comfort::Cold, "cold")]
    #[case(Comfort::Moderate, "moderate")]
    #[case(Comfort::Hot, "hot")]
    fn test_comfort_display(#[case] comfort: Comfort, #[case] expected: &str) {
        assert_eq!(comfort.to_string(), expected);
    }
}
