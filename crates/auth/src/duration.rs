use std::str::FromStr;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use tokengate_core::AuthError;

/// Caller-selected token lifetime.
///
/// Only the tags `1d`, `1w`, `1m` and `1y` are accepted; anything else is a
/// configuration error at the boundary and is never coerced. A month is 30
/// days and a year is 365 days.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DurationTag {
    OneDay,
    OneWeek,
    OneMonth,
    OneYear,
}

impl DurationTag {
    pub const ALL: [DurationTag; 4] = [
        DurationTag::OneDay,
        DurationTag::OneWeek,
        DurationTag::OneMonth,
        DurationTag::OneYear,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DurationTag::OneDay => "1d",
            DurationTag::OneWeek => "1w",
            DurationTag::OneMonth => "1m",
            DurationTag::OneYear => "1y",
        }
    }

    pub fn minutes(&self) -> i64 {
        match self {
            DurationTag::OneDay => 1_440,
            DurationTag::OneWeek => 10_080,
            DurationTag::OneMonth => 43_200,
            DurationTag::OneYear => 525_600,
        }
    }

    pub fn duration(&self) -> Duration {
        Duration::minutes(self.minutes())
    }
}

impl core::fmt::Display for DurationTag {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DurationTag {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1d" => Ok(DurationTag::OneDay),
            "1w" => Ok(DurationTag::OneWeek),
            "1m" => Ok(DurationTag::OneMonth),
            "1y" => Ok(DurationTag::OneYear),
            other => Err(AuthError::configuration(format!(
                "invalid duration '{other}'; choose from '1d', '1w', '1m', or '1y'"
            ))),
        }
    }
}

impl TryFrom<String> for DurationTag {
    type Error = AuthError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DurationTag> for String {
    fn from(value: DurationTag) -> Self {
        value.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn mapping_table() {
        assert_eq!("1d".parse::<DurationTag>().unwrap().minutes(), 1440);
        assert_eq!("1w".parse::<DurationTag>().unwrap().minutes(), 10080);
        assert_eq!("1m".parse::<DurationTag>().unwrap().minutes(), 43200);
        assert_eq!("1y".parse::<DurationTag>().unwrap().minutes(), 525600);
    }

    #[test]
    fn tags_round_trip_through_their_string_form() {
        for tag in DurationTag::ALL {
            assert_eq!(tag.as_str().parse::<DurationTag>().unwrap(), tag);
        }
    }

    #[test]
    fn near_misses_are_rejected() {
        for bad in ["", "1D", "1h", "30m", " 1d", "1d ", "2d", "1 w"] {
            let err = bad.parse::<DurationTag>().unwrap_err();
            assert!(matches!(err, AuthError::Configuration(_)), "{bad:?} accepted");
        }
    }

    proptest! {
        #[test]
        fn anything_outside_the_closed_set_is_rejected(s in "\\PC{0,6}") {
            let accepted = s.parse::<DurationTag>().is_ok();
            prop_assert_eq!(accepted, matches!(s.as_str(), "1d" | "1w" | "1m" | "1y"));
        }
    }
}
