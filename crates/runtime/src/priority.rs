//! Execution priorities.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, FromRepr};

/// Ordered execution priority. Lower values are more eligible to run.
///
/// `Pause` never matches a routine's attachment priority, so routines wait
/// on it indefinitely. `Stop` terminates every routine that checks it.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    FromRepr,
    Serialize,
    Deserialize,
)]
#[repr(u8)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High = 0,
    Normal = 1,
    Background = 5,
    Pause = 10,
    Stop = 100,
}

impl Priority {
    #[inline]
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    #[inline]
    pub fn is_stop(self) -> bool {
        self == Priority::Stop
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn totally_ordered() {
        assert!(Priority::High < Priority::Normal);
        assert!(Priority::Normal < Priority::Background);
        assert!(Priority::Background < Priority::Pause);
        assert!(Priority::Pause < Priority::Stop);
    }

    #[test]
    fn numeric_values_round_trip() {
        for priority in [
            Priority::High,
            Priority::Normal,
            Priority::Background,
            Priority::Pause,
            Priority::Stop,
        ] {
            assert_eq!(Priority::from_repr(priority.as_u8()), Some(priority));
        }
        assert_eq!(Priority::Stop.as_u8(), 100);
        assert_eq!(Priority::from_repr(2), None);
    }

    #[test]
    fn parses_names() {
        assert_eq!(Priority::from_str("background"), Ok(Priority::Background));
        assert_eq!(Priority::from_str("STOP"), Ok(Priority::Stop));
        assert_eq!(Priority::Normal.to_string(), "normal");
    }
}
