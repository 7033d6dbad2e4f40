//! Run configuration.

use std::fmt;

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::slot::HoursWindow;

/// Configuration errors, raised before any allocation is attempted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The slot granularity was zero minutes.
    #[error("slot granularity must be positive")]
    ZeroGranularity,

    /// No teaching days were configured.
    #[error("at least one teaching day must be configured")]
    NoDays,

    /// Not even one slot fits in the operating window.
    #[error("operating window {window} is shorter than one {granularity_minutes}-minute slot")]
    WindowTooShort {
        window: HoursWindow,
        granularity_minutes: u32,
    },
}

/// How strongly a section's desired period shapes its candidate order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodWeighting {
    /// Only slots inside the desired period are candidates.
    Strict,
    /// Capacity fit is decided first; the desired period orders slots
    /// within each room.
    #[default]
    Soft,
    /// Slots inside the desired period are tried in every room before any
    /// slot outside it.
    Dominant,
}

impl PeriodWeighting {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Soft => "soft",
            Self::Dominant => "dominant",
        }
    }
}

impl fmt::Display for PeriodWeighting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Configuration for an allocation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Daily window slots must fit in. Default: 08:00-22:00.
    pub operating_hours: HoursWindow,

    /// Step between slot starts, which is also the slot length.
    /// Default: 120 minutes.
    pub slot_granularity_minutes: u32,

    /// Default: [`PeriodWeighting::Soft`].
    pub period_weighting: PeriodWeighting,

    /// Teaching days. Default: Monday to Friday.
    #[serde(with = "weekday_names")]
    pub days: Vec<Weekday>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            operating_hours: HoursWindow {
                open: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or(NaiveTime::MIN),
                close: NaiveTime::from_hms_opt(22, 0, 0).unwrap_or(NaiveTime::MIN),
            },
            slot_granularity_minutes: 120,
            period_weighting: PeriodWeighting::Soft,
            days: vec![
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
            ],
        }
    }
}

/// Serializes weekdays as their short names ("Mon") and accepts any name
/// `chrono` understands.
mod weekday_names {
    use chrono::Weekday;
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    pub fn serialize<S>(days: &[Weekday], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(days.iter().map(ToString::to_string))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Weekday>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Vec::<String>::deserialize(deserializer)?
            .iter()
            .map(|name| {
                name.parse::<Weekday>()
                    .map_err(|_| D::Error::custom(format!("unknown weekday '{name}'")))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slot::SlotGrid;

    #[test]
    fn test_period_weighting_display_matches_serde_name() {
        for weighting in [
            PeriodWeighting::Strict,
            PeriodWeighting::Soft,
            PeriodWeighting::Dominant,
        ] {
            let json = serde_json::to_string(&weighting).unwrap();
            assert_eq!(json, format!("\"{weighting}\""));
        }
    }

    #[test]
    fn test_default_grid_has_seven_slots_per_weekday() {
        let grid = SlotGrid::from_config(&RunConfig::default()).unwrap();
        assert_eq!(grid.len(), 5 * 7);
        assert_eq!(grid.slots()[0].to_string(), "Mon 08:00-10:00");
        assert_eq!(grid.slots()[34].to_string(), "Fri 20:00-22:00");
    }

    #[test]
    fn test_config_serde_uses_text_forms() {
        let json = serde_json::to_value(RunConfig::default()).unwrap();
        assert_eq!(json["operating_hours"], "08:00-22:00");
        assert_eq!(json["period_weighting"], "soft");
        assert_eq!(json["days"][0], "Mon");
    }

    #[test]
    fn test_partial_config_falls_back_to_defaults() {
        let config: RunConfig =
            serde_json::from_str(r#"{"days": ["saturday"], "slot_granularity_minutes": 60}"#)
                .unwrap();
        assert_eq!(config.days, vec![Weekday::Sat]);
        assert_eq!(config.slot_granularity_minutes, 60);
        assert_eq!(config.operating_hours, RunConfig::default().operating_hours);
        assert_eq!(config.period_weighting, PeriodWeighting::Soft);
    }

    #[test]
    fn test_unknown_weekday_is_rejected() {
        let result: Result<RunConfig, _> = serde_json::from_str(r#"{"days": ["Caturday"]}"#);
        assert!(result.is_err());
    }
}
