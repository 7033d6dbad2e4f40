//! Weekly time-slot grid.
//!
//! A run places sections into recurring weekly slots. The grid is finite:
//! slots start at the opening of the operating window and step by a fixed
//! granularity, and each slot lasts exactly one granularity step, so no two
//! grid slots on the same day overlap. Grid order (day, then start time) is
//! the canonical slot order everywhere in the engine.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{ConfigError, RunConfig};
use crate::index::SlotIdx;
use crate::types::Period;

/// Errors parsing textual slot representations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SlotParseError {
    /// The text did not have the expected shape.
    #[error("invalid {what} '{input}': expected {expected}")]
    Malformed {
        what: &'static str,
        input: String,
        expected: &'static str,
    },

    /// The weekday name was not recognized.
    #[error("unknown weekday '{0}'")]
    UnknownWeekday(String),

    /// The time of day was not `HH:MM`.
    #[error("invalid time of day '{0}': expected HH:MM")]
    InvalidTime(String),

    /// The end of an interval is not after its start.
    #[error("interval '{0}' must end after it starts")]
    EmptyInterval(String),
}

fn parse_time(s: &str) -> Result<NaiveTime, SlotParseError> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M")
        .map_err(|_| SlotParseError::InvalidTime(s.trim().to_string()))
}

fn parse_weekday(s: &str) -> Result<Weekday, SlotParseError> {
    s.trim()
        .parse::<Weekday>()
        .map_err(|_| SlotParseError::UnknownWeekday(s.trim().to_string()))
}

/// Parses `"HH:MM-HH:MM"` into its two ends, rejecting empty intervals.
fn parse_interval(s: &str) -> Result<(NaiveTime, NaiveTime), SlotParseError> {
    let (open, close) = s.split_once('-').ok_or_else(|| SlotParseError::Malformed {
        what: "interval",
        input: s.to_string(),
        expected: "HH:MM-HH:MM",
    })?;
    let open = parse_time(open)?;
    let close = parse_time(close)?;
    if close <= open {
        return Err(SlotParseError::EmptyInterval(s.to_string()));
    }
    Ok((open, close))
}

/// Minutes elapsed since midnight.
pub(crate) fn minute_of_day(t: NaiveTime) -> u32 {
    t.num_seconds_from_midnight() / 60
}

fn time_at_minute(minute: u32) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(minute / 60, minute % 60, 0)
}

/// Sort key placing Monday first.
const fn day_rank(day: Weekday) -> u32 {
    day.num_days_from_monday()
}

/// A recurring weekly start instant, e.g. `Mon 08:00`.
///
/// Professors declare availability as a set of these, and pinned placements
/// name the slot they occupy by its start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SlotStart {
    pub day: Weekday,
    pub start: NaiveTime,
}

impl SlotStart {
    #[must_use]
    pub const fn new(day: Weekday, start: NaiveTime) -> Self {
        Self { day, start }
    }
}

impl Ord for SlotStart {
    fn cmp(&self, other: &Self) -> Ordering {
        day_rank(self.day)
            .cmp(&day_rank(other.day))
            .then_with(|| self.start.cmp(&other.start))
    }
}

impl PartialOrd for SlotStart {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for SlotStart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.day, self.start.format("%H:%M"))
    }
}

impl FromStr for SlotStart {
    type Err = SlotParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (day, time) = s
            .trim()
            .split_once(char::is_whitespace)
            .ok_or_else(|| SlotParseError::Malformed {
                what: "slot start",
                input: s.to_string(),
                expected: "<weekday> HH:MM",
            })?;
        Ok(Self {
            day: parse_weekday(day)?,
            start: parse_time(time)?,
        })
    }
}

impl TryFrom<String> for SlotStart {
    type Error = SlotParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SlotStart> for String {
    fn from(s: SlotStart) -> Self {
        s.to_string()
    }
}

/// One slot of the weekly grid, e.g. `Mon 08:00-10:00`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeSlot {
    pub day: Weekday,
    pub start: NaiveTime,
    pub minutes: u32,
}

impl TimeSlot {
    /// When the slot ends.
    #[must_use]
    pub fn end(&self) -> NaiveTime {
        self.start + Duration::minutes(i64::from(self.minutes))
    }

    /// The part of the day this slot belongs to, by its start time.
    #[must_use]
    pub fn period(&self) -> Period {
        Period::of(self.start)
    }

    /// The weekly instant this slot starts at.
    #[must_use]
    pub const fn starts_at(&self) -> SlotStart {
        SlotStart::new(self.day, self.start)
    }
}

impl Ord for TimeSlot {
    fn cmp(&self, other: &Self) -> Ordering {
        self.starts_at()
            .cmp(&other.starts_at())
            .then_with(|| self.minutes.cmp(&other.minutes))
    }
}

impl PartialOrd for TimeSlot {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}-{}",
            self.day,
            self.start.format("%H:%M"),
            self.end().format("%H:%M")
        )
    }
}

impl FromStr for TimeSlot {
    type Err = SlotParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (day, interval) = s
            .trim()
            .split_once(char::is_whitespace)
            .ok_or_else(|| SlotParseError::Malformed {
                what: "time slot",
                input: s.to_string(),
                expected: "<weekday> HH:MM-HH:MM",
            })?;
        let (start, end) = parse_interval(interval)?;
        Ok(Self {
            day: parse_weekday(day)?,
            start,
            minutes: minute_of_day(end) - minute_of_day(start),
        })
    }
}

impl TryFrom<String> for TimeSlot {
    type Error = SlotParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeSlot> for String {
    fn from(s: TimeSlot) -> Self {
        s.to_string()
    }
}

/// Daily operating-hours window, e.g. `08:00-22:00`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HoursWindow {
    pub open: NaiveTime,
    pub close: NaiveTime,
}

impl HoursWindow {
    /// Length of the window in minutes.
    #[must_use]
    pub fn minutes(&self) -> u32 {
        minute_of_day(self.close).saturating_sub(minute_of_day(self.open))
    }
}

impl fmt::Display for HoursWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}",
            self.open.format("%H:%M"),
            self.close.format("%H:%M")
        )
    }
}

impl FromStr for HoursWindow {
    type Err = SlotParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (open, close) = parse_interval(s.trim())?;
        Ok(Self { open, close })
    }
}

impl TryFrom<String> for HoursWindow {
    type Error = SlotParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HoursWindow> for String {
    fn from(w: HoursWindow) -> Self {
        w.to_string()
    }
}

/// The finite set of weekly slots a run may assign.
#[derive(Debug, Clone)]
pub struct SlotGrid {
    slots: Vec<TimeSlot>,
    by_start: HashMap<SlotStart, SlotIdx>,
}

impl SlotGrid {
    /// Builds the grid described by a run configuration.
    pub fn from_config(config: &RunConfig) -> Result<Self, ConfigError> {
        Self::new(
            &config.days,
            config.operating_hours,
            config.slot_granularity_minutes,
        )
    }

    /// Builds a grid over `days` inside `window`, one slot every
    /// `granularity_minutes`.
    ///
    /// Days are emitted Monday first regardless of input order; repeated days
    /// are ignored. A trailing remainder of the window shorter than one step
    /// produces no slot.
    pub fn new(
        days: &[Weekday],
        window: HoursWindow,
        granularity_minutes: u32,
    ) -> Result<Self, ConfigError> {
        if granularity_minutes == 0 {
            return Err(ConfigError::ZeroGranularity);
        }
        if days.is_empty() {
            return Err(ConfigError::NoDays);
        }
        if window.minutes() < granularity_minutes {
            return Err(ConfigError::WindowTooShort {
                window,
                granularity_minutes,
            });
        }

        let mut days = days.to_vec();
        days.sort_by_key(|d| day_rank(*d));
        days.dedup();

        let open = minute_of_day(window.open);
        let close = minute_of_day(window.close);
        let mut slots = Vec::new();
        for day in days {
            let mut minute = open;
            while minute + granularity_minutes <= close {
                let Some(start) = time_at_minute(minute) else {
                    break;
                };
                slots.push(TimeSlot {
                    day,
                    start,
                    minutes: granularity_minutes,
                });
                minute += granularity_minutes;
            }
        }

        let by_start = slots
            .iter()
            .enumerate()
            .map(|(i, slot)| (slot.starts_at(), SlotIdx::new(i)))
            .collect();
        Ok(Self { slots, by_start })
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// All slots in grid order.
    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    /// The slot at `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx` did not come from this grid.
    pub fn slot(&self, idx: SlotIdx) -> &TimeSlot {
        &self.slots[idx.get()]
    }

    /// Looks up the grid slot starting at `start`.
    pub fn find(&self, start: &SlotStart) -> Option<SlotIdx> {
        self.by_start.get(start).copied()
    }

    /// Iterates slots in grid order together with their indices.
    pub fn iter(&self) -> impl Iterator<Item = (SlotIdx, &TimeSlot)> {
        self.slots
            .iter()
            .enumerate()
            .map(|(i, slot)| (SlotIdx::new(i), slot))
    }
}
