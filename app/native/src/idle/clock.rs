//! Idle screen clock strings.

use chrono::NaiveDateTime;
use eyeball::Observable;
use serde::Serialize;

use crate::config::{ClockConfig, DateFormat};
use crate::events::fields;

/// The display strings computed for one instant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClockStrings {
    pub time: String,
    pub date: String,
    pub weekday: String,
    pub month: String,
    pub day: String,
    pub year: String,
}

impl ClockStrings {
    /// Formats `now` according to the clock configuration.
    #[must_use]
    pub fn format(now: &NaiveDateTime, config: &ClockConfig) -> Self {
        let time_pattern = if config.use_24_hour { "%H:%M" } else { "%-I:%M" };
        let date_pattern = match config.date_format {
            DateFormat::Mdy => "%B %-d, %Y",
            DateFormat::Dmy => "%-d %B, %Y",
        };

        Self {
            time: now.format(time_pattern).to_string(),
            date: now.format(date_pattern).to_string(),
            weekday: now.format("%A").to_string(),
            month: now.format("%B").to_string(),
            day: now.format("%-d").to_string(),
            year: now.format("%Y").to_string(),
        }
    }
}

/// Last displayed clock strings.
///
/// Each field is an [`Observable`], so a refresh reports only what changed and
/// subscribers wake only on real updates.
#[derive(Debug)]
pub struct IdleClock {
    pub time: Observable<String>,
    pub date: Observable<String>,
    pub weekday: Observable<String>,
    pub month: Observable<String>,
    pub day: Observable<String>,
    pub year: Observable<String>,
}

impl Default for IdleClock {
    fn default() -> Self { Self::new() }
}

impl IdleClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            time: Observable::new(String::new()),
            date: Observable::new(String::new()),
            weekday: Observable::new(String::new()),
            month: Observable::new(String::new()),
            day: Observable::new(String::new()),
            year: Observable::new(String::new()),
        }
    }

    /// Recomputes the strings for `now`.
    ///
    /// Returns `(field, value)` pairs for the fields whose value changed,
    /// keyed by their view-model names.
    pub fn refresh(
        &mut self,
        now: &NaiveDateTime,
        config: &ClockConfig,
    ) -> Vec<(&'static str, String)> {
        let next = ClockStrings::format(now, config);
        let mut changed = Vec::new();

        for (field, observable, value) in [
            (fields::TIME, &mut self.time, next.time),
            (fields::DATE, &mut self.date, next.date),
            (fields::WEEKDAY, &mut self.weekday, next.weekday),
            (fields::MONTH, &mut self.month, next.month),
            (fields::DAY, &mut self.day, next.day),
            (fields::YEAR, &mut self.year, next.year),
        ] {
            if Observable::set_if_not_eq(observable, value.clone()).is_some() {
                changed.push((field, value));
            }
        }

        changed
    }

    /// All fields with their current values, for a full idle page render.
    #[must_use]
    pub fn snapshot(&self) -> Vec<(&'static str, String)> {
        vec![
            (fields::TIME, Observable::get(&self.time).clone()),
            (fields::DATE, Observable::get(&self.date).clone()),
            (fields::WEEKDAY, Observable::get(&self.weekday).clone()),
            (fields::MONTH, Observable::get(&self.month).clone()),
            (fields::DAY, Observable::get(&self.day).clone()),
            (fields::YEAR, Observable::get(&self.year).clone()),
        ]
    }
}
