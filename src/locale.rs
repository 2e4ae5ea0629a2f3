use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

const SV_MONTHS_SHORT: [&str; 12] = [
    "jan.", "feb.", "mars", "apr.", "maj", "juni", "juli", "aug.", "sep.", "okt.", "nov.", "dec.",
];
const EN_MONTHS_SHORT: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Calendar vocabulary the tick generator needs from a locale.
pub trait DateFormatter {
    /// Short month name for `month` in `1..=12`.
    fn month_short(&self, month: u32) -> String;

    /// Week-number label, e.g. `v12`.
    fn week_number(&self, week: u32) -> String;

    /// Label for the inclusive range `start..=end` of one week.
    fn week_range(&self, start: NaiveDate, end: NaiveDate) -> String {
        if start.month() == end.month() {
            format!("{}–{} {}", start.day(), end.day(), self.month_short(end.month()))
        } else {
            format!(
                "{} {} – {} {}",
                start.day(),
                self.month_short(start.month()),
                end.day(),
                self.month_short(end.month())
            )
        }
    }

    fn day(&self, day: NaiveDate) -> String {
        day.day().to_string()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Sv,
    En,
}

impl DateFormatter for Locale {
    fn month_short(&self, month: u32) -> String {
        let names = match self {
            Locale::Sv => &SV_MONTHS_SHORT,
            Locale::En => &EN_MONTHS_SHORT,
        };
        names
            .get(month.saturating_sub(1) as usize)
            .copied()
            .unwrap_or("?")
            .to_string()
    }

    fn week_number(&self, week: u32) -> String {
        match self {
            Locale::Sv => format!("v{week}"),
            Locale::En => format!("W{week}"),
        }
    }
}

impl Display for Locale {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Locale::Sv => write!(f, "sv"),
            Locale::En => write!(f, "en"),
        }
    }
}

impl FromStr for Locale {
    type Err = ParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let lowered = input.trim().to_ascii_lowercase();
        match lowered.split(['-', '_']).next().unwrap_or_default() {
            "sv" => Ok(Locale::Sv),
            "en" => Ok(Locale::En),
            _ => Err(ParseError::Locale(input.to_string())),
        }
    }
}

/// How week ticks are labelled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekDisplay {
    #[default]
    Number,
    Range,
}

impl FromStr for WeekDisplay {
    type Err = ParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_ascii_lowercase().as_str() {
            "number" | "numbers" => Ok(WeekDisplay::Number),
            "range" | "dates" => Ok(WeekDisplay::Range),
            _ => Err(ParseError::WeekDisplay(input.to_string())),
        }
    }
}
