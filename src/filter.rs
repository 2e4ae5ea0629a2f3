use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::calendar::supported_year;
use crate::domain::CalendarItem;
use crate::error::ParseError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum YearFilter {
    #[default]
    All,
    Year(i32),
}

impl YearFilter {
    /// Overlap test: a multi-year item is visible in every year it touches.
    pub fn includes(&self, item: &CalendarItem) -> bool {
        match self {
            YearFilter::All => true,
            YearFilter::Year(year) => item.start_year() <= *year && *year <= item.end_year(),
        }
    }
}

impl Display for YearFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            YearFilter::All => write!(f, "all"),
            YearFilter::Year(year) => write!(f, "{year}"),
        }
    }
}

impl FromStr for YearFilter {
    type Err = ParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            return Ok(YearFilter::All);
        }
        trimmed
            .parse::<i32>()
            .ok()
            .filter(|year| supported_year(*year))
            .map(YearFilter::Year)
            .ok_or_else(|| ParseError::YearFilter(input.to_string()))
    }
}

pub fn filter_items(items: &[CalendarItem], filter: YearFilter) -> Vec<CalendarItem> {
    items
        .iter()
        .filter(|item| filter.includes(item))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, NaiveDate};

    use crate::domain::fixtures::{date, item};

    use super::{YearFilter, filter_items};

    #[test]
    fn keeps_items_overlapping_the_requested_year() {
        let items = vec![
            item("spans", date(2024, 11, 1), date(2026, 2, 1)),
            item("inside", date(2025, 6, 1), date(2025, 6, 2)),
            item("before", date(2024, 1, 1), date(2024, 12, 31)),
        ];

        let visible = filter_items(&items, YearFilter::Year(2025));
        let ids = visible.iter().map(|item| item.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["spans", "inside"]);
        assert_eq!(filter_items(&items, YearFilter::All).len(), 3);
    }

    #[test]
    fn parses_all_and_numeric_years() {
        assert_eq!("all".parse::<YearFilter>().expect("all"), YearFilter::All);
        assert_eq!("2025".parse::<YearFilter>().expect("year"), YearFilter::Year(2025));
        assert!("next".parse::<YearFilter>().is_err());
    }

    #[test]
    fn rejects_years_chrono_cannot_represent() {
        assert!("300000".parse::<YearFilter>().is_err());
        assert!("-300000".parse::<YearFilter>().is_err());
        let last = NaiveDate::MAX.year();
        assert_eq!(last.to_string().parse::<YearFilter>().expect("last year"), YearFilter::Year(last));
    }
}
