use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime};

pub fn midnight(day: NaiveDate) -> NaiveDateTime {
	NaiveDateTime::new(day, NaiveTime::MIN)
}

/// Years chrono can represent as whole calendar years.
pub fn supported_year(year: i32) -> bool {
	(NaiveDate::MIN.year()..=NaiveDate::MAX.year()).contains(&year)
}

/// Jan 1 of `year`, with `year` clamped to the representable range.
pub fn year_start(year: i32) -> NaiveDate {
	let year = year.clamp(NaiveDate::MIN.year(), NaiveDate::MAX.year());
	NaiveDate::from_ymd_opt(year, 1, 1).expect("january first of a clamped year must be valid")
}

/// Dec 31 of `year`, with `year` clamped to the representable range.
pub fn year_end(year: i32) -> NaiveDate {
	let year = year.clamp(NaiveDate::MIN.year(), NaiveDate::MAX.year());
	NaiveDate::from_ymd_opt(year, 12, 31).expect("december last of a clamped year must be valid")
}

/// Midnight starting `year` up to midnight starting the next one.
pub fn year_bounds(year: i32) -> (NaiveDateTime, NaiveDateTime) {
	let end = year_end(year)
		.succ_opt()
		.map(midnight)
		.unwrap_or(NaiveDateTime::MAX);
	(midnight(year_start(year)), end)
}

pub fn first_day_of_month(day: NaiveDate) -> NaiveDate {
	day.with_day(1).expect("first day of month must be valid")
}

/// `None` in the last representable month.
pub fn next_month_start(day: NaiveDate) -> Option<NaiveDate> {
	first_day_of_month(day).checked_add_months(Months::new(1))
}

pub fn last_day_of_month(day: NaiveDate) -> NaiveDate {
	match next_month_start(day) {
		Some(next) => next - Duration::days(1),
		None => NaiveDate::MAX,
	}
}

pub fn start_of_week(day: NaiveDate) -> NaiveDate {
	let days_from_monday = day.weekday().num_days_from_monday() as i64;
	day.checked_sub_signed(Duration::days(days_from_monday))
		.unwrap_or(NaiveDate::MIN)
}

/// Parses `YYYY-MM` into the first day of that month.
pub fn parse_month(input: &str) -> Option<NaiveDate> {
	NaiveDate::parse_from_str(&format!("{}-01", input.trim()), "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
	use crate::domain::fixtures::date;

	use chrono::{Datelike, NaiveDate, NaiveDateTime};

	use crate::calendar::midnight;

	use super::{
		last_day_of_month, next_month_start, parse_month, start_of_week, supported_year, year_bounds,
		year_end, year_start,
	};

	#[test]
	fn month_boundaries_handle_leap_years_and_december() {
		assert_eq!(last_day_of_month(date(2024, 2, 10)), date(2024, 2, 29));
		assert_eq!(last_day_of_month(date(2025, 2, 10)), date(2025, 2, 28));
		assert_eq!(next_month_start(date(2024, 12, 31)), Some(date(2025, 1, 1)));
	}

	#[test]
	fn weeks_start_on_monday() {
		// 2025-01-05 is a Sunday.
		assert_eq!(start_of_week(date(2025, 1, 5)), date(2024, 12, 30));
		assert_eq!(start_of_week(date(2025, 1, 6)), date(2025, 1, 6));
	}

	#[test]
	fn parses_year_month() {
		assert_eq!(parse_month("2025-03"), Some(date(2025, 3, 1)));
		assert_eq!(parse_month("2025-13"), None);
	}

	#[test]
	fn year_bounds_clamp_to_the_representable_range() {
		assert_eq!(year_bounds(2025), (midnight(date(2025, 1, 1)), midnight(date(2026, 1, 1))));

		assert!(supported_year(2025));
		assert!(!supported_year(300_000));
		assert_eq!(year_start(300_000).year(), NaiveDate::MAX.year());
		assert_eq!(year_end(i32::MIN).year(), NaiveDate::MIN.year());

		let (start, end) = year_bounds(i32::MAX);
		assert_eq!(start, midnight(year_start(NaiveDate::MAX.year())));
		assert_eq!(end, NaiveDateTime::MAX);
	}

	#[test]
	fn month_and_week_math_saturate_at_the_edges() {
		assert_eq!(last_day_of_month(NaiveDate::MAX), NaiveDate::MAX);
		assert_eq!(next_month_start(NaiveDate::MAX), None);
		assert!(start_of_week(NaiveDate::MIN) >= NaiveDate::MIN);
	}
}
