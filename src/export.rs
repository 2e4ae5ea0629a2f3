use std::collections::HashSet;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::calendar::{first_day_of_month, last_day_of_month, parse_month, year_end, year_start};
use crate::consolidate::ConsolidatedItem;
use crate::domain::{Group, WheelStructure};
use crate::error::ParseError;
use crate::grouping::{GroupBy, GroupedItems, group_info};

/// Date window an export covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportRange {
	/// Whole months around the items actually present.
	#[default]
	Smart,
	/// Whatever the timeline currently shows.
	Current,
	/// Every year that has a page.
	FullYear,
	/// Whole months from `from` through `to`.
	Custom { from: NaiveDate, to: NaiveDate },
}

impl ExportRange {
	/// Parses a mode name; `custom` needs both `YYYY-MM` bounds.
	pub fn parse(mode: &str, from: Option<&str>, to: Option<&str>) -> Result<Self, ParseError> {
		match mode.trim().to_ascii_lowercase().as_str() {
			"smart" => Ok(ExportRange::Smart),
			"current" => Ok(ExportRange::Current),
			"full" | "full-year" => Ok(ExportRange::FullYear),
			"custom" => {
				let month = |raw: Option<&str>| {
					let raw = raw.unwrap_or_default();
					parse_month(raw).ok_or_else(|| ParseError::Month(raw.to_string()))
				};
				Ok(ExportRange::Custom {
					from: month(from)?,
					to: month(to)?,
				})
			}
			_ => Err(ParseError::ExportRange(mode.to_string())),
		}
	}
}

impl FromStr for ExportRange {
	type Err = ParseError;

	fn from_str(input: &str) -> Result<Self, Self::Err> {
		ExportRange::parse(input, None, None)
	}
}

/// Resolves an export range to inclusive dates. `view` is the current
/// timeline window and the fallback when there is nothing to measure.
pub fn resolve_export_range(
	range: ExportRange,
	items: &[ConsolidatedItem],
	available_years: &[i32],
	view: (NaiveDate, NaiveDate),
) -> (NaiveDate, NaiveDate) {
	match range {
		ExportRange::Smart => {
			let min_start = items.iter().map(ConsolidatedItem::start_date).min();
			let max_end = items.iter().map(ConsolidatedItem::end_date).max();
			match (min_start, max_end) {
				(Some(start), Some(end)) => (first_day_of_month(start), last_day_of_month(end)),
				_ => view,
			}
		}
		ExportRange::Current => view,
		ExportRange::FullYear => {
			let first = available_years.iter().min().copied().unwrap_or(view.0.year());
			let last = available_years.iter().max().copied().unwrap_or(view.1.year());
			(year_start(first), year_end(last))
		}
		ExportRange::Custom { from, to } => {
			let (from, to) = if from <= to { (from, to) } else { (to, from) };
			(first_day_of_month(from), last_day_of_month(to))
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
	pub group: String,
	pub name: String,
	pub start_date: NaiveDate,
	pub end_date: NaiveDate,
	pub ring: String,
	pub activity_group: String,
	pub label: String,
}

/// Flattens grouped rows overlapping `range` into table rows, group by group.
pub fn export_rows(
	grouped: &GroupedItems,
	structure: &WheelStructure,
	group_by: GroupBy,
	range: (NaiveDate, NaiveDate),
) -> Vec<ExportRow> {
	let mut rows = Vec::new();
	for (key, items) in grouped {
		let group = group_info(key, structure, group_by).name;
		for item in items.iter().filter(|item| item.item.overlaps(range.0, range.1)) {
			rows.push(ExportRow {
				group: group.clone(),
				name: item.item.name.clone(),
				start_date: item.start_date(),
				end_date: item.end_date(),
				ring: name_or(structure.ring(&item.item.ring_id), "Unknown"),
				activity_group: name_or(structure.activity_group(&item.item.activity_id), "Unknown"),
				label: name_or(
					item.item.label_id.as_deref().and_then(|id| structure.label(id)),
					"",
				),
			});
		}
	}
	rows
}

/// Visible activity groups that at least one item uses, in registry order.
pub fn legend<'a>(items: &[ConsolidatedItem], structure: &'a WheelStructure) -> Vec<&'a Group> {
	let used = items
		.iter()
		.map(|item| item.item.activity_id.as_str())
		.collect::<HashSet<_>>();
	structure
		.activity_groups
		.iter()
		.filter(|group| group.visible && used.contains(group.id.as_str()))
		.collect()
}

fn name_or(group: Option<&Group>, fallback: &str) -> String {
	group
		.map(|group| group.name.clone())
		.unwrap_or_else(|| fallback.to_string())
}
