use std::collections::HashSet;

use chrono::{Datelike, NaiveDate, NaiveDateTime};

use crate::calendar::year_bounds;
use crate::config::GanttConfig;
use crate::domain::{Page, WheelStructure};
use crate::filter::YearFilter;
use crate::gantt::{GanttData, consolidate_and_group};
use crate::grouping::{GroupBy, GroupKey};
use crate::layout::{BarPlacement, GanttLayout, LayoutMetrics, compute_layout, place_bars};
use crate::locale::{Locale, WeekDisplay};
use crate::ticks::{TickOptions, TickSet, generate_ticks};
use crate::time_scale::TimeScale;
use crate::zoom::ZoomLevel;

/// Toolbar and viewport state of one Gantt view, with memoized derived data.
#[derive(Debug, Clone)]
pub struct GanttSession {
	year_filter: YearFilter,
	group_by: GroupBy,
	expanded: HashSet<GroupKey>,
	selected_item: Option<String>,
	view_start: NaiveDateTime,
	view_end: NaiveDateTime,
	zoom: ZoomLevel,
	container_width: f64,
	locale: Locale,
	week_display: WeekDisplay,
	metrics: LayoutMetrics,
	data: Memo<DataInputs, GanttData>,
	scale: Memo<ViewKey, TimeScale>,
	ticks: Memo<(ViewKey, TickOptions, Locale), TickSet>,
	layout: Memo<(u64, HashSet<GroupKey>, LayoutMetrics), GanttLayout>,
}

impl GanttSession {
	/// Fresh session showing the calendar year of `today`.
	pub fn new(today: NaiveDate, config: &GanttConfig) -> Self {
		let (view_start, view_end) = year_bounds(today.year());
		Self {
			year_filter: YearFilter::All,
			group_by: GroupBy::Rings,
			expanded: HashSet::new(),
			selected_item: None,
			view_start,
			view_end,
			zoom: config.zoom,
			container_width: config.container_width,
			locale: config.locale,
			week_display: config.week_display,
			metrics: config.layout,
			data: Memo::default(),
			scale: Memo::default(),
			ticks: Memo::default(),
			layout: Memo::default(),
		}
	}

	pub fn year_filter(&self) -> YearFilter {
		self.year_filter
	}

	pub fn group_by(&self) -> GroupBy {
		self.group_by
	}

	pub fn zoom(&self) -> ZoomLevel {
		self.zoom
	}

	pub fn view(&self) -> (NaiveDateTime, NaiveDateTime) {
		(self.view_start, self.view_end)
	}

	pub fn selected_item(&self) -> Option<&str> {
		self.selected_item.as_deref()
	}

	pub fn is_expanded(&self, key: &GroupKey) -> bool {
		self.expanded.contains(key)
	}

	/// Picking a single year also moves the view onto it; `All` keeps the view.
	pub fn set_year_filter(&mut self, filter: YearFilter) {
		self.year_filter = filter;
		if let YearFilter::Year(year) = filter {
			(self.view_start, self.view_end) = year_bounds(year);
		}
	}

	/// Switching dimension collapses every group.
	pub fn set_group_by(&mut self, group_by: GroupBy) {
		self.group_by = group_by;
		self.expanded.clear();
	}

	pub fn toggle_group(&mut self, key: GroupKey) {
		if !self.expanded.remove(&key) {
			self.expanded.insert(key);
		}
	}

	/// Expands every group currently present in the grouped view.
	pub fn expand_all(&mut self, pages: &[Page], structure: &WheelStructure) {
		let keys = self
			.data(pages, structure)
			.grouped_items
			.keys()
			.cloned()
			.collect::<Vec<_>>();
		self.expanded.extend(keys);
	}

	pub fn select_item(&mut self, item_id: Option<String>) {
		self.selected_item = item_id;
	}

	pub fn zoom_in(&mut self) {
		self.zoom = self.zoom.zoom_in();
	}

	pub fn zoom_out(&mut self) {
		self.zoom = self.zoom.zoom_out();
	}

	/// Jumps the view to the calendar year containing `today`.
	pub fn today(&mut self, today: NaiveDate) {
		(self.view_start, self.view_end) = year_bounds(today.year());
	}

	pub fn set_viewport(&mut self, start: NaiveDateTime, end: NaiveDateTime) {
		self.view_start = start;
		self.view_end = end;
	}

	pub fn set_container_width(&mut self, width: f64) {
		self.container_width = width;
	}

	pub fn data(&mut self, pages: &[Page], structure: &WheelStructure) -> &GanttData {
		let (year_filter, group_by) = (self.year_filter, self.group_by);
		refresh_data(&mut self.data, pages, structure, year_filter, group_by).1
	}

	pub fn scale(&mut self) -> &TimeScale {
		let key = self.view_key();
		self.scale
			.get_or_insert_with(key, || TimeScale::new(key.start, key.end, key.width(), key.zoom))
			.1
	}

	/// Axis ticks in the session's locale. Years are shown whenever every
	/// year is selected.
	pub fn ticks(&mut self) -> &TickSet {
		let key = self.view_key();
		let options = TickOptions {
			week_display: self.week_display,
			show_year: self.year_filter == YearFilter::All,
		};
		let locale = self.locale;
		let (_, scale) = self
			.scale
			.get_or_insert_with(key, || TimeScale::new(key.start, key.end, key.width(), key.zoom));
		self.ticks
			.get_or_insert_with((key, options, locale), || generate_ticks(scale, key.zoom, &locale, options))
			.1
	}

	pub fn layout(&mut self, pages: &[Page], structure: &WheelStructure) -> &GanttLayout {
		let (year_filter, group_by) = (self.year_filter, self.group_by);
		let (generation, data) = refresh_data(&mut self.data, pages, structure, year_filter, group_by);
		let expanded = &self.expanded;
		let metrics = self.metrics;
		self.layout
			.get_or_insert_with((generation, expanded.clone(), metrics), || {
				compute_layout(&data.grouped_items, expanded, &metrics)
			})
			.1
	}

	/// Position of the "today" line, hidden when `now` is outside the view.
	pub fn today_marker(&mut self, now: NaiveDateTime) -> Option<f64> {
		self.scale().marker_x(now)
	}

	/// Bars for every expanded row under the current view.
	pub fn bars(&mut self, pages: &[Page], structure: &WheelStructure) -> Vec<BarPlacement> {
		let layout = self.layout(pages, structure).clone();
		let scale = self.scale().clone();
		let grouped = &self.data(pages, structure).grouped_items;
		place_bars(&layout, grouped, &scale)
	}

	fn view_key(&self) -> ViewKey {
		ViewKey {
			start: self.view_start,
			end: self.view_end,
			width_bits: self.container_width.to_bits(),
			zoom: self.zoom,
		}
	}
}

/// Recomputes the grouped data only when the inputs differ from the cached ones.
fn refresh_data<'a>(
	memo: &'a mut Memo<DataInputs, GanttData>,
	pages: &[Page],
	structure: &WheelStructure,
	year_filter: YearFilter,
	group_by: GroupBy,
) -> (u64, &'a GanttData) {
	memo.get_or_refresh(
		|inputs| inputs.matches(pages, structure, year_filter, group_by),
		|| {
			let inputs = DataInputs {
				pages: pages.to_vec(),
				structure: structure.clone(),
				year_filter,
				group_by,
			};
			(inputs, consolidate_and_group(pages, structure, year_filter, group_by))
		},
	)
}

/// Owned copy of what the grouped data was computed from.
#[derive(Debug, Clone)]
struct DataInputs {
	pages: Vec<Page>,
	structure: WheelStructure,
	year_filter: YearFilter,
	group_by: GroupBy,
}

impl DataInputs {
	fn matches(&self, pages: &[Page], structure: &WheelStructure, year_filter: YearFilter, group_by: GroupBy) -> bool {
		self.year_filter == year_filter
			&& self.group_by == group_by
			&& self.structure == *structure
			&& self.pages == pages
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ViewKey {
	start: NaiveDateTime,
	end: NaiveDateTime,
	width_bits: u64,
	zoom: ZoomLevel,
}

impl ViewKey {
	fn width(&self) -> f64 {
		f64::from_bits(self.width_bits)
	}
}

/// Single-entry cache: keeps the last value and the key it was computed for.
/// `generation` counts recomputations so dependent caches can key on it.
#[derive(Debug, Clone)]
struct Memo<K, V> {
	entry: Option<(K, V)>,
	generation: u64,
}

impl<K, V> Default for Memo<K, V> {
	fn default() -> Self {
		Self {
			entry: None,
			generation: 0,
		}
	}
}

impl<K, V> Memo<K, V> {
	fn get_or_refresh(&mut self, fresh: impl Fn(&K) -> bool, compute: impl FnOnce() -> (K, V)) -> (u64, &V) {
		let entry = match self.entry.take() {
			Some(entry) if fresh(&entry.0) => entry,
			_ => {
				self.generation += 1;
				compute()
			}
		};
		(self.generation, &self.entry.insert(entry).1)
	}
}

impl<K: PartialEq, V> Memo<K, V> {
	fn get_or_insert_with(&mut self, key: K, compute: impl FnOnce() -> V) -> (u64, &V) {
		let entry = match self.entry.take() {
			Some((cached, value)) if cached == key => (cached, value),
			_ => {
				self.generation += 1;
				(key, compute())
			}
		};
		(self.generation, &self.entry.insert(entry).1)
	}
}
