use std::collections::{HashMap, HashSet};

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::calendar::{year_end, year_start};
use crate::domain::CalendarItem;
use crate::error::{Irregularity, SplitError};

/// Longest forward or backward extension a single split may produce.
const MAX_EXTRA_YEARS: i32 = 10;

/// A calendar item as shown on the timeline. Cross-year segments are merged
/// into one record spanning every segment; standalone items carry their own id.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsolidatedItem {
    #[serde(flatten)]
    pub item: CalendarItem,
    pub segment_ids: Vec<String>,
}

impl ConsolidatedItem {
    pub fn standalone(item: CalendarItem) -> Self {
        let segment_ids = vec![item.id.clone()];
        Self { item, segment_ids }
    }

    pub fn id(&self) -> &str {
        &self.item.id
    }

    pub fn start_date(&self) -> NaiveDate {
        self.item.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.item.end_date
    }

    pub fn is_cross_year(&self) -> bool {
        self.segment_ids.len() > 1 || self.item.start_year() != self.item.end_year()
    }

    /// Part of the item's span inside `[start, end]`, if any.
    pub fn clipped_to(&self, start: NaiveDate, end: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
        let clipped_start = self.item.start_date.max(start);
        let clipped_end = self.item.end_date.min(end);
        (clipped_start <= clipped_end).then_some((clipped_start, clipped_end))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Consolidation {
    pub items: Vec<ConsolidatedItem>,
    pub irregularities: Vec<Irregularity>,
}

/// Merges cross-year segments present in `visible`, using every segment of the
/// group found in `all` (not only the visible ones) to compute the full span.
pub fn consolidate(visible: &[CalendarItem], all: &[CalendarItem]) -> Consolidation {
    let mut segments_by_group: HashMap<&str, Vec<&CalendarItem>> = HashMap::new();
    for item in all {
        if let Some(group_id) = item.cross_year_group_id.as_deref() {
            segments_by_group.entry(group_id).or_default().push(item);
        }
    }

    let mut emitted = HashSet::new();
    let mut consolidation = Consolidation::default();

    for item in visible {
        let Some(group_id) = item.cross_year_group_id.as_deref() else {
            consolidation
                .items
                .push(ConsolidatedItem::standalone(item.clone()));
            continue;
        };

        match segments_by_group.get(group_id) {
            Some(segments) => {
                if emitted.insert(group_id) {
                    consolidation.items.push(merge_segments(segments));
                }
            }
            None => {
                tracing::debug!(item = %item.id, group = group_id, "cross-year group has no segments, keeping item standalone");
                consolidation
                    .irregularities
                    .push(Irregularity::IncompleteCrossYearGroup {
                        item_id: item.id.clone(),
                        group_id: group_id.to_string(),
                    });
                consolidation
                    .items
                    .push(ConsolidatedItem::standalone(item.clone()));
            }
        }
    }

    consolidation
}

fn merge_segments(segments: &[&CalendarItem]) -> ConsolidatedItem {
    let mut ordered = segments.to_vec();
    ordered.sort_by(|left, right| {
        left.start_date
            .cmp(&right.start_date)
            .then_with(|| left.id.cmp(&right.id))
    });

    let template = ordered[0];
    let end_date = ordered
        .iter()
        .map(|segment| segment.end_date)
        .max()
        .unwrap_or(template.end_date);

    ConsolidatedItem {
        item: CalendarItem {
            end_date,
            ..template.clone()
        },
        segment_ids: ordered.iter().map(|segment| segment.id.clone()).collect(),
    }
}

/// Extends `item` to `new_end`, cutting the extension into one segment per
/// following year. Every segment shares the item's cross-year group id, or a
/// fresh one from `next_id` if the item had none. The first returned item is
/// the original, clamped to the end of its own year.
pub fn split_across_years(
    item: &CalendarItem,
    new_end: NaiveDate,
    mut next_id: impl FnMut() -> String,
) -> Result<Vec<CalendarItem>, SplitError> {
    if new_end < item.start_date {
        return Err(SplitError::EndBeforeStart {
            start: item.start_date,
            new_end,
        });
    }

    let year = item.start_date.year();
    if new_end.year() == year {
        return Ok(vec![CalendarItem {
            end_date: new_end,
            ..item.clone()
        }]);
    }

    let extra_years = new_end.year() - year;
    if extra_years > MAX_EXTRA_YEARS {
        return Err(SplitError::TooManyYears(extra_years));
    }

    let group_id = item.cross_year_group_id.clone().unwrap_or_else(&mut next_id);
    let mut segments = vec![CalendarItem {
        end_date: year_end(year),
        cross_year_group_id: Some(group_id.clone()),
        ..item.clone()
    }];

    for segment_year in (year + 1)..=new_end.year() {
        segments.push(CalendarItem {
            id: next_id(),
            start_date: year_start(segment_year),
            end_date: new_end.min(year_end(segment_year)),
            cross_year_group_id: Some(group_id.clone()),
            page_year: segment_year,
            ..item.clone()
        });
    }

    Ok(segments)
}

/// Mirror of [`split_across_years`] for extending an item into earlier years.
/// Segments are returned in date order, so the original item comes last.
pub fn split_backwards(
    item: &CalendarItem,
    new_start: NaiveDate,
    mut next_id: impl FnMut() -> String,
) -> Result<Vec<CalendarItem>, SplitError> {
    if new_start > item.end_date {
        return Err(SplitError::StartAfterEnd {
            end: item.end_date,
            new_start,
        });
    }

    let year = item.end_date.year();
    if new_start.year() == year {
        return Ok(vec![CalendarItem {
            start_date: new_start,
            ..item.clone()
        }]);
    }

    let extra_years = year - new_start.year();
    if extra_years > MAX_EXTRA_YEARS {
        return Err(SplitError::TooManyYears(extra_years));
    }

    let group_id = item.cross_year_group_id.clone().unwrap_or_else(&mut next_id);
    let mut segments = Vec::new();
    for segment_year in new_start.year()..year {
        segments.push(CalendarItem {
            id: next_id(),
            start_date: new_start.max(year_start(segment_year)),
            end_date: year_end(segment_year),
            cross_year_group_id: Some(group_id.clone()),
            page_year: segment_year,
            ..item.clone()
        });
    }
    segments.push(CalendarItem {
        start_date: year_start(year),
        cross_year_group_id: Some(group_id),
        ..item.clone()
    });

    Ok(segments)
}
