use chrono::{NaiveDate, NaiveDateTime};

/// Calendar-data irregularities the engine recovers from on its own.
///
/// None of these abort a computation. They are collected next to the derived
/// output so callers that care about completeness can inspect them.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Irregularity {
    /// View end was not after view start, or the container width was not positive.
    #[error("degenerate view range {start} .. {end} at {container_width}px, clamped")]
    DegenerateRange {
        start: NaiveDateTime,
        end: NaiveDateTime,
        container_width: f64,
    },
    /// Ring or activity-group id missing from the registry; item left out of the grouped view.
    #[error("item {item_id} references unknown group {group_id}")]
    UnresolvedGroupReference { item_id: String, group_id: String },
    /// Label id missing from the registry; item placed in the unlabeled bucket.
    #[error("item {item_id} references unknown label {label_id}")]
    UnresolvedLabelReference { item_id: String, label_id: String },
    /// A cross-year group id had no segments in the full item set.
    #[error("cross-year group {group_id} of item {item_id} has no known segments")]
    IncompleteCrossYearGroup { item_id: String, group_id: String },
}

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("invalid year filter `{0}`: expected `all` or a year")]
    YearFilter(String),
    #[error("invalid grouping `{0}`: expected rings, labels or activity-groups")]
    GroupBy(String),
    #[error("invalid zoom level `{0}`: expected month, week or day")]
    ZoomLevel(String),
    #[error("unsupported locale `{0}`: expected sv or en")]
    Locale(String),
    #[error("invalid week display `{0}`: expected number or range")]
    WeekDisplay(String),
    #[error("invalid export range `{0}`: expected smart, current, full-year or custom")]
    ExportRange(String),
    #[error("invalid month `{0}`: expected YYYY-MM")]
    Month(String),
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SplitError {
    #[error("item not found: {0}")]
    UnknownItem(String),
    #[error("new end {new_end} is before item start {start}")]
    EndBeforeStart { start: NaiveDate, new_end: NaiveDate },
    #[error("new start {new_start} is after item end {end}")]
    StartAfterEnd { end: NaiveDate, new_start: NaiveDate },
    #[error("extension spans {0} years, more than the supported maximum")]
    TooManyYears(i32),
}
