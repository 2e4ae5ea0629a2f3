//! Gantt timeline engine for year-wheel calendars.
//!
//! Items live on per-year pages and may be split into linked cross-year
//! segments. The pipeline flattens pages, filters by year, merges linked
//! segments back into one bar and buckets the result by ring, label or
//! activity group. [`TimeScale`] and [`generate_ticks`] map the result onto
//! pixels; [`compute_layout`] stacks the rows.

pub mod aggregate;
pub mod calendar;
pub mod config;
pub mod consolidate;
pub mod domain;
pub mod error;
pub mod export;
pub mod filter;
pub mod gantt;
pub mod grouping;
pub mod layout;
pub mod locale;
pub mod scroll;
pub mod session;
pub mod storage;
pub mod ticks;
pub mod time_scale;
pub mod zoom;

pub use consolidate::{ConsolidatedItem, consolidate, split_across_years, split_backwards};
pub use domain::{CalendarItem, Group, Page, Wheel, WheelStructure};
pub use error::{Irregularity, ParseError, SplitError};
pub use filter::YearFilter;
pub use gantt::{GanttData, consolidate_and_group};
pub use grouping::{GroupBy, GroupKey, GroupedItems};
pub use layout::{GanttLayout, LayoutMetrics, compute_layout, place_bars};
pub use locale::{DateFormatter, Locale, WeekDisplay};
pub use scroll::{HeaderFollower, ScrollSync};
pub use session::GanttSession;
pub use ticks::{Tick, TickOptions, TickSet, generate_ticks};
pub use time_scale::{TimeScale, snap_date};
pub use zoom::ZoomLevel;
