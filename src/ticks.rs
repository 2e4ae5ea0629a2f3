use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::calendar::{first_day_of_month, midnight, next_month_start, start_of_week};
use crate::locale::{DateFormatter, WeekDisplay};
use crate::time_scale::TimeScale;
use crate::zoom::ZoomLevel;

/// One labelled axis segment. `x`/`width` are clipped to the view, `anchor`
/// is the unclipped start of the period the tick stands for.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tick {
    pub anchor: NaiveDate,
    pub label: String,
    pub secondary: Option<String>,
    pub x: f64,
    pub width: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOptions {
    pub week_display: WeekDisplay,
    /// Force the year on ticks, e.g. when every year is selected.
    pub show_year: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TickSet {
    pub ticks: Vec<Tick>,
    /// Month row above the day numbers; only produced at day zoom.
    pub month_spans: Option<Vec<Tick>>,
}

impl TickSet {
    pub fn total_width(&self) -> f64 {
        self.ticks.iter().map(|tick| tick.width).sum()
    }
}

/// Builds the axis for `zoom`. Ticks partition the view contiguously, so
/// their widths add up to the scale's full pixel width.
pub fn generate_ticks(
    scale: &TimeScale,
    zoom: ZoomLevel,
    formatter: &dyn DateFormatter,
    options: TickOptions,
) -> TickSet {
    let show_year = options.show_year || scale.spans_multiple_years();

    match zoom {
        ZoomLevel::Month => TickSet {
            ticks: month_ticks(scale, formatter, show_year),
            month_spans: None,
        },
        ZoomLevel::Week => {
            let ticks = periods(scale, start_of_week, |day| day.checked_add_signed(Duration::days(7)))
                .into_iter()
                .map(|period| {
                    let iso = period.start.iso_week();
                    let label = match options.week_display {
                        WeekDisplay::Number => formatter.week_number(iso.week()),
                        WeekDisplay::Range => formatter.week_range(period.start, period.last_day()),
                    };
                    period.into_tick(label, show_year.then(|| two_digit_year(iso.year())))
                })
                .collect();
            TickSet {
                ticks,
                month_spans: None,
            }
        }
        ZoomLevel::Day => {
            let ticks = periods(scale, |day| day, |day| day.succ_opt())
                .into_iter()
                .map(|period| {
                    let label = formatter.day(period.start);
                    period.into_tick(label, None)
                })
                .collect();
            TickSet {
                ticks,
                month_spans: Some(month_ticks(scale, formatter, show_year)),
            }
        }
    }
}

fn month_ticks(scale: &TimeScale, formatter: &dyn DateFormatter, show_year: bool) -> Vec<Tick> {
    periods(scale, first_day_of_month, next_month_start)
        .into_iter()
        .map(|period| {
            let label = formatter.month_short(period.start.month());
            let secondary = show_year.then(|| two_digit_year(period.start.year()));
            period.into_tick(label, secondary)
        })
        .collect()
}

struct Period {
    start: NaiveDate,
    /// Start of the following period; `None` past the last representable day.
    next: Option<NaiveDate>,
    x: f64,
    width: f64,
}

impl Period {
    fn last_day(&self) -> NaiveDate {
        self.next
            .and_then(|next| next.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }

    fn into_tick(self, label: String, secondary: Option<String>) -> Tick {
        Tick {
            anchor: self.start,
            label,
            secondary,
            x: self.x,
            width: self.width,
        }
    }
}

/// Walks consecutive periods covering the view, clipping the first and last
/// to the view edges and skipping periods that end up empty. A period with no
/// successor runs to the view end.
fn periods(
    scale: &TimeScale,
    align: impl Fn(NaiveDate) -> NaiveDate,
    advance: impl Fn(NaiveDate) -> Option<NaiveDate>,
) -> Vec<Period> {
    let view_start = scale.view_start();
    let view_end = scale.view_end();
    let mut cursor = align(view_start.date());
    let mut out = Vec::new();

    while midnight(cursor) < view_end {
        let next = advance(cursor);
        let clipped_start = midnight(cursor).max(view_start);
        let clipped_end = next.map_or(view_end, |next| midnight(next).min(view_end));
        if clipped_end > clipped_start {
            let x = scale.date_to_x(clipped_start);
            out.push(Period {
                start: cursor,
                next,
                x,
                width: scale.date_to_x(clipped_end) - x,
            });
        }
        match next {
            Some(next) => cursor = next,
            None => break,
        }
    }

    out
}

fn two_digit_year(year: i32) -> String {
    format!("{:02}", year.rem_euclid(100))
}
