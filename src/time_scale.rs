use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};

use crate::calendar::{first_day_of_month, midnight, start_of_week};
use crate::error::Irregularity;
use crate::zoom::ZoomLevel;

const MS_PER_DAY: f64 = 86_400_000.0;
const MIN_CONTAINER_WIDTH: f64 = 1.0;

/// Linear mapping between timestamps and horizontal pixels for one view.
///
/// Degenerate inputs are clamped rather than rejected: a range that is not
/// positive becomes one day long, and a width that is not positive becomes
/// one pixel. The clamp is recorded in [`TimeScale::irregularity`].
#[derive(Debug, Clone, PartialEq)]
pub struct TimeScale {
    view_start: NaiveDateTime,
    view_end: NaiveDateTime,
    container_width: f64,
    zoom: ZoomLevel,
    total_days: f64,
    pixels_per_day: f64,
    irregularity: Option<Irregularity>,
}

impl TimeScale {
    pub fn new(view_start: NaiveDateTime, view_end: NaiveDateTime, container_width: f64, zoom: ZoomLevel) -> Self {
        let mut total_days = (view_end - view_start).num_milliseconds() as f64 / MS_PER_DAY;
        let width_ok = container_width.is_finite() && container_width > 0.0;
        let irregularity = (total_days <= 0.0 || !width_ok).then(|| Irregularity::DegenerateRange {
            start: view_start,
            end: view_end,
            container_width,
        });
        if let Some(irregularity) = &irregularity {
            tracing::debug!(%irregularity, "clamping time scale");
        }

        let view_end = if total_days <= 0.0 {
            total_days = 1.0;
            view_start
                .checked_add_signed(Duration::days(1))
                .unwrap_or(NaiveDateTime::MAX)
        } else {
            view_end
        };
        let container_width = if width_ok { container_width } else { MIN_CONTAINER_WIDTH };

        Self {
            view_start,
            view_end,
            container_width,
            zoom,
            total_days,
            pixels_per_day: container_width / total_days,
            irregularity,
        }
    }

    /// Scale over whole days, `start` and `end` taken at midnight.
    pub fn for_dates(start: NaiveDate, end: NaiveDate, container_width: f64, zoom: ZoomLevel) -> Self {
        Self::new(midnight(start), midnight(end), container_width, zoom)
    }

    pub fn view_start(&self) -> NaiveDateTime {
        self.view_start
    }

    pub fn view_end(&self) -> NaiveDateTime {
        self.view_end
    }

    pub fn container_width(&self) -> f64 {
        self.container_width
    }

    pub fn zoom(&self) -> ZoomLevel {
        self.zoom
    }

    pub fn total_days(&self) -> f64 {
        self.total_days
    }

    pub fn pixels_per_day(&self) -> f64 {
        self.pixels_per_day
    }

    pub fn irregularity(&self) -> Option<&Irregularity> {
        self.irregularity.as_ref()
    }

    pub fn date_to_x(&self, at: NaiveDateTime) -> f64 {
        let days = (at - self.view_start).num_milliseconds() as f64 / MS_PER_DAY;
        days * self.pixels_per_day
    }

    pub fn day_to_x(&self, day: NaiveDate) -> f64 {
        self.date_to_x(midnight(day))
    }

    /// Saturates at the calendar bounds for coordinates far outside the view.
    /// A non-finite `x` maps to the view start.
    pub fn x_to_date(&self, x: f64) -> NaiveDateTime {
        let ms = (x / self.pixels_per_day * MS_PER_DAY).round() as i64;
        Duration::try_milliseconds(ms)
            .and_then(|offset| self.view_start.checked_add_signed(offset))
            .unwrap_or(if ms < 0 { NaiveDateTime::MIN } else { NaiveDateTime::MAX })
    }

    /// Horizontal position of a marker such as "now", if it falls inside the
    /// container.
    pub fn marker_x(&self, at: NaiveDateTime) -> Option<f64> {
        let x = self.date_to_x(at);
        (0.0..=self.container_width).contains(&x).then_some(x)
    }

    /// Snaps to the grid of this scale's zoom level.
    pub fn snap(&self, at: NaiveDateTime) -> NaiveDateTime {
        snap_date(at, self.zoom)
    }

    pub fn width_between(&self, start: NaiveDateTime, end: NaiveDateTime) -> f64 {
        self.date_to_x(end) - self.date_to_x(start)
    }

    /// Whether the view touches more than one calendar year.
    pub fn spans_multiple_years(&self) -> bool {
        let last_moment = self.view_end - Duration::milliseconds(1);
        self.view_start.year() != last_moment.year()
    }
}

/// Day: midnight. Week: Monday at midnight. Month: the 1st at midnight.
pub fn snap_date(at: NaiveDateTime, zoom: ZoomLevel) -> NaiveDateTime {
    let day = at.date();
    match zoom {
        ZoomLevel::Day => midnight(day),
        ZoomLevel::Week => midnight(start_of_week(day)),
        ZoomLevel::Month => midnight(first_day_of_month(day)),
    }
}
