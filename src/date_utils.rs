use std::fmt;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::error::{AppError, AppResult};

/// Trait for query params that carry a chart window with prev/next navigation.
#[allow(clippy::wrong_self_convention)]
pub trait WindowFilterable {
    fn from_date(&self) -> Option<&String>;
    fn to_date(&self) -> Option<&String>;

    /// Override to support prev/next navigation. Defaults to None.
    fn nav(&self) -> Option<&String> {
        None
    }

    /// Resolve the window the caller is looking at. Without explicit dates the
    /// view's default window is used; `nav` is applied afterwards.
    fn resolve_window(&self, default: ViewWindow) -> AppResult<ViewWindow> {
        let base = match (self.from_date(), self.to_date()) {
            (Some(from), Some(to)) => {
                let from = parse_query_date(from)?;
                let to = parse_query_date(to)?;
                if to < from {
                    return Err(AppError::Validation(format!(
                        "to_date {} is before from_date {}",
                        to, from
                    )));
                }
                ViewWindow::from_dates(from, to, default.step_months)
            }
            (None, None) => default,
            _ => {
                return Err(AppError::Validation(
                    "from_date and to_date must be given together".into(),
                ))
            }
        };

        Ok(match self.nav().map(|s| s.as_str()) {
            Some("prev") => base.prev(),
            Some("next") => base.next(),
            _ => base,
        })
    }
}

fn parse_query_date(raw: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("invalid date: {}", raw)))
}

/// A calendar month, used as the bucket key for month charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthKey {
    pub year: i32,
    /// 1-based.
    pub month: u32,
}

impl MonthKey {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn of_datetime(dt: &NaiveDateTime) -> Self {
        Self::of(dt.date())
    }

    /// Months since year 0; consecutive months differ by one.
    pub fn ordinal(&self) -> i64 {
        self.year as i64 * 12 + self.month as i64 - 1
    }

    pub fn from_ordinal(ordinal: i64) -> Self {
        Self {
            year: ordinal.div_euclid(12) as i32,
            month: (ordinal.rem_euclid(12) + 1) as u32,
        }
    }

    /// Zero-based month of the year (0 = January).
    pub fn month_index(&self) -> u32 {
        self.month - 1
    }

    pub fn label(&self) -> String {
        match NaiveDate::from_ymd_opt(self.year, self.month, 1) {
            Some(d) => d.format("%b %Y").to_string(),
            None => format!("{}-{:02}", self.year, self.month),
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

/// The date range a chart view shows. Only `next` and `prev` move it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ViewWindow {
    pub range_start: NaiveDate,
    pub range_end: NaiveDate,
    pub step_months: u32,
}

impl ViewWindow {
    /// `months` whole calendar months beginning with the month of `start`.
    pub fn months_from(start: NaiveDate, months: u32, step_months: u32) -> Self {
        let range_start = month_start(start);
        let last_month = shift_months(range_start, months.max(1) as i32 - 1);
        Self {
            range_start,
            range_end: month_end(last_month),
            step_months,
        }
    }

    /// Widened to whole months: `from` snaps to the first of its month and
    /// `to` to the last day of its month.
    pub fn from_dates(from: NaiveDate, to: NaiveDate, step_months: u32) -> Self {
        Self {
            range_start: month_start(from),
            range_end: month_end(to),
            step_months,
        }
    }

    /// January-June or July-December, whichever holds `today`.
    pub fn half_year_containing(today: NaiveDate) -> Self {
        let first_month = if today.month() <= 6 { 1 } else { 7 };
        let start = NaiveDate::from_ymd_opt(today.year(), first_month, 1).unwrap_or(today);
        Self::months_from(start, 6, 6)
    }

    pub fn year_containing(today: NaiveDate) -> Self {
        let start = NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today);
        Self::months_from(start, 12, 12)
    }

    pub fn next(&self) -> Self {
        self.shifted(self.step_months as i32)
    }

    pub fn prev(&self) -> Self {
        self.shifted(-(self.step_months as i32))
    }

    fn shifted(&self, months: i32) -> Self {
        Self {
            range_start: shift_months(self.range_start, months),
            range_end: month_end(shift_months(self.range_end, months)),
            step_months: self.step_months,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.range_start <= date && date <= self.range_end
    }

    /// Every calendar month touched by the window, in order.
    pub fn month_keys(&self) -> Vec<MonthKey> {
        let first = MonthKey::of(self.range_start).ordinal();
        let last = MonthKey::of(self.range_end).ordinal();
        (first..=last).map(MonthKey::from_ordinal).collect()
    }

    /// Human-readable label, e.g. "Jan 2024 – Jun 2024".
    pub fn display_label(&self) -> String {
        format!(
            "{} – {}",
            self.range_start.format("%b %Y"),
            self.range_end.format("%b %Y")
        )
    }
}

pub fn month_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.day0() as i64)
}

pub fn month_end(date: NaiveDate) -> NaiveDate {
    shift_months(month_start(date), 1) - Duration::days(1)
}

/// First day of the month `months` away from the month of `date`.
pub fn shift_months(date: NaiveDate, months: i32) -> NaiveDate {
    let total_months = date.year() * 12 + date.month() as i32 - 1 + months;
    let new_year = total_months.div_euclid(12);
    let new_month = (total_months.rem_euclid(12) + 1) as u32;
    NaiveDate::from_ymd_opt(new_year, new_month, 1).unwrap_or(date)
}

/// Number of calendar months between the months of two dates, ignoring days.
pub fn months_between(from: &NaiveDateTime, to: &NaiveDateTime) -> i64 {
    MonthKey::of_datetime(to).ordinal() - MonthKey::of_datetime(from).ordinal()
}
