//! Day-granularity calendar helpers.
//!
//! Every date in the engine is a [`NaiveDate`]: no time of day and no
//! timezone, so equality and ordering are the same on every machine. String
//! inputs are normalized once through [`parse_date_only`] and written back
//! out through [`to_iso_date`].
//!
//! # Functions
//!
//! - [`parse_date_only`] — ISO date or datetime string → calendar date
//! - [`to_iso_date`] — calendar date → `YYYY-MM-DD`
//! - [`add_days`] — checked day arithmetic (negative offsets allowed)
//! - [`is_weekend`], [`weekday_index`], [`weekday_label`] — weekday queries
//! - [`group_consecutive_dates`] — split a sorted date list into contiguous runs
//! - [`season_windows`] — Summer and Christmas windows for a list of years

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeDelta, Weekday};
use serde::Serialize;

use crate::error::{LeaveError, Result};

const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

// ── Parsing and formatting ──────────────────────────────────────────────────

/// Normalize a date or datetime string to a calendar date.
///
/// Accepts `YYYY-MM-DD`, naive `YYYY-MM-DDTHH:MM[:SS]`, and RFC 3339
/// datetimes. For datetimes the calendar date as written is kept; the time
/// of day and any offset are discarded rather than converted, so
/// `"2025-02-17T23:30:00-05:00"` is still the 17th.
///
/// # Errors
///
/// Returns [`LeaveError::InvalidDate`] if the string matches none of the
/// accepted forms or names a day that does not exist.
///
/// # Examples
///
/// ```
/// use leave_engine::calendar::parse_date_only;
///
/// let date = parse_date_only("2025-02-17T08:00:00Z").unwrap();
/// assert_eq!(date.to_string(), "2025-02-17");
/// ```
pub fn parse_date_only(s: &str) -> Result<NaiveDate> {
    let s = s.trim();

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.date_naive());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt.date());
        }
    }

    Err(LeaveError::InvalidDate(format!("'{s}'")))
}

/// Format a date as `YYYY-MM-DD`.
pub fn to_iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

// ── Arithmetic and weekday queries ──────────────────────────────────────────

/// Return the date `n` days after `date` (`n` may be negative).
///
/// # Errors
///
/// Returns [`LeaveError::DateOutOfRange`] if the result falls outside the
/// range chrono can represent.
pub fn add_days(date: NaiveDate, n: i64) -> Result<NaiveDate> {
    TimeDelta::try_days(n)
        .and_then(|delta| date.checked_add_signed(delta))
        .ok_or_else(|| LeaveError::DateOutOfRange(format!("{} {n:+} days", to_iso_date(date))))
}

/// Weekday number with Sunday as 0 and Saturday as 6.
pub fn weekday_index(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

/// Three-letter weekday label, `"Sun"` through `"Sat"`.
pub fn weekday_label(date: NaiveDate) -> &'static str {
    WEEKDAY_LABELS[weekday_index(date) as usize]
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

// ── Blocks ──────────────────────────────────────────────────────────────────

/// Split a sorted, deduplicated date list into maximal runs of consecutive
/// calendar days.
///
/// A gap of even one day (a skipped weekend, a day already covered) starts a
/// new run. Unsorted input is not reordered; each element is only compared
/// with its predecessor.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use leave_engine::calendar::group_consecutive_dates;
///
/// let d = |day| NaiveDate::from_ymd_opt(2025, 2, day).unwrap();
/// let blocks = group_consecutive_dates(&[d(3), d(4), d(6)]);
/// assert_eq!(blocks, vec![vec![d(3), d(4)], vec![d(6)]]);
/// ```
pub fn group_consecutive_dates(sorted_dates: &[NaiveDate]) -> Vec<Vec<NaiveDate>> {
    let mut blocks: Vec<Vec<NaiveDate>> = Vec::new();

    for &date in sorted_dates {
        if let Some(block) = blocks.last_mut() {
            if block.last().and_then(|d| d.succ_opt()) == Some(date) {
                block.push(date);
                continue;
            }
        }
        blocks.push(vec![date]);
    }

    blocks
}

// ── Seasonal windows ────────────────────────────────────────────────────────

/// Holiday seasons in which joint leave is preferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Season {
    /// June 20 through September 1.
    Summer,
    /// December 15 through January 7 of the following year.
    Christmas,
}

/// An inclusive date range belonging to one season of one year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeasonWindow {
    pub season: Season,
    /// The year the window starts in.
    pub year: i32,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl SeasonWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// True if any date of `block` falls inside the window.
    pub fn intersects(&self, block: &[NaiveDate]) -> bool {
        block.iter().any(|&d| self.contains(d))
    }
}

/// Build the Summer and Christmas windows for each year, in input order.
///
/// Years whose window dates chrono cannot represent are skipped.
pub fn season_windows(years: &[i32]) -> Vec<SeasonWindow> {
    years
        .iter()
        .flat_map(|&year| [summer_window(year), christmas_window(year)])
        .flatten()
        .collect()
}

/// The years a date list touches, plus the year before the earliest one so
/// that early-January dates fall inside the previous Christmas window.
pub fn years_touched(dates: &[NaiveDate]) -> Vec<i32> {
    let mut years: Vec<i32> = dates.iter().map(|d| d.year()).collect();
    if let Some(first) = years.iter().min().copied() {
        years.push(first - 1);
    }
    years.sort_unstable();
    years.dedup();
    years
}

fn summer_window(year: i32) -> Option<SeasonWindow> {
    Some(SeasonWindow {
        season: Season::Summer,
        year,
        start: NaiveDate::from_ymd_opt(year, 6, 20)?,
        end: NaiveDate::from_ymd_opt(year, 9, 1)?,
    })
}

fn christmas_window(year: i32) -> Option<SeasonWindow> {
    Some(SeasonWindow {
        season: Season::Christmas,
        year,
        start: NaiveDate::from_ymd_opt(year, 12, 15)?,
        end: NaiveDate::from_ymd_opt(year + 1, 1, 7)?,
    })
}

// ── Tests ───────────────────────────────────────────────────────────────────
