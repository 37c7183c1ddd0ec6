//! Calendar month-grid derivation
//!
//! Conventions used throughout:
//! - months are 1-based (1 = January .. 12 = December)
//! - weekdays are Sunday-based (0 = Sunday .. 6 = Saturday)
//!
//! Day counts and weekdays are computed arithmetically on the proleptic
//! Gregorian calendar, so any `i32` year is accepted.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use utoipa::ToSchema;

use crate::buckets::DayBucketIndex;
use crate::error::{CalendarError, CalendarResult};
use crate::models::Event;

/// One cell of a month grid
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum GridCell {
    /// Padding before day 1
    Blank,
    Day {
        day: u32,
        events: Vec<Event>,
        #[serde(rename = "isToday")]
        is_today: bool,
    },
}

impl GridCell {
    pub const fn day(&self) -> Option<u32> {
        match self {
            GridCell::Blank => None,
            GridCell::Day { day, .. } => Some(*day),
        }
    }

    pub fn events(&self) -> &[Event] {
        match self {
            GridCell::Blank => &[],
            GridCell::Day { events, .. } => events,
        }
    }

    pub const fn is_today(&self) -> bool {
        matches!(self, GridCell::Day { is_today: true, .. })
    }
}

pub const fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn check_month(month: u32) -> CalendarResult<()> {
    if (1..=12).contains(&month) {
        Ok(())
    } else {
        Err(CalendarError::InvalidMonth(month))
    }
}

/// Number of days in a month
pub fn days_in_month(year: i32, month: u32) -> CalendarResult<u32> {
    check_month(month)?;
    Ok(match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    })
}

/// Weekday of the first day of a month, 0 = Sunday
pub fn first_weekday(year: i32, month: u32) -> CalendarResult<u32> {
    check_month(month)?;
    // Sakamoto's method with floor division so negative years work too
    const T: [i64; 12] = [0, 3, 2, 5, 0, 3, 5, 1, 4, 6, 2, 4];
    let y = i64::from(year) - i64::from(month < 3);
    let raw = y + y.div_euclid(4) - y.div_euclid(100) + y.div_euclid(400)
        + T[(month - 1) as usize]
        + 1;
    // rem_euclid(7) is always in 0..7
    Ok(raw.rem_euclid(7) as u32)
}

/// Borrow the events that fall in the given month, in input order
pub fn month_events(events: &[Event], year: i32, month: u32) -> impl Iterator<Item = &Event> {
    events.iter().filter(move |e| e.is_in_month(year, month))
}

/// Build the cells of a month view
///
/// Leading blanks (one per weekday before day 1) come first, then one cell
/// per day. Events outside the month or without a date are not placed.
/// `today` is supplied by the caller so the result depends only on inputs.
pub fn build_grid(
    events: &[Event],
    year: i32,
    month: u32,
    today: NaiveDate,
) -> CalendarResult<Vec<GridCell>> {
    let days = days_in_month(year, month)?;
    let blanks = first_weekday(year, month)?;
    let mut index = DayBucketIndex::from_events(month_events(events, year, month));

    let today_in_month = today.year() == year && today.month() == month;

    let mut cells = Vec::with_capacity((blanks + days) as usize);
    cells.extend((0..blanks).map(|_| GridCell::Blank));
    cells.extend((1..=days).map(|day| GridCell::Day {
        day,
        events: index.take(day),
        is_today: today_in_month && today.day() == day,
    }));

    Ok(cells)
}

/// Serializable month view consumed by the calendar endpoints
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    pub leading_blanks: u32,
    pub days_in_month: u32,
    pub cells: Vec<GridCell>,
}

impl MonthGrid {
    pub fn build(events: &[Event], year: i32, month: u32, today: NaiveDate) -> CalendarResult<Self> {
        Ok(Self {
            year,
            month,
            leading_blanks: first_weekday(year, month)?,
            days_in_month: days_in_month(year, month)?,
            cells: build_grid(events, year, month, today)?,
        })
    }

    /// Number of day cells that carry at least one event
    pub fn busy_days(&self) -> usize {
        self.cells.iter().filter(|c| !c.events().is_empty()).count()
    }
}
