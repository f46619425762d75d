// Calendar slots: which dates fall inside a season window, and the cursor
// that hands out (date, kickoff) pairs in order.

use chrono::{Datelike, NaiveDate, Weekday};

use crate::model::KickoffTime;

/// The months a season is played in, anchored to a calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleWindow {
    /// First month, 0 = January.
    pub start_month: u32,
    /// Last month, inclusive, 0 = January.
    pub end_month: u32,
    /// Year the window starts in.
    pub year: i32,
}

impl ScheduleWindow {
    pub fn new(start_month: u32, end_month: u32, year: i32) -> Self {
        Self {
            start_month,
            end_month,
            year,
        }
    }

    /// Window for the occurrence of `start_month` in `today`'s year.
    pub fn for_anchor(start_month: u32, end_month: u32, today: NaiveDate) -> Self {
        Self::new(start_month, end_month, today.year())
    }

    /// Whether the window runs past December into the next year.
    pub fn wraps_year(&self) -> bool {
        self.end_month < self.start_month
    }

    /// First day of the start month. `None` if the month is out of range.
    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.start_month + 1, 1)
    }

    /// Last day of the end month. `None` if the month is out of range.
    pub fn last_day(&self) -> Option<NaiveDate> {
        let end_year = if self.wraps_year() {
            self.year + 1
        } else {
            self.year
        };
        if self.end_month > 11 {
            return None;
        }
        let (next_year, next_month) = if self.end_month == 11 {
            (end_year + 1, 1)
        } else {
            (end_year, self.end_month + 2)
        };
        NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
    }
}

/// Every date in the window, inclusive, whose weekday is allowed, in
/// chronological order.
pub fn slot_dates(window: &ScheduleWindow, match_days: &[Weekday]) -> Vec<NaiveDate> {
    let (Some(first), Some(last)) = (window.first_day(), window.last_day()) else {
        return Vec::new();
    };

    first
        .iter_days()
        .take_while(|d| *d <= last)
        .filter(|d| match_days.contains(&d.weekday()))
        .collect()
}

/// Hands out match slots: the time advances first, and the date advances
/// each time the time list wraps. Both wrap around, so slots repeat once the
/// calendar is exhausted.
#[derive(Debug, Clone)]
pub struct SlotCursor<'a> {
    dates: &'a [NaiveDate],
    times: &'a [KickoffTime],
    date_idx: usize,
    time_idx: usize,
}

impl<'a> SlotCursor<'a> {
    /// Returns `None` when either list is empty.
    pub fn new(dates: &'a [NaiveDate], times: &'a [KickoffTime]) -> Option<Self> {
        if dates.is_empty() || times.is_empty() {
            return None;
        }
        Some(Self {
            dates,
            times,
            date_idx: 0,
            time_idx: 0,
        })
    }

    /// Take the current slot and move the cursor on.
    pub fn next_slot(&mut self) -> (NaiveDate, KickoffTime) {
        let slot = (self.dates[self.date_idx], self.times[self.time_idx]);

        self.time_idx = (self.time_idx + 1) % self.times.len();
        if self.time_idx == 0 {
            self.date_idx = (self.date_idx + 1) % self.dates.len();
        }

        slot
    }
}
