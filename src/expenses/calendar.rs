//! Calendar helpers for grouping records by day, week and month. Weeks start on Sunday.
//!
//! Stored timestamps are UTC, every decision is made in the time zone of the provided `now`.

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};

/// Calendar day of `ts` as seen in `zone`.
pub fn local_date<Tz: TimeZone>(ts: &DateTime<Utc>, zone: &Tz) -> NaiveDate {
    ts.with_timezone(zone).date_naive()
}

/// Compares year, month and day, ignoring the time of day.
pub fn same_calendar_day<Tz: TimeZone>(a: &DateTime<Tz>, b: &DateTime<Tz>) -> bool {
    a.date_naive() == b.date_naive()
}

pub fn is_today<Tz: TimeZone>(ts: &DateTime<Utc>, now: &DateTime<Tz>) -> bool {
    same_calendar_day(&ts.with_timezone(&now.timezone()), now)
}

/// Sunday and Saturday of the week containing `now`.
pub fn week_window<Tz: TimeZone>(now: &DateTime<Tz>) -> (NaiveDate, NaiveDate) {
    week_of(now.date_naive())
}

fn week_of(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = date - Duration::days(date.weekday().num_days_from_sunday().into());
    (start, start + Duration::days(6))
}

/// First and last day of the month containing `now`.
pub fn month_window<Tz: TimeZone>(now: &DateTime<Tz>) -> (NaiveDate, NaiveDate) {
    let date = now.date_naive();
    let first = date - Duration::days(date.day0().into());
    let mut last = date;
    while let Some(next) = last.succ_opt().filter(|next| next.month() == date.month()) {
        last = next;
    }
    (first, last)
}

/// Every day between `start` and `end`, both inclusive.
pub fn days_in(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |day| *day <= end)
}

/// Weeks that have at least one day in the month containing `now`. The first and last weeks may
/// spill into neighbouring months.
pub fn weeks_of_month<Tz: TimeZone>(now: &DateTime<Tz>) -> Vec<(NaiveDate, NaiveDate)> {
    let (first, last) = month_window(now);
    let mut weeks = Vec::new();
    let mut week = week_of(first);
    while week.0 <= last {
        weeks.push(week);
        week = week_of(week.0 + Duration::days(7));
    }
    weeks
}
