use chrono::{DateTime, Datelike, TimeZone, Weekday};

use super::{
    calendar::weeks_of_month,
    entities::{PeriodSummary, WeekSummary},
};

pub fn period_total(days: &[PeriodSummary]) -> u32 {
    days.iter().map(|day| day.total).sum()
}

/// Drops Saturday and Sunday. Used when only working days are of interest.
pub fn weekdays_only(days: Vec<PeriodSummary>) -> Vec<PeriodSummary> {
    days.into_iter()
        .filter(|day| !matches!(day.date.weekday(), Weekday::Sat | Weekday::Sun))
        .collect()
}

/// Groups monthly entries into the weeks of the month containing `now`.
pub fn month_breakdown<Tz: TimeZone>(
    entries: &[PeriodSummary],
    now: &DateTime<Tz>,
) -> Vec<WeekSummary> {
    weeks_of_month(now)
        .into_iter()
        .map(|(start, end)| WeekSummary {
            start,
            end,
            total: entries
                .iter()
                .filter(|entry| start <= entry.date && entry.date <= end)
                .map(|entry| entry.total)
                .sum(),
        })
        .collect()
}
