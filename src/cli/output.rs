//! Plain text rendering of expenses for the terminal.

use std::fmt::Write;

use ansi_term::Colour;

use crate::expenses::{
    entities::{DailyRecord, MealType, PeriodSummary, WeekSummary},
    repository::Dashboard,
    summary::period_total,
};

const DATE_FORMAT: &str = "%a %d %b";

fn meal_line(record: &DailyRecord, meal: MealType) -> String {
    // Width has to be applied before painting, escape codes are not counted by the formatter.
    let status = if record.meal(meal).had {
        Colour::Green.paint(format!("{:<8}", "had"))
    } else {
        Colour::Fixed(245).paint(format!("{:<8}", "skipped"))
    };
    format!("  {:<10} {} {:>4}", meal.to_string(), status, record.meal(meal).amount)
}

pub fn daily_record(record: &DailyRecord) -> String {
    let mut out = String::new();
    for meal in MealType::ALL {
        let _ = writeln!(out, "{}", meal_line(record, meal));
    }
    let _ = write!(out, "  {:<19} {:>4}", "total", record.total());
    out
}

pub fn current_meal(meal: Option<MealType>) -> String {
    match meal {
        Some(meal) => format!(
            "Did you have {}? ({})",
            Colour::Yellow.bold().paint(meal.to_string()),
            meal.price()
        ),
        None => "No meal is waiting for an answer".to_string(),
    }
}

pub fn dashboard(dashboard: &Dashboard) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", Colour::Cyan.bold().paint("Today"));
    let _ = writeln!(out, "{}", daily_record(&dashboard.today));
    let _ = writeln!(out);
    let _ = writeln!(out, "  {:<19} {:>4}", "this week", dashboard.weekly_total);
    let _ = writeln!(out, "  {:<19} {:>4}", "this month", dashboard.monthly_total);
    let _ = writeln!(out);
    let _ = write!(out, "{}", current_meal(dashboard.current_meal));
    out
}

pub fn period(title: &str, days: &[PeriodSummary]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", Colour::Cyan.bold().paint(title));
    if days.is_empty() {
        let _ = writeln!(out, "  nothing recorded");
    }
    for day in days {
        let date = day.date.format(DATE_FORMAT).to_string();
        let _ = writeln!(out, "  {:<19} {:>4}", date, day.total);
    }
    let _ = write!(out, "  {:<19} {:>4}", "total", period_total(days));
    out
}

pub fn weeks(title: &str, weeks: &[WeekSummary]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", Colour::Cyan.bold().paint(title));
    for week in weeks {
        let range = format!(
            "{} - {}",
            week.start.format("%d %b"),
            week.end.format("%d %b")
        );
        let _ = writeln!(out, "  {:<19} {:>4}", range, week.total);
    }
    let _ = write!(
        out,
        "  {:<19} {:>4}",
        "total",
        weeks.iter().map(|week| week.total).sum::<u32>()
    );
    out
}
