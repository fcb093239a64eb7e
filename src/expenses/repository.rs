use chrono::{DateTime, Local, TimeZone, Utc};
use serde::Serialize;
use tracing::{error, info, instrument};

use crate::{
    storage::{record_store::RecordStore, KeyValueStore, StorageError},
    utils::clock::Clock,
};

use super::{
    calendar::{days_in, is_today, local_date, month_window, week_window},
    entities::{DailyRecord, MealType, PeriodSummary, RecordList},
    schedule::current_meal,
    summary::period_total,
};

/// Everything the home screen shows at once, computed from a single load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    pub today: DailyRecord,
    pub today_total: u32,
    pub current_meal: Option<MealType>,
    pub weekly_total: u32,
    pub monthly_total: u32,
}

/// Owns the record list during every load-modify-save cycle. Nothing is cached between calls,
/// each operation loads the list again.
///
/// The plain operations never fail: a failed load behaves like an empty history and a failed save
/// is only logged. `try_` variants report storage failures instead.
pub struct ExpenseRepository<S, Tz: TimeZone = Local> {
    records: RecordStore<S>,
    clock: Box<dyn Clock<Tz>>,
}

impl<S: KeyValueStore, Tz: TimeZone + 'static> ExpenseRepository<S, Tz> {
    pub fn new(records: RecordStore<S>, clock: Box<dyn Clock<Tz>>) -> Self {
        Self { records, clock }
    }

    async fn load_or_empty(&self) -> RecordList {
        self.records.load().await.unwrap_or_else(|e| {
            error!("Failed to load expenses {e:?}");
            vec![]
        })
    }

    /// Record for today. A fresh one is returned (but not saved) if nothing was recorded yet.
    pub async fn get_today_record(&self) -> DailyRecord {
        let records = self.load_or_empty().await;
        today_in(&records, &self.clock.time())
    }

    pub async fn try_get_today_record(&self) -> Result<DailyRecord, StorageError> {
        let records = self.records.load().await?;
        Ok(today_in(&records, &self.clock.time()))
    }

    /// Marks `meal` as had or not had today and saves the whole list. The updated record is
    /// returned even if saving failed.
    #[instrument(skip(self))]
    pub async fn update_today_record(&self, meal: MealType, had: bool) -> DailyRecord {
        let records = self.load_or_empty().await;
        let (record, records) = apply_toggle(records, &self.clock.time(), meal, had);
        match self.records.save(&records).await {
            Ok(()) => info!("Saved {meal} as {had}"),
            Err(e) => error!("Failed to save expenses {e:?}"),
        }
        record
    }

    #[instrument(skip(self))]
    pub async fn try_update_today_record(
        &self,
        meal: MealType,
        had: bool,
    ) -> Result<DailyRecord, StorageError> {
        let records = self.records.load().await?;
        let (record, records) = apply_toggle(records, &self.clock.time(), meal, had);
        self.records.save(&records).await?;
        info!("Saved {meal} as {had}");
        Ok(record)
    }

    /// One entry for every day of the current week, Sunday first. Days without a record cost 0.
    pub async fn get_weekly_expenses(&self) -> Vec<PeriodSummary> {
        let records = self.load_or_empty().await;
        weekly_expenses(&records, &self.clock.time())
    }

    /// One entry for every stored record of the current month, in stored order. Days without a
    /// record are not included.
    pub async fn get_monthly_expenses(&self) -> Vec<PeriodSummary> {
        let records = self.load_or_empty().await;
        monthly_expenses(&records, &self.clock.time())
    }

    pub async fn get_dashboard(&self) -> Dashboard {
        let records = self.load_or_empty().await;
        let now = self.clock.time();
        let today = today_in(&records, &now);
        Dashboard {
            today_total: today.total(),
            today,
            current_meal: current_meal(&now),
            weekly_total: period_total(&weekly_expenses(&records, &now)),
            monthly_total: period_total(&monthly_expenses(&records, &now)),
        }
    }
}

fn today_in<Tz: TimeZone>(records: &[DailyRecord], now: &DateTime<Tz>) -> DailyRecord {
    records
        .iter()
        .find(|record| is_today(&record.date, now))
        .cloned()
        .unwrap_or_else(|| DailyRecord::empty(now.with_timezone(&Utc)))
}

/// Replaces every record of today with the updated one.
fn apply_toggle<Tz: TimeZone>(
    records: RecordList,
    now: &DateTime<Tz>,
    meal: MealType,
    had: bool,
) -> (DailyRecord, RecordList) {
    let record = today_in(&records, now).with_meal(meal, had);
    let mut records = records
        .into_iter()
        .filter(|stored| !is_today(&stored.date, now))
        .collect::<RecordList>();
    records.push(record.clone());
    (record, records)
}

fn weekly_expenses<Tz: TimeZone>(
    records: &[DailyRecord],
    now: &DateTime<Tz>,
) -> Vec<PeriodSummary> {
    let zone = now.timezone();
    let (start, end) = week_window(now);
    days_in(start, end)
        .map(|date| PeriodSummary {
            date,
            total: records
                .iter()
                .find(|record| local_date(&record.date, &zone) == date)
                .map(DailyRecord::total)
                .unwrap_or(0),
        })
        .collect()
}

fn monthly_expenses<Tz: TimeZone>(
    records: &[DailyRecord],
    now: &DateTime<Tz>,
) -> Vec<PeriodSummary> {
    let zone = now.timezone();
    let (first, last) = month_window(now);
    records
        .iter()
        .filter_map(|record| {
            let date = local_date(&record.date, &zone);
            (first <= date && date <= last).then(|| PeriodSummary {
                date,
                total: record.total(),
            })
        })
        .collect()
}
