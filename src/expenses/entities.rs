use std::{fmt::Display, str::FromStr};

use anyhow::anyhow;
use chrono::{DateTime, NaiveDate, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// Meals that can be tracked during a day. The order of [MealType::ALL] is the order in which
/// meal windows are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
}

/// Inclusive range of local hours during which a meal is expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MealWindow {
    pub start: u32,
    pub end: u32,
}

impl MealWindow {
    pub fn contains(&self, hour: u32) -> bool {
        self.start <= hour && hour <= self.end
    }
}

impl MealType {
    pub const ALL: [MealType; 3] = [MealType::Breakfast, MealType::Lunch, MealType::Dinner];

    /// Fixed cost of a meal.
    pub fn price(self) -> u32 {
        match self {
            MealType::Breakfast => 40,
            MealType::Lunch => 60,
            MealType::Dinner => 50,
        }
    }

    pub fn window(self) -> MealWindow {
        match self {
            MealType::Breakfast => MealWindow { start: 9, end: 11 },
            MealType::Lunch => MealWindow { start: 13, end: 15 },
            MealType::Dinner => MealWindow { start: 19, end: 22 },
        }
    }
}

impl Display for MealType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MealType::Breakfast => write!(f, "breakfast"),
            MealType::Lunch => write!(f, "lunch"),
            MealType::Dinner => write!(f, "dinner"),
        }
    }
}

impl FromStr for MealType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MealType::ALL
            .into_iter()
            .find(|meal| meal.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| anyhow!("Unknown meal {s}. Expected breakfast, lunch or dinner"))
    }
}

/// Whether a meal was had and how much it cost. `amount` is either 0 or the meal's price.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealRecord {
    pub had: bool,
    pub amount: u32,
}

impl MealRecord {
    pub fn for_meal(meal: MealType, had: bool) -> Self {
        Self {
            had,
            amount: if had { meal.price() } else { 0 },
        }
    }
}

/// Everything recorded for a single calendar day. The stored layout is shared with the mobile
/// application, so field names must stay as they are.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRecord {
    #[serde(with = "iso_date")]
    pub date: DateTime<Utc>,
    pub breakfast: MealRecord,
    pub lunch: MealRecord,
    pub dinner: MealRecord,
}

impl DailyRecord {
    /// Record with no meals, stamped with `date`. The stamp is cut to the millisecond precision
    /// it is stored with, so a saved record reads back equal.
    pub fn empty(date: DateTime<Utc>) -> Self {
        Self {
            date: date.trunc_subsecs(3),
            breakfast: MealRecord::default(),
            lunch: MealRecord::default(),
            dinner: MealRecord::default(),
        }
    }

    pub fn meal(&self, meal: MealType) -> MealRecord {
        match meal {
            MealType::Breakfast => self.breakfast,
            MealType::Lunch => self.lunch,
            MealType::Dinner => self.dinner,
        }
    }

    pub fn set_meal(&mut self, meal: MealType, record: MealRecord) {
        match meal {
            MealType::Breakfast => self.breakfast = record,
            MealType::Lunch => self.lunch = record,
            MealType::Dinner => self.dinner = record,
        }
    }

    pub fn with_meal(mut self, meal: MealType, had: bool) -> Self {
        self.set_meal(meal, MealRecord::for_meal(meal, had));
        self
    }

    pub fn total(&self) -> u32 {
        self.breakfast
            .amount
            .saturating_add(self.lunch.amount)
            .saturating_add(self.dinner.amount)
    }
}

/// All persisted records. Order carries no meaning.
pub type RecordList = Vec<DailyRecord>;

/// Cost of a single calendar day inside a requested period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeriodSummary {
    pub date: NaiveDate,
    pub total: u32,
}

/// Cost of a week (`start` and `end` inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeekSummary {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub total: u32,
}

/// Dates are kept in the same form javascript's `toISOString` produces them,
/// e.g. `2025-03-14T08:30:00.000Z`. Any RFC 3339 offset is accepted on read.
mod iso_date {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&s)
            .map(|date| date.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use chrono::{Duration, TimeZone, Utc};

    use super::{DailyRecord, MealRecord, MealType};

    #[test]
    fn test_meal_record_amounts() {
        assert_eq!(
            MealRecord::for_meal(MealType::Breakfast, true),
            MealRecord { had: true, amount: 40 }
        );
        assert_eq!(
            MealRecord::for_meal(MealType::Lunch, true),
            MealRecord { had: true, amount: 60 }
        );
        assert_eq!(
            MealRecord::for_meal(MealType::Dinner, true),
            MealRecord { had: true, amount: 50 }
        );
        for meal in MealType::ALL {
            assert_eq!(MealRecord::for_meal(meal, false), MealRecord::default());
        }
    }

    #[test]
    fn test_windows_do_not_overlap() {
        for hour in 0..24 {
            let matching = MealType::ALL
                .into_iter()
                .filter(|meal| meal.window().contains(hour))
                .count();
            assert!(matching <= 1, "hour {hour} is in {matching} windows");
        }
    }

    #[test]
    fn test_meal_type_parsing() -> Result<()> {
        assert_eq!("Lunch".parse::<MealType>()?, MealType::Lunch);
        assert_eq!(" dinner ".parse::<MealType>()?, MealType::Dinner);
        assert!("brunch".parse::<MealType>().is_err());
        Ok(())
    }

    #[test]
    fn test_reads_mobile_layout() -> Result<()> {
        let stored = r#"{
            "breakfast": { "had": true, "amount": 40 },
            "lunch": { "had": false, "amount": 0 },
            "dinner": { "had": true, "amount": 50 },
            "date": "2025-03-14T08:30:00.000Z"
        }"#;
        let record: DailyRecord = serde_json::from_str(stored)?;

        assert_eq!(record.date, Utc.with_ymd_and_hms(2025, 3, 14, 8, 30, 0).unwrap());
        assert_eq!(record.total(), 90);
        assert!(!record.meal(MealType::Lunch).had);
        Ok(())
    }

    #[test]
    fn test_writes_iso_date() -> Result<()> {
        let record = DailyRecord::empty(Utc.with_ymd_and_hms(2025, 3, 14, 8, 30, 0).unwrap())
            .with_meal(MealType::Lunch, true);
        let value = serde_json::to_value(&record)?;

        assert_eq!(value["date"], "2025-03-14T08:30:00.000Z");
        assert_eq!(value["lunch"]["amount"], 60);
        assert_eq!(value["lunch"]["had"], true);
        Ok(())
    }

    #[test]
    fn test_accepts_offset_dates() -> Result<()> {
        let record: DailyRecord = serde_json::from_str(
            r#"{"date":"2025-03-14T14:00:00+05:30","breakfast":{"had":false,"amount":0},
                "lunch":{"had":false,"amount":0},"dinner":{"had":false,"amount":0}}"#,
        )?;
        assert_eq!(record.date, Utc.with_ymd_and_hms(2025, 3, 14, 8, 30, 0).unwrap());
        Ok(())
    }

    #[test]
    fn test_new_record_reads_back_equal() -> Result<()> {
        let date = Utc.with_ymd_and_hms(2025, 3, 14, 6, 30, 0).unwrap()
            + Duration::nanoseconds(123_456_789);
        let record = DailyRecord::empty(date).with_meal(MealType::Dinner, true);

        assert_eq!(record.date.timestamp_subsec_nanos(), 123_000_000);
        let read_back: DailyRecord = serde_json::from_str(&serde_json::to_string(&record)?)?;
        assert_eq!(read_back, record);
        Ok(())
    }

    #[test]
    fn test_total_does_not_overflow() -> Result<()> {
        let record: DailyRecord = serde_json::from_str(&format!(
            r#"{{"date":"2025-03-14T08:30:00.000Z","breakfast":{{"had":true,"amount":{}}},
                "lunch":{{"had":true,"amount":60}},"dinner":{{"had":false,"amount":0}}}}"#,
            u32::MAX
        ))?;
        assert_eq!(record.total(), u32::MAX);
        Ok(())
    }
}
