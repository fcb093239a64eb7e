use std::time::Duration;

use chrono::{DateTime, Datelike, TimeZone, Timelike, Weekday};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::utils::clock::Clock;

use super::entities::MealType;

pub const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_secs(60);

/// Returns the meal that is awaiting an answer at `now`. Meals are only tracked on weekdays.
pub fn current_meal<Tz: TimeZone>(now: &DateTime<Tz>) -> Option<MealType> {
    if matches!(now.weekday(), Weekday::Sat | Weekday::Sun) {
        return None;
    }
    let hour = now.hour();
    MealType::ALL
        .into_iter()
        .find(|meal| meal.window().contains(hour))
}

/// Sent by [MealWatcher] whenever the current meal changes.
#[derive(Debug, Clone)]
pub struct MealPrompt<Tz: TimeZone> {
    pub meal: Option<MealType>,
    pub at: DateTime<Tz>,
}

/// Periodically re-evaluates [current_meal] and reports changes.
pub struct MealWatcher<Tz: TimeZone> {
    next: mpsc::Sender<MealPrompt<Tz>>,
    shutdown: CancellationToken,
    check_frequency: Duration,
    time_provider: Box<dyn Clock<Tz>>,
}

impl<Tz: TimeZone + 'static> MealWatcher<Tz> {
    pub fn new(
        next: mpsc::Sender<MealPrompt<Tz>>,
        shutdown: CancellationToken,
        check_frequency: Duration,
        time_provider: Box<dyn Clock<Tz>>,
    ) -> Self {
        Self {
            next,
            shutdown,
            check_frequency,
            time_provider,
        }
    }

    /// Executes the watcher loop. The first evaluation is always reported. Stops once cancelled
    /// or once nobody listens anymore.
    pub async fn run(self) {
        let mut check_point = self.time_provider.instant();
        let mut reported: Option<Option<MealType>> = None;
        loop {
            check_point += self.check_frequency;

            let at = self.time_provider.time();
            let meal = current_meal(&at);
            if reported != Some(meal) {
                info!("Current meal is now {meal:?}");
                if self.next.send(MealPrompt { meal, at }).await.is_err() {
                    debug!("Prompt receiver was dropped, stopping the watcher");
                    return;
                }
                reported = Some(meal);
            }

            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    return
                }
                _ = self.time_provider.sleep_until(check_point) => ()
            }
        }
    }
}
