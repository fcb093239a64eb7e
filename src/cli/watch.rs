use std::time::Duration;

use chrono::TimeZone;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::{
    expenses::schedule::{MealPrompt, MealWatcher},
    utils::{clock::Clock, shutdown::detect_shutdown},
};

use super::output;

/// Prints the current meal every time it changes until Ctrl-C is pressed.
pub async fn watch_current_meal<Tz: TimeZone + 'static>(
    interval: Duration,
    clock: impl Clock<Tz>,
) {
    let (sender, mut receiver) = mpsc::channel::<MealPrompt<Tz>>(10);
    let shutdown_token = CancellationToken::new();

    let watcher = MealWatcher::new(sender, shutdown_token.clone(), interval, Box::new(clock));

    tokio::join!(detect_shutdown(shutdown_token.clone()), watcher.run(), async {
        while let Some(prompt) = receiver.recv().await {
            println!("{}", output::current_meal(prompt.meal));
        }
        // Nothing left to print for, make sure the signal listener stops as well.
        shutdown_token.cancel();
    });
}
