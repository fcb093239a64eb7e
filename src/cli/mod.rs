pub mod output;
pub mod watch;

use std::{path::PathBuf, time::Duration};

use anyhow::Result;
use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, level_filters::LevelFilter};

use crate::{
    expenses::{
        entities::MealType,
        repository::ExpenseRepository,
        schedule::current_meal,
        summary::{month_breakdown, weekdays_only},
    },
    storage::{file_store::FileStore, record_store::RecordStore},
    utils::clock::{Clock, LocalClock},
};

#[derive(Parser, Debug)]
#[command(name = "mealtrack", version, long_about = None)]
#[command(about = "Tracks which meals you had and what they cost", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(
        long,
        global = true,
        help = "Application directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
    )]
    pub dir: Option<PathBuf>,
    #[arg(long, global = true, help = "Show logs in the console")]
    pub log: bool,
    #[arg(long = "log-filter", global = true, help = "Log level. Falls back to RUST_LOG")]
    pub log_filter: Option<LevelFilter>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum MealStatus {
    Had,
    Skipped,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Show today's meals together with weekly and monthly totals")]
    Today,
    #[command(about = "Record whether a meal was had today")]
    Mark {
        #[arg(help = "breakfast, lunch or dinner")]
        meal: MealType,
        status: MealStatus,
        #[arg(long, help = "Fail instead of continuing when the records can't be read or saved")]
        strict: bool,
    },
    #[command(about = "Show what every day of the current week cost")]
    Week {
        #[arg(long, help = "Only show Monday to Friday")]
        weekdays: bool,
    },
    #[command(about = "Show what the recorded days of the current month cost")]
    Month {
        #[arg(long, help = "Group the month into weeks")]
        breakdown: bool,
    },
    #[command(about = "Show which meal is awaiting an answer right now")]
    Current,
    #[command(about = "Keep reporting the current meal until stopped with Ctrl-C")]
    Watch {
        #[arg(long, default_value_t = 60, help = "Seconds between checks")]
        interval: u64,
    },
}

/// Runs the parsed command against the records stored in `app_dir`.
pub async fn run_cli(args: Args, app_dir: PathBuf) -> Result<()> {
    let store = FileStore::new(app_dir.join("records"))?;
    let repository: ExpenseRepository<_, Local> =
        ExpenseRepository::new(RecordStore::new(store), Box::new(LocalClock));

    match args.commands {
        Commands::Today => {
            let dashboard = repository.get_dashboard().await;
            println!("{}", output::dashboard(&dashboard));
        }
        Commands::Mark {
            meal,
            status,
            strict,
        } => {
            let had = matches!(status, MealStatus::Had);
            let record = if strict {
                repository.try_update_today_record(meal, had).await?
            } else {
                repository.update_today_record(meal, had).await
            };
            info!("Marked {meal} as {status:?}");
            println!("{}", output::daily_record(&record));
        }
        Commands::Week { weekdays } => {
            let mut days = repository.get_weekly_expenses().await;
            if weekdays {
                days = weekdays_only(days);
            }
            println!("{}", output::period("This week", &days));
        }
        Commands::Month { breakdown } => {
            let days = repository.get_monthly_expenses().await;
            if breakdown {
                let weeks = month_breakdown(&days, &LocalClock.time());
                println!("{}", output::weeks("This month", &weeks));
            } else {
                println!("{}", output::period("This month", &days));
            }
        }
        Commands::Current => {
            println!("{}", output::current_meal(current_meal(&LocalClock.time())));
        }
        Commands::Watch { interval } => {
            watch::watch_current_meal(Duration::from_secs(interval.max(1)), LocalClock).await;
        }
    }
    Ok(())
}
