use anyhow::Result;
use clap::Parser;
use mealtrack::{
    cli::{run_cli, Args},
    utils::{
        dir::{create_application_default_path, ensure_dir},
        logging::{enable_logging, CLI_PREFIX},
        runtime::single_thread_runtime,
    },
};
use tracing::{error, level_filters::LevelFilter};

fn main() -> Result<()> {
    let args = Args::parse();

    let app_dir = args
        .dir
        .clone()
        .map_or_else(create_application_default_path, ensure_dir)?;

    let log_level = args
        .log_filter
        .or(args.log.then_some(LevelFilter::TRACE));
    enable_logging(CLI_PREFIX, &app_dir.join("logs"), log_level, args.log)?;

    single_thread_runtime()?
        .block_on(run_cli(args, app_dir))
        .inspect_err(|e| {
            error!("Error running cli {e:?}");
        })
}
