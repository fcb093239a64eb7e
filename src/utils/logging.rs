use std::{path::Path, sync::LazyLock};

use anyhow::{Context, Result};
use tracing::level_filters::LevelFilter;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt::{format::FmtSpan, writer::MakeWriterExt},
    EnvFilter,
};

pub const CLI_PREFIX: &str = "cli";

const KEPT_LOG_FILES: usize = 5;
const DEFAULT_LEVEL: &str = "info";

/// Installs the global subscriber. Logs always go into daily rotated files inside `log_dir`,
/// `show_std` additionally mirrors them to stdout.
pub fn enable_logging(
    prefix: &str,
    log_dir: &Path,
    log_level: Option<LevelFilter>,
    show_std: bool,
) -> Result<()> {
    let appender = log_files(prefix, log_dir)?;
    let stdout = std::io::stdout.with_filter(move |_| show_std);

    let directive = level_directive(log_level, std::env::var("RUST_LOG").ok());
    let filter = EnvFilter::try_new(&directive)
        .with_context(|| format!("Invalid log filter {directive}"))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(stdout.and(appender))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install logging {e}"))?;
    Ok(())
}

fn log_files(prefix: &str, log_dir: &Path) -> Result<RollingFileAppender> {
    tracing_appender::rolling::Builder::new()
        .rotation(Rotation::DAILY)
        .max_log_files(KEPT_LOG_FILES)
        .filename_prefix(prefix)
        .filename_suffix("log")
        .build(log_dir)
        .with_context(|| format!("Could not open logs in {log_dir:?}"))
}

/// Filter directive for this crate. An explicit level wins over `env_level`. A bare level from
/// the environment is scoped to this crate, full directives such as `mealtrack=debug` are kept.
fn level_directive(log_level: Option<LevelFilter>, env_level: Option<String>) -> String {
    let crate_name = env!("CARGO_PKG_NAME").replace('-', "_");
    match (log_level, env_level) {
        (Some(level), _) => format!("{crate_name}={level}"),
        (None, Some(env)) if env.contains('=') => env,
        (None, Some(env)) if !env.trim().is_empty() => format!("{crate_name}={}", env.trim()),
        _ => format!("{crate_name}={DEFAULT_LEVEL}"),
    }
}

pub static TEST_LOGGING: LazyLock<()> = LazyLock::new(|| {
    // Another subscriber may already be installed.
    let _ = tracing_subscriber::fmt()
        .with_max_level(LevelFilter::TRACE)
        .with_test_writer()
        .pretty()
        .try_init();
});

#[cfg(test)]
mod tests {
    use std::io::Write;

    use anyhow::Result;
    use tempfile::tempdir;
    use tracing::level_filters::LevelFilter;

    use super::{level_directive, log_files};

    #[test]
    fn test_level_directive() {
        assert_eq!(level_directive(None, None), "mealtrack=info");
        assert_eq!(level_directive(None, Some(" ".into())), "mealtrack=info");
        assert_eq!(level_directive(None, Some("warn".into())), "mealtrack=warn");
        assert_eq!(
            level_directive(Some(LevelFilter::TRACE), Some("warn".into())),
            "mealtrack=trace"
        );
        assert_eq!(
            level_directive(None, Some("mealtrack=debug,tokio=warn".into())),
            "mealtrack=debug,tokio=warn"
        );
    }

    #[test]
    fn test_log_files_go_into_log_dir() -> Result<()> {
        let dir = tempdir()?;
        let log_dir = dir.path().join("logs");

        let mut appender = log_files("cli", &log_dir)?;
        appender.write_all(b"marked lunch\n")?;
        appender.flush()?;

        let names = std::fs::read_dir(&log_dir)?
            .map(|entry| entry.map(|e| e.file_name().to_string_lossy().into_owned()))
            .collect::<Result<Vec<_>, _>>()?;
        assert_eq!(names.len(), 1);
        assert!(names[0].starts_with("cli."));
        assert!(names[0].ends_with(".log"));
        Ok(())
    }
}
