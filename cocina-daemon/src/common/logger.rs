//! Logging Infrastructure
//!
//! Console logging always; daily rotating files when a log directory is
//! configured. Old log files are removed after 14 days.

use std::fs;
use std::path::{Path, PathBuf};

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Daily log files are named `comanda.YYYY-MM-DD`.
const LOG_FILE_PREFIX: &str = "comanda";

/// Days of log files to keep.
const LOG_RETENTION_DAYS: i64 = 14;

/// Initialize logging to the console only.
pub fn init_logger(level: &str) -> anyhow::Result<()> {
    init_logger_with_file(level, None)
}

/// Initialize logging with an optional daily rotating file
///
/// `RUST_LOG` overrides `level` when set. The file layer is plain text
/// without ANSI colors; a cleanup task removes files older than the
/// retention window.
///
/// # Examples
/// ```ignore
/// // Console only
/// init_logger_with_file("info", None)?;
///
/// // Console plus ./logs/comanda.YYYY-MM-DD
/// init_logger_with_file("info", Some("./logs"))?;
/// ```
pub fn init_logger_with_file(level: &str, log_dir: Option<&str>) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true);

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    if let Some(dir) = log_dir {
        let log_dir = Path::new(dir);
        fs::create_dir_all(log_dir)?;

        let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, LOG_FILE_PREFIX);
        let file_layer = fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .with_writer(std::sync::Mutex::new(file_appender));

        tokio::spawn(periodic_cleanup(log_dir.to_path_buf()));

        subscriber.with(file_layer).init();
    } else {
        subscriber.init();
    }

    Ok(())
}

/// Remove daily log files older than the retention window.
pub fn cleanup_old_logs(log_dir: &Path) -> anyhow::Result<()> {
    use chrono::{Local, TimeZone};

    let cutoff = Local::now() - chrono::Duration::days(LOG_RETENTION_DAYS);
    if !log_dir.exists() {
        return Ok(());
    }

    for entry in fs::read_dir(log_dir)? {
        let entry = entry?;
        let path = entry.path();

        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        // Rolling appender names files `comanda.YYYY-MM-DD`.
        let Some(date_part) = name.strip_prefix(LOG_FILE_PREFIX).and_then(|r| r.strip_prefix('.'))
        else {
            continue;
        };
        let Ok(date) = chrono::NaiveDate::parse_from_str(date_part, "%Y-%m-%d") else {
            continue;
        };

        if let Some(file_day) = Local
            .from_local_datetime(&date.and_time(chrono::NaiveTime::MIN))
            .single()
            && file_day < cutoff
        {
            fs::remove_file(&path)?;
            tracing::info!(file = %name, "Deleted old log file");
        }
    }

    Ok(())
}

/// Hourly cleanup driver, spawned when file logging is enabled.
async fn periodic_cleanup(log_dir: PathBuf) {
    use tokio::time::{Duration, sleep};

    loop {
        sleep(Duration::from_secs(3600)).await;

        if let Err(e) = cleanup_old_logs(&log_dir) {
            tracing::error!(error = %e, "Failed to cleanup old logs");
        }
    }
}
