//! Logging Infrastructure
//!
//! Console output always; a daily rolling file when a log directory is configured.

use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Default filter when neither `RUST_LOG` nor a level is given
const DEFAULT_DIRECTIVES: &str = "pos_server=info,tower_http=info";

/// Initialize the logger with console output only
pub fn init_logger() {
    init_logger_with_file(None, None);
}

/// Initialize the logger with optional file output
///
/// `RUST_LOG` wins over `log_level`. Returns the appender guard when a file
/// writer is installed; it must be kept alive for the lifetime of the process.
pub fn init_logger_with_file(
    log_level: Option<&str>,
    log_dir: Option<&str>,
) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match log_level {
        Some(level) => EnvFilter::new(format!("pos_server={level},tower_http={level}")),
        None => EnvFilter::new(DEFAULT_DIRECTIVES),
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    if let Some(dir) = log_dir {
        let log_path = Path::new(dir);
        if log_path.exists()
            && let Some(dir_str) = log_path.to_str()
        {
            let file_appender = tracing_appender::rolling::daily(dir_str, "pos-server.log");
            let (writer, guard) = tracing_appender::non_blocking(file_appender);
            // try_init: tests may install a subscriber more than once
            let _ = builder.with_ansi(false).with_writer(writer).try_init();
            return Some(guard);
        }
        eprintln!("LOG_DIR {dir} does not exist, logging to console only");
    }

    let _ = builder.try_init();
    None
}
