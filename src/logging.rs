use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable naming a log file when neither the command line
/// nor the config file does.
pub const LOG_ENV: &str = "LITECODE_LOG";

/// Pick the log file: `--log-file`, then `logging.file`, then `LITECODE_LOG`.
pub fn log_path(cli: Option<&Path>, configured: Option<&Path>) -> Option<PathBuf> {
    cli.or(configured)
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os(LOG_ENV).map(PathBuf::from))
}

/// Install the global subscriber writing to `log_file`.
///
/// Logging is off when there is no file: the editor owns the tty in raw
/// mode, and log lines on stderr would land in the middle of the screen.
/// `RUST_LOG` wins over `default_level`. Returns whether logging is on.
pub fn init_tracing(default_level: &str, log_file: Option<&Path>) -> std::io::Result<bool> {
    let Some(path) = log_file else {
        return Ok(false);
    };
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let file_layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .with_level(true)
        .with_timer(fmt::time::UtcTime::rfc_3339());

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .init();
    Ok(true)
}
