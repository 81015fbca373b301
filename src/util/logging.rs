use std::fs::OpenOptions;
use std::path::Path;

use env_logger::{Builder, Env, Target};

/// Environment variable holding the log filter (env_logger syntax).
pub const LOG_ENV: &str = "TIMEWARP_LOG";

/// Route `log` output to `log_path`. The TUI owns the terminal, so nothing
/// may be written to stdout/stderr while it runs.
///
/// Failing to open the log file is not fatal: logging is simply disabled.
pub fn init(log_path: &Path) {
    let file = match OpenOptions::new().create(true).append(true).open(log_path) {
        Ok(f) => f,
        Err(_) => return,
    };
    let _ = Builder::from_env(Env::default().filter_or(LOG_ENV, "info"))
        .target(Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init();
}
