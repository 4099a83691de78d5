use std::env;
use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Where log output may go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    /// CLI commands: stderr
    Stderr,
    /// The TUI owns the terminal, so only a file named by `RK_LOG_FILE` is used
    FileOnly,
}

fn filter() -> EnvFilter {
    EnvFilter::try_from_env("RK_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "remark=debug,warn"
        } else {
            "remark=warn"
        })
    })
}

/// Install the global subscriber. Safe to call more than once; later calls are ignored.
pub fn init(target: LogTarget) {
    let registry = tracing_subscriber::registry().with(filter());

    if let Ok(path) = env::var("RK_LOG_FILE")
        && let Ok(file) = OpenOptions::new().create(true).append(true).open(&path)
    {
        let _ = registry
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .try_init();
        return;
    }

    match target {
        LogTarget::Stderr => {
            let _ = registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .try_init();
        }
        LogTarget::FileOnly => {}
    }
}
