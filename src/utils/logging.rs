//! Per-module switchable logging.
//!
//! Modules that log through these macros declare a `const ENABLE_LOGS: bool`
//! next to their imports; flipping it silences that module without touching
//! `RUST_LOG`.
//!
//! ```ignore
//! const ENABLE_LOGS: bool = true;
//!
//! use crate::{log_info, log_warn};
//!
//! log_info!("catalog search for {query:?} returned {} works", works.len());
//! ```

use log::LevelFilter;

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::debug!($($arg)*);
        }
    };
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::info!($($arg)*);
        }
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::warn!($($arg)*);
        }
    };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::error!($($arg)*);
        }
    };
}

/// Installs `env_logger`. `RUST_LOG` still wins over the default level;
/// `BOOKVERSE_DEBUG=1` lowers the default to `Debug`.
pub fn init_logging() {
    let debug_mode = std::env::var("BOOKVERSE_DEBUG")
        .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    let default_level = if debug_mode {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let _ = env_logger::Builder::new()
        .filter_level(default_level)
        .parse_default_env()
        .try_init();
}
