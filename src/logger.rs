//! Console output levels for the converter.
//!
//! The run transcript (header, per-file lines, summary) is written by
//! `report::Reporter`. These macros carry diagnostics around it: `verbose!`
//! adds codec details with `--verbose`, `warn!` reports skipped entries on
//! stderr unless `--quiet` is set.

use std::sync::atomic::{AtomicBool, Ordering};

static QUIET_MODE: AtomicBool = AtomicBool::new(false);
static VERBOSE_MODE: AtomicBool = AtomicBool::new(false);

/// Sets both flags at once. Quiet wins over verbose.
pub fn init(quiet: bool, verbose: bool) {
    QUIET_MODE.store(quiet, Ordering::Relaxed);
    VERBOSE_MODE.store(verbose && !quiet, Ordering::Relaxed);
}

pub fn is_quiet() -> bool {
    QUIET_MODE.load(Ordering::Relaxed)
}

pub fn is_verbose() -> bool {
    VERBOSE_MODE.load(Ordering::Relaxed)
}

#[macro_export]
macro_rules! verbose {
    ($($arg:tt)*) => {
        if $crate::logger::is_verbose() {
            println!("  · {}", format!($($arg)*));
        }
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        if !$crate::logger::is_quiet() {
            eprintln!("Warning: {}", format!($($arg)*));
        }
    };
}
