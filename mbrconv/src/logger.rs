// Global logging system for the conversion planner

use alloc::vec::Vec;
use spin::Mutex;

const MAX_LOG_ENTRIES: usize = 64;

/// Fixed ring of the most recent messages.
struct LogRing {
    entries: [Option<&'static str>; MAX_LOG_ENTRIES],
    /// Total messages ever logged; also the next write position modulo capacity.
    total: usize,
}

impl LogRing {
    const fn new() -> Self {
        Self {
            entries: [None; MAX_LOG_ENTRIES],
            total: 0,
        }
    }

    fn push(&mut self, message: &'static str) {
        self.entries[self.total % MAX_LOG_ENTRIES] = Some(message);
        self.total = self.total.wrapping_add(1);
    }

    fn retained(&self) -> usize {
        self.total.min(MAX_LOG_ENTRIES)
    }
}

static LOG: Mutex<LogRing> = Mutex::new(LogRing::new());

pub fn log(message: &'static str) {
    LOG.lock().push(message);
}

/// Copy of the retained messages, oldest first.
pub fn get_logs() -> Vec<&'static str> {
    let ring = LOG.lock();
    let retained = ring.retained();
    let first = ring.total - retained;

    (first..ring.total)
        .filter_map(|n| ring.entries[n % MAX_LOG_ENTRIES])
        .collect()
}

/// Number of messages logged since start (or the last clear), including
/// ones already overwritten.
pub fn log_count() -> usize {
    LOG.lock().total
}

pub fn clear_logs() {
    *LOG.lock() = LogRing::new();
}

// Macro for easier logging
#[macro_export]
macro_rules! log_info {
    ($msg:expr) => {
        $crate::logger::log($msg)
    };
}

// Legalizer step tracing, compiled out unless `plan_debug` is on
#[macro_export]
macro_rules! log_trace {
    ($msg:expr) => {{
        #[cfg(feature = "plan_debug")]
        $crate::logger::log($msg);
    }};
}
