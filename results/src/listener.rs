use std::sync::{Arc, Mutex, PoisonError};

use log::Level;

pub const LOG_TARGET: &str = "testlink_results";

/// Operator-visible sink for everything a scan wants to say but must not fail on.
pub trait BuildListener: Send + Sync {
    fn report(&self, level: Level, message: &str);

    fn debug(&self, message: &str) {
        self.report(Level::Debug, message);
    }

    fn info(&self, message: &str) {
        self.report(Level::Info, message);
    }

    fn warn(&self, message: &str) {
        self.report(Level::Warn, message);
    }
}

/// Forwards to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogListener;

impl BuildListener for LogListener {
    fn report(&self, level: Level, message: &str) {
        log::log!(target: LOG_TARGET, level, "{}", message);
    }
}

/// Keeps every message in memory. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct RecordingListener {
    records: Arc<Mutex<Vec<(Level, String)>>>,
}

impl RecordingListener {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn records(&self) -> Vec<(Level, String)> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn messages_at(&self, level: Level) -> Vec<String> {
        self.records()
            .into_iter()
            .filter(|(record_level, _)| *record_level == level)
            .map(|(_, message)| message)
            .collect()
    }
}

impl BuildListener for RecordingListener {
    fn report(&self, level: Level, message: &str) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((level, String::from(message)));
    }
}
