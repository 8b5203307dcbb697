use std::sync::{Arc, Mutex, Once};

use lazy_static::lazy_static;

#[derive(Debug, Clone, Default)]
struct MockLogger {
    pub logs: Arc<Mutex<Vec<(log::Level, String)>>>,
}

impl log::Log for MockLogger {
    fn enabled(&self, _: &log::Metadata) -> bool {
        true
    }
    fn flush(&self) {}
    fn log(&self, record: &log::Record) {
        self.logs
            .lock()
            .unwrap()
            .push((record.level(), record.args().to_string()));
    }
}

/// Installs a process-wide capturing logger on first use and returns its buffer.
///
/// Every test in the binary shares the buffer, so assert on contents, not on length.
pub fn mock_logger(max_level: Option<log::LevelFilter>) -> Arc<Mutex<Vec<(log::Level, String)>>> {
    lazy_static! {
        static ref MOCK_LOGGER: MockLogger = MockLogger::default();
    }
    static INSTALL: Once = Once::new();

    INSTALL.call_once(|| {
        log::set_logger(&*MOCK_LOGGER as &'static MockLogger).unwrap();
    });
    log::set_max_level(max_level.unwrap_or(log::LevelFilter::Debug));

    MOCK_LOGGER.logs.clone()
}
