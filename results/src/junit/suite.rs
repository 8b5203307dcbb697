use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use super::date_parser::ReportDateParser;
use super::test_case::{remove_first, ParsedTestCase};

/// One `<testsuite>` element with its counters, captured output, and test cases.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedSuite {
    pub name: String,
    pub hostname: String,
    /// Raw `timestamp` attribute. See [`ParsedSuite::parsed_timestamp`].
    pub timestamp: String,
    /// Kept as reported, since some producers write non-numeric values here.
    pub tests: String,
    pub failures: u64,
    pub errors: u64,
    pub system_out: Option<String>,
    pub system_err: Option<String>,
    pub test_cases: Vec<ParsedTestCase>,
}

impl ParsedSuite {
    pub fn new<T: Into<String>>(name: T) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn test_cases(&self) -> &[ParsedTestCase] {
        &self.test_cases
    }

    pub fn add_test_case(&mut self, test_case: ParsedTestCase) {
        self.test_cases.push(test_case);
    }

    pub fn remove_test_case(&mut self, test_case: &ParsedTestCase) -> bool {
        remove_first(&mut self.test_cases, test_case)
    }

    pub fn parsed_timestamp(&self) -> Option<DateTime<FixedOffset>> {
        if self.timestamp.is_empty() {
            return None;
        }
        ReportDateParser::default().parse_date(&self.timestamp)
    }
}
