use serde::{Deserialize, Serialize};

use crate::junit::{ParsedSuite, ParsedTestCase};

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionStatus {
    #[default]
    NotRun,
    Passed,
    Failed,
    Blocked,
}

impl ExecutionStatus {
    /// Single-letter code used by the test-management API.
    pub fn code(self) -> char {
        match self {
            ExecutionStatus::NotRun => 'n',
            ExecutionStatus::Passed => 'p',
            ExecutionStatus::Failed => 'f',
            ExecutionStatus::Blocked => 'b',
        }
    }

    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'n' => Some(ExecutionStatus::NotRun),
            'p' => Some(ExecutionStatus::Passed),
            'f' => Some(ExecutionStatus::Failed),
            'b' => Some(ExecutionStatus::Blocked),
            _ => None,
        }
    }

    pub fn is_failure(self) -> bool {
        matches!(self, ExecutionStatus::Failed | ExecutionStatus::Blocked)
    }

    /// Folds a later observation into this one.
    ///
    /// Any failure beats a pass, a pass never replaces a failure, and between `Failed` and
    /// `Blocked` the later one is kept. `NotRun` carries no evidence and never wins.
    pub fn merge(self, next: ExecutionStatus) -> ExecutionStatus {
        match (self, next) {
            (previous, ExecutionStatus::NotRun) => previous,
            (previous, ExecutionStatus::Passed) if previous.is_failure() => previous,
            (_, next) => next,
        }
    }
}

pub fn test_case_status(test_case: &ParsedTestCase) -> ExecutionStatus {
    if !test_case.errors().is_empty() {
        ExecutionStatus::Blocked
    } else if !test_case.failures().is_empty() {
        ExecutionStatus::Failed
    } else {
        ExecutionStatus::Passed
    }
}

/// Failures first, then errors, one paragraph each.
pub fn test_case_notes(test_case: &ParsedTestCase) -> String {
    test_case
        .failures()
        .iter()
        .chain(test_case.errors())
        .map(|outcome| outcome.describe())
        .filter(|paragraph| !paragraph.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// `Passed` for a suite without test cases.
pub fn suite_status(suite: &ParsedSuite) -> ExecutionStatus {
    suite
        .test_cases()
        .iter()
        .map(test_case_status)
        .fold(ExecutionStatus::Passed, |status, next| {
            // Within one suite a block outranks a failure regardless of order.
            match (status, next) {
                (ExecutionStatus::Blocked, _) => ExecutionStatus::Blocked,
                (status, next) => status.merge(next),
            }
        })
}

pub fn suite_notes(suite: &ParsedSuite) -> String {
    let mut header = vec![format!("Test suite: {}", suite.name)];
    if !suite.hostname.is_empty() {
        header.push(format!("Hostname: {}", suite.hostname));
    }
    if !suite.timestamp.is_empty() {
        header.push(format!("Timestamp: {}", suite.timestamp));
    }
    header.push(format!(
        "Tests: {}, failures: {}, errors: {}",
        if suite.tests.is_empty() {
            suite.test_cases().len().to_string()
        } else {
            suite.tests.clone()
        },
        suite.failures,
        suite.errors
    ));

    let mut paragraphs = vec![header.join("\n")];
    for test_case in suite.test_cases() {
        let notes = test_case_notes(test_case);
        if !notes.is_empty() {
            paragraphs.push(format!("{}\n{}", test_case.qualified_name(), notes));
        }
    }
    if let Some(system_out) = suite.system_out.as_deref().filter(|out| !out.is_empty()) {
        paragraphs.push(format!("System out:\n{system_out}"));
    }
    if let Some(system_err) = suite.system_err.as_deref().filter(|err| !err.is_empty()) {
        paragraphs.push(format!("System err:\n{system_err}"));
    }
    paragraphs.join("\n\n")
}
