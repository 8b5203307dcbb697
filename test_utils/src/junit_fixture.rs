use std::{
    fs,
    path::{Path, PathBuf},
};

use quick_junit::{NonSuccessKind, Report, TestCase, TestCaseStatus, TestSuite};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockOutcome {
    Passed,
    Failed { message: String, description: String },
    Errored { message: String, description: String },
}

impl MockOutcome {
    pub fn failed<T: Into<String>>(message: T) -> Self {
        let message = message.into();
        MockOutcome::Failed {
            description: format!("java.lang.AssertionError: {message}\n\tat Mock.java:1"),
            message,
        }
    }

    pub fn errored<T: Into<String>>(message: T) -> Self {
        let message = message.into();
        MockOutcome::Errored {
            description: format!("java.lang.Exception: {message}\n\tat Mock.java:1"),
            message,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MockTestCase {
    pub classname: String,
    pub name: String,
    pub outcome: MockOutcome,
}

impl MockTestCase {
    pub fn new<T: Into<String>, U: Into<String>>(classname: T, name: U, outcome: MockOutcome) -> Self {
        Self {
            classname: classname.into(),
            name: name.into(),
            outcome,
        }
    }
}

/// A `<testsuites>` report holding one suite with the given test cases.
pub fn mock_report(suite_name: &str, test_cases: &[MockTestCase]) -> Report {
    let mut test_suite = TestSuite::new(suite_name);
    for mock in test_cases {
        let status = match &mock.outcome {
            MockOutcome::Passed => TestCaseStatus::success(),
            MockOutcome::Failed {
                message,
                description,
            } => non_success(NonSuccessKind::Failure, message, description),
            MockOutcome::Errored {
                message,
                description,
            } => non_success(NonSuccessKind::Error, message, description),
        };
        let mut test_case = TestCase::new(mock.name.as_str(), status);
        test_case.set_classname(mock.classname.as_str());
        test_suite.add_test_case(test_case);
    }

    let mut report = Report::new(suite_name);
    report.add_test_suite(test_suite);
    report
}

fn non_success(kind: NonSuccessKind, message: &str, description: &str) -> TestCaseStatus {
    let r#type = match kind {
        NonSuccessKind::Failure => "java.lang.AssertionError",
        NonSuccessKind::Error => "java.lang.Exception",
    };
    let mut status = TestCaseStatus::non_success(kind);
    status.set_message(message);
    status.set_type(r#type);
    status.set_description(description);
    status
}

pub fn write_report<P: AsRef<Path>>(dir: P, file_name: &str, report: &Report) -> PathBuf {
    let mut serialized = Vec::new();
    report.serialize(&mut serialized).unwrap();
    let path = dir.as_ref().join(file_name);
    fs::write(&path, serialized).unwrap();
    path
}
