use std::time::Duration;

use serde::Serialize;

/// Whether a nested outcome element was a `<failure>` or an `<error>`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeKind {
    Failure,
    Error,
}

/// A `<failure>` or `<error>` record nested under a test case.
///
/// Both kinds carry the same data, so errors are represented with this type as well.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub message: Option<String>,
    pub r#type: Option<String>,
    /// Element body, verbatim. Usually a stack trace.
    pub text: String,
}

impl Failure {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn r#type(&self) -> Option<&str> {
        self.r#type.as_deref()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Message, type, and text on separate lines, skipping the absent or empty ones.
    pub fn describe(&self) -> String {
        [self.message(), self.r#type(), Some(self.text())]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedTestCase {
    pub classname: String,
    pub name: String,
    pub time: Option<Duration>,
    pub failures: Vec<Failure>,
    pub errors: Vec<Failure>,
    pub system_out: Option<String>,
    pub system_err: Option<String>,
}

impl ParsedTestCase {
    pub fn new<T: Into<String>, U: Into<String>>(classname: T, name: U) -> Self {
        Self {
            classname: classname.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// `classname.name`, or just `name` when the report leaves the class name out.
    pub fn qualified_name(&self) -> String {
        if self.classname.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.classname, self.name)
        }
    }

    pub fn failures(&self) -> &[Failure] {
        &self.failures
    }

    pub fn errors(&self) -> &[Failure] {
        &self.errors
    }

    pub fn add_outcome(&mut self, kind: OutcomeKind, outcome: Failure) {
        match kind {
            OutcomeKind::Failure => self.failures.push(outcome),
            OutcomeKind::Error => self.errors.push(outcome),
        }
    }

    pub fn remove_failure(&mut self, failure: &Failure) -> bool {
        remove_first(&mut self.failures, failure)
    }

    pub fn remove_error(&mut self, error: &Failure) -> bool {
        remove_first(&mut self.errors, error)
    }

    pub fn is_passed(&self) -> bool {
        self.failures.is_empty() && self.errors.is_empty()
    }
}

pub(crate) fn remove_first<T: PartialEq>(items: &mut Vec<T>, item: &T) -> bool {
    match items.iter().position(|candidate| candidate == item) {
        Some(index) => {
            items.remove(index);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure(message: &str) -> Failure {
        Failure {
            message: Some(message.into()),
            r#type: Some("junit.framework.AssertionFailedError".into()),
            text: format!("junit.framework.AssertionFailedError: {message}\n"),
        }
    }

    #[test]
    fn qualified_name_joins_class_and_method() {
        let test_case = ParsedTestCase::new("a.b", "C");
        assert_eq!(test_case.qualified_name(), "a.b.C");
    }

    #[test]
    fn qualified_name_without_classname() {
        let test_case = ParsedTestCase::new("", "standalone");
        assert_eq!(test_case.qualified_name(), "standalone");
    }

    #[test]
    fn remove_failure_leaves_siblings() {
        let mut test_case = ParsedTestCase::new("a.b", "C");
        test_case.add_outcome(OutcomeKind::Failure, failure("first"));
        test_case.add_outcome(OutcomeKind::Failure, failure("second"));
        test_case.add_outcome(OutcomeKind::Error, failure("boom"));

        assert!(test_case.remove_failure(&failure("first")));
        assert_eq!(test_case.failures(), &[failure("second")]);
        assert_eq!(test_case.errors().len(), 1);

        assert!(!test_case.remove_failure(&failure("first")));
    }

    #[test]
    fn remove_error_empties_container() {
        let mut test_case = ParsedTestCase::new("a.b", "C");
        test_case.add_outcome(OutcomeKind::Error, failure("boom"));

        assert!(test_case.remove_error(&failure("boom")));
        assert!(test_case.errors().is_empty());
        assert!(test_case.is_passed());
    }

    #[test]
    fn describe_skips_absent_fields() {
        let outcome = Failure {
            message: None,
            r#type: Some("java.lang.Exception".into()),
            text: String::from("trace"),
        };
        assert_eq!(outcome.describe(), "java.lang.Exception\ntrace");
        assert_eq!(Failure::new().describe(), "");
    }
}
