use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
    sync::Arc,
};

use quick_xml::{
    events::{BytesStart, BytesText, Event},
    Reader,
};
use thiserror::Error;

use super::{
    suite::ParsedSuite,
    test_case::{Failure, OutcomeKind, ParsedTestCase},
};
use crate::{error::ParseError, listener::BuildListener, seeker::ReportParser};

const TAG_REPORT: &[u8] = b"testsuites";
const TAG_TEST_SUITE: &[u8] = b"testsuite";
const TAG_TEST_CASE: &[u8] = b"testcase";
const TAG_TEST_CASE_FAILURE: &[u8] = b"failure";
const TAG_TEST_CASE_ERROR: &[u8] = b"error";
const TAG_SYSTEM_OUT: &[u8] = b"system-out";
const TAG_SYSTEM_ERR: &[u8] = b"system-err";

/// Structural defects the parser recovers from. They never abort a parse.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JunitParseIssue {
    #[error("root element `{0}` is not a test suite")]
    UnrecognizedRoot(String),
    #[error("no test suites found")]
    TestSuiteNotFound,
    #[error("test suite `{0}` was never closed")]
    TestSuiteEndTagNotFound(String),
    #[error("test case found without a test suite")]
    TestCaseTestSuiteNotFound,
    #[error("test case end tag found without start tag")]
    TestCaseStartTagNotFound,
    #[error("{0:?} found without a test case")]
    OutcomeTestCaseNotFound(OutcomeKind),
    #[error("text content could not be unescaped")]
    TextUnescape,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Text {
    SystemOut,
    SystemErr,
}

/// Streaming JUnit parser. Feed it one document with [`JunitParser::parse`], then collect
/// the suites and whatever issues were recovered from along the way.
#[derive(Debug, Clone, Default)]
pub struct JunitParser {
    issues: Vec<JunitParseIssue>,
    suites: Vec<ParsedSuite>,
    root_seen: bool,
    ignore_document: bool,
    open_suites: Vec<ParsedSuite>,
    current_test_case: Option<ParsedTestCase>,
    current_outcome: Option<(OutcomeKind, Failure)>,
    current_text: Option<(Text, String)>,
}

impl JunitParser {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn issues(&self) -> &[JunitParseIssue] {
        &self.issues
    }

    pub fn suites(&self) -> &[ParsedSuite] {
        &self.suites
    }

    pub fn into_suites(self) -> Vec<ParsedSuite> {
        self.suites
    }

    pub fn parse<R: BufRead>(&mut self, xml: R) -> Result<(), quick_xml::Error> {
        let mut reader = Reader::from_reader(xml);

        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Eof => break,
                event => self.match_event(event),
            }
            buf.clear();
        }

        self.finish();
        Ok(())
    }

    fn match_event(&mut self, event: Event) {
        if self.ignore_document {
            return;
        }
        match event {
            Event::Start(e) => {
                if self.accept_root(&e) {
                    self.open_element(&e);
                }
            }
            Event::Empty(e) => {
                if self.accept_root(&e) {
                    self.open_element(&e);
                    self.close_element(e.local_name().as_ref());
                }
            }
            Event::End(e) => self.close_element(e.local_name().as_ref()),
            Event::Text(e) => self.match_text(&e),
            Event::CData(e) => self.push_text(&String::from_utf8_lossy(&e)),
            _ => (),
        }
    }

    fn accept_root(&mut self, e: &BytesStart) -> bool {
        if self.root_seen {
            return true;
        }
        self.root_seen = true;
        match e.local_name().as_ref() {
            TAG_REPORT | TAG_TEST_SUITE => true,
            other => {
                self.issues.push(JunitParseIssue::UnrecognizedRoot(
                    String::from_utf8_lossy(other).into_owned(),
                ));
                self.ignore_document = true;
                false
            }
        }
    }

    fn open_element(&mut self, e: &BytesStart) {
        match e.local_name().as_ref() {
            TAG_TEST_SUITE => self.open_test_suite(e),
            TAG_TEST_CASE => self.open_test_case(e),
            TAG_TEST_CASE_FAILURE => self.open_outcome(OutcomeKind::Failure, e),
            TAG_TEST_CASE_ERROR => self.open_outcome(OutcomeKind::Error, e),
            TAG_SYSTEM_OUT => self.current_text = Some((Text::SystemOut, String::new())),
            TAG_SYSTEM_ERR => self.current_text = Some((Text::SystemErr, String::new())),
            _ => (),
        }
    }

    fn close_element(&mut self, name: &[u8]) {
        match name {
            TAG_TEST_SUITE => self.close_test_suite(),
            TAG_TEST_CASE => self.close_test_case(),
            TAG_TEST_CASE_FAILURE | TAG_TEST_CASE_ERROR => self.close_outcome(),
            TAG_SYSTEM_OUT | TAG_SYSTEM_ERR => self.close_text(),
            _ => (),
        }
    }

    fn open_test_suite(&mut self, e: &BytesStart) {
        let mut test_suite = ParsedSuite::new(parse_attr::string(e, "name").unwrap_or_default());
        test_suite.hostname = parse_attr::string(e, "hostname").unwrap_or_default();
        test_suite.timestamp = parse_attr::string(e, "timestamp").unwrap_or_default();
        test_suite.tests = parse_attr::string(e, "tests").unwrap_or_default();
        test_suite.failures = parse_attr::number(e, "failures").unwrap_or_default();
        test_suite.errors = parse_attr::number(e, "errors").unwrap_or_default();
        self.open_suites.push(test_suite);
    }

    fn close_test_suite(&mut self) {
        // Nested suites are flattened, innermost first.
        if let Some(test_suite) = self.open_suites.pop() {
            self.suites.push(test_suite);
        }
    }

    fn open_test_case(&mut self, e: &BytesStart) {
        let mut test_case = ParsedTestCase::new(
            parse_attr::string(e, "classname").unwrap_or_default(),
            parse_attr::string(e, "name").unwrap_or_default(),
        );
        test_case.time = parse_attr::time(e);
        self.current_test_case = Some(test_case);
    }

    fn close_test_case(&mut self) {
        let Some(test_case) = self.current_test_case.take() else {
            self.issues.push(JunitParseIssue::TestCaseStartTagNotFound);
            return;
        };
        match self.open_suites.last_mut() {
            Some(test_suite) => test_suite.add_test_case(test_case),
            None => self.issues.push(JunitParseIssue::TestCaseTestSuiteNotFound),
        }
    }

    fn open_outcome(&mut self, kind: OutcomeKind, e: &BytesStart) {
        if self.current_test_case.is_none() {
            self.issues
                .push(JunitParseIssue::OutcomeTestCaseNotFound(kind));
            return;
        }
        let outcome = Failure {
            message: parse_attr::string(e, "message"),
            r#type: parse_attr::string(e, "type"),
            text: String::new(),
        };
        self.current_outcome = Some((kind, outcome));
    }

    fn close_outcome(&mut self) {
        if let (Some(test_case), Some((kind, outcome))) =
            (self.current_test_case.as_mut(), self.current_outcome.take())
        {
            test_case.add_outcome(kind, outcome);
        }
    }

    fn match_text(&mut self, e: &BytesText) {
        if self.current_text.is_none() && self.current_outcome.is_none() {
            return;
        }
        match e.unescape() {
            Ok(text) => self.push_text(&text),
            Err(_) => {
                self.issues.push(JunitParseIssue::TextUnescape);
                self.push_text(&String::from_utf8_lossy(e));
            }
        }
    }

    fn push_text(&mut self, text: &str) {
        if let Some((_, value)) = self.current_text.as_mut() {
            value.push_str(text);
        } else if let Some((_, outcome)) = self.current_outcome.as_mut() {
            outcome.text.push_str(text);
        }
    }

    fn close_text(&mut self) {
        let Some((target, value)) = self.current_text.take() else {
            return;
        };
        if let Some(test_case) = self.current_test_case.as_mut() {
            match target {
                Text::SystemOut => test_case.system_out = Some(value),
                Text::SystemErr => test_case.system_err = Some(value),
            }
        } else if let Some(test_suite) = self.open_suites.last_mut() {
            match target {
                Text::SystemOut => test_suite.system_out = Some(value),
                Text::SystemErr => test_suite.system_err = Some(value),
            }
        }
    }

    fn finish(&mut self) {
        // A truncated document still yields whatever was read before the cut.
        self.close_outcome();
        if self.current_test_case.is_some() {
            self.close_test_case();
        }
        while let Some(test_suite) = self.open_suites.pop() {
            self.issues.push(JunitParseIssue::TestSuiteEndTagNotFound(
                test_suite.name.clone(),
            ));
            self.suites.push(test_suite);
        }
        if self.suites.is_empty() && !self.ignore_document {
            self.issues.push(JunitParseIssue::TestSuiteNotFound);
        }
    }
}

/// [`ReportParser`] for JUnit XML files. Recovered issues go to the listener at debug level.
#[derive(Clone)]
pub struct JunitReportParser {
    listener: Arc<dyn BuildListener>,
}

impl JunitReportParser {
    pub fn new(listener: Arc<dyn BuildListener>) -> Self {
        Self { listener }
    }
}

impl ReportParser for JunitReportParser {
    type Suite = ParsedSuite;

    fn name(&self) -> &'static str {
        "JUnit"
    }

    fn parse(&self, path: &Path) -> Result<Vec<ParsedSuite>, ParseError> {
        let file = File::open(path).map_err(|source| ParseError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut junit_parser = JunitParser::new();
        junit_parser
            .parse(BufReader::new(file))
            .map_err(|source| ParseError::Xml {
                path: path.to_path_buf(),
                source,
            })?;

        for issue in junit_parser.issues() {
            self.listener
                .debug(&format!("{}: {}", path.display(), issue));
        }

        Ok(junit_parser.into_suites())
    }
}

mod parse_attr {
    use std::{str::FromStr, time::Duration};

    use quick_xml::events::BytesStart;

    pub fn string(e: &BytesStart, attr_name: &'static str) -> Option<String> {
        e.try_get_attribute(attr_name)
            .ok()
            .flatten()
            .and_then(|attr| attr.unescape_value().ok())
            .map(|value| value.into_owned())
    }

    pub fn number<T: FromStr>(e: &BytesStart, attr_name: &'static str) -> Option<T> {
        string(e, attr_name).and_then(|value| value.trim().parse::<T>().ok())
    }

    pub fn time(e: &BytesStart) -> Option<Duration> {
        number::<f64>(e, "time").and_then(|seconds| Duration::try_from_secs_f64(seconds).ok())
    }
}
