pub mod date_parser;
pub mod parser;
pub mod suite;
pub mod test_case;

pub use parser::{JunitParseIssue, JunitParser, JunitReportParser};
pub use suite::ParsedSuite;
pub use test_case::{Failure, OutcomeKind, ParsedTestCase};
