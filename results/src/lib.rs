pub mod catalog;
pub mod error;
pub mod file_set;
pub mod junit;
pub mod listener;
pub mod seeker;
pub mod status;
pub mod wrapper;

pub use catalog::{CatalogTestCase, CustomField, KeyIndex};
pub use error::{AttachmentError, ParseError, ScanError, SeekerError};
pub use listener::{BuildListener, LogListener, RecordingListener};
pub use seeker::{
    JunitSuitesSeeker, JunitTestCasesSeeker, ReportParser, ResultMap, ResultSeeker, SeekerConfig,
    TestCaseKey,
};
pub use status::ExecutionStatus;
pub use wrapper::{Attachment, TestCaseWrapper};
