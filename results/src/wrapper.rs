use std::{fs, path::Path};

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::Serialize;

use crate::{catalog::CatalogTestCase, error::AttachmentError, status::ExecutionStatus};

pub const REPORT_FILE_TYPE: &str = "text/xml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attachment {
    pub file_name: String,
    pub title: String,
    pub description: String,
    pub file_type: String,
    /// Base64, standard alphabet with padding.
    pub content: String,
}

impl Attachment {
    pub fn from_bytes<T: Into<String>>(file_name: T, bytes: &[u8]) -> Self {
        let file_name = file_name.into();
        Self {
            title: file_name.clone(),
            description: format!("Test report {file_name}"),
            file_name,
            file_type: String::from(REPORT_FILE_TYPE),
            content: encode_base64(bytes),
        }
    }

    /// Reads and encodes the whole file. The attachment is named after the file's base name.
    pub fn from_path(path: &Path) -> Result<Self, AttachmentError> {
        let bytes = fs::read(path).map_err(|source| AttachmentError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Ok(Self::from_bytes(file_name, &bytes))
    }

    pub fn decoded_content(&self) -> Result<Vec<u8>, base64::DecodeError> {
        STANDARD.decode(&self.content)
    }
}

pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// A catalog test case together with what the scanned reports say about it.
///
/// `T` is the parsed record type that produced the status, kept for traceability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestCaseWrapper<T> {
    test_case: CatalogTestCase,
    execution_status: ExecutionStatus,
    notes: String,
    attachments: Vec<Attachment>,
    records: Vec<T>,
}

impl<T> TestCaseWrapper<T> {
    pub fn new(test_case: CatalogTestCase) -> Self {
        Self {
            test_case,
            execution_status: ExecutionStatus::NotRun,
            notes: String::new(),
            attachments: Vec::new(),
            records: Vec::new(),
        }
    }

    pub fn id(&self) -> i32 {
        self.test_case.id
    }

    pub fn test_case(&self) -> &CatalogTestCase {
        &self.test_case
    }

    pub fn execution_status(&self) -> ExecutionStatus {
        self.execution_status
    }

    pub fn set_execution_status(&mut self, execution_status: ExecutionStatus) {
        self.execution_status = execution_status;
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    /// Appends a paragraph, separated from earlier notes by a blank line.
    pub fn append_notes(&mut self, notes: &str) {
        if notes.is_empty() {
            return;
        }
        if !self.notes.is_empty() {
            self.notes.push_str("\n\n");
        }
        self.notes.push_str(notes);
    }

    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    pub fn add_attachment(&mut self, attachment: Attachment) {
        self.attachments.push(attachment);
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn add_record(&mut self, record: T) {
        self.records.push(record);
    }
}
