use std::{collections::BTreeMap, error::Error, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    catalog::{CatalogTestCase, KeyIndex},
    error::{ParseError, SeekerError},
    file_set::FileSetScanner,
    junit::ParsedTestCase,
    listener::BuildListener,
    status::ExecutionStatus,
    wrapper::{Attachment, TestCaseWrapper},
};

pub mod junit;

pub use junit::{JunitSuitesSeeker, JunitTestCasesSeeker};

/// Catalog test case id to its wrapped result. Only matched ids appear.
pub type ResultMap<T> = BTreeMap<i32, TestCaseWrapper<T>>;

/// Turns one report file into suites of some report format.
pub trait ReportParser {
    type Suite;

    fn name(&self) -> &'static str;

    /// An empty list means the file holds no suites, which is not an error.
    fn parse(&self, path: &Path) -> Result<Vec<Self::Suite>, ParseError>;
}

pub trait ResultSeeker {
    type Record;

    fn seek(&self, root: &Path) -> Result<ResultMap<Self::Record>, SeekerError>;
}

/// How a parsed test case is turned into the key compared against the catalog.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TestCaseKey {
    /// `classname.name`
    #[default]
    QualifiedName,
    /// Every method of a class folds into one catalog entry.
    ClassName,
    Name,
}

impl TestCaseKey {
    pub fn key_for(self, test_case: &ParsedTestCase) -> String {
        match self {
            TestCaseKey::QualifiedName => test_case.qualified_name(),
            TestCaseKey::ClassName => test_case.classname.clone(),
            TestCaseKey::Name => test_case.name.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeekerConfig {
    /// Comma-separated glob patterns relative to the scanned directory.
    pub includes: String,
    pub key_custom_field: String,
    #[serde(default)]
    pub test_case_key: TestCaseKey,
}

impl SeekerConfig {
    pub fn new<T: Into<String>, U: Into<String>>(includes: T, key_custom_field: U) -> Self {
        Self {
            includes: includes.into(),
            key_custom_field: key_custom_field.into(),
            test_case_key: TestCaseKey::default(),
        }
    }

    pub fn with_test_case_key(mut self, test_case_key: TestCaseKey) -> Self {
        self.test_case_key = test_case_key;
        self
    }
}

/// What one parsed record says about the catalog entry its key points at.
#[derive(Debug, Clone)]
pub(crate) struct Observation<T> {
    pub key: String,
    pub status: ExecutionStatus,
    pub notes: String,
    pub record: T,
}

pub(crate) struct ScanInputs<'a> {
    pub config: &'a SeekerConfig,
    pub catalog: &'a [CatalogTestCase],
    pub scanner: &'a dyn FileSetScanner,
    pub listener: &'a dyn BuildListener,
}

/// Shared scan loop: enumerate, parse each file, match observations, merge into wrappers.
///
/// Files are visited strictly in enumeration order. A file that fails to parse, or whose
/// attachment cannot be read, is reported to the listener and the scan goes on.
pub(crate) fn seek_reports<P, T, F>(
    root: &Path,
    inputs: ScanInputs,
    parser: &P,
    mut observe: F,
) -> Result<ResultMap<T>, SeekerError>
where
    P: ReportParser,
    F: FnMut(&P::Suite) -> Vec<Observation<T>>,
{
    let ScanInputs {
        config,
        catalog,
        scanner,
        listener,
    } = inputs;

    if config.key_custom_field.trim().is_empty() {
        return Err(SeekerError::BlankKeyCustomField);
    }

    let report_paths = scanner.scan(root, &config.includes)?;
    listener.info(&format!(
        "Found {} {} report file(s) matching `{}` in {}",
        report_paths.len(),
        parser.name(),
        config.includes,
        root.display()
    ));

    let index = KeyIndex::build(catalog, &config.key_custom_field);
    let mut results = ResultMap::new();

    for relative_path in report_paths {
        let path = root.join(&relative_path);
        let suites = match parser.parse(&path) {
            Ok(suites) => suites,
            Err(e) => {
                listener.warn(&format!("Skipping report: {}", error_chain(&e)));
                continue;
            }
        };

        let mut matched_ids = Vec::new();
        for suite in &suites {
            for observation in observe(suite) {
                let Some(test_case) = index.find(&observation.key) else {
                    listener.debug(&format!(
                        "{}: `{}` is not in the catalog",
                        relative_path.display(),
                        observation.key
                    ));
                    continue;
                };

                let wrapper = results
                    .entry(test_case.id)
                    .or_insert_with(|| TestCaseWrapper::new(test_case.clone()));
                wrapper.set_execution_status(wrapper.execution_status().merge(observation.status));
                wrapper.append_notes(&observation.notes);
                wrapper.add_record(observation.record);

                if !matched_ids.contains(&test_case.id) {
                    matched_ids.push(test_case.id);
                }
            }
        }

        if matched_ids.is_empty() {
            continue;
        }
        match Attachment::from_path(&path) {
            Ok(attachment) => {
                for id in matched_ids {
                    if let Some(wrapper) = results.get_mut(&id) {
                        wrapper.add_attachment(attachment.clone());
                    }
                }
            }
            Err(e) => listener.warn(&format!("Omitting attachment: {}", error_chain(&e))),
        }
    }

    listener.info(&format!(
        "Matched {} of {} catalog test case(s)",
        results.len(),
        catalog.len()
    ));

    Ok(results)
}

pub(crate) fn error_chain(error: &dyn Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use std::{fs, sync::Arc};

    use tempfile::tempdir;

    use super::*;
    use crate::{
        catalog::CustomField,
        file_set::GlobFileSetScanner,
        junit::{JunitReportParser, ParsedSuite},
        listener::RecordingListener,
        status::{test_case_notes, test_case_status},
    };

    /// Removes each report once it has been parsed, so it can no longer be read back.
    struct ConsumingParser(JunitReportParser);

    impl ReportParser for ConsumingParser {
        type Suite = ParsedSuite;

        fn name(&self) -> &'static str {
            self.0.name()
        }

        fn parse(&self, path: &Path) -> Result<Vec<ParsedSuite>, ParseError> {
            let suites = self.0.parse(path)?;
            fs::remove_file(path).unwrap();
            Ok(suites)
        }
    }

    fn observe(suite: &ParsedSuite) -> Vec<Observation<ParsedTestCase>> {
        suite
            .test_cases()
            .iter()
            .map(|test_case| Observation {
                key: test_case.qualified_name(),
                status: test_case_status(test_case),
                notes: test_case_notes(test_case),
                record: test_case.clone(),
            })
            .collect()
    }

    #[test]
    fn unreadable_attachment_is_omitted() {
        let temp_dir = tempdir().unwrap();
        fs::write(
            temp_dir.path().join("TEST-a.b.xml"),
            r#"<testsuite name="a.b"><testcase classname="a.b" name="C"><failure message="boom"/></testcase></testsuite>"#,
        )
        .unwrap();

        let config = SeekerConfig::new("TEST-*.xml", "key");
        let catalog = [CatalogTestCase::new(1, "TC 1")
            .with_custom_field(CustomField::new("key", "a.b.C"))];
        let listener = RecordingListener::new();
        let parser = ConsumingParser(JunitReportParser::new(Arc::new(listener.clone())));

        let found = seek_reports(
            temp_dir.path(),
            ScanInputs {
                config: &config,
                catalog: &catalog,
                scanner: &GlobFileSetScanner,
                listener: &listener,
            },
            &parser,
            observe,
        )
        .unwrap();

        assert_eq!(found.len(), 1);
        let wrapper = &found[&1];
        assert_eq!(wrapper.execution_status(), ExecutionStatus::Failed);
        assert!(wrapper.notes().contains("boom"));
        assert!(wrapper.attachments().is_empty());

        let warnings = listener.messages_at(log::Level::Warn);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].starts_with("Omitting attachment"));
        assert!(warnings[0].contains("TEST-a.b.xml"));
    }

    #[test]
    fn test_case_keys() {
        let test_case = ParsedTestCase::new("br.eti.kinoshita.junit.SampleTest", "testFails");
        assert_eq!(
            TestCaseKey::QualifiedName.key_for(&test_case),
            "br.eti.kinoshita.junit.SampleTest.testFails"
        );
        assert_eq!(
            TestCaseKey::ClassName.key_for(&test_case),
            "br.eti.kinoshita.junit.SampleTest"
        );
        assert_eq!(TestCaseKey::Name.key_for(&test_case), "testFails");
    }

    #[test]
    fn config_deserializes_with_default_key() {
        let config: SeekerConfig = serde_json::from_str(
            r#"{ "includes": "TEST-*.xml", "key_custom_field": "testCustomField" }"#,
        )
        .unwrap();
        assert_eq!(config, SeekerConfig::new("TEST-*.xml", "testCustomField"));

        let config: SeekerConfig = serde_json::from_str(
            r#"{ "includes": "", "key_custom_field": "k", "test_case_key": "class-name" }"#,
        )
        .unwrap();
        assert_eq!(config.test_case_key, TestCaseKey::ClassName);
    }
}
