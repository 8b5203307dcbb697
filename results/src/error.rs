use std::{io, path::PathBuf};

use thiserror::Error;

/// A report file that could not be read as markup at all.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("could not read report {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("report {path:?} is not well-formed XML")]
    Xml {
        path: PathBuf,
        #[source]
        source: quick_xml::Error,
    },
}

impl ParseError {
    pub fn path(&self) -> &PathBuf {
        match self {
            ParseError::Io { path, .. } | ParseError::Xml { path, .. } => path,
        }
    }
}

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("root directory {0:?} does not exist")]
    RootNotFound(PathBuf),
    #[error("root {0:?} is not a directory")]
    NotADirectory(PathBuf),
    #[error("invalid include pattern `{pattern}`")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
    #[error("root {0:?} is not valid UTF-8")]
    NonUtf8Root(PathBuf),
    #[error("matched {0:?} outside the root directory")]
    OutsideRoot(PathBuf),
    #[error("could not scan directory")]
    Glob(#[from] glob::GlobError),
}

/// Aborts a scan. No partial results accompany it.
#[derive(Error, Debug)]
pub enum SeekerError {
    #[error("failed to enumerate report files")]
    Scan(#[from] ScanError),
    #[error("key custom field name must not be blank")]
    BlankKeyCustomField,
}

#[derive(Error, Debug)]
pub enum AttachmentError {
    #[error("could not read {path:?} for attachment")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
