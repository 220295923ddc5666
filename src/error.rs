//! Error taxonomy for the import pipeline.
//!
//! Decode-stage variants abort the import before any rows are exposed.
//! [`ImportError::MissingRequiredMapping`] blocks progression past the mapping
//! step but leaves the session intact so the mapping can be fixed and retried.
//! Row-level defects are never errors; they surface as
//! [`crate::validate::ValidationStats`] counts.

use std::{io, path::PathBuf};

use thiserror::Error;

const BYTES_PER_MIB: f64 = 1024.0 * 1024.0;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Unsupported file type for '{name}': expected .csv, .xlsx or .xls")]
    UnsupportedFormat { name: String },

    #[error(
        "File is {:.2} MB ({size} bytes); the maximum allowed size is {:.2} MB",
        mib(.size),
        mib(.limit)
    )]
    FileTooLarge { size: u64, limit: u64 },

    #[error("Reading {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse file: {message}")]
    Parse { message: String },

    #[error("The file contains no data rows")]
    EmptyData,

    #[error("The file does not contain any named columns")]
    NoColumns,

    #[error("Please map the required fields: {}", .missing.join(", "))]
    MissingRequiredMapping { missing: Vec<&'static str> },

    #[error("Column '{column}' is not present in the imported file")]
    UnknownColumn { column: String },
}

fn mib(bytes: &u64) -> f64 {
    *bytes as f64 / BYTES_PER_MIB
}

impl ImportError {
    pub(crate) fn parse(message: impl Into<String>) -> Self {
        ImportError::Parse {
            message: message.into(),
        }
    }

    /// Decode-stage errors mean the file must be re-selected.
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            ImportError::UnsupportedFormat { .. }
                | ImportError::FileTooLarge { .. }
                | ImportError::Read { .. }
                | ImportError::Parse { .. }
                | ImportError::EmptyData
                | ImportError::NoColumns
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_too_large_reports_measured_size() {
        let err = ImportError::FileTooLarge {
            size: 6 * 1024 * 1024,
            limit: 5 * 1024 * 1024,
        };
        let message = err.to_string();
        assert!(message.contains("6.00 MB"), "{message}");
        assert!(message.contains("5.00 MB"), "{message}");
        assert!(err.is_decode_error());
    }

    #[test]
    fn missing_required_mapping_lists_labels() {
        let err = ImportError::MissingRequiredMapping {
            missing: vec!["Name", "Phone"],
        };
        assert_eq!(err.to_string(), "Please map the required fields: Name, Phone");
        assert!(!err.is_decode_error());
    }
}
