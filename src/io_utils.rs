//! Input handling shared by the decoder backends.
//!
//! - **Format gate**: only `.csv`, `.xlsx` and `.xls` names are accepted.
//! - **Size gate**: files above [`MAX_FILE_BYTES`] (or the configured limit)
//!   are refused before any byte is parsed; [`SourceFile::open`] checks the
//!   on-disk length before reading.
//! - **Encoding**: delimited text is decoded via `encoding_rs`, defaulting to
//!   UTF-8 with BOM sniffing.

use std::{fs, path::Path};

use csv::Trim;
use encoding_rs::{Encoding, UTF_8};

use crate::error::ImportError;

pub const MAX_FILE_BYTES: u64 = 5 * 1024 * 1024;
pub const CSV_DELIMITER: u8 = b',';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Xlsx,
    Xls,
}

impl SourceFormat {
    pub fn from_name(name: &str) -> Result<Self, ImportError> {
        let extension = Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        match extension.to_ascii_lowercase().as_str() {
            "csv" => Ok(SourceFormat::Csv),
            "xlsx" => Ok(SourceFormat::Xlsx),
            "xls" => Ok(SourceFormat::Xls),
            _ => Err(ImportError::UnsupportedFormat {
                name: name.to_string(),
            }),
        }
    }

    pub fn is_workbook(self) -> bool {
        matches!(self, SourceFormat::Xlsx | SourceFormat::Xls)
    }
}

#[derive(Debug, Clone)]
pub struct DecodeOptions {
    pub max_bytes: u64,
    /// Encoding label for delimited text; `None` means UTF-8.
    pub input_encoding: Option<String>,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_bytes: MAX_FILE_BYTES,
            input_encoding: None,
        }
    }
}

impl DecodeOptions {
    pub fn ensure_size(&self, size: u64) -> Result<(), ImportError> {
        if size > self.max_bytes {
            Err(ImportError::FileTooLarge {
                size,
                limit: self.max_bytes,
            })
        } else {
            Ok(())
        }
    }
}

/// The uploaded file: its name (for format detection) and raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl SourceFile {
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Reads `path` after the format and size gates pass.
    pub fn open(path: &Path, options: &DecodeOptions) -> Result<Self, ImportError> {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        SourceFormat::from_name(&name)?;
        let read_error = |source| ImportError::Read {
            path: path.to_path_buf(),
            source,
        };
        let size = fs::metadata(path).map_err(read_error)?.len();
        options.ensure_size(size)?;
        let bytes = fs::read(path).map_err(read_error)?;
        Ok(Self { name, bytes })
    }

    pub fn format(&self) -> Result<SourceFormat, ImportError> {
        SourceFormat::from_name(&self.name)
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding, ImportError> {
    match label {
        Some(value) => Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| ImportError::parse(format!("Unknown encoding '{value}'"))),
        None => Ok(UTF_8),
    }
}

/// Decodes text, stripping a BOM if present.
pub fn decode_text(bytes: &[u8], encoding: &'static Encoding) -> Result<String, ImportError> {
    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        Err(ImportError::parse(format!(
            "Failed to decode text with encoding {}",
            used.name()
        )))
    } else {
        Ok(text.into_owned())
    }
}

pub fn open_csv_reader(text: &str) -> csv::Reader<&[u8]> {
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(false)
        .delimiter(CSV_DELIMITER)
        .double_quote(true)
        .flexible(true)
        .trim(Trim::None);
    builder.from_reader(text.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extensions_are_case_insensitive() {
        assert_eq!(SourceFormat::from_name("leads.CSV").unwrap(), SourceFormat::Csv);
        assert_eq!(
            SourceFormat::from_name("book.xlsx").unwrap(),
            SourceFormat::Xlsx
        );
        assert!(SourceFormat::from_name("legacy.XLS").unwrap().is_workbook());
    }

    #[test]
    fn other_extensions_are_unsupported() {
        for name in ["leads.txt", "leads", "leads.csv.bak", "report.ods"] {
            assert!(matches!(
                SourceFormat::from_name(name),
                Err(ImportError::UnsupportedFormat { .. })
            ));
        }
    }

    #[test]
    fn size_gate_allows_exact_limit() {
        let options = DecodeOptions::default();
        assert!(options.ensure_size(MAX_FILE_BYTES).is_ok());
        assert!(matches!(
            options.ensure_size(MAX_FILE_BYTES + 1),
            Err(ImportError::FileTooLarge { size, .. }) if size == MAX_FILE_BYTES + 1
        ));
    }

    #[test]
    fn decode_text_strips_utf8_bom() {
        let bytes = b"\xEF\xBB\xBFName\n";
        assert_eq!(decode_text(bytes, UTF_8).unwrap(), "Name\n");
    }

    #[test]
    fn decode_text_honours_legacy_encodings() {
        let encoding = resolve_encoding(Some("windows-1252")).unwrap();
        assert_eq!(decode_text(b"Jos\xE9", encoding).unwrap(), "José");
        assert!(resolve_encoding(Some("not-an-encoding")).is_err());
    }
}
