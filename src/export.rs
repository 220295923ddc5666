//! Packaging of an import for the ingestion endpoint.
//!
//! The payload is a two-part bundle: the untouched original file and a JSON
//! document carrying the [`ImportMetadata`] annex plus the effective column
//! mapping. Assembly refuses to run unless every required field is mapped.

use std::path::Path;

use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};

use crate::{error::ImportError, io_utils::SourceFile, mapping::ColumnMapping};

pub const FILE_PART: &str = "file";
pub const DATA_PART: &str = "data";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Treatment {
    pub treatment: String,
    #[serde(default)]
    pub sub_treatment: Option<String>,
}

/// Fixed-shape annex attached to every import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImportMetadata {
    pub treatments: Vec<Treatment>,
    pub source: String,
    pub custom_source: String,
    pub offer_tag: String,
    pub status: String,
    pub custom_status: String,
    pub note: String,
    pub follow_up_date: String,
    pub assigned_to: Vec<String>,
    pub segment_id: Option<String>,
}

impl ImportMetadata {
    /// Loads metadata from a YAML or JSON document.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Opening metadata file {path:?}"))?;
        serde_yaml::from_str(&contents)
            .with_context(|| format!("Parsing metadata file {path:?}"))
    }
}

/// JSON part of the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRequest {
    pub treatments: Vec<Treatment>,
    pub source: String,
    pub custom_source: String,
    pub offer_tag: String,
    pub status: String,
    pub custom_status: String,
    pub note: String,
    pub follow_up_date: String,
    pub assigned_to: Vec<String>,
    pub column_mapping: ColumnMapping,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segment_id: Option<String>,
}

impl ImportRequest {
    fn new(metadata: ImportMetadata, column_mapping: ColumnMapping) -> Self {
        let ImportMetadata {
            treatments,
            source,
            custom_source,
            offer_tag,
            status,
            custom_status,
            note,
            follow_up_date,
            assigned_to,
            segment_id,
        } = metadata;
        Self {
            treatments,
            source,
            custom_source,
            offer_tag,
            status,
            custom_status,
            note,
            follow_up_date,
            assigned_to,
            column_mapping,
            segment_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadPart<'a> {
    File { file_name: &'a str, bytes: &'a [u8] },
    Text(String),
}

#[derive(Debug, Clone)]
pub struct ExportPayload {
    pub file: SourceFile,
    pub request: ImportRequest,
}

impl ExportPayload {
    pub fn data_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.request)
    }

    /// Named multipart parts in submission order.
    pub fn parts(&self) -> serde_json::Result<Vec<(&'static str, PayloadPart<'_>)>> {
        Ok(vec![
            (
                FILE_PART,
                PayloadPart::File {
                    file_name: &self.file.name,
                    bytes: &self.file.bytes,
                },
            ),
            (DATA_PART, PayloadPart::Text(self.data_json()?)),
        ])
    }
}

pub fn assemble(
    file: SourceFile,
    mapping: &ColumnMapping,
    metadata: ImportMetadata,
) -> Result<ExportPayload, ImportError> {
    mapping.ensure_required()?;
    info!(
        "Assembled import payload for '{}' with {} mapped column(s)",
        file.name,
        mapping.len()
    );
    Ok(ExportPayload {
        file,
        request: ImportRequest::new(metadata, mapping.clone()),
    })
}
