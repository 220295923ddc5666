//! Per-import state: the decoded dataset and the current mapping.
//!
//! A session only exists once a file decoded completely, so later stages never
//! see a partial row set. Mapping edits replace the whole mapping value.

use log::{debug, info};

use crate::{
    classify::classify,
    data::Dataset,
    decode::decode,
    error::ImportError,
    export::{ExportPayload, ImportMetadata, assemble},
    fields::CanonicalField,
    io_utils::{DecodeOptions, SourceFile},
    mapping::ColumnMapping,
    normalize::{NormalizedLead, project},
    validate::{ValidationStats, validate},
};

#[derive(Debug, Clone)]
pub struct ImportSession {
    source: SourceFile,
    dataset: Dataset,
    mapping: ColumnMapping,
}

impl ImportSession {
    /// Decodes `source` and seeds the mapping from the column classifier.
    pub fn open(source: SourceFile, options: &DecodeOptions) -> Result<Self, ImportError> {
        let dataset = decode(&source, options)?;
        let mapping = classify(&dataset.columns);
        info!(
            "Auto-mapped {} of {} column(s) in '{}'",
            mapping.len(),
            dataset.columns.len(),
            source.name
        );
        Ok(Self {
            source,
            dataset,
            mapping,
        })
    }

    pub fn source(&self) -> &SourceFile {
        &self.source
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn columns(&self) -> &[String] {
        &self.dataset.columns
    }

    pub fn mapping(&self) -> &ColumnMapping {
        &self.mapping
    }

    pub fn assign(
        &mut self,
        column: &str,
        field: Option<CanonicalField>,
    ) -> Result<&ColumnMapping, ImportError> {
        if !self.dataset.has_column(column) {
            return Err(ImportError::UnknownColumn {
                column: column.to_string(),
            });
        }
        debug!(
            "Assigning column '{column}' to {}",
            field.map_or("nothing", CanonicalField::id)
        );
        self.mapping = self.mapping.assign(column, field);
        Ok(&self.mapping)
    }

    /// Applies every override or none of them.
    pub fn apply_overrides(
        &mut self,
        overrides: &[(String, Option<CanonicalField>)],
    ) -> Result<&ColumnMapping, ImportError> {
        let mut next = self.mapping.clone();
        for (column, field) in overrides {
            if !self.dataset.has_column(column) {
                return Err(ImportError::UnknownColumn {
                    column: column.clone(),
                });
            }
            next = next.assign(column, *field);
        }
        self.mapping = next;
        Ok(&self.mapping)
    }

    pub fn stats(&self) -> ValidationStats {
        validate(&self.dataset.rows, &self.mapping)
    }

    pub fn preview(&self, limit: usize) -> Vec<NormalizedLead> {
        project(&self.dataset.rows, &self.mapping, limit)
    }

    pub fn ensure_required(&self) -> Result<(), ImportError> {
        self.mapping.ensure_required()
    }

    pub fn into_payload(self, metadata: ImportMetadata) -> Result<ExportPayload, ImportError> {
        assemble(self.source, &self.mapping, metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(contents: &str) -> ImportSession {
        let source = SourceFile::from_bytes("leads.csv", contents.as_bytes().to_vec());
        ImportSession::open(source, &DecodeOptions::default()).unwrap()
    }

    #[test]
    fn open_classifies_columns() {
        let session = session("Full Name,Mobile No,Sex,DOB\nAsha,98765,female,1990\n");
        let mapping = session.mapping();
        assert_eq!(mapping.field_for("Full Name"), Some(CanonicalField::Name));
        assert_eq!(mapping.field_for("Mobile No"), Some(CanonicalField::Phone));
        assert_eq!(mapping.field_for("Sex"), Some(CanonicalField::Gender));
        assert_eq!(mapping.field_for("DOB"), None);
    }

    #[test]
    fn assign_rejects_unknown_columns_and_keeps_mapping() {
        let mut session = session("Name,Phone\nAsha,1\n");
        let before = session.mapping().clone();
        let err = session.assign("Email", Some(CanonicalField::Name)).unwrap_err();
        assert!(matches!(err, ImportError::UnknownColumn { .. }));
        assert_eq!(session.mapping(), &before);
    }

    #[test]
    fn stats_follow_mapping_changes() {
        let mut session = session("Name,Phone,Alt\nAsha,,555\n");
        assert_eq!(session.stats().invalid_rows, 1);
        session.assign("Alt", Some(CanonicalField::Phone)).unwrap();
        let stats = session.stats();
        assert_eq!(stats.valid_rows, 1);
        assert_eq!(stats.missing_phone, 0);
    }

    #[test]
    fn failed_overrides_leave_mapping_untouched() {
        let mut session = session("Name,Phone\nAsha,1\n");
        let before = session.mapping().clone();
        let overrides = vec![
            ("Phone".to_string(), None),
            ("Missing".to_string(), Some(CanonicalField::Age)),
        ];
        assert!(session.apply_overrides(&overrides).is_err());
        assert_eq!(session.mapping(), &before);
    }

    #[test]
    fn payload_is_blocked_until_required_fields_are_mapped() {
        let mut session = session("Name,Phone\nAsha,1\n");
        session.assign("Phone", None).unwrap();
        assert!(session.ensure_required().is_err());
        session.assign("Phone", Some(CanonicalField::Phone)).unwrap();
        let payload = session.into_payload(ImportMetadata::default()).unwrap();
        assert_eq!(payload.file.name, "leads.csv");
    }
}
