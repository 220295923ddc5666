//! Source column to canonical field assignment.
//!
//! A [`ColumnMapping`] never lets two columns target the same field: every
//! write goes through [`ColumnMapping::assign`], which evicts the previous
//! holder of the field before recording the new one. Assignment returns a new
//! mapping instead of editing in place, so a reader holding the old value never
//! sees a half-applied change.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{error::ImportError, fields::CanonicalField};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, CanonicalField>",
    into = "BTreeMap<String, CanonicalField>"
)]
pub struct ColumnMapping {
    assignments: BTreeMap<String, CanonicalField>,
}

impl ColumnMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the mapping with `column` pointed at `field` (or unmapped when
    /// `field` is `None`).
    #[must_use]
    pub fn assign(&self, column: &str, field: Option<CanonicalField>) -> ColumnMapping {
        let mut assignments = self.assignments.clone();
        assignments.remove(column);
        if let Some(field) = field {
            assignments.retain(|_, existing| *existing != field);
            assignments.insert(column.to_string(), field);
        }
        ColumnMapping { assignments }
    }

    pub fn field_for(&self, column: &str) -> Option<CanonicalField> {
        self.assignments.get(column).copied()
    }

    pub fn column_for(&self, field: CanonicalField) -> Option<&str> {
        self.assignments
            .iter()
            .find(|(_, existing)| **existing == field)
            .map(|(column, _)| column.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, CanonicalField)> {
        self.assignments
            .iter()
            .map(|(column, field)| (column.as_str(), *field))
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn missing_required(&self) -> Vec<CanonicalField> {
        CanonicalField::required_fields()
            .filter(|field| self.column_for(*field).is_none())
            .collect()
    }

    pub fn ensure_required(&self) -> Result<(), ImportError> {
        let missing = self.missing_required();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ImportError::MissingRequiredMapping {
                missing: missing.into_iter().map(CanonicalField::label).collect(),
            })
        }
    }
}

impl From<BTreeMap<String, CanonicalField>> for ColumnMapping {
    fn from(raw: BTreeMap<String, CanonicalField>) -> Self {
        raw.into_iter()
            .fold(ColumnMapping::new(), |mapping, (column, field)| {
                mapping.assign(&column, Some(field))
            })
    }
}

impl From<ColumnMapping> for BTreeMap<String, CanonicalField> {
    fn from(mapping: ColumnMapping) -> Self {
        mapping.assignments
    }
}

impl<'a> FromIterator<(&'a str, CanonicalField)> for ColumnMapping {
    fn from_iter<I: IntoIterator<Item = (&'a str, CanonicalField)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(ColumnMapping::new(), |mapping, (column, field)| {
                mapping.assign(column, Some(field))
            })
    }
}
