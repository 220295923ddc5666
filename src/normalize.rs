//! Field normalization and the bounded preview projection.

use serde::{Serialize, Serializer, ser::SerializeMap};

use crate::{
    data::RawRow,
    dates::{format_minute, parse_date},
    fields::CanonicalField,
    mapping::ColumnMapping,
};

/// Placeholder gender used when a row supplies none; not ground truth.
pub const DEFAULT_GENDER: &str = "Male";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedLead {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub gender: String,
    pub age: Option<String>,
    pub follow_up_date: Option<String>,
    /// Unmapped source columns, trimmed, in source order.
    pub extra: Vec<(String, String)>,
}

impl Default for NormalizedLead {
    fn default() -> Self {
        Self {
            name: None,
            phone: None,
            gender: DEFAULT_GENDER.to_string(),
            age: None,
            follow_up_date: None,
            extra: Vec::new(),
        }
    }
}

impl NormalizedLead {
    pub fn get(&self, field: CanonicalField) -> Option<&str> {
        match field {
            CanonicalField::Name => self.name.as_deref(),
            CanonicalField::Phone => self.phone.as_deref(),
            CanonicalField::Gender => Some(self.gender.as_str()),
            CanonicalField::Age => self.age.as_deref(),
            CanonicalField::FollowUpDate => self.follow_up_date.as_deref(),
        }
    }

    fn set(&mut self, field: CanonicalField, value: String) {
        match field {
            CanonicalField::Name => self.name = Some(value),
            CanonicalField::Phone => self.phone = Some(value),
            CanonicalField::Gender => self.gender = value,
            CanonicalField::Age => self.age = Some(value),
            CanonicalField::FollowUpDate => self.follow_up_date = Some(value),
        }
    }

    pub fn extra_value(&self, column: &str) -> Option<&str> {
        self.extra
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }
}

impl Serialize for NormalizedLead {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let canonical = CanonicalField::ALL
            .into_iter()
            .filter_map(|field| self.get(field).map(|value| (field.id(), value)))
            .collect::<Vec<_>>();
        let mut map = serializer.serialize_map(None)?;
        for (key, value) in &canonical {
            map.serialize_entry(key, value)?;
        }
        for (column, value) in &self.extra {
            if canonical.iter().any(|(key, _)| *key == column.as_str()) {
                continue;
            }
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

pub fn normalize_value(field: CanonicalField, trimmed: String) -> String {
    match field {
        CanonicalField::FollowUpDate => match parse_date(&trimmed) {
            Some(parsed) => format_minute(&parsed),
            None => trimmed,
        },
        _ => trimmed,
    }
}

pub fn normalize_row(row: &RawRow, mapping: &ColumnMapping) -> NormalizedLead {
    let mut lead = NormalizedLead::default();
    for (column, cell) in row.iter() {
        match mapping.field_for(column) {
            Some(field) => {
                if cell.is_empty() {
                    continue;
                }
                let trimmed = cell.trimmed();
                // a blank gender keeps the placeholder
                if field == CanonicalField::Gender && trimmed.is_empty() {
                    continue;
                }
                lead.set(field, normalize_value(field, trimmed));
            }
            None => lead.extra.push((column.to_string(), cell.trimmed())),
        }
    }
    lead
}

/// Normalizes the first `limit` rows, preserving order.
pub fn project(rows: &[RawRow], mapping: &ColumnMapping, limit: usize) -> Vec<NormalizedLead> {
    rows.iter()
        .take(limit)
        .map(|row| normalize_row(row, mapping))
        .collect()
}
