use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Target fields a source column can be mapped onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CanonicalField {
    Name,
    Phone,
    Gender,
    Age,
    FollowUpDate,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 5] = [
        CanonicalField::Name,
        CanonicalField::Phone,
        CanonicalField::Gender,
        CanonicalField::Age,
        CanonicalField::FollowUpDate,
    ];

    pub fn id(self) -> &'static str {
        match self {
            CanonicalField::Name => "name",
            CanonicalField::Phone => "phone",
            CanonicalField::Gender => "gender",
            CanonicalField::Age => "age",
            CanonicalField::FollowUpDate => "followUpDate",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CanonicalField::Name => "Name",
            CanonicalField::Phone => "Phone",
            CanonicalField::Gender => "Gender",
            CanonicalField::Age => "Age",
            CanonicalField::FollowUpDate => "Follow-up Date",
        }
    }

    pub fn required(self) -> bool {
        matches!(self, CanonicalField::Name | CanonicalField::Phone)
    }

    pub fn required_fields() -> impl Iterator<Item = CanonicalField> {
        Self::ALL.into_iter().filter(|field| field.required())
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for CanonicalField {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        CanonicalField::ALL
            .into_iter()
            .find(|field| field.id().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| {
                let known = CanonicalField::ALL
                    .iter()
                    .map(|field| field.id())
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("Unknown field '{trimmed}' (expected one of: {known})")
            })
    }
}
