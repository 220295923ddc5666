//! Automatic first-guess mapping from column headers.
//!
//! Rules are checked in declaration order and the first rule with a keyword
//! contained in the lower-cased header wins. Classification only ever runs when
//! a file is decoded; later changes are manual.

use log::debug;

use crate::{fields::CanonicalField, mapping::ColumnMapping};

const CLASSIFIER_RULES: &[(&[&str], CanonicalField)] = &[
    (&["name", "fullname", "full name"], CanonicalField::Name),
    (&["phone", "mobile", "contact"], CanonicalField::Phone),
    (&["gender", "sex"], CanonicalField::Gender),
    (&["age", "year"], CanonicalField::Age),
    (
        &[
            "follow",
            "followup",
            "follow-up",
            "date",
            "followup_date",
            "next_followup",
        ],
        CanonicalField::FollowUpDate,
    ),
];

pub fn classify_column(column: &str) -> Option<CanonicalField> {
    let lowered = column.trim().to_lowercase();
    CLASSIFIER_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|keyword| lowered.contains(keyword)))
        .map(|(_, field)| *field)
}

/// Builds the initial mapping; when several columns match the same field the
/// last one wins.
pub fn classify(columns: &[String]) -> ColumnMapping {
    columns.iter().fold(ColumnMapping::new(), |mapping, column| {
        match classify_column(column) {
            Some(field) => {
                if let Some(previous) = mapping.column_for(field) {
                    debug!("Column '{column}' replaces '{previous}' as the {field} guess");
                }
                mapping.assign(column, Some(field))
            }
            None => mapping,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn maps_common_headers_and_leaves_unknown_columns() {
        let mapping = classify(&columns(&["Full Name", "Mobile No", "Sex", "DOB"]));
        assert_eq!(mapping.field_for("Full Name"), Some(CanonicalField::Name));
        assert_eq!(mapping.field_for("Mobile No"), Some(CanonicalField::Phone));
        assert_eq!(mapping.field_for("Sex"), Some(CanonicalField::Gender));
        assert_eq!(mapping.field_for("DOB"), None);
        assert_eq!(mapping.len(), 3);
    }

    #[test]
    fn earlier_rules_take_precedence() {
        // "contact name" mentions both name and contact keywords
        assert_eq!(classify_column("Contact Name"), Some(CanonicalField::Name));
        assert_eq!(classify_column("  AGE  "), Some(CanonicalField::Age));
        assert_eq!(
            classify_column("Next_FollowUp"),
            Some(CanonicalField::FollowUpDate)
        );
        assert_eq!(classify_column("Created Date"), Some(CanonicalField::FollowUpDate));
        assert_eq!(classify_column("Email"), None);
    }

    #[test]
    fn last_matching_column_claims_the_field() {
        let mapping = classify(&columns(&["First Name", "Last Name", "Phone"]));
        assert_eq!(mapping.column_for(CanonicalField::Name), Some("Last Name"));
        assert_eq!(mapping.field_for("First Name"), None);
    }

    #[test]
    fn classification_is_deterministic() {
        let input = columns(&["Name", "Contact", "Gender", "Year", "Follow Up"]);
        assert_eq!(classify(&input), classify(&input));
    }
}
