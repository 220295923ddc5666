//! Dataset-wide defect counts under the current mapping.
//!
//! Row-level problems never abort an import; they are only counted here.
//! Every call recomputes from scratch.

use serde::Serialize;

use crate::{
    data::RawRow, dates::parse_date, fields::CanonicalField, mapping::ColumnMapping,
};

const VALID_GENDERS: &[&str] = &["male", "female", "other"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationStats {
    pub valid_rows: usize,
    pub invalid_rows: usize,
    pub missing_name: usize,
    pub missing_phone: usize,
    pub invalid_gender: usize,
    pub invalid_follow_up_date: usize,
}

impl ValidationStats {
    pub fn total(&self) -> usize {
        self.valid_rows + self.invalid_rows
    }

    pub fn render_rows(&self) -> Vec<Vec<String>> {
        [
            ("total rows", self.total()),
            ("valid rows", self.valid_rows),
            ("invalid rows", self.invalid_rows),
            ("missing name", self.missing_name),
            ("missing phone", self.missing_phone),
            ("invalid gender", self.invalid_gender),
            ("invalid follow-up date", self.invalid_follow_up_date),
        ]
        .into_iter()
        .map(|(label, count)| vec![label.to_string(), count.to_string()])
        .collect()
    }
}

fn trimmed_cell(row: &RawRow, column: Option<&str>) -> Option<String> {
    column
        .and_then(|column| row.get(column))
        .map(|cell| cell.trimmed())
}

fn has_value(row: &RawRow, column: Option<&str>) -> bool {
    trimmed_cell(row, column).is_some_and(|value| !value.is_empty())
}

pub fn validate(rows: &[RawRow], mapping: &ColumnMapping) -> ValidationStats {
    let name_column = mapping.column_for(CanonicalField::Name);
    let phone_column = mapping.column_for(CanonicalField::Phone);
    let gender_column = mapping.column_for(CanonicalField::Gender);
    let follow_up_column = mapping.column_for(CanonicalField::FollowUpDate);

    let mut stats = ValidationStats::default();
    for row in rows {
        let has_name = has_value(row, name_column);
        let has_phone = has_value(row, phone_column);
        if !has_name {
            stats.missing_name += 1;
        }
        if !has_phone {
            stats.missing_phone += 1;
        }

        if let Some(gender) = trimmed_cell(row, gender_column)
            && !gender.is_empty()
            && !VALID_GENDERS.contains(&gender.to_lowercase().as_str())
        {
            stats.invalid_gender += 1;
        }

        if let Some(follow_up) = trimmed_cell(row, follow_up_column)
            && !follow_up.is_empty()
            && parse_date(&follow_up).is_none()
        {
            stats.invalid_follow_up_date += 1;
        }

        if has_name && has_phone {
            stats.valid_rows += 1;
        } else {
            stats.invalid_rows += 1;
        }
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standard_mapping() -> ColumnMapping {
        [
            ("Name", CanonicalField::Name),
            ("Phone", CanonicalField::Phone),
            ("Gender", CanonicalField::Gender),
            ("Date", CanonicalField::FollowUpDate),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn missing_phone_marks_row_invalid_but_valid_gender_is_not_counted() {
        let rows: Vec<RawRow> = vec![
            [("Name", "Asha"), ("Phone", ""), ("Gender", "male")]
                .into_iter()
                .collect(),
        ];
        let stats = validate(&rows, &standard_mapping());
        assert_eq!(stats.missing_phone, 1);
        assert_eq!(stats.invalid_rows, 1);
        assert_eq!(stats.valid_rows, 0);
        assert_eq!(stats.invalid_gender, 0);
        assert_eq!(stats.missing_name, 0);
    }

    #[test]
    fn invalid_gender_and_dates_are_counted_separately() {
        let rows: Vec<RawRow> = vec![
            [("Name", "A"), ("Phone", "1"), ("Gender", "M"), ("Date", "13/40/2024")]
                .into_iter()
                .collect(),
            [("Name", "B"), ("Phone", "2"), ("Gender", " Female "), ("Date", "31/01/2024")]
                .into_iter()
                .collect(),
            [("Name", "C"), ("Phone", "3"), ("Gender", ""), ("Date", "")]
                .into_iter()
                .collect(),
        ];
        let stats = validate(&rows, &standard_mapping());
        assert_eq!(stats.valid_rows, 3);
        assert_eq!(stats.invalid_gender, 1);
        assert_eq!(stats.invalid_follow_up_date, 1);
    }

    #[test]
    fn unmapped_required_fields_count_every_row_missing() {
        let rows: Vec<RawRow> = vec![
            [("Name", "A")].into_iter().collect(),
            [("Name", "B")].into_iter().collect(),
        ];
        let stats = validate(&rows, &ColumnMapping::new());
        assert_eq!(stats.missing_name, 2);
        assert_eq!(stats.missing_phone, 2);
        assert_eq!(stats.invalid_rows, 2);
        assert_eq!(stats.total(), rows.len());
    }

    #[test]
    fn render_rows_lists_every_counter() {
        let rendered = ValidationStats::default().render_rows();
        assert_eq!(rendered.len(), 7);
        assert_eq!(rendered[0], vec!["total rows".to_string(), "0".to_string()]);
    }
}
