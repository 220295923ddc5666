//! Plain-text table rendering for terminal output.

use std::fmt::Write as _;

use crate::{fields::CanonicalField, normalize::NormalizedLead};

const COLUMN_GAP: &str = "  ";

#[derive(Debug, Clone, Default)]
pub struct TextTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl TextTable {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn extend_rows(&mut self, rows: impl IntoIterator<Item = Vec<String>>) {
        self.rows.extend(rows);
    }

    pub fn render(&self) -> String {
        let mut widths = self
            .headers
            .iter()
            .map(|header| header.chars().count().max(3))
            .collect::<Vec<_>>();
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(single_line(cell).chars().count());
            }
        }

        let mut output = String::new();
        let _ = writeln!(output, "{}", render_line(&self.headers, &widths));
        let rule = widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>();
        let _ = writeln!(output, "{}", render_line(&rule, &widths));
        for row in &self.rows {
            let _ = writeln!(output, "{}", render_line(row, &widths));
        }
        output
    }

    pub fn print(&self) {
        print!("{}", self.render());
    }
}

fn render_line(cells: &[String], widths: &[usize]) -> String {
    let line = widths
        .iter()
        .enumerate()
        .map(|(idx, &width)| {
            let cell = cells.get(idx).map(|c| single_line(c)).unwrap_or_default();
            format!("{cell:<width$}")
        })
        .collect::<Vec<_>>()
        .join(COLUMN_GAP);
    line.trim_end().to_string()
}

fn single_line(value: &str) -> String {
    value.replace(['\n', '\r', '\t'], " ")
}

/// Preview table: canonical fields first, then every extra column seen.
pub fn leads_table(leads: &[NormalizedLead]) -> TextTable {
    let mut extra_columns: Vec<&str> = Vec::new();
    for lead in leads {
        for (column, _) in &lead.extra {
            if !extra_columns.contains(&column.as_str()) {
                extra_columns.push(column.as_str());
            }
        }
    }

    let headers = CanonicalField::ALL
        .iter()
        .map(|field| field.id())
        .chain(extra_columns.iter().copied());
    let mut table = TextTable::new(headers);
    for lead in leads {
        let canonical = CanonicalField::ALL
            .iter()
            .map(|field| lead.get(*field).unwrap_or_default().to_string());
        let extras = extra_columns
            .iter()
            .map(|column| lead.extra_value(column).unwrap_or_default().to_string());
        table.push_row(canonical.chain(extras).collect());
    }
    table
}
