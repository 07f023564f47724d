use std::collections::HashMap;

use serde::Deserialize;

use crate::domain::LVError;

/// The fetched payload describing the list panel: an ordered set of
/// column definitions and one entry per row.
#[derive(Debug, Clone, Deserialize)]
pub struct Document {
    pub columns: Vec<ColumnSpec>,
    pub entries: Vec<Entry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    // CSS style em length, e.g. "10em"
    pub width: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Entry {
    #[serde(default)]
    pub fields: HashMap<String, String>,
    #[serde(default)]
    pub content_url: Option<String>,
}

impl Document {
    pub fn from_json(raw: &str) -> Result<Self, LVError> {
        Ok(serde_json::from_str(raw)?)
    }
}

impl Entry {
    // Missing fields render as empty cells instead of failing the render.
    pub fn field(&self, column_name: &str) -> &str {
        self.fields.get(column_name).map(|s| s.as_str()).unwrap_or("")
    }
}

impl ColumnSpec {
    /// Terminal cells this column should occupy. The wire format carries
    /// em lengths; a terminal cell is roughly half an em wide.
    pub fn width_cells(&self) -> usize {
        let digits: String = self
            .width
            .chars()
            .take_while(|c| c.is_ascii_digit() || *c == '.')
            .collect();
        match digits.parse::<f64>() {
            Ok(em) => (em * 2.0).round() as usize,
            Err(_) => self.name.len(),
        }
    }
}

// Cell text is display only. Collapse line breaks into a visible marker
// so a single entry can never span multiple panel rows.
pub fn sanitize_cell(value: &str) -> String {
    value.replace("\r\n", " ↵ ").replace("\n", " ↵ ")
}
