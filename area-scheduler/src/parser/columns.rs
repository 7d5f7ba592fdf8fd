use std::collections::HashMap;

use csv::{Reader, ReaderBuilder, StringRecord, Trim};

use crate::error::{PlannerError, Result};
use super::cells::normalize_header;

/// Header lookup for tables with a header row. Matching ignores case,
/// spaces, underscores and dashes; the first matching column wins.
pub struct Columns {
    index: HashMap<String, usize>,
    found: Vec<String>,
}

impl Columns {
    pub fn from_headers(headers: &StringRecord) -> Self {
        let mut index = HashMap::new();
        for (pos, header) in headers.iter().enumerate() {
            index.entry(normalize_header(header)).or_insert(pos);
        }
        Self {
            index,
            found: headers.iter().map(String::from).collect(),
        }
    }

    pub fn require(&self, name: &str) -> Result<usize> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| PlannerError::missing_column(name, &self.found))
    }

    pub fn optional(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }
}

/// Trimmed cell text, or "" when the column is absent or the row is short
pub fn cell(record: &StringRecord, col: Option<usize>) -> &str {
    col.and_then(|c| record.get(c)).unwrap_or("").trim()
}

pub fn table_reader(text: &str, delimiter: u8) -> Reader<&[u8]> {
    ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_column_lists_found() {
        let headers = StringRecord::from(vec!["Area", "StartHour", "Qty"]);
        let columns = Columns::from_headers(&headers);

        assert_eq!(columns.require("starthour").unwrap(), 1);
        match columns.require("quantity") {
            Err(PlannerError::MissingColumn { column, found }) => {
                assert_eq!(column, "quantity");
                assert_eq!(found, vec!["Area", "StartHour", "Qty"]);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_cell_defaults() {
        let record = StringRecord::from(vec![" a ", "b"]);
        assert_eq!(cell(&record, Some(0)), "a");
        assert_eq!(cell(&record, Some(5)), "");
        assert_eq!(cell(&record, None), "");
    }
}
