use crate::search::types::SearchRecord;
use std::fmt::Write as _;
use std::io::{self, Write};

/// Placeholder printed when none of a field's keys is present
pub const MISSING_FIELD: &str = "N/A";

/// A printed field and the record keys it is read from, in order of preference
#[derive(Debug, Clone, Copy)]
pub struct ResultField {
    pub label: &'static str,
    pub keys: &'static [&'static str],
}

pub const RESULT_FIELDS: [ResultField; 3] = [
    ResultField {
        label: "URL",
        keys: &["link", "href"],
    },
    ResultField {
        label: "Title",
        keys: &["title"],
    },
    ResultField {
        label: "Snippet",
        keys: &["snippet", "body"],
    },
];

impl ResultField {
    pub fn resolve<'a>(&self, record: &'a SearchRecord) -> &'a str {
        record.first_of(self.keys).unwrap_or(MISSING_FIELD)
    }
}

/// Render a single record with its 1-based index.
pub fn format_record(index: usize, record: &SearchRecord) -> String {
    let mut out = format!("\n=== Result {} ===\n", index);
    for field in RESULT_FIELDS {
        let _ = writeln!(out, "{}: {}", field.label, field.resolve(record));
    }
    out
}

pub fn format_results(results: &[SearchRecord]) -> String {
    results
        .iter()
        .enumerate()
        .map(|(i, record)| format_record(i + 1, record))
        .collect()
}

pub fn write_results<W: Write>(out: &mut W, results: &[SearchRecord]) -> io::Result<()> {
    out.write_all(format_results(results).as_bytes())?;
    out.flush()
}
