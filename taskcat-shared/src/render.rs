/// Result presentation
///
/// Turns an operation's `Outcome` into terminal text:
///
/// - row sets become an ASCII table with a fixed header, rows in store order
/// - documents become indented JSON with keys in red and values in green
/// - notices become a single green (success) or red (miss) line
///
/// Coloring is a `Presenter` setting so the same code renders plain text for
/// tests and pipes.
///
/// # Example
///
/// ```
/// use taskcat_shared::ops::Outcome;
/// use taskcat_shared::render::Presenter;
///
/// let text = Presenter::plain().render(&Outcome::Done("Task has been added.".into()));
/// assert_eq!(text, "Task has been added.\n");
/// ```

use colored::Colorize;
use comfy_table::presets::ASCII_FULL_CONDENSED;
use comfy_table::Table;
use serde_json::Value as JsonValue;

use crate::ops::Outcome;

const INDENT: &str = "    ";

/// A record that renders as one table row
pub trait TableRow {
    /// Header shown above rows of this shape
    const COLUMNS: &'static [&'static str];

    /// Cell text in `COLUMNS` order
    fn cells(&self) -> Vec<String>;
}

/// A rendered-ready row set with its header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rows {
    pub columns: &'static [&'static str],
    pub rows: Vec<Vec<String>>,
}

impl Rows {
    /// Captures records in the order the store returned them
    pub fn from_records<T: TableRow>(records: &[T]) -> Self {
        Self {
            columns: T::COLUMNS,
            rows: records.iter().map(TableRow::cells).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cells of one column, top to bottom
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let index = self.columns.iter().position(|c| *c == name)?;
        Some(
            self.rows
                .iter()
                .map(|row| row.get(index).map(String::as_str).unwrap_or(""))
                .collect(),
        )
    }
}

/// Renders outcomes to text
#[derive(Debug, Clone, Copy)]
pub struct Presenter {
    color: bool,
}

impl Presenter {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// Presenter that never emits escape codes
    pub fn plain() -> Self {
        Self::new(false)
    }

    /// Renders an outcome, always ending with a newline
    pub fn render(&self, outcome: &Outcome) -> String {
        match outcome {
            Outcome::Rows(rows) => format!("{}\n", render_table(rows)),
            Outcome::Documents(documents) => self.render_documents(documents),
            Outcome::Done(message) | Outcome::AllClear(message) => {
                format!("{}\n", self.success(message))
            }
            Outcome::NotFound(message) | Outcome::NoRecords(message) => {
                format!("{}\n", self.failure(message))
            }
        }
    }

    pub fn success(&self, text: &str) -> String {
        if self.color {
            text.green().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn failure(&self, text: &str) -> String {
        if self.color {
            text.red().to_string()
        } else {
            text.to_string()
        }
    }

    /// Renders each document as indented JSON, one after another
    pub fn render_documents(&self, documents: &[JsonValue]) -> String {
        let mut out = String::new();
        for document in documents {
            self.write_value(&mut out, document, 0);
            out.push('\n');
        }
        out
    }

    fn key(&self, key: &str) -> String {
        let quoted = format!("{}:", JsonValue::String(key.to_string()));
        if self.color {
            quoted.red().to_string()
        } else {
            quoted
        }
    }

    fn scalar(&self, value: &JsonValue) -> String {
        let text = value.to_string();
        if self.color {
            text.green().to_string()
        } else {
            text
        }
    }

    fn write_value(&self, out: &mut String, value: &JsonValue, depth: usize) {
        match value {
            JsonValue::Object(map) if !map.is_empty() => {
                out.push_str("{\n");
                let last = map.len() - 1;
                for (i, (key, child)) in map.iter().enumerate() {
                    out.push_str(&INDENT.repeat(depth + 1));
                    out.push_str(&self.key(key));
                    out.push(' ');
                    self.write_value(out, child, depth + 1);
                    if i != last {
                        out.push(',');
                    }
                    out.push('\n');
                }
                out.push_str(&INDENT.repeat(depth));
                out.push('}');
            }
            JsonValue::Array(items) if !items.is_empty() => {
                out.push_str("[\n");
                let last = items.len() - 1;
                for (i, item) in items.iter().enumerate() {
                    out.push_str(&INDENT.repeat(depth + 1));
                    self.write_value(out, item, depth + 1);
                    if i != last {
                        out.push(',');
                    }
                    out.push('\n');
                }
                out.push_str(&INDENT.repeat(depth));
                out.push(']');
            }
            // empty containers, strings, numbers, booleans, null
            scalar => out.push_str(&self.scalar(scalar)),
        }
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new(true)
    }
}

fn render_table(rows: &Rows) -> String {
    let mut table = Table::new();
    table.load_preset(ASCII_FULL_CONDENSED);
    table.set_header(rows.columns.iter().copied());
    for row in &rows.rows {
        table.add_row(row.iter().map(String::as_str));
    }
    table.to_string()
}
