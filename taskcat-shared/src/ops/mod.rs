/// Operation set
///
/// Each menu command maps to exactly one operation. An operation takes the
/// raw strings the menu collected, converts them, runs its guards, issues a
/// single query or update, and interprets the result as an `Outcome`.
///
/// # Modules
///
/// - `tasks`: The relational tool's 14 operations
/// - `cats`: The document tool's 7 operations

pub mod cats;
pub mod tasks;

pub use cats::{CatCommand, CatOps, CAT_MENU};
pub use tasks::{TaskCommand, TaskOps, TASK_MENU};

use serde_json::Value as JsonValue;

use crate::error::{CliError, CliResult};
use crate::render::{Rows, TableRow};

/// Non-error result of an operation
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Tabular result set
    Rows(Rows),

    /// Documents from the document store
    Documents(Vec<JsonValue>),

    /// A mutation succeeded
    Done(String),

    /// A referenced entity does not exist, or a mutation matched nothing
    NotFound(String),

    /// A read returned nothing
    NoRecords(String),

    /// A read returned nothing, and nothing is the good news
    AllClear(String),
}

impl Outcome {
    /// Rows when non-empty, otherwise a "no records" notice
    pub fn rows_or_no_records<T: TableRow>(records: &[T], message: impl Into<String>) -> Self {
        if records.is_empty() {
            Outcome::NoRecords(message.into())
        } else {
            Outcome::Rows(Rows::from_records(records))
        }
    }

    /// Rows when non-empty, otherwise an "all clear" notice
    pub fn rows_or_all_clear<T: TableRow>(records: &[T], message: impl Into<String>) -> Self {
        if records.is_empty() {
            Outcome::AllClear(message.into())
        } else {
            Outcome::Rows(Rows::from_records(records))
        }
    }

    /// Maps an affected-row count to success or not-found
    pub fn from_affected(affected: u64, done: impl Into<String>, missing: impl Into<String>) -> Self {
        if affected == 0 {
            Outcome::NotFound(missing.into())
        } else {
            Outcome::Done(done.into())
        }
    }

    pub fn rows(&self) -> Option<&Rows> {
        match self {
            Outcome::Rows(rows) => Some(rows),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Outcome::NotFound(_))
    }

    /// True for both empty-result notices
    pub fn is_empty_result(&self) -> bool {
        matches!(self, Outcome::NoRecords(_) | Outcome::AllClear(_))
    }
}

/// Converts a raw identifier to the store's integer ID type
pub fn parse_id(field: &'static str, raw: &str) -> CliResult<i32> {
    let trimmed = raw.trim();
    trimmed
        .parse::<i32>()
        .map_err(|e| CliError::invalid_input(field, trimmed, e.to_string()))
}

/// Converts a raw age to a non-negative integer
pub fn parse_age(raw: &str) -> CliResult<i32> {
    let trimmed = raw.trim();
    let age = trimmed
        .parse::<i32>()
        .map_err(|e| CliError::invalid_input("age", trimmed, e.to_string()))?;

    if age < 0 {
        return Err(CliError::invalid_input("age", trimmed, "must not be negative"));
    }
    Ok(age)
}

/// Argument at `index`, or "" when the menu supplied fewer
pub(crate) fn arg(args: &[String], index: usize) -> &str {
    args.get(index).map(String::as_str).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("user ID", " 42 ").unwrap(), 42);
        assert!(parse_id("user ID", "forty-two").unwrap_err().is_input_error());
        assert!(parse_id("user ID", "").unwrap_err().is_input_error());
        assert!(parse_id("user ID", "99999999999").is_err());
    }

    #[test]
    fn test_parse_age() {
        assert_eq!(parse_age("4").unwrap(), 4);
        assert_eq!(parse_age("0").unwrap(), 0);

        let err = parse_age("-1").unwrap_err();
        assert_eq!(err.to_string(), "Invalid age '-1': must not be negative");
        assert!(parse_age("old").is_err());
    }

    #[test]
    fn test_from_affected() {
        assert_eq!(
            Outcome::from_affected(0, "done", "missing"),
            Outcome::NotFound("missing".to_string())
        );
        assert_eq!(
            Outcome::from_affected(2, "done", "missing"),
            Outcome::Done("done".to_string())
        );
    }

    #[test]
    fn test_arg_defaults_to_empty() {
        let args = vec!["a".to_string()];
        assert_eq!(arg(&args, 0), "a");
        assert_eq!(arg(&args, 1), "");
    }
}
