/// Error handling for taskcat operations
///
/// Every operation returns `CliResult<Outcome>`. Expected outcomes such as a
/// missing user or an empty result set are `Outcome` values, never errors;
/// `CliError` is reserved for failures the menu loop reports and then moves
/// past.
///
/// # Taxonomy
///
/// - Store failures (`Database`, `Schema`, `Document`, `Conflict`, BSON encoding)
/// - Input failures (`InvalidInput`, `Validation`)
/// - Terminal I/O failures (`Io`)
/// - Everything else (`Render`), reported as unexpected
///
/// # Example
///
/// ```
/// use taskcat_shared::error::CliError;
///
/// let err = CliError::invalid_input("user ID", "abc", "expected an integer");
/// assert!(err.is_input_error());
/// assert_eq!(
///     err.to_string(),
///     "Invalid user ID 'abc': expected an integer"
/// );
/// ```

use thiserror::Error;

/// Result type alias for taskcat operations
pub type CliResult<T> = Result<T, CliError>;

/// Unified error type for both CLIs
#[derive(Debug, Error)]
pub enum CliError {
    /// Relational driver error
    #[error("Database error: {0}")]
    Database(sqlx::Error),

    /// Constraint violation, e.g. a duplicate email
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Required tables or reference rows are absent
    #[error("Schema is not set up: {0}")]
    Schema(String),

    /// Document store driver error
    #[error("Document store error: {0}")]
    Document(#[from] mongodb::error::Error),

    /// Document could not be encoded to BSON
    #[error("Failed to encode document: {0}")]
    BsonEncode(#[from] mongodb::bson::ser::Error),

    /// Document could not be decoded from BSON
    #[error("Failed to decode document: {0}")]
    BsonDecode(#[from] mongodb::bson::de::Error),

    /// A raw input string could not be converted
    #[error("Invalid {field} '{value}': {reason}")]
    InvalidInput {
        field: &'static str,
        value: String,
        reason: String,
    },

    /// Input converted fine but violates a field constraint
    #[error("Validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// Document could not be converted to JSON for display
    #[error("Failed to render document: {0}")]
    Render(#[from] serde_json::Error),

    /// Terminal I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Creates an input conversion error
    pub fn invalid_input(
        field: &'static str,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidInput {
            field,
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// True for errors caused by what the operator typed
    pub fn is_input_error(&self) -> bool {
        matches!(self, CliError::InvalidInput { .. } | CliError::Validation(_))
    }

    /// True for errors raised by either store or its driver
    pub fn is_store_error(&self) -> bool {
        matches!(
            self,
            CliError::Database(_)
                | CliError::Conflict(_)
                | CliError::Schema(_)
                | CliError::Document(_)
                | CliError::BsonEncode(_)
                | CliError::BsonDecode(_)
        )
    }
}

/// Convert sqlx errors, surfacing constraint violations as conflicts
impl From<sqlx::Error> for CliError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if let Some(constraint) = db_err.constraint() {
                if constraint.contains("email") {
                    return CliError::Conflict("Email already exists".to_string());
                }
                return CliError::Conflict(format!("Constraint violation: {}", constraint));
            }
        }

        CliError::Database(err)
    }
}
