use thiserror::Error;

/// Why an entry operation was refused. Either way the collection is left
/// exactly as it was.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EntryError {
    #[error("Invalid entry: {0}")]
    Validation(String),

    #[error("Not allowed: {0}")]
    Forbidden(String),

    #[error("Timesheet entry {0} not found")]
    NotFound(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RosterError {
    #[error("Invalid record: {0}")]
    Validation(String),

    #[error("Not allowed: {0}")]
    Forbidden(String),

    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: String },
}
