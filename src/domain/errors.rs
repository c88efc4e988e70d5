//! Domain error taxonomy.
//!
//! Only caller-addressable failures surface from mutations: bad input and
//! unmatched ids. Persistence failures are handled inside the storage layer
//! (logged, reported as sentinels) and never reach a mutation caller.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// Caller-supplied fields violate domain constraints.
    #[error("{0}")]
    Validation(String),
    /// A mutation referenced an id with no matching entity.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
}

impl LedgerError {
    pub fn validation(message: impl Into<String>) -> Self {
        LedgerError::Validation(message.into())
    }

    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        LedgerError::NotFound {
            entity,
            id: id.into(),
        }
    }
}
