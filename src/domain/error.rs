//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::Level;

/// Domain errors represent violations of the table's structural assumptions.
/// Every variant aborts the whole build: a partial classification tree is never returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("unrecognized section marker: {text:?}")]
    UnrecognizedSectionFormat { text: String },

    #[error("{0}")]
    Structural(#[from] StructuralError),

    #[error("malformed table row {row}: expected 4 cells, found {cells}")]
    MalformedRow { row: usize, cells: usize },
}

/// Hierarchy violations detected while folding rows into the forest.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructuralError {
    #[error("row {row}: {level} {code:?} has no enclosing {parent}")]
    MissingParent {
        row: usize,
        code: String,
        level: Level,
        parent: Level,
    },

    #[error("row {row}: code {code:?} matches no classification level")]
    Unclassifiable { row: usize, code: String },
}

impl DomainError {
    /// True for errors raised by the hierarchy fold itself.
    pub fn is_structural(&self) -> bool {
        matches!(self, DomainError::Structural(_))
    }

    /// Attach the input row position to structural errors.
    pub fn at_row(self, row: usize) -> Self {
        match self {
            DomainError::Structural(StructuralError::Unclassifiable { code, .. }) => {
                StructuralError::Unclassifiable { row, code }.into()
            }
            DomainError::Structural(StructuralError::MissingParent {
                code,
                level,
                parent,
                ..
            }) => StructuralError::MissingParent {
                row,
                code,
                level,
                parent,
            }
            .into(),
            other => other,
        }
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
