//! Error types for the statement builder.

use crate::ast::{StatementKind, StructureError};
use crate::builder::{PartId, PartKind};
use crate::value::ValueError;

/// Errors returned by [`SqlBuilder`](crate::builder::SqlBuilder) operations.
///
/// A failing operation never modifies the builder.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuilderError {
    /// The statement was already taken out of the builder.
    #[error("SqlBuilder is empty")]
    Empty,

    /// The operation does not apply to the builder's statement kind.
    #[error("{operation} is not supported for {kind} statements")]
    WrongStatementKind {
        /// The rejected operation.
        operation: &'static str,
        /// The builder's statement kind.
        kind: StatementKind,
    },

    /// No part is registered under this ID.
    #[error("Unknown part ID {0}")]
    UnknownPart(PartId),

    /// A part exists under this ID but has another kind.
    #[error("Part {id} is a {found}, expected {expected}")]
    WrongPartKind {
        /// The looked-up ID.
        id: PartId,
        /// The kind the operation needs.
        expected: PartKind,
        /// The kind actually registered.
        found: PartKind,
    },

    /// A caller-chosen ID is already registered.
    #[error("Part ID {0} is already in use")]
    DuplicatePartId(PartId),

    /// Every automatic ID has been handed out.
    #[error("No free part ID left")]
    IdsExhausted,

    /// The ID does not name a FROM target of this statement.
    #[error("Unknown target ID {0}")]
    UnknownTarget(PartId),

    /// A join names the same target on both sides.
    #[error("Target {0} can't be joined with itself")]
    SelfJoin(PartId),

    /// The ID does not name a join of this statement.
    #[error("Unknown join ID {0}")]
    UnknownJoin(PartId),

    /// A field expression is not a plain name.
    #[error("Wrong field format: {0}")]
    WrongFieldFormat(String),

    /// An INSERT would mix a VALUES list with a SELECT source.
    #[error("INSERT statement can't have both VALUES and a SELECT source")]
    InsertSourceConflict,

    /// A statement that does not yield rows was used as a sub-select.
    #[error("{0} statement can't be used as a sub-select")]
    NotASubSelect(StatementKind),

    /// A required operand was not given.
    #[error("Missing {0}")]
    MissingOperand(&'static str),

    /// CASE got unbalanced WHEN and THEN lists.
    #[error("CASE has {when} WHEN expressions but {then} THEN expressions")]
    CaseArity {
        /// Number of WHEN expressions.
        when: usize,
        /// Number of THEN expressions.
        then: usize,
    },

    /// A value could not be rendered.
    #[error(transparent)]
    Value(#[from] ValueError),

    /// The statement failed structural validation.
    #[error(transparent)]
    Structure(#[from] StructureError),
}

/// Result type for builder operations.
pub type Result<T, E = BuilderError> = std::result::Result<T, E>;
