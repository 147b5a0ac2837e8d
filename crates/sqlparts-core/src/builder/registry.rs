//! ID-addressed storage for the parts a builder hands out.
//!
//! Expressions live in the registry until a parent consumes them; parents
//! always receive a clone, so a part can be used any number of times.
//! FROM targets and joins live inside the statement itself and only reserve
//! their ID here.

use std::collections::HashMap;
use std::fmt;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::ast::Expr;
use crate::error::{BuilderError, Result};

/// Handle to a registered part.
///
/// Caller-chosen IDs should stay small; automatic IDs count down from
/// `u32::MAX` and never reuse an ID that is taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartId(NonZeroU32);

impl PartId {
    /// Creates an ID; zero is not a valid ID.
    #[must_use]
    pub const fn new(raw: u32) -> Option<Self> {
        match NonZeroU32::new(raw) {
            Some(id) => Some(Self(id)),
            None => None,
        }
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }
}

impl fmt::Display for PartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<NonZeroU32> for PartId {
    fn from(id: NonZeroU32) -> Self {
        Self(id)
    }
}

/// The kind of a registered part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartKind {
    /// An expression.
    Expr,
    /// A SELECT FROM target.
    Target,
    /// A SELECT join.
    Join,
}

impl PartKind {
    /// Returns a lowercase name for diagnostics.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Expr => "expression",
            Self::Target => "target",
            Self::Join => "join",
        }
    }
}

impl fmt::Display for PartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registry entry.
#[derive(Debug, Clone, PartialEq)]
pub enum Part {
    /// An expression, owned by the registry.
    Expr(Expr),
    /// Reservation for a FROM target stored in the statement.
    Target,
    /// Reservation for a join stored in the statement.
    Join,
}

impl Part {
    /// Returns the kind of this part.
    #[must_use]
    pub const fn kind(&self) -> PartKind {
        match self {
            Self::Expr(_) => PartKind::Expr,
            Self::Target => PartKind::Target,
            Self::Join => PartKind::Join,
        }
    }
}

/// Maps part IDs to parts.
#[derive(Debug, Clone)]
pub struct PartRegistry {
    parts: HashMap<PartId, Part>,
    next_auto: u32,
}

impl PartRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            parts: HashMap::new(),
            next_auto: u32::MAX,
        }
    }

    /// Returns the number of registered parts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Returns true if `id` is registered.
    #[must_use]
    pub fn contains(&self, id: PartId) -> bool {
        self.parts.contains_key(&id)
    }

    /// Fails if `requested` is already taken.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::DuplicatePartId`] for a taken ID.
    pub fn check_available(&self, requested: Option<PartId>) -> Result<()> {
        match requested {
            Some(id) if self.contains(id) => Err(BuilderError::DuplicatePartId(id)),
            _ => Ok(()),
        }
    }

    /// Stores `part` under `requested`, or under a fresh automatic ID.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::DuplicatePartId`] if `requested` is taken,
    /// or [`BuilderError::IdsExhausted`] if no automatic ID is left.
    pub fn register(&mut self, requested: Option<PartId>, part: Part) -> Result<PartId> {
        let id = match requested {
            Some(id) => {
                self.check_available(Some(id))?;
                id
            }
            None => self.next_free()?,
        };
        debug!(id = id.get(), kind = %part.kind(), "registered part");
        self.parts.insert(id, part);
        Ok(id)
    }

    fn next_free(&mut self) -> Result<PartId> {
        loop {
            let id = PartId::new(self.next_auto).ok_or(BuilderError::IdsExhausted)?;
            self.next_auto -= 1;
            if !self.contains(id) {
                return Ok(id);
            }
        }
    }

    /// Returns the part under `id` if it has the expected kind.
    ///
    /// A missing ID or a kind mismatch is logged and yields `None`.
    #[must_use]
    pub fn lookup(&self, id: PartId, expected: PartKind) -> Option<&Part> {
        match self.get(id, expected) {
            Ok(part) => Some(part),
            Err(err) => {
                warn!(id = id.get(), error = %err, "part lookup failed");
                None
            }
        }
    }

    /// Returns the part under `id`, checking its kind.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::UnknownPart`] or [`BuilderError::WrongPartKind`].
    pub fn get(&self, id: PartId, expected: PartKind) -> Result<&Part> {
        let part = self.parts.get(&id).ok_or(BuilderError::UnknownPart(id))?;
        if part.kind() == expected {
            Ok(part)
        } else {
            Err(BuilderError::WrongPartKind {
                id,
                expected,
                found: part.kind(),
            })
        }
    }

    /// Returns the expression under `id`.
    ///
    /// # Errors
    ///
    /// Fails like [`PartRegistry::get`].
    pub fn expr(&self, id: PartId) -> Result<&Expr> {
        match self.get(id, PartKind::Expr)? {
            Part::Expr(expr) => Ok(expr),
            other => Err(BuilderError::WrongPartKind {
                id,
                expected: PartKind::Expr,
                found: other.kind(),
            }),
        }
    }

    /// Returns a copy of the expression under `id`, for splicing into a
    /// new parent. `None` passes through unchanged.
    ///
    /// # Errors
    ///
    /// Fails like [`PartRegistry::get`].
    pub fn use_expr(&self, id: Option<PartId>) -> Result<Option<Expr>> {
        id.map(|id| self.expr(id).cloned()).transpose()
    }

    /// Returns copies of all expressions in `ids`, in order.
    ///
    /// # Errors
    ///
    /// Fails on the first ID that does not name an expression.
    pub fn use_exprs(&self, ids: &[PartId]) -> Result<Vec<Expr>> {
        ids.iter().map(|id| self.expr(*id).cloned()).collect()
    }
}

impl Default for PartRegistry {
    fn default() -> Self {
        Self::new()
    }
}
