// SPDX-License-Identifier: AGPL-3.0-or-later

use std::fmt;

use crate::db::types::ElementKind;

/// Entities which can be looked up by their id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Element,
    Template,
    TextProps,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Resource::Element => "Element",
            Resource::Template => "Template",
            Resource::TextProps => "Text properties",
        };

        write!(f, "{}", name)
    }
}

/// Errors returned by all element store operations.
///
/// Database errors are kept as strings so that errors can be cloned into every slot of a batch
/// result.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ElementStoreError {
    /// A referenced element, template or text properties row does not exist.
    #[error("{0} with id {1} not found")]
    NotFound(Resource, i64),

    /// Input violates a field constraint or references a missing or unsuitable row.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The stored kind of an element differs from the kind the caller expected.
    #[error("Element {id} is a {found} element, expected {expected}")]
    Conflict {
        id: i64,
        expected: ElementKind,
        found: ElementKind,
    },

    /// A base row carries a kind this store has no variant table for.
    #[error("Element {0} has unsupported kind '{1}'")]
    UnsupportedKind(i64, String),

    /// Error returned from the database or other fatal errors such as corrupt rows.
    #[error("Fatal storage error: {0}")]
    FatalStorageError(String),
}

impl From<sqlx::Error> for ElementStoreError {
    fn from(err: sqlx::Error) -> Self {
        Self::FatalStorageError(err.to_string())
    }
}

impl From<serde_json::Error> for ElementStoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::FatalStorageError(format!("Corrupt JSON value found in database: {}", err))
    }
}
