//! Error type used by the crate.

use thiserror::Error;

/// Errors produced when converting foreign geometry representations.
#[derive(Debug, Error)]
pub enum GeometryError {
    /// The geometry kind has no counterpart in this crate's model.
    #[error("unsupported geometry kind: {0}")]
    UnsupportedKind(String),
    /// The coordinates do not form a valid geometry of the declared kind.
    #[error("malformed geometry: {0}")]
    MalformedCoordinates(String),
}
