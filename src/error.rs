//! Error types

/// Errors raised while setting up kinds and collision rules
///
/// Dispatch never fails; these only surface during setup.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A rule already exists for this ordered pair (strict mode only)
    #[error("Duplicate collision rule: {collider} vs {collidee}")]
    DuplicateRule { collider: String, collidee: String },

    /// A kind name that the graph does not declare
    #[error("Unknown kind: {0}")]
    UnknownKind(String),

    /// Kind declaration table could not be parsed
    #[error("Invalid kind declarations: {0}")]
    Declaration(#[from] serde_json::Error),
}
