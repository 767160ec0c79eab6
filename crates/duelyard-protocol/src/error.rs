//! Error types for the protocol layer.
//!
//! Each crate in Duelyard defines its own error enum. When you see a
//! `ProtocolError`, you know the problem is a malformed value (usually a
//! coordinate string from an arena file), not a lifecycle or runtime issue.

/// Errors that can occur while parsing protocol values.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProtocolError {
    /// A coordinate string did not have exactly three comma-separated parts.
    ///
    /// Coordinates are stored as `"x,y,z"` in arena files.
    #[error("coordinate `{0}` must have exactly three components")]
    CoordinateArity(String),

    /// One of the coordinate components is not a finite number.
    #[error("coordinate component `{component}` in `{input}` is not a number")]
    CoordinateComponent { input: String, component: String },

    /// A numeric message kind outside the closed set.
    #[error("unknown message kind {0}")]
    UnknownMessageKind(u8),
}
