use thiserror::Error;

/// Invalid gate configuration, detected when the gate is built at startup.
#[derive(Debug, Error)]
pub enum GateConfigError {
    #[error("invalid route pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: matchit::InsertError,
    },

    #[error("{field} must be an absolute path, got '{value}'")]
    InvalidPath { field: &'static str, value: String },

    #[error("{field} '{path}' would redirect callers back to itself")]
    RedirectLoop { field: &'static str, path: String },

    #[error("{field} '{value}' is not a valid Location header value")]
    InvalidLocation { field: &'static str, value: String },

    #[error("cookie name must not be empty")]
    EmptyCookieName,
}
