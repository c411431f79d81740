use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HooklineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid pattern: {0}")]
    Regex(#[from] regex::Error),

    #[error("Not a usable git repository ({path}): {reason}")]
    InvalidRepo { path: PathBuf, reason: String },

    /// Raised when line data is requested for a file outside the modified set.
    #[error("File is not in the modified file set: {0}")]
    NotModified(PathBuf),

    #[error("No .hookline.json found from {0}")]
    ConfigNotFound(PathBuf),

    #[error("Unknown hook event: {0}")]
    UnknownEvent(String),

    #[error("Invalid arguments for {event} hook: {reason}")]
    InvalidArgs { event: String, reason: String },

    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Other(String),
}
