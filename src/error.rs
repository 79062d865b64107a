use std::fmt;
use std::time::Duration;

/// Error types for content export and module generation
#[derive(Debug)]
pub enum ExportError {
    /// Remote API answered with an unexpected HTTP status
    Transport {
        context: String,
        status: u16,
        body: String,
    },

    /// A polled job did not settle before its deadline
    Timeout { what: String, after: Duration },

    /// Remote job reported a failure status
    JobFailed { job_id: String, message: String },

    /// Folder or content id could not be resolved
    NotFound { id: String },

    /// External importer exited non-zero or left no output file
    SubprocessFailure {
        command: String,
        message: String,
        exit_code: Option<i32>,
    },

    /// A folder id in generated dashboard code has no emitted folder resource
    RewriteUnresolvedReference { folder_id: String },

    /// A folder points at a parent that is neither the import root nor discovered
    UnknownParent {
        folder_id: String,
        parent_id: String,
    },

    /// Invalid input or parameter
    InvalidInput(String),

    /// Missing or inconsistent settings
    Config(String),

    /// General I/O error
    Io(std::io::Error),

    /// Serialization error
    Serialization(String),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::Transport {
                context,
                status,
                body,
            } => {
                write!(f, "{} failed with status code {}: {}", context, status, body)
            }
            ExportError::Timeout { what, after } => {
                write!(f, "{} timed out after {}s", what, after.as_secs_f64())
            }
            ExportError::JobFailed { job_id, message } => {
                write!(f, "Job {} encountered an error: {}", job_id, message)
            }
            ExportError::NotFound { id } => {
                write!(f, "Content not found: '{}'", id)
            }
            ExportError::SubprocessFailure {
                command,
                message,
                exit_code,
            } => {
                write!(f, "Command '{}' failed", command)?;

                if let Some(code) = exit_code {
                    write!(f, " (exit code {})", code)?;
                }

                write!(f, ": {}", message)
            }
            ExportError::RewriteUnresolvedReference { folder_id } => {
                write!(
                    f,
                    "Dashboard references folder '{}' which is not part of the import",
                    folder_id
                )
            }
            ExportError::UnknownParent {
                folder_id,
                parent_id,
            } => {
                write!(
                    f,
                    "Folder '{}' has parent '{}' which was not discovered",
                    folder_id, parent_id
                )
            }
            ExportError::InvalidInput(msg) => {
                write!(f, "Invalid input: {}", msg)
            }
            ExportError::Config(msg) => {
                write!(f, "Configuration error: {}", msg)
            }
            ExportError::Io(err) => {
                write!(f, "I/O error: {}", err)
            }
            ExportError::Serialization(msg) => {
                write!(f, "Serialization error: {}", msg)
            }
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        ExportError::Io(err)
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(err: serde_json::Error) -> Self {
        ExportError::Serialization(err.to_string())
    }
}

/// Result type for export operations
pub type ExportResult<T> = Result<T, ExportError>;
