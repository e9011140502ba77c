//! Domain error types.

/// Top-level error type for fxjournal.
///
/// Missing trade/goal ids are not errors: update and delete report them as a
/// `false` return instead.
#[derive(Debug, thiserror::Error)]
pub enum JournalError {
    #[error("storage error for key '{key}': {reason}")]
    Storage { key: String, reason: String },

    #[error("could not (de)serialize '{key}': {reason}")]
    Serialization { key: String, reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("journal store has not finished loading")]
    NotReady,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&JournalError> for std::process::ExitCode {
    fn from(err: &JournalError) -> Self {
        let code: u8 = match err {
            JournalError::Io(_) => 1,
            JournalError::ConfigParse { .. }
            | JournalError::ConfigMissing { .. }
            | JournalError::ConfigInvalid { .. }
            | JournalError::InvalidInput { .. } => 2,
            JournalError::Storage { .. } => 3,
            JournalError::Serialization { .. } => 4,
            JournalError::NotReady => 5,
        };
        std::process::ExitCode::from(code)
    }
}
