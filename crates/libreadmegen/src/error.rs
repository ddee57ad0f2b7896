use thiserror::Error;

/// Exit code used when the structured documentation input is malformed.
pub const MALFORMED_INPUT_EXIT_CODE: i32 = 65;

/// Errors that abort a README generation run.
#[derive(Error, Debug)]
pub enum ReadmeError {
    /// The reflection tool completed with a non-zero status.
    #[error("Documentation tool failed with status {code}: {stderr}")]
    ReflectionFailed {
        /// Exit status reported by the tool.
        code: i32,
        /// Captured error output of the tool.
        stderr: String,
    },

    /// The reflection tool executable could not be located.
    #[error("Documentation tool not found: {0}")]
    ToolNotFound(String),

    /// The structured documentation input is not a sequence of items.
    #[error("Malformed documentation input: {0}")]
    MalformedInput(String),

    /// Indicates a failure in reading or writing a file.
    #[error("Failed to read file: {0}")]
    FileReadError(#[from] std::io::Error),

    /// The structured documentation input is not valid JSON.
    #[error("Failed to parse JSON: {0}")]
    JsonParseError(#[from] serde_json::Error),

    /// A `SYMBOL=PATH` override could not be parsed.
    #[error("Invalid export override: {0}")]
    InvalidOverride(String),

    /// Indicates an error occurred during syntax highlighting.
    #[error("Highlighting error: {0}")]
    Highlight(String),
}

impl ReadmeError {
    /// Process exit code for this error.
    ///
    /// A failed reflection run propagates the tool's own status; malformed input uses
    /// [`MALFORMED_INPUT_EXIT_CODE`]; everything else exits with `1`.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ReflectionFailed { code, .. } => *code,
            Self::MalformedInput(_) | Self::JsonParseError(_) => MALFORMED_INPUT_EXIT_CODE,
            _ => 1,
        }
    }
}

impl From<syntect::Error> for ReadmeError {
    fn from(err: syntect::Error) -> Self {
        Self::Highlight(err.to_string())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ReadmeError>;
