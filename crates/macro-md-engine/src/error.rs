use crate::io::IoError;

/// Deepest allowed nesting of invocations inside one content span.
pub const MAX_NESTING_DEPTH: usize = 10;

/// Errors that abort processing of a whole document.
///
/// There is no partial-result mode: the first error raised by any stage is
/// returned to the caller as-is.
#[derive(Debug, thiserror::Error)]
pub enum MacroError {
    /// A header names an identifier that is not in the registry.
    #[error("Unknown macro: {identifier}")]
    UnknownMacro { identifier: String },

    /// Invocations nested deeper than [`MAX_NESTING_DEPTH`].
    #[error("Too many nested macros: depth {depth} exceeds limit of {limit}")]
    TooManyNestedMacros { depth: usize, limit: usize },

    #[error("Macro delimiter must not be empty")]
    EmptyDelimiter,

    #[error("Invalid macro delimiter {delimiter:?}: {source}")]
    InvalidDelimiter {
        delimiter: String,
        source: regex::Error,
    },

    #[error("Duplicate macro identifier: {0}")]
    DuplicateMacro(String),

    /// A placeholder marker without a second occurrence in the rendered text.
    #[error("Placeholder {0} has no closing marker")]
    UnmatchedPlaceholder(String),

    #[error(transparent)]
    Pattern(#[from] regex::Error),

    #[error(transparent)]
    Io(#[from] IoError),

    /// Failure raised by a macro function, passed through untouched.
    #[error(transparent)]
    Macro(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, MacroError>;
