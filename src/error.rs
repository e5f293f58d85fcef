/// Error types for the mangling pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MangleError {
    /// No collision-free placeholder token could be found for a file's embeds
    PlaceholderCollision(String),
    /// Error reading or writing a source file
    Io(String),
    /// Error loading or parsing a mangle configuration
    Config(String),
}

impl std::fmt::Display for MangleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MangleError::PlaceholderCollision(msg) => {
                write!(f, "Placeholder collision: {}", msg)
            }
            MangleError::Io(msg) => write!(f, "I/O error: {}", msg),
            MangleError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for MangleError {}

/// Result type for mangling operations
pub type MangleResult<T> = Result<T, MangleError>;
