use std::fmt;

/// Result type for vigil-adapters operations.
///
/// Only environmental failures that the aggregation pipeline cannot absorb
/// locally are represented here — ordinary malformed-tool-output cases are
/// handled inside each adapter by returning an empty finding list, per the
/// adapter error model.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    /// No adapter is registered under the given name.
    UnknownAdapter(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnknownAdapter(name) => write!(f, "unknown adapter: {}", name),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::UnknownAdapter(_) => None,
        }
    }
}
