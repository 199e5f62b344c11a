//! Error type shared by the fault tree model, the orderings and the reader.

use std::fmt;
use std::io;

use crate::types::GateId;

/// Errors reported by this crate.
///
/// All of them are raised synchronously by the operation that detects them.
/// None of the operations are retried, since they are deterministic.
#[derive(Debug)]
pub enum Error {
    /// A variable ordering is not a permutation of the tree's basic events.
    InvalidOrdering(String),
    /// A probability literal could not be parsed.
    MalformedProbability(String),
    /// A probability lies outside of `[0, 1]`.
    ProbabilityOutOfRange(String),
    /// No basic event with the given name exists in the tree.
    UnknownEvent(String),
    /// A gate id does not belong to the tree (or builder).
    UnknownGate(GateId),
    /// A gate id was used where a basic event is required.
    NotABasicEvent(GateId),
    /// A gate is malformed (wrong arity, bad voting threshold).
    InvalidGate(String),
    /// The gate graph contains a cycle through the named gate.
    Cycle(String),
    /// Galileo input could not be parsed.
    Parse { line: usize, message: String },
    /// A fault tree file has an extension no reader is registered for.
    UnsupportedFileType(String),
    /// File I/O error.
    Io(io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Error::Parse {
            line,
            message: message.into(),
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidOrdering(msg) => write!(f, "Invalid ordering: {}", msg),
            Error::MalformedProbability(s) => write!(f, "Malformed probability: {:?}", s),
            Error::ProbabilityOutOfRange(s) => write!(f, "Probability out of range [0, 1]: {}", s),
            Error::UnknownEvent(name) => write!(f, "Unknown basic event: {:?}", name),
            Error::UnknownGate(id) => write!(f, "Unknown gate: {}", id),
            Error::NotABasicEvent(id) => write!(f, "Gate {} is not a basic event", id),
            Error::InvalidGate(msg) => write!(f, "Invalid gate: {}", msg),
            Error::Cycle(name) => write!(f, "Cycle in gate graph through {:?}", name),
            Error::Parse { line, message } => write!(f, "Parse error at line {}: {}", line, message),
            Error::UnsupportedFileType(ext) => write!(f, "Unsupported file type: {:?}", ext),
            Error::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let e = Error::parse(3, "Toplevel is defined twice");
        assert_eq!(e.to_string(), "Parse error at line 3: Toplevel is defined twice");

        let e = Error::NotABasicEvent(GateId::new(4));
        assert_eq!(e.to_string(), "Gate g4 is not a basic event");
    }

    #[test]
    fn test_io_source() {
        let e = Error::from(io::Error::new(io::ErrorKind::NotFound, "missing.dft"));
        assert!(std::error::Error::source(&e).is_some());
        assert!(e.to_string().starts_with("I/O error"));
    }
}
