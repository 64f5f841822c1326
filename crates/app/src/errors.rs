//! Error classification shared by every service.

use std::fmt;

/// Caller-visible category of a service error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed or out-of-range input.
    Validation,

    /// A referenced record does not exist.
    NotFound,

    /// The caller may not perform the operation.
    Authorization,

    /// The operation conflicts with the record's current state.
    Conflict,

    /// A business rule refused the operation.
    DomainRule,

    /// The storage collaborator failed.
    Infrastructure,
}

impl ErrorKind {
    /// Stable snake-case name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::Authorization => "authorization",
            Self::Conflict => "conflict",
            Self::DomainRule => "domain_rule",
            Self::Infrastructure => "infrastructure",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
