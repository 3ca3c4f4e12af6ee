//! Error types and diagnostics for iterown
//!
//! Query validation is the only failure the resolver core knows about.
//! Everything else here belongs to the surfaces around it: configuration
//! files, batch input and the compact outcome encoding.

use crate::fact::{ContainerKind, IterationForm};
use miette::Diagnostic;
use thiserror::Error;

/// Alias for Result type with iterown errors
pub type IterResult<T> = std::result::Result<T, IterError>;

/// Top-level error type
#[derive(Error, Diagnostic, Debug)]
pub enum IterError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Query(#[from] InvalidQuery),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// Query Errors (E0001-E0099)
// ============================================================================

/// Precondition violation while building a query
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum InvalidQuery {
    /// Exclusive access requested through an immutable binding
    #[error("cannot iterate with `{form}` over an immutable {container} binding")]
    #[diagnostic(
        code(iterown_query_E0001),
        help("Declare the container binding as `mut`, or use a shared-reference form such as `iter()`")
    )]
    ImmutableBinding {
        form: IterationForm,
        container: ContainerKind,
    },
}

// ============================================================================
// Configuration Errors (E0101-E0199)
// ============================================================================

/// Failure loading a resolver configuration
#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error("failed to read config file '{path}'")]
    #[diagnostic(code(iterown_config_E0101))]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config in '{path}'")]
    #[diagnostic(
        code(iterown_config_E0102),
        help("Known fields are `rule_set` (\"modern\" or \"legacy2018\") and `deny_moves` (bool)")
    )]
    Invalid {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

// ============================================================================
// Parse Errors (E0201-E0299)
// ============================================================================

/// Malformed textual input
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Compact outcome code could not be decoded
    #[error("malformed outcome code '{code}': {reason}")]
    #[diagnostic(
        code(iterown_parse_E0201),
        help("Outcome codes look like `copy:0:1:1` (mode:mutates:usable:valid)")
    )]
    MalformedCode { code: String, reason: String },

    /// A name did not match any known enum variant
    #[error("unknown {kind} '{name}'")]
    #[diagnostic(code(iterown_parse_E0202))]
    UnknownName { kind: &'static str, name: String },

    /// A batch line was not a valid query record
    #[error("line {line}: {message}")]
    #[diagnostic(code(iterown_parse_E0203))]
    MalformedRecord { line: usize, message: String },
}
