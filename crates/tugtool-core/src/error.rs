//! Error types and error code constants for tugtool.
//!
//! This module provides a unified error type (`TugError`) that bridges
//! domain-specific errors from the engine's subsystems (matchers, templates,
//! traversal) into a common format suitable for run diagnostics.
//!
//! ## Error Code Mapping
//!
//! - `2`: Invalid arguments (bad option values, invalid recipe configuration)
//! - `3`: Pattern errors (malformed matcher pattern)
//! - `4`: Template compilation errors (broken snippet, unresolvable symbol)
//! - `5`: Template apply errors (argument arity or type mismatch)
//! - `6`: Transform errors (deferred-queue overflow, structural invariant)
//! - `7`: Configuration errors
//! - `10`: Internal errors (bugs, unexpected state)
//!
//! ## Design
//!
//! - **Subsystem enums**: each subsystem raises its own `thiserror` enum
//! - **Bridging**: `impl From<X> for TugError` bridges domain errors
//! - **Code mapping**: `OutputErrorCode` provides stable integer codes
//!
//! A matcher that does not match is never an error. Matchers return `false`
//! when type information is missing.

use std::fmt;

use thiserror::Error;

// ============================================================================
// Output Error Codes
// ============================================================================

/// Stable error codes attached to run diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OutputErrorCode {
    /// Invalid arguments from caller (bad option, invalid recipe settings).
    InvalidArguments = 2,
    /// Malformed matcher pattern.
    PatternError = 3,
    /// Template snippet failed to compile.
    TemplateCompilation = 4,
    /// Template arguments did not fit the compiled template.
    TemplateApply = 5,
    /// Traversal aborted (deferred overflow, structural invariant).
    TransformFailed = 6,
    /// Configuration could not be read or parsed.
    ConfigError = 7,
    /// Internal errors (bugs, unexpected state).
    InternalError = 10,
}

impl OutputErrorCode {
    /// Get the numeric code value.
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for OutputErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ============================================================================
// Pattern Errors
// ============================================================================

/// Raised when a matcher pattern string cannot be compiled.
///
/// Pattern errors surface at matcher construction time so that a broken
/// pattern never degrades into a matcher that silently matches nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    /// The pattern string was empty or only whitespace.
    #[error("empty {kind} pattern")]
    Empty { kind: &'static str },

    /// The pattern string did not follow the pattern grammar.
    #[error("malformed {kind} pattern `{pattern}`: {reason}")]
    Malformed {
        kind: &'static str,
        pattern: String,
        reason: String,
    },
}

impl PatternError {
    /// Convenience constructor for [`PatternError::Malformed`].
    pub fn malformed(kind: &'static str, pattern: &str, reason: impl Into<String>) -> Self {
        PatternError::Malformed {
            kind,
            pattern: pattern.to_string(),
            reason: reason.into(),
        }
    }
}

// ============================================================================
// Template Errors
// ============================================================================

/// Raised while compiling a template snippet.
///
/// These always indicate a broken recipe, never bad input data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateCompilationError {
    /// The snippet is not valid code for any supported snippet kind.
    #[error("syntax error in template at {line}:{column}: {message}")]
    Syntax {
        line: u32,
        column: u32,
        message: String,
    },

    /// A placeholder used an unsupported form, e.g. `#{foo(bar)}`.
    #[error("unknown placeholder `{placeholder}`")]
    UnknownPlaceholder { placeholder: String },

    /// A `#{name}` back-reference names no earlier `#{name:any(..)}`.
    #[error("placeholder `#{{{name}}}` refers to no named placeholder")]
    UndeclaredReference { name: String },

    /// A named placeholder was declared twice.
    #[error("placeholder `{name}` is declared more than once")]
    DuplicatePlaceholder { name: String },

    /// A type named by the snippet or a placeholder could not be resolved.
    #[error("cannot resolve type `{name}` in template")]
    UnresolvedType { name: String },

    /// A method, field or annotation attribute is missing from the type it
    /// was looked up on.
    #[error("cannot resolve `{name}` on `{owner}` in template")]
    UnresolvedMember { owner: String, name: String },
}

/// Raised when a compiled template is applied with unsuitable arguments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateApplyError {
    /// Number of arguments differs from the number of distinct placeholders.
    #[error("template expects {expected} argument(s), got {actual}")]
    ArityMismatch { expected: usize, actual: usize },

    /// An argument's type does not satisfy its placeholder's declared type.
    #[error("argument {index} of type `{actual}` is not assignable to `{expected}`")]
    ArgumentType {
        index: usize,
        expected: String,
        actual: String,
    },

    /// The snippet kind cannot be spliced in at the requested coordinate.
    #[error("a {snippet} template cannot be applied to a {coordinate} coordinate")]
    CoordinateMismatch {
        snippet: &'static str,
        coordinate: &'static str,
    },

    /// A name in the instantiated snippet did not resolve against the
    /// argument types it was given.
    #[error("cannot resolve `{symbol}` in the applied template")]
    UnresolvedSymbol { symbol: String },
}

// ============================================================================
// Transform Errors
// ============================================================================

/// Errors that abort one recipe's traversal of one file.
///
/// The runner converts these into diagnostics and keeps the file's original
/// tree.
#[derive(Debug, Error)]
pub enum TransformError {
    /// A template could not be applied inside a visitor hook.
    #[error(transparent)]
    TemplateApply(#[from] TemplateApplyError),

    /// A template compiled lazily inside a visitor hook was broken.
    #[error(transparent)]
    TemplateCompilation(#[from] TemplateCompilationError),

    /// More deferred visitors were scheduled than the configured bound.
    #[error("deferred visit queue exceeded {limit} visits")]
    DeferredOverflow { limit: usize },

    /// An edit broke tree identity (duplicate node id, wrong node kind).
    #[error("structural invariant violated: {message}")]
    StructuralInvariantViolation { message: String },

    /// A recipe reported a failure of its own.
    #[error("{message}")]
    Recipe { message: String },
}

impl TransformError {
    /// Convenience constructor for [`TransformError::StructuralInvariantViolation`].
    pub fn invariant(message: impl Into<String>) -> Self {
        TransformError::StructuralInvariantViolation {
            message: message.into(),
        }
    }
}

// ============================================================================
// Unified Error Type
// ============================================================================

/// Unified error type for run diagnostics.
///
/// Every subsystem error converts into this type before being attached to a
/// diagnostic, so callers can map any failure to an [`OutputErrorCode`].
#[derive(Debug, Error)]
pub enum TugError {
    /// Invalid arguments or recipe options.
    #[error("invalid arguments: {message}")]
    InvalidArguments { message: String },

    /// Malformed matcher pattern.
    #[error(transparent)]
    Pattern(#[from] PatternError),

    /// Template snippet failed to compile.
    #[error(transparent)]
    TemplateCompilation(#[from] TemplateCompilationError),

    /// Template arguments did not fit.
    #[error(transparent)]
    TemplateApply(#[from] TemplateApplyError),

    /// Traversal aborted.
    #[error(transparent)]
    Transform(#[from] TransformError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal error (bug or unexpected state).
    #[error("internal error: {message}")]
    Internal { message: String },
}

impl TugError {
    /// Create an invalid arguments error.
    pub fn invalid_args(message: impl Into<String>) -> Self {
        TugError::InvalidArguments {
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        TugError::Internal {
            message: message.into(),
        }
    }

    /// Map this error to its stable output code.
    pub fn error_code(&self) -> OutputErrorCode {
        match self {
            TugError::InvalidArguments { .. } => OutputErrorCode::InvalidArguments,
            TugError::Pattern(_) => OutputErrorCode::PatternError,
            TugError::TemplateCompilation(_) => OutputErrorCode::TemplateCompilation,
            TugError::TemplateApply(_) => OutputErrorCode::TemplateApply,
            TugError::Transform(TransformError::TemplateApply(_)) => OutputErrorCode::TemplateApply,
            TugError::Transform(TransformError::TemplateCompilation(_)) => {
                OutputErrorCode::TemplateCompilation
            }
            TugError::Transform(_) => OutputErrorCode::TransformFailed,
            TugError::Config(_) => OutputErrorCode::ConfigError,
            TugError::Internal { .. } => OutputErrorCode::InternalError,
        }
    }
}

impl From<serde_json::Error> for TugError {
    fn from(e: serde_json::Error) -> Self {
        TugError::internal(format!("serialization failed: {}", e))
    }
}
