//! Unified error types for sit.
//!
//! Every fallible core operation returns [`SitError`]. The four
//! domain kinds (`MalformedDocument`, `UnsupportedMapping`,
//! `ComponentNotFound`, `MergeConflict`) carry enough context to name the
//! offending component ID, format, or schema field.

use crate::model::{ComponentId, SbomFormat};
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for sit operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SitError {
    /// Unparseable or schema-invalid input
    #[error("Malformed {format} document: {context}")]
    MalformedDocument {
        format: String,
        context: String,
        #[source]
        source: MalformedKind,
    },

    /// A construct of the graph has no representation in the target format
    #[error("Cannot represent {field} of '{subject}' in {format}: {detail}")]
    UnsupportedMapping {
        format: SbomFormat,
        subject: String,
        field: String,
        detail: String,
    },

    /// Export or merge referenced an ID that is not in the graph
    #[error("Component not found: '{id}'{}", fmt_context(.context))]
    ComponentNotFound { id: ComponentId, context: String },

    /// Irreconcilable identity clash between root and sub graph
    #[error("Merge conflict on component '{id}': {reason}")]
    MergeConflict { id: ComponentId, reason: String },

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Invalid configuration for '{field}': {message}")]
    Config { field: String, message: String },

    /// Validation errors
    #[error("Validation failed: {0}")]
    Validation(String),
}

fn fmt_context(context: &str) -> String {
    if context.is_empty() {
        String::new()
    } else {
        format!(" ({context})")
    }
}

/// Specific reasons a document is malformed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MalformedKind {
    #[error("Could not detect SBOM format - expected SPDX, CycloneDX, OSSBOM or middleware markers")]
    UndetectedFormat,

    #[error("Input is not valid UTF-8")]
    NotUtf8,

    #[error("Invalid JSON structure: {0}")]
    InvalidJson(String),

    #[error("Missing required field: {field} in {context}")]
    MissingField { field: String, context: String },

    #[error("Unsupported format version: {version} (supported: {supported})")]
    UnsupportedVersion { version: String, supported: String },

    #[error("Invalid field value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    #[error("Duplicate component id '{0}'")]
    DuplicateId(String),

    #[error("Relationship {from} -> {to} references a component that does not exist")]
    DanglingRelationship { from: String, to: String },

    #[error("Root '{0}' is not a component of the graph")]
    UnknownRoot(String),

    #[error("Graph has no root component")]
    MissingRoot,
}

// ============================================================================
// Result type alias
// ============================================================================

/// Convenient Result type for sit operations
pub type Result<T> = std::result::Result<T, SitError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl SitError {
    /// Create a malformed-document error with context
    pub fn malformed(
        format: impl ToString,
        context: impl Into<String>,
        source: MalformedKind,
    ) -> Self {
        Self::MalformedDocument {
            format: format.to_string(),
            context: context.into(),
            source,
        }
    }

    /// Create a malformed-document error for a missing required field
    pub fn missing_field(
        format: impl ToString,
        field: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        Self::malformed(
            format,
            "missing required field",
            MalformedKind::MissingField {
                field: field.into(),
                context: context.into(),
            },
        )
    }

    /// Create a malformed-document error for an unsupported schema version
    pub fn unsupported_version(
        format: SbomFormat,
        version: impl Into<String>,
        supported: &[&str],
    ) -> Self {
        Self::malformed(
            format,
            "unsupported schema version",
            MalformedKind::UnsupportedVersion {
                version: version.into(),
                supported: supported.join(", "),
            },
        )
    }

    /// Create a malformed-document error from a JSON deserialization failure
    pub fn invalid_json(format: impl ToString, err: &serde_json::Error) -> Self {
        Self::malformed(
            format,
            "JSON deserialization",
            MalformedKind::InvalidJson(err.to_string()),
        )
    }

    /// Create an unsupported-mapping error
    pub fn unsupported(
        format: SbomFormat,
        subject: impl Into<String>,
        field: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self::UnsupportedMapping {
            format,
            subject: subject.into(),
            field: field.into(),
            detail: detail.into(),
        }
    }

    /// Create a component-not-found error
    pub fn not_found(id: impl Into<ComponentId>, context: impl Into<String>) -> Self {
        Self::ComponentNotFound {
            id: id.into(),
            context: context.into(),
        }
    }

    /// Create a merge conflict error
    pub fn conflict(id: impl Into<ComponentId>, reason: impl Into<String>) -> Self {
        Self::MergeConflict {
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        let message = format!("{source}");
        Self::Io {
            path: Some(path),
            message,
            source,
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a config error
    pub fn config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Config {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Process exit status for this error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        use crate::pipeline::exit_codes;
        match self {
            Self::MalformedDocument { .. } => exit_codes::MALFORMED_DOCUMENT,
            Self::UnsupportedMapping { .. } => exit_codes::UNSUPPORTED_MAPPING,
            Self::ComponentNotFound { .. } => exit_codes::COMPONENT_NOT_FOUND,
            Self::MergeConflict { .. } => exit_codes::MERGE_CONFLICT,
            Self::Io { .. } | Self::Config { .. } | Self::Validation(_) => exit_codes::ERROR,
        }
    }
}

// ============================================================================
// Conversions from existing error types
// ============================================================================

impl From<std::io::Error> for SitError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// The context string is prepended to the error's existing context, so a
/// failure deep inside a decoder reads like
/// `Malformed SPDX document: root graph: packages[3]: missing required field`.
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure (lazy evaluation).
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<SitError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

/// Add context to an error, chaining with any existing context.
fn add_context_to_error(err: SitError, new_ctx: &str) -> SitError {
    match err {
        SitError::MalformedDocument {
            format,
            context: existing,
            source,
        } => SitError::MalformedDocument {
            format,
            context: chain_context(new_ctx, &existing),
            source,
        },
        SitError::ComponentNotFound {
            id,
            context: existing,
        } => SitError::ComponentNotFound {
            id,
            context: chain_context(new_ctx, &existing),
        },
        SitError::MergeConflict { id, reason } => SitError::MergeConflict {
            id,
            reason: chain_context(new_ctx, &reason),
        },
        SitError::Io {
            path,
            message,
            source,
        } => SitError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        SitError::Validation(msg) => SitError::Validation(chain_context(new_ctx, &msg)),
        other => other,
    }
}

/// Chain two context strings together.
///
/// If the existing context is empty, returns just the new context.
/// Otherwise, returns "`new_context`: `existing_context`".
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_names_field() {
        let err = SitError::missing_field(SbomFormat::Spdx, "spdxVersion", "document");
        let display = err.to_string();
        assert!(display.contains("SPDX"), "{display}");

        let source = std::error::Error::source(&err).map(ToString::to_string);
        assert!(source.unwrap_or_default().contains("spdxVersion"));
    }

    #[test]
    fn test_not_found_names_id() {
        let err = SitError::not_found("pkg-a", "export request");
        let display = err.to_string();
        assert!(display.contains("'pkg-a'"));
        assert!(display.contains("export request"));

        let bare = SitError::not_found("pkg-b", "");
        assert_eq!(bare.to_string(), "Component not found: 'pkg-b'");
    }

    #[test]
    fn test_unsupported_mapping_display() {
        let err = SitError::unsupported(
            SbomFormat::CycloneDx,
            "lib-a",
            "relationship",
            "GENERATED_FROM has no CycloneDX form",
        );
        let display = err.to_string();
        assert!(display.contains("CycloneDX"));
        assert!(display.contains("lib-a"));
        assert!(display.contains("GENERATED_FROM"));
    }

    #[test]
    fn test_exit_codes_are_distinct() {
        let codes = [
            SitError::missing_field(SbomFormat::Spdx, "x", "y").exit_code(),
            SitError::unsupported(SbomFormat::Spdx, "a", "b", "c").exit_code(),
            SitError::not_found("a", "").exit_code(),
            SitError::conflict("a", "b").exit_code(),
            SitError::validation("x").exit_code(),
        ];
        assert!(codes.iter().all(|c| *c != 0));
        let unique: std::collections::HashSet<_> = codes.iter().collect();
        assert_eq!(unique.len(), codes.len());
    }

    #[test]
    fn test_context_chaining() {
        let initial: Result<()> = Err(SitError::malformed(
            SbomFormat::CycloneDx,
            "components[2]",
            MalformedKind::InvalidValue {
                field: "hashes".into(),
                message: "empty".into(),
            },
        ));

        match initial.context("sub graph") {
            Err(SitError::MalformedDocument { context, .. }) => {
                assert_eq!(context, "sub graph: components[2]");
            }
            other => panic!("Expected MalformedDocument, got {other:?}"),
        }
    }

    #[test]
    fn test_with_context_is_lazy_on_success() {
        let ok: Result<i32> = Ok(7);
        let value = ok
            .with_context(|| -> String { panic!("closure must not run on success") })
            .unwrap();
        assert_eq!(value, 7);
    }

    #[test]
    fn test_context_does_not_touch_unsupported_mapping() {
        let err: Result<()> = Err(SitError::unsupported(SbomFormat::Ossbom, "a", "b", "c"));
        match err.context("ignored") {
            Err(SitError::UnsupportedMapping { subject, .. }) => assert_eq!(subject, "a"),
            other => panic!("unexpected {other:?}"),
        }
    }
}
