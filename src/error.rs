//! Unified error types for eol-scanner.
//!
//! Errors are grouped by the subsystem that raised them. Each group carries a
//! context string that can be chained with [`ErrorContext`] as the error
//! travels up through the store, sync, and scan layers.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for eol-scanner operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum EolScanError {
    /// Errors raised by the catalog store
    #[error("Catalog store error: {context}")]
    Store {
        context: String,
        #[source]
        source: StoreErrorKind,
    },

    /// Errors raised while fetching the upstream catalog
    #[error("Catalog source error: {context}")]
    Source {
        context: String,
        #[source]
        source: SourceErrorKind,
    },

    /// Errors while reading a component inventory
    #[error("Failed to read inventory: {context}")]
    Inventory {
        context: String,
        #[source]
        source: InventoryErrorKind,
    },

    /// The operation observed a cancellation request
    #[error("Operation cancelled")]
    Cancelled,

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Specific store error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum StoreErrorKind {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Store lock poisoned")]
    Poisoned,
}

/// Specific catalog source error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SourceErrorKind {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Upstream returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Source unavailable: {0}")]
    Unavailable(String),
}

/// Specific inventory error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum InventoryErrorKind {
    #[error("Unknown inventory format - expected a `components` or `artifacts` array")]
    UnknownFormat,

    #[error("Invalid JSON structure: {0}")]
    InvalidJson(String),
}

// ============================================================================
// Result type alias
// ============================================================================

/// Convenient Result type for eol-scanner operations
pub type Result<T> = std::result::Result<T, EolScanError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl EolScanError {
    /// Create a store error with context
    pub fn store(context: impl Into<String>, source: StoreErrorKind) -> Self {
        Self::Store {
            context: context.into(),
            source,
        }
    }

    /// Create a source error with context
    pub fn upstream(context: impl Into<String>, source: SourceErrorKind) -> Self {
        Self::Source {
            context: context.into(),
            source,
        }
    }

    /// Create an inventory error with context
    pub fn inventory(context: impl Into<String>, source: InventoryErrorKind) -> Self {
        Self::Inventory {
            context: context.into(),
            source,
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

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Whether this error is a cancellation rather than a failure.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

// ============================================================================
// Conversions from existing error types
// ============================================================================

impl From<std::io::Error> for EolScanError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

impl From<rusqlite::Error> for EolScanError {
    fn from(err: rusqlite::Error) -> Self {
        Self::store("sqlite query", StoreErrorKind::Sqlite(err))
    }
}

impl From<serde_json::Error> for EolScanError {
    fn from(err: serde_json::Error) -> Self {
        Self::inventory(
            "JSON deserialization",
            InventoryErrorKind::InvalidJson(err.to_string()),
        )
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// The context is prepended to the error's existing context, so the final
/// message reads outermost operation first.
///
/// ```ignore
/// use eol_scanner::error::ErrorContext;
///
/// let id = store
///     .upsert_product(&product)
///     .with_context(|| format!("upserting product {}", product.name))?;
/// ```
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure, evaluated only on error.
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<EolScanError>> ErrorContext<T> for std::result::Result<T, E> {
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
fn add_context_to_error(err: EolScanError, new_ctx: &str) -> EolScanError {
    match err {
        EolScanError::Store {
            context: existing,
            source,
        } => EolScanError::Store {
            context: chain_context(new_ctx, &existing),
            source,
        },
        EolScanError::Source {
            context: existing,
            source,
        } => EolScanError::Source {
            context: chain_context(new_ctx, &existing),
            source,
        },
        EolScanError::Inventory {
            context: existing,
            source,
        } => EolScanError::Inventory {
            context: chain_context(new_ctx, &existing),
            source,
        },
        EolScanError::Io {
            path,
            message,
            source,
        } => EolScanError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        EolScanError::Config(msg) => EolScanError::Config(chain_context(new_ctx, &msg)),
        EolScanError::Cancelled => EolScanError::Cancelled,
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
