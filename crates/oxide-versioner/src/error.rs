//! Error types for the migration system.

use std::path::PathBuf;

/// Errors that can occur during migration operations.
#[derive(Debug, thiserror::Error)]
pub enum MigrateError {
    /// Malformed input to statement synthesis.
    ///
    /// Raised before any SQL text is produced.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The dialect cannot express the requested operation at all.
    #[error("{dialect} does not support {feature}")]
    Unsupported {
        /// Dialect name.
        dialect: &'static str,
        /// What was requested.
        feature: String,
    },

    /// A migration has no variant for the connected database product.
    #[error("{0} is not supported by this migration")]
    UnsupportedProduct(String),

    /// Reading, creating or writing the version table failed.
    #[error("Version table '{table}' failed: {source}")]
    VersionStore {
        /// Name of the version table.
        table: String,
        /// Underlying database error.
        #[source]
        source: sqlx::Error,
    },

    /// Looking up a table or index in the database metadata failed.
    #[error("Failed to look up {object}: {source}")]
    Introspection {
        /// The table or index that was looked up.
        object: String,
        /// Underlying database error.
        #[source]
        source: sqlx::Error,
    },

    /// A migration unit failed. The version reached before the failure has
    /// already been persisted.
    #[error("Migration {name} failed, schema left at version {reached}: {source}")]
    MigrationFailed {
        /// Discovered name of the failing unit.
        name: String,
        /// Version persisted after the partial run.
        reached: i64,
        /// The unit's own error.
        #[source]
        source: Box<MigrateError>,
    },

    /// The same registry key was registered twice.
    #[error("Migration {ordinal}{} registered more than once", .dialect.as_deref().map(|d| format!("${d}")).unwrap_or_default())]
    DuplicateMigration {
        /// Ordinal of the migration.
        ordinal: i64,
        /// Dialect tag, if dialect-qualified.
        dialect: Option<String>,
    },

    /// Two candidates resolved to the same ordinal.
    #[error("Migrations '{first}' and '{second}' share ordinal {ordinal}")]
    DuplicateOrdinal {
        /// The shared ordinal.
        ordinal: i64,
        /// First candidate name.
        first: String,
        /// Second candidate name.
        second: String,
    },

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Database error during migration execution.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// IO error (reading configuration files).
    #[error("IO error reading '{path}': {source}")]
    Io {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl MigrateError {
    /// Shorthand for a validation error.
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Returns the unit error wrapped by [`MigrateError::MigrationFailed`],
    /// or `self` for every other kind.
    #[must_use]
    pub fn root_cause(&self) -> &Self {
        match self {
            Self::MigrationFailed { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Result type for migration operations.
pub type Result<T> = std::result::Result<T, MigrateError>;
