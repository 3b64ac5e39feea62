//! Migration configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MigrateError, Result};

/// Default prefix of migration names.
pub const DEFAULT_BASE_NAME: &str = "Migration_";

/// Default name of the version table.
pub const DEFAULT_VERSION_TABLE: &str = "version";

/// Settings shared by the engine, the version store and every migration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MigrateConfig {
    /// Prefix of migration names; the ordinal follows it.
    pub base_name: String,
    /// First ordinal looked up during discovery.
    pub start_index: i64,
    /// Name of the table holding the schema version.
    pub version_table: String,
    /// Database product name, overriding the one reported by the driver.
    pub product_name: Option<String>,
}

impl Default for MigrateConfig {
    fn default() -> Self {
        Self {
            base_name: DEFAULT_BASE_NAME.to_string(),
            start_index: 1,
            version_table: DEFAULT_VERSION_TABLE.to_string(),
            product_name: None,
        }
    }
}

impl MigrateConfig {
    /// Loads a configuration from a JSON file. Missing keys take their
    /// default values.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| MigrateError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the base name.
    #[must_use]
    pub fn base_name(mut self, base_name: impl Into<String>) -> Self {
        self.base_name = base_name.into();
        self
    }

    /// Sets the start index.
    #[must_use]
    pub fn start_index(mut self, start_index: i64) -> Self {
        self.start_index = start_index;
        self
    }

    /// Sets the version table name.
    #[must_use]
    pub fn version_table(mut self, table: impl Into<String>) -> Self {
        self.version_table = table.into();
        self
    }

    /// Overrides the database product name.
    #[must_use]
    pub fn product_name(mut self, product: impl Into<String>) -> Self {
        self.product_name = Some(product.into());
        self
    }

    /// Checks the settings are usable.
    pub fn validate(&self) -> Result<()> {
        if self.base_name.trim().is_empty() {
            return Err(MigrateError::Config("base_name can not be empty".to_string()));
        }
        if self.base_name.contains('$') {
            return Err(MigrateError::Config(
                "base_name can not contain '$'".to_string(),
            ));
        }
        if self.version_table.trim().is_empty() {
            return Err(MigrateError::Config(
                "version_table can not be empty".to_string(),
            ));
        }
        if self.start_index < 0 {
            return Err(MigrateError::Config(format!(
                "start_index must not be negative, got {}",
                self.start_index
            )));
        }
        Ok(())
    }
}
