//! Explicit migration registration and discovery.
//!
//! Migrations are registered under an ordinal, optionally qualified by a
//! database product. A qualified entry `(n, "Oracle")` is presented as
//! `<base>n$Oracle` and wins over the unqualified `<base>n` when the engine
//! runs against that product.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::dialect::product_tag;
use crate::error::{MigrateError, Result};
use crate::migration::Migration;

/// Builds a fresh migration instance.
pub type MigrationFactory = Arc<dyn Fn() -> Box<dyn Migration> + Send + Sync>;

/// A discovered migration, not yet ordered or filtered.
#[derive(Clone)]
pub struct Candidate {
    /// `<base><ordinal>` or `<base><ordinal>$<tag>`.
    pub name: String,
    /// Builds the unit.
    pub factory: MigrationFactory,
}

impl Candidate {
    /// Creates a candidate.
    pub fn new(name: impl Into<String>, factory: MigrationFactory) -> Self {
        Self {
            name: name.into(),
            factory,
        }
    }
}

impl fmt::Debug for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Candidate").field("name", &self.name).finish()
    }
}

/// Registry key: an ordinal plus the product tag of a dedicated variant.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnitKey {
    /// Migration ordinal.
    pub ordinal: i64,
    /// Normalized product tag, `None` for the variant used everywhere else.
    pub dialect: Option<String>,
}

impl UnitKey {
    fn new(ordinal: i64, dialect: Option<String>) -> Self {
        Self { ordinal, dialect }
    }
}

/// Table of known migrations.
#[derive(Clone, Default)]
pub struct MigrationRegistry {
    entries: BTreeMap<UnitKey, MigrationFactory>,
}

impl fmt::Debug for MigrationRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.keys()).finish()
    }
}

impl MigrationRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the migration for `ordinal` used on every product without
    /// a dedicated variant.
    pub fn register<F, M>(&mut self, ordinal: i64, factory: F) -> Result<()>
    where
        F: Fn() -> M + Send + Sync + 'static,
        M: Migration + 'static,
    {
        self.insert(ordinal, None, factory)
    }

    /// Registers the migration for `ordinal` used only on `product`.
    pub fn register_for<F, M>(&mut self, ordinal: i64, product: &str, factory: F) -> Result<()>
    where
        F: Fn() -> M + Send + Sync + 'static,
        M: Migration + 'static,
    {
        self.insert(ordinal, Some(product_tag(product)), factory)
    }

    fn insert<F, M>(&mut self, ordinal: i64, tag: Option<String>, factory: F) -> Result<()>
    where
        F: Fn() -> M + Send + Sync + 'static,
        M: Migration + 'static,
    {
        let key = UnitKey::new(ordinal, tag);
        if self.entries.contains_key(&key) {
            return Err(MigrateError::DuplicateMigration {
                ordinal: key.ordinal,
                dialect: key.dialect,
            });
        }
        let factory: MigrationFactory = Arc::new(move || Box::new(factory()) as Box<dyn Migration>);
        self.entries.insert(key, factory);
        Ok(())
    }

    /// Number of registered entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Collects the contiguous run of migrations starting at `start_index`.
    ///
    /// For each ordinal the variant for `product` is preferred over the
    /// unqualified one. Discovery stops at the first ordinal with neither,
    /// so anything registered past a gap is never returned.
    #[must_use]
    pub fn discover(&self, base_name: &str, product: &str, start_index: i64) -> Vec<Candidate> {
        let tag = product_tag(product);
        let mut candidates = Vec::new();
        let mut ordinal = start_index;

        loop {
            let qualified = self.entries.get(&UnitKey::new(ordinal, Some(tag.clone())));
            let candidate = match qualified {
                Some(factory) => Candidate::new(format!("{base_name}{ordinal}${tag}"), factory.clone()),
                None => match self.entries.get(&UnitKey::new(ordinal, None)) {
                    Some(factory) => Candidate::new(format!("{base_name}{ordinal}"), factory.clone()),
                    None => break,
                },
            };
            debug!(name = %candidate.name, "Discovered migration");
            candidates.push(candidate);

            match ordinal.checked_add(1) {
                Some(next) => ordinal = next,
                None => break,
            }
        }

        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migration::MigrationContext;
    use async_trait::async_trait;

    struct Noop;

    #[async_trait]
    impl Migration for Noop {
        async fn up(&self, _ctx: &MigrationContext) -> Result<()> {
            Ok(())
        }

        async fn down(&self, _ctx: &MigrationContext) -> Result<()> {
            Ok(())
        }
    }

    fn names(candidates: &[Candidate]) -> Vec<&str> {
        candidates.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_discover_prefers_dialect_variant() {
        let mut registry = MigrationRegistry::new();
        registry.register(1, || Noop).unwrap();
        registry.register(2, || Noop).unwrap();
        registry.register_for(2, "Oracle", || Noop).unwrap();

        let oracle = registry.discover("Migration_", "Oracle", 1);
        assert_eq!(names(&oracle), vec!["Migration_1", "Migration_2$Oracle"]);

        let mysql = registry.discover("Migration_", "MySQL", 1);
        assert_eq!(names(&mysql), vec!["Migration_1", "Migration_2"]);
    }

    #[test]
    fn test_discover_stops_at_gap() {
        let mut registry = MigrationRegistry::new();
        for ordinal in [1, 2, 3, 5] {
            registry.register(ordinal, || Noop).unwrap();
        }

        let found = registry.discover("Migration_", "SQLite", 1);
        assert_eq!(
            names(&found),
            vec!["Migration_1", "Migration_2", "Migration_3"]
        );
    }

    #[test]
    fn test_discover_qualified_only_ordinal() {
        let mut registry = MigrationRegistry::new();
        registry.register(1, || Noop).unwrap();
        registry.register_for(2, "PostgreSQL", || Noop).unwrap();
        registry.register(3, || Noop).unwrap();

        assert_eq!(registry.discover("M", "PostgreSQL", 1).len(), 3);
        // Ordinal 2 has no variant for SQLite, so 3 is unreachable.
        assert_eq!(names(&registry.discover("M", "SQLite", 1)), vec!["M1"]);
    }

    #[test]
    fn test_discover_respects_start_index() {
        let mut registry = MigrationRegistry::new();
        registry.register(0, || Noop).unwrap();
        registry.register(1, || Noop).unwrap();

        assert_eq!(registry.discover("M", "SQLite", 1).len(), 1);
        assert_eq!(registry.discover("M", "SQLite", 0).len(), 2);
        assert!(registry.discover("M", "SQLite", 7).is_empty());
    }

    #[test]
    fn test_product_tag_normalized() {
        let mut registry = MigrationRegistry::new();
        registry.register(1, || Noop).unwrap();
        registry.register_for(1, "Apache Derby", || Noop).unwrap();

        let found = registry.discover("Migration_", "Apache Derby", 1);
        assert_eq!(names(&found), vec!["Migration_1$Apache_Derby"]);
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut registry = MigrationRegistry::new();
        registry.register(4, || Noop).unwrap();
        let err = registry.register(4, || Noop).unwrap_err();
        assert!(matches!(
            err,
            MigrateError::DuplicateMigration {
                ordinal: 4,
                dialect: None
            }
        ));

        registry.register_for(4, "MySQL", || Noop).unwrap();
        assert!(registry.register_for(4, "MySQL", || Noop).is_err());
        assert_eq!(registry.len(), 2);
    }
}
