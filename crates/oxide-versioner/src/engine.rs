//! Migration engine.
//!
//! Moves a database from its persisted version to a target version by
//! running the registered migrations in between, in order, and persisting
//! how far it got even when a migration fails.

use std::fmt;
use std::sync::Arc;

use sqlx::AnyPool;
use tracing::{debug, error, info};

use crate::config::MigrateConfig;
use crate::dialect::Dialect;
use crate::error::{MigrateError, Result};
use crate::migration::MigrationContext;
use crate::registry::{Candidate, MigrationFactory, MigrationRegistry};
use crate::version::{InitGate, SqlVersionStore, VersionStore};

/// Direction of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Applying migrations, ascending.
    Up,
    /// Reverting migrations, descending.
    Down,
}

impl Direction {
    /// Returns the direction needed to go from `current` to `target`, or
    /// `None` when they are equal.
    #[must_use]
    pub fn between(current: i64, target: i64) -> Option<Self> {
        match target.cmp(&current) {
            std::cmp::Ordering::Greater => Some(Self::Up),
            std::cmp::Ordering::Less => Some(Self::Down),
            std::cmp::Ordering::Equal => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up => f.write_str("up"),
            Self::Down => f.write_str("down"),
        }
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    /// Version before the run.
    pub from: i64,
    /// Version after the run.
    pub to: i64,
    /// Direction, `None` when nothing had to change.
    pub direction: Option<Direction>,
    /// Names of the migrations that ran, in execution order.
    pub executed: Vec<String>,
}

impl MigrationReport {
    fn unchanged(version: i64) -> Self {
        Self {
            from: version,
            to: version,
            direction: None,
            executed: Vec::new(),
        }
    }
}

/// A candidate selected for a run.
#[derive(Clone)]
pub struct PlannedMigration {
    /// Ordinal parsed from the name.
    pub ordinal: i64,
    /// Discovered name.
    pub name: String,
    factory: MigrationFactory,
}

impl fmt::Debug for PlannedMigration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlannedMigration")
            .field("ordinal", &self.ordinal)
            .field("name", &self.name)
            .finish()
    }
}

/// Extracts the ordinal from a migration name: the `$<tag>` suffix and the
/// base-name prefix are stripped and the rest parsed.
///
/// Names that do not parse are logged and yield `None`.
#[must_use]
pub fn parse_ordinal(name: &str, base_name: &str) -> Option<i64> {
    let stem = name.split_once('$').map_or(name, |(stem, _)| stem);
    let Some(digits) = stem.strip_prefix(base_name) else {
        error!(name, base_name, "Migration name does not start with the base name");
        return None;
    };
    match digits.parse::<i64>() {
        Ok(ordinal) => Some(ordinal),
        Err(e) => {
            error!(name, error = %e, "Could not parse migration ordinal");
            None
        }
    }
}

/// Selects and orders the candidates needed to go from `current` to
/// `target`.
///
/// Keeps ordinals in `(min, max]` of the two versions, ascending when going
/// up and descending when going down.
pub fn plan(
    candidates: Vec<Candidate>,
    base_name: &str,
    current: i64,
    target: i64,
) -> Result<Vec<PlannedMigration>> {
    let Some(direction) = Direction::between(current, target) else {
        return Ok(Vec::new());
    };
    let (low, high) = (current.min(target), current.max(target));

    let mut planned: Vec<PlannedMigration> = candidates
        .into_iter()
        .filter_map(|candidate| {
            let ordinal = parse_ordinal(&candidate.name, base_name)?;
            Some(PlannedMigration {
                ordinal,
                name: candidate.name,
                factory: candidate.factory,
            })
        })
        .collect();

    // Duplicates anywhere in the set are rejected, not only inside the range.
    planned.sort_by_key(|m| m.ordinal);
    if let Some(pair) = planned.windows(2).find(|w| w[0].ordinal == w[1].ordinal) {
        return Err(MigrateError::DuplicateOrdinal {
            ordinal: pair[0].ordinal,
            first: pair[0].name.clone(),
            second: pair[1].name.clone(),
        });
    }
    planned.retain(|m| m.ordinal > low && m.ordinal <= high);
    if direction == Direction::Down {
        planned.reverse();
    }

    Ok(planned)
}

/// Returns the product name to migrate for: the configured override, or the
/// backend reported by the connection.
pub async fn resolve_product_name(pool: &AnyPool, config: &MigrateConfig) -> Result<String> {
    if let Some(product) = &config.product_name {
        return Ok(product.clone());
    }
    let conn = pool.acquire().await?;
    Ok(conn.backend_name().to_string())
}

/// Runs migrations against one database.
pub struct Engine<S: VersionStore = SqlVersionStore> {
    pool: AnyPool,
    config: MigrateConfig,
    registry: MigrationRegistry,
    product_name: String,
    store: S,
}

impl Engine<SqlVersionStore> {
    /// Creates an engine storing the version in the configured table.
    ///
    /// `gate` serializes version-table creation across every engine in the
    /// process.
    pub async fn connect(
        pool: AnyPool,
        config: MigrateConfig,
        registry: MigrationRegistry,
        gate: Arc<InitGate>,
    ) -> Result<Self> {
        config.validate()?;
        let product_name = resolve_product_name(&pool, &config).await?;
        let store = SqlVersionStore::new(
            pool.clone(),
            Dialect::from_product_name(&product_name),
            config.version_table.clone(),
            gate,
        );
        info!(product = %product_name, "Connected migration engine");
        Ok(Self::with_store(pool, config, registry, product_name, store))
    }
}

impl<S: VersionStore> Engine<S> {
    /// Creates an engine over a custom version store.
    pub fn with_store(
        pool: AnyPool,
        config: MigrateConfig,
        registry: MigrationRegistry,
        product_name: impl Into<String>,
        store: S,
    ) -> Self {
        Self {
            pool,
            config,
            registry,
            product_name: product_name.into(),
            store,
        }
    }

    /// Returns the product name migrations are selected for.
    #[must_use]
    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    /// Returns the dialect of the managed database.
    #[must_use]
    pub fn dialect(&self) -> Dialect {
        Dialect::from_product_name(&self.product_name)
    }

    /// Returns the version store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the persisted version.
    pub async fn current_version(&self) -> Result<i64> {
        self.store.current_version().await
    }

    fn plan_between(&self, current: i64, target: i64) -> Result<Vec<PlannedMigration>> {
        let candidates = self.registry.discover(
            &self.config.base_name,
            &self.product_name,
            self.config.start_index,
        );
        debug!(count = candidates.len(), "Discovered migrations");
        plan(candidates, &self.config.base_name, current, target)
    }

    /// Names of the migrations a run to `target` would execute, in order.
    pub async fn pending(&self, target: i64) -> Result<Vec<String>> {
        let current = self.current_version().await?;
        Ok(self
            .plan_between(current, target)?
            .into_iter()
            .map(|m| m.name)
            .collect())
    }

    /// Migrates to the highest known version.
    pub async fn migrate_to_latest(&self) -> Result<MigrationReport> {
        self.migrate(i64::MAX).await
    }

    /// Migrates to `target`.
    ///
    /// Migrations run one at a time and the run halts at the first failure.
    /// The version reached so far is persisted before that failure is
    /// returned as [`MigrateError::MigrationFailed`].
    pub async fn migrate(&self, target: i64) -> Result<MigrationReport> {
        let current = self.current_version().await?;
        let Some(direction) = Direction::between(current, target) else {
            info!(version = current, "Schema already at requested version");
            return Ok(MigrationReport::unchanged(current));
        };

        let planned = self.plan_between(current, target)?;
        info!(
            from = current,
            target,
            %direction,
            count = planned.len(),
            "Migrating"
        );

        let mut reached = current;
        let mut executed = Vec::with_capacity(planned.len());
        let mut failure = None;

        for migration in planned {
            info!(name = %migration.name, %direction, "Running migration");
            match self.run_one(&migration, direction).await {
                Ok(()) => {
                    reached = match direction {
                        Direction::Up => migration.ordinal,
                        Direction::Down => migration.ordinal - 1,
                    };
                    executed.push(migration.name);
                }
                Err(e) => {
                    error!(name = %migration.name, error = %e, "Migration failed");
                    failure = Some((migration.name, e));
                    break;
                }
            }
        }

        if reached != current {
            self.store.update_version(reached).await?;
        }

        if let Some((name, source)) = failure {
            return Err(MigrateError::MigrationFailed {
                name,
                reached,
                source: Box::new(source),
            });
        }

        info!(from = current, to = reached, "Migration complete");
        Ok(MigrationReport {
            from: current,
            to: reached,
            direction: Some(direction),
            executed,
        })
    }

    async fn run_one(&self, migration: &PlannedMigration, direction: Direction) -> Result<()> {
        let ctx = MigrationContext::new(
            self.pool.clone(),
            self.config.clone(),
            self.product_name.clone(),
        );
        let mut unit = (migration.factory)();
        unit.init(&ctx).await?;
        match direction {
            Direction::Up => unit.up(&ctx).await,
            Direction::Down => unit.down(&ctx).await,
        }
    }
}
