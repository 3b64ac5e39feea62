#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use oxide_versioner::prelude::*;
use sqlx::AnyPool;
use sqlx::any::AnyPoolOptions;

pub type Log = Arc<Mutex<Vec<String>>>;

pub async fn memory_pool() -> AnyPool {
    sqlx::any::install_default_drivers();
    AnyPoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory SQLite pool")
}

pub async fn file_pool(path: &std::path::Path, max_connections: u32) -> AnyPool {
    sqlx::any::install_default_drivers();
    AnyPoolOptions::new()
        .max_connections(max_connections)
        .connect(&format!("sqlite://{}?mode=rwc", path.display()))
        .await
        .expect("Failed to open SQLite file")
}

pub fn new_log() -> Log {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn entries(log: &Log) -> Vec<String> {
    log.lock().unwrap().clone()
}

/// Records `up:<label>` / `down:<label>` and optionally fails afterwards.
pub struct Recording {
    pub label: String,
    pub log: Log,
    pub fail: bool,
}

#[async_trait]
impl Migration for Recording {
    async fn up(&self, _ctx: &MigrationContext) -> Result<()> {
        self.log.lock().unwrap().push(format!("up:{}", self.label));
        if self.fail {
            return Err(MigrateError::Validation(format!("{} failed", self.label)));
        }
        Ok(())
    }

    async fn down(&self, _ctx: &MigrationContext) -> Result<()> {
        self.log.lock().unwrap().push(format!("down:{}", self.label));
        if self.fail {
            return Err(MigrateError::Validation(format!("{} failed", self.label)));
        }
        Ok(())
    }
}

pub fn recording(label: impl Into<String>, log: &Log, fail: bool) -> impl Fn() -> Recording + Send + Sync + 'static {
    let label = label.into();
    let log = log.clone();
    move || Recording {
        label: label.clone(),
        log: log.clone(),
        fail,
    }
}

/// Registers recording migrations for `ordinals`; `failing` fails.
pub fn recording_registry(
    ordinals: impl IntoIterator<Item = i64>,
    log: &Log,
    failing: Option<i64>,
) -> MigrationRegistry {
    let mut registry = MigrationRegistry::new();
    for ordinal in ordinals {
        registry
            .register(
                ordinal,
                recording(ordinal.to_string(), log, failing == Some(ordinal)),
            )
            .unwrap();
    }
    registry
}

/// In-memory version store that remembers every write.
#[derive(Default)]
pub struct MemoryStore {
    pub version: Mutex<i64>,
    pub writes: Mutex<Vec<i64>>,
}

impl MemoryStore {
    pub fn at(version: i64) -> Self {
        Self {
            version: Mutex::new(version),
            writes: Mutex::new(Vec::new()),
        }
    }

    pub fn version(&self) -> i64 {
        *self.version.lock().unwrap()
    }

    pub fn writes(&self) -> Vec<i64> {
        self.writes.lock().unwrap().clone()
    }
}

#[async_trait]
impl VersionStore for MemoryStore {
    async fn current_version(&self) -> Result<i64> {
        Ok(self.version())
    }

    async fn update_version(&self, version: i64) -> Result<()> {
        *self.version.lock().unwrap() = version;
        self.writes.lock().unwrap().push(version);
        Ok(())
    }
}

pub async fn engine_at(
    version: i64,
    registry: MigrationRegistry,
    product: &str,
) -> Engine<MemoryStore> {
    Engine::with_store(
        memory_pool().await,
        MigrateConfig::default(),
        registry,
        product,
        MemoryStore::at(version),
    )
}

/// Version store whose reads or writes fail with a closed pool.
pub struct FailingStore {
    pub version: i64,
    pub fail_read: bool,
    pub fail_write: bool,
}

impl FailingStore {
    fn error() -> MigrateError {
        MigrateError::VersionStore {
            table: "version".to_string(),
            source: sqlx::Error::PoolClosed,
        }
    }
}

#[async_trait]
impl VersionStore for FailingStore {
    async fn current_version(&self) -> Result<i64> {
        if self.fail_read {
            return Err(Self::error());
        }
        Ok(self.version)
    }

    async fn update_version(&self, _version: i64) -> Result<()> {
        if self.fail_write {
            return Err(Self::error());
        }
        Ok(())
    }
}

pub async fn engine_with_store(registry: MigrationRegistry, store: FailingStore) -> Engine<FailingStore> {
    Engine::with_store(
        memory_pool().await,
        MigrateConfig::default(),
        registry,
        "SQLite",
        store,
    )
}
