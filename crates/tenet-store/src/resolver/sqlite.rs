//! SQLite-backed property resolver.

use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use rusqlite::{Connection, ErrorCode, OptionalExtension, Row, params};
use tenet_core::{Lookup, PropertyInfo, PropertyType, Result, TenetError};
use tracing::{debug, info, warn};

use super::{PropertyResolver, StoreHealth, StoreState};

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS properties (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        category TEXT NOT NULL,
        name TEXT NOT NULL,
        modifiable INTEGER NOT NULL,
        type TEXT NOT NULL,
        UNIQUE (category, name)
    );

    CREATE TABLE IF NOT EXISTS property_values (
        property_id INTEGER NOT NULL REFERENCES properties(id) ON DELETE CASCADE,
        lookup INTEGER NOT NULL,
        value BLOB NOT NULL,
        PRIMARY KEY (property_id, lookup)
    );
"#;

const SELECT_INFO: &str = "SELECT id, category, name, modifiable, type FROM properties";

/// A resolver persisting properties in a SQLite database.
///
/// The connection is opened by [`initialize`](Self::initialize). Until then
/// every call fails with `StoreUnavailable`. Access is serialized through a
/// single connection.
pub struct SqliteResolver {
    /// Database file, or `None` for a private in-memory database.
    path: Option<PathBuf>,
    conn: Mutex<Option<Connection>>,
    state: StoreState,
}

impl SqliteResolver {
    /// Creates a resolver for the database at `path` without opening it.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: Some(path.as_ref().to_path_buf()),
            conn: Mutex::new(None),
            state: StoreState::new(),
        }
    }

    /// Creates a resolver over a private in-memory database without opening it.
    pub fn new_in_memory() -> Self {
        Self {
            path: None,
            conn: Mutex::new(None),
            state: StoreState::new(),
        }
    }

    /// Creates and initializes a resolver for the database at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let resolver = Self::new(path);
        resolver.initialize()?;
        Ok(resolver)
    }

    /// Creates and initializes a resolver over an in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let resolver = Self::new_in_memory();
        resolver.initialize()?;
        Ok(resolver)
    }

    /// Opens the connection and creates the schema if needed.
    ///
    /// Calling this on an initialized resolver does nothing.
    pub fn initialize(&self) -> Result<()> {
        let mut guard = self.conn.lock();
        if guard.is_some() {
            return Ok(());
        }

        let conn = match &self.path {
            Some(path) => {
                if let Some(parent) = path.parent()
                    && !parent.as_os_str().is_empty()
                {
                    std::fs::create_dir_all(parent).map_err(|e| {
                        TenetError::store_failure_with_cause(
                            self.name(),
                            format!("failed to create directory {}", parent.display()),
                            e,
                        )
                    })?;
                }
                Connection::open(path)
            },
            None => Connection::open_in_memory(),
        }
        .map_err(|e| self.failure("failed to open database", e))?;

        conn.execute_batch(
            "PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL; PRAGMA foreign_keys=ON;",
        )
        .map_err(|e| self.failure("failed to set pragmas", e))?;

        conn.execute_batch(SCHEMA)
            .map_err(|e| self.failure("failed to create schema", e))?;

        *guard = Some(conn);
        self.state.mark_initialized();

        info!(
            path = %self.display_path(),
            "SQLite property store initialized"
        );
        Ok(())
    }

    /// Returns the lifecycle state of the store.
    pub fn state(&self) -> &StoreState {
        &self.state
    }

    fn display_path(&self) -> String {
        self.path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| ":memory:".to_string())
    }

    fn failure(&self, message: &str, error: rusqlite::Error) -> TenetError {
        self.state.record_failure(format!("{}: {}", message, error));
        TenetError::store_failure_with_cause(self.name(), message, error)
    }

    /// Runs `f` on the open connection, mapping native errors.
    fn with_conn<T>(
        &self,
        operation: &str,
        f: impl FnOnce(&Connection) -> rusqlite::Result<T>,
    ) -> Result<T> {
        let guard = self.conn.lock();
        let conn = guard.as_ref().ok_or_else(|| {
            TenetError::unavailable(format!("{} has not been initialized", self.name()))
        })?;

        match f(conn) {
            Ok(value) => {
                self.state.record_success();
                Ok(value)
            },
            Err(e) => {
                warn!(operation, error = %e, "SQLite operation failed");
                Err(self.failure(&format!("{} failed", operation), e))
            },
        }
    }
}

fn is_constraint_violation(error: &rusqlite::Error) -> bool {
    matches!(
        error,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}

struct InfoRow {
    id: i32,
    category: String,
    name: String,
    modifiable: bool,
    property_type: String,
}

impl InfoRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            category: row.get(1)?,
            name: row.get(2)?,
            modifiable: row.get(3)?,
            property_type: row.get(4)?,
        })
    }

    fn into_info(self) -> Result<PropertyInfo> {
        let property_type: PropertyType = self.property_type.parse()?;
        PropertyInfo::new(
            self.id,
            self.category,
            self.name,
            self.modifiable,
            property_type,
        )
    }
}

fn lookup_param(lookup: Lookup) -> i64 {
    lookup.get() as i64
}

impl PropertyResolver for SqliteResolver {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn is_ready(&self) -> bool {
        self.state.is_initialized()
    }

    fn last_error(&self) -> Option<String> {
        self.state.last_error()
    }

    fn health(&self) -> StoreHealth {
        self.state.health()
    }

    fn create_property_info(
        &self,
        category: &str,
        key: &str,
        modifiable: bool,
        property_type: PropertyType,
    ) -> Result<PropertyInfo> {
        self.check_ready()?;

        let guard = self.conn.lock();
        let conn = guard.as_ref().ok_or_else(|| {
            TenetError::unavailable(format!("{} has not been initialized", self.name()))
        })?;

        let inserted = conn.execute(
            "INSERT INTO properties (category, name, modifiable, type) VALUES (?1, ?2, ?3, ?4)",
            params![category, key, modifiable, property_type.as_str()],
        );

        match inserted {
            Ok(_) => {
                let id = i32::try_from(conn.last_insert_rowid()).map_err(|_| {
                    TenetError::store_failure(self.name(), "property id exceeds 32 bits")
                })?;
                self.state.record_success();
                debug!(property_id = id, category, key, "Created property metadata");
                PropertyInfo::new(id, category, key, modifiable, property_type)
            },
            Err(e) if is_constraint_violation(&e) => {
                Err(TenetError::already_registered(category, key))
            },
            Err(e) => Err(self.failure("create property failed", e)),
        }
    }

    fn get_property_info(&self, category: &str, key: &str) -> Result<PropertyInfo> {
        self.check_ready()?;

        let row = self.with_conn("get property", |conn| {
            conn.query_row(
                &format!("{} WHERE category = ?1 AND name = ?2", SELECT_INFO),
                params![category, key],
                InfoRow::from_row,
            )
            .optional()
        })?;

        row.ok_or_else(|| TenetError::not_found(format!("{}/{}", category, key)))?
            .into_info()
    }

    fn is_registered(&self, category: &str, key: &str) -> Result<bool> {
        self.check_ready()?;

        self.with_conn("check registration", |conn| {
            conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM properties WHERE category = ?1 AND name = ?2)",
                params![category, key],
                |row| row.get(0),
            )
        })
    }

    fn get_property_by_id(&self, id: i32) -> Result<PropertyInfo> {
        self.check_ready()?;

        let row = self.with_conn("get property by id", |conn| {
            conn.query_row(
                &format!("{} WHERE id = ?1", SELECT_INFO),
                params![id],
                InfoRow::from_row,
            )
            .optional()
        })?;

        row.ok_or_else(|| TenetError::not_found(format!("property id {}", id)))?
            .into_info()
    }

    fn get_property_list(&self) -> Result<Vec<PropertyInfo>> {
        self.check_ready()?;

        let rows = self.with_conn("list properties", |conn| {
            let mut stmt = conn.prepare(&format!("{} ORDER BY id", SELECT_INFO))?;
            let rows = stmt.query_map([], InfoRow::from_row)?;
            rows.collect::<rusqlite::Result<Vec<_>>>()
        })?;

        rows.into_iter().map(InfoRow::into_info).collect()
    }

    fn get_internal(&self, lookup: Lookup, info: &PropertyInfo) -> Result<Option<Vec<u8>>> {
        self.check_ready()?;

        self.with_conn("get value", |conn| {
            conn.query_row(
                "SELECT value FROM property_values WHERE property_id = ?1 AND lookup = ?2",
                params![info.id(), lookup_param(lookup)],
                |row| row.get(0),
            )
            .optional()
        })
    }

    fn put_internal(&self, lookup: Lookup, info: &PropertyInfo, value: &[u8]) -> Result<bool> {
        self.check_ready()?;

        let guard = self.conn.lock();
        let conn = guard.as_ref().ok_or_else(|| {
            TenetError::unavailable(format!("{} has not been initialized", self.name()))
        })?;

        let written = conn.execute(
            "INSERT INTO property_values (property_id, lookup, value) VALUES (?1, ?2, ?3)
             ON CONFLICT (property_id, lookup) DO UPDATE SET value = excluded.value",
            params![info.id(), lookup_param(lookup), value],
        );

        match written {
            Ok(rows) => {
                self.state.record_success();
                Ok(rows > 0)
            },
            Err(e) if is_constraint_violation(&e) => Err(TenetError::not_found(info.to_string())),
            Err(e) => Err(self.failure("put value failed", e)),
        }
    }

    fn remove_internal(&self, lookup: Lookup, info: &PropertyInfo) -> Result<bool> {
        self.check_ready()?;

        let rows = self.with_conn("remove value", |conn| {
            conn.execute(
                "DELETE FROM property_values WHERE property_id = ?1 AND lookup = ?2",
                params![info.id(), lookup_param(lookup)],
            )
        })?;
        Ok(rows > 0)
    }

    fn is_present(&self, lookup: Lookup, info: &PropertyInfo) -> Result<bool> {
        self.check_ready()?;

        self.with_conn("check value", |conn| {
            conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM property_values WHERE property_id = ?1 AND lookup = ?2)",
                params![info.id(), lookup_param(lookup)],
                |row| row.get(0),
            )
        })
    }
}

impl std::fmt::Debug for SqliteResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteResolver")
            .field("path", &self.display_path())
            .field("ready", &self.is_ready())
            .finish()
    }
}
