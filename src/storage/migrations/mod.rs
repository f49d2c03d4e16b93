//! Schema migrations for the pantry database.
//!
//! Applied migration version is mirrored to `PRAGMA user_version`; versions
//! must stay strictly increasing.

use crate::error::{PantryError, Result};
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    sql: include_str!("0001_init.sql"),
}];

/// Latest schema version this binary knows how to produce.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Applies every pending migration in one transaction.
///
/// Returns the number of migrations applied.
pub fn apply_migrations(conn: &mut Connection) -> Result<usize> {
    let current = current_version(conn)?;
    let latest = latest_version();

    if current > latest {
        return Err(PantryError::UnsupportedSchemaVersion {
            db_version: current,
            latest_supported: latest,
        });
    }

    if current == latest {
        return Ok(0);
    }

    let tx = conn.transaction()?;
    let mut applied = 0;
    for migration in MIGRATIONS {
        if migration.version <= current {
            continue;
        }

        tracing::info!(version = migration.version, "Applying migration");
        tx.execute_batch(migration.sql)?;
        tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))?;
        applied += 1;
    }
    tx.commit()?;

    Ok(applied)
}

pub fn current_version(conn: &Connection) -> Result<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
