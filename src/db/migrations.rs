use anyhow::{bail, Context, Result};
use log::info;
use rusqlite::Connection;

/// Schema scripts in order. Script `n` moves `user_version` from `n` to `n + 1`.
const MIGRATIONS: &[(&str, &str)] = &[("schema_v1.sql", include_str!("schemas/schema_v1.sql"))];

pub(crate) const CURRENT_SCHEMA_VERSION: usize = MIGRATIONS.len();

fn schema_version(conn: &Connection) -> Result<usize> {
    let version: i64 = conn
        .pragma_query_value(None, "user_version", |row| row.get(0))
        .context("failed to read user_version pragma")?;
    usize::try_from(version).with_context(|| format!("invalid user_version {version}"))
}

/// Brings the storage schema up to [`CURRENT_SCHEMA_VERSION`] in one
/// transaction. A database written by a newer build is refused.
pub fn run_migrations(conn: &mut Connection) -> Result<()> {
    let found = schema_version(conn)?;
    let pending = match MIGRATIONS.get(found..) {
        Some(pending) => pending,
        None => bail!(
            "database version ({found}) is newer than supported schema ({CURRENT_SCHEMA_VERSION})"
        ),
    };
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn
        .transaction()
        .context("failed to open migration transaction")?;
    for (name, script) in pending {
        tx.execute_batch(script)
            .with_context(|| format!("failed to execute {name}"))?;
    }
    tx.pragma_update(None, "user_version", CURRENT_SCHEMA_VERSION as i64)
        .context("failed to update user_version pragma")?;
    tx.commit().context("failed to commit migrations")?;

    info!("Storage schema migrated from version {found} to {CURRENT_SCHEMA_VERSION}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_idempotent() {
        let mut conn = Connection::open_in_memory().unwrap();
        run_migrations(&mut conn).unwrap();
        run_migrations(&mut conn).unwrap();

        assert_eq!(schema_version(&conn).unwrap(), CURRENT_SCHEMA_VERSION);

        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'storage'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 1);
    }

    #[test]
    fn newer_database_is_refused() {
        let mut conn = Connection::open_in_memory().unwrap();
        conn.pragma_update(None, "user_version", CURRENT_SCHEMA_VERSION as i64 + 1)
            .unwrap();
        assert!(run_migrations(&mut conn).is_err());
    }
}
