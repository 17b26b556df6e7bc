use rusqlite::Connection;
use rusqlite_migration::{Migrations, M};

/// Define all schema migrations.
fn migrations() -> Migrations<'static> {
    Migrations::new(vec![M::up(
        "CREATE TABLE chunks (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            chunk_id     TEXT NOT NULL UNIQUE,
            source       TEXT NOT NULL,
            chunk_index  INTEGER NOT NULL,
            content      TEXT NOT NULL,
            embedding    BLOB NOT NULL,
            created_at   TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_chunks_source
            ON chunks(source, chunk_index);

        CREATE TABLE index_meta (
            key    TEXT PRIMARY KEY,
            value  TEXT NOT NULL
        );",
    )])
}

/// Apply all pending migrations to the database.
pub fn apply_migrations(conn: &mut Connection) -> anyhow::Result<()> {
    migrations()
        .to_latest(conn)
        .map_err(|e| anyhow::anyhow!("Failed to apply migrations: {e}"))?;
    Ok(())
}
