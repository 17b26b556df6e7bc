use std::path::Path;
use std::sync::Once;

use anyhow::Context;
use rusqlite::{Connection, OpenFlags};

use super::schema::apply_migrations;

static VEC_EXTENSION: Once = Once::new();

/// Register sqlite-vec as a process-wide auto extension so every
/// connection opened afterwards has the `vec_*` distance functions.
#[allow(unsafe_code)]
fn register_vector_extension() {
    VEC_EXTENSION.call_once(|| unsafe {
        rusqlite::ffi::sqlite3_auto_extension(Some(std::mem::transmute::<
            *const (),
            unsafe extern "C" fn(
                *mut rusqlite::ffi::sqlite3,
                *mut *const std::os::raw::c_char,
                *const rusqlite::ffi::sqlite3_api_routines,
            ) -> std::os::raw::c_int,
        >(sqlite_vec::sqlite3_vec_init as *const ())));
    });
}

/// Open a file-backed `SQLite` connection with sqlite-vec loaded and schema applied.
pub fn open_db(path: &Path) -> anyhow::Result<Connection> {
    register_vector_extension();

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let mut conn = Connection::open(path)
        .with_context(|| format!("Failed to open database: {}", path.display()))?;
    init_connection(&mut conn)?;
    Ok(conn)
}

/// Open an in-memory `SQLite` connection with sqlite-vec loaded and schema applied.
///
/// Uses the `SQLite` URI format with shared-cache mode so multiple connections
/// can share the same named in-memory database within the same process.
/// The in-memory database persists as long as at least one connection to it remains open.
pub fn open_db_in_memory(name: &str) -> anyhow::Result<Connection> {
    register_vector_extension();

    let uri = format!("file:{name}?mode=memory&cache=shared");
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_URI
        | OpenFlags::SQLITE_OPEN_SHARED_CACHE
        | OpenFlags::SQLITE_OPEN_NO_MUTEX;

    let mut conn = Connection::open_with_flags(uri, flags)
        .with_context(|| format!("Failed to open in-memory database: {name}"))?;
    init_connection(&mut conn)?;
    Ok(conn)
}

/// Apply schema migrations and configure WAL mode so offline ingestion and
/// query-time reads tolerate each other as far as the backend allows.
fn init_connection(conn: &mut Connection) -> anyhow::Result<()> {
    conn.pragma_update(None, "journal_mode", "WAL")
        .context("Failed to enable WAL mode")?;
    conn.pragma_update(None, "busy_timeout", 5000)
        .context("Failed to set busy_timeout")?;
    apply_migrations(conn)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_db_creates_file() {
        let tmp = tempfile::tempdir().unwrap();
        let db_path = tmp.path().join("test.db");
        let conn = open_db(&db_path).unwrap();
        assert!(db_path.exists());
        drop(conn);
    }

    #[test]
    fn vector_functions_are_available() {
        let tmp = tempfile::tempdir().unwrap();
        let db_path = tmp.path().join("test.db");
        let conn = open_db(&db_path).unwrap();

        let version: String = conn
            .query_row("SELECT vec_version()", [], |row| row.get(0))
            .unwrap();
        assert!(!version.is_empty());
    }

    #[test]
    fn open_in_memory_works() {
        let conn = open_db_in_memory("test_open").unwrap();
        let version: String = conn
            .query_row("SELECT vec_version()", [], |row| row.get(0))
            .unwrap();
        assert!(!version.is_empty());
    }

    #[test]
    fn in_memory_shared_cache_persists() {
        // First connection creates data
        let conn1 = open_db_in_memory("test_shared").unwrap();
        conn1
            .execute(
                "INSERT INTO index_meta (key, value) VALUES (?1, ?2)",
                rusqlite::params!["probe", "42"],
            )
            .unwrap();

        // Second connection sees the same data
        let conn2 = open_db_in_memory("test_shared").unwrap();
        let val: String = conn2
            .query_row(
                "SELECT value FROM index_meta WHERE key = ?1",
                rusqlite::params!["probe"],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(val, "42");
    }

    #[test]
    fn wal_mode_is_active() {
        let tmp = tempfile::tempdir().unwrap();
        let db_path = tmp.path().join("test_wal.db");
        let conn = open_db(&db_path).unwrap();

        let mode: String = conn
            .pragma_query_value(None, "journal_mode", |row| row.get(0))
            .unwrap();
        assert_eq!(mode.to_lowercase(), "wal");
    }

    #[test]
    fn busy_timeout_is_set() {
        let tmp = tempfile::tempdir().unwrap();
        let db_path = tmp.path().join("test_timeout.db");
        let conn = open_db(&db_path).unwrap();

        let timeout: i64 = conn
            .pragma_query_value(None, "busy_timeout", |row| row.get(0))
            .unwrap();
        assert_eq!(timeout, 5000);
    }
}
