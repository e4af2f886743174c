pub mod queries;

use anyhow::Context;
use rusqlite::Connection;

/// Opens the on-device session database. The schema is a single
/// key/value table; the only durable client state is the auth credential.
pub fn init_db(path: &str) -> anyhow::Result<Connection> {
    let conn = Connection::open(path).context("failed to open session database")?;

    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
        .context("failed to set database pragmas")?;

    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS session (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );",
    )
    .context("failed to create session table")?;

    Ok(conn)
}
