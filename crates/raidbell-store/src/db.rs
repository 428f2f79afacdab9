use rusqlite::Connection;

use crate::error::Result;

/// Initialise the event schema in `conn`.
///
/// Idempotent — runs on every startup.
pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS events (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            kind          TEXT    NOT NULL,
            days          TEXT,              -- CSV weekday tokens, NULL for one-off
            date          TEXT,              -- YYYY-MM-DD, NULL for weekly
            time          TEXT    NOT NULL,  -- HH:MM, local bot time
            description   TEXT    NOT NULL,
            last_fired_on TEXT               -- YYYY-MM-DD of the latest delivery
        ) STRICT;
        ",
    )?;
    Ok(())
}
