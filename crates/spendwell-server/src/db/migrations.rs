use rusqlite::Connection;

const SCHEMA: &str = include_str!("schema.sql");

/// Creates missing tables. Never drops or rewrites existing ones.
pub fn run(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA)
}
