mod migrations;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::OpenFlags;
use std::path::Path;

pub type DbPool = Pool<SqliteConnectionManager>;

pub fn create_pool(sqlite_path: &str) -> DbPool {
    // Ensure parent directory exists
    if let Some(parent) = Path::new(sqlite_path).parent() {
        std::fs::create_dir_all(parent).expect("Failed to create database directory");
    }

    let manager = SqliteConnectionManager::file(sqlite_path)
        .with_flags(
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_FULL_MUTEX,
        )
        .with_init(|conn| {
            conn.execute_batch(
                "PRAGMA journal_mode = WAL;
                 PRAGMA foreign_keys = ON;
                 PRAGMA busy_timeout = 5000;",
            )
        });

    let pool = Pool::builder()
        .max_size(10)
        .build(manager)
        .expect("Failed to create database pool");

    // Bootstrap the schema
    let conn = pool.get().expect("Failed to get connection for schema bootstrap");
    migrations::run(&conn).expect("Failed to bootstrap schema");

    pool
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bootstrap_is_idempotent() {
        let pool = testing::pool();
        let conn = pool.get().unwrap();

        // Running the bootstrap again must not drop or rewrite anything.
        conn.execute(
            "INSERT INTO users (google_id, email, name, created_at) VALUES ('g1', 'a@x.com', 'Ann', '2026-01-01T00:00:00.000Z')",
            [],
        )
        .unwrap();
        super::migrations::run(&conn).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn new_user_gets_default_dashboard_cards() {
        let pool = testing::pool();
        let conn = pool.get().unwrap();

        conn.execute(
            "INSERT INTO users (google_id, email, name, created_at) VALUES ('g1', 'a@x.com', 'Ann', '2026-01-01T00:00:00.000Z')",
            [],
        )
        .unwrap();

        let cards: String = conn
            .query_row("SELECT dashboard_cards FROM users WHERE google_id = 'g1'", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(cards, "summary_chart,savings_goal,anomaly_alert");
    }
}
