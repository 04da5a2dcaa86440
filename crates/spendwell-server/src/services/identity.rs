//! Links a provider identity assertion to a local user record.

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};

use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{IdentityAssertion, User, DEFAULT_DASHBOARD_CARDS};

/// Returns the user for the assertion's identity string, creating one on
/// first sight. The bool is true when a new row was inserted.
pub fn link_identity(pool: &DbPool, assertion: &IdentityAssertion) -> AppResult<(User, bool)> {
    let conn = pool.get()?;
    if let Some(user) = find_by_google_id(&conn, &assertion.id)? {
        return Ok((user, false));
    }
    insert_or_existing(&conn, assertion)
}

pub fn update_dashboard_cards(pool: &DbPool, user_id: i64, cards: &str) -> AppResult<()> {
    let conn = pool.get()?;
    conn.execute(
        "UPDATE users SET dashboard_cards = ?1 WHERE id = ?2",
        rusqlite::params![cards, user_id],
    )?;
    Ok(())
}

fn find_by_google_id(conn: &Connection, google_id: &str) -> AppResult<Option<User>> {
    conn.query_row(
        "SELECT id, google_id, email, name, dashboard_cards, created_at
         FROM users WHERE google_id = ?1",
        rusqlite::params![google_id],
        |row| {
            Ok(User {
                id: row.get(0)?,
                google_id: row.get(1)?,
                email: row.get(2)?,
                name: row.get(3)?,
                dashboard_cards: row.get(4)?,
                created_at: row.get(5)?,
            })
        },
    )
    .optional()
    .map_err(AppError::Database)
}

/// Inserts a new user for the assertion. A rejected insert means another
/// request won the first-login race; the now-existing row is re-read and
/// returned instead.
fn insert_or_existing(
    conn: &Connection,
    assertion: &IdentityAssertion,
) -> AppResult<(User, bool)> {
    let now = Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string();

    let result = conn.execute(
        "INSERT INTO users (google_id, email, name, dashboard_cards, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![
            assertion.id,
            assertion.email,
            assertion.name,
            DEFAULT_DASHBOARD_CARDS,
            now
        ],
    );

    match result {
        Ok(_) => {
            let user = User {
                id: conn.last_insert_rowid(),
                google_id: Some(assertion.id.clone()),
                email: assertion.email.clone(),
                name: assertion.name.clone(),
                dashboard_cards: DEFAULT_DASHBOARD_CARDS.to_string(),
                created_at: now,
            };
            tracing::info!("Created user {} for google id {}", user.id, assertion.id);
            Ok((user, true))
        }
        Err(rusqlite::Error::SqliteFailure(err, _))
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            // Either the identity string raced with a concurrent first login,
            // or the email is already taken by a different identity.
            match find_by_google_id(conn, &assertion.id)? {
                Some(user) => Ok((user, false)),
                None => Err(AppError::Conflict(
                    "An account with this email already exists".to_string(),
                )),
            }
        }
        Err(e) => Err(AppError::Database(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing;

    fn assertion() -> IdentityAssertion {
        IdentityAssertion {
            id: "g123".into(),
            email: "a@x.com".into(),
            name: "Ann".into(),
        }
    }

    #[test]
    fn first_link_creates_user_with_default_cards() {
        let pool = testing::pool();
        let (user, created) = link_identity(&pool, &assertion()).unwrap();

        assert!(created);
        assert_eq!(user.google_id.as_deref(), Some("g123"));
        assert_eq!(user.email, "a@x.com");
        assert_eq!(user.name, "Ann");
        assert_eq!(user.dashboard_cards, "summary_chart,savings_goal,anomaly_alert");
    }

    #[test]
    fn second_link_returns_same_user_without_duplicate() {
        let pool = testing::pool();
        let (first, _) = link_identity(&pool, &assertion()).unwrap();
        let (second, created) = link_identity(&pool, &assertion()).unwrap();

        assert!(!created);
        assert_eq!(first.id, second.id);

        let count: i64 = pool
            .get()
            .unwrap()
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn lost_first_login_race_resolves_to_existing_row() {
        let pool = testing::pool();
        let conn = pool.get().unwrap();

        // Another request inserted the row between our lookup and insert.
        conn.execute(
            "INSERT INTO users (google_id, email, name, created_at) VALUES ('g123', 'a@x.com', 'Ann', '2026-01-01T00:00:00.000Z')",
            [],
        )
        .unwrap();

        let (user, created) = insert_or_existing(&conn, &assertion()).unwrap();
        assert!(!created);
        assert_eq!(user.google_id.as_deref(), Some("g123"));

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn email_taken_by_other_identity_is_a_conflict() {
        let pool = testing::pool();
        let conn = pool.get().unwrap();
        conn.execute(
            "INSERT INTO users (google_id, email, name, created_at) VALUES ('other', 'a@x.com', 'Ann', '2026-01-01T00:00:00.000Z')",
            [],
        )
        .unwrap();
        drop(conn);

        let err = link_identity(&pool, &assertion()).unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn dashboard_cards_can_be_replaced() {
        let pool = testing::pool();
        let (user, _) = link_identity(&pool, &assertion()).unwrap();

        update_dashboard_cards(&pool, user.id, "summary_chart").unwrap();

        let cards: String = pool
            .get()
            .unwrap()
            .query_row(
                "SELECT dashboard_cards FROM users WHERE id = ?1",
                rusqlite::params![user.id],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(cards, "summary_chart");
    }
}
