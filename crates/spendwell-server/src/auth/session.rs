use axum_extra::extract::CookieJar;
use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::auth::SESSION_COOKIE;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{Session, User};

const SESSION_DURATION_DAYS: i64 = 30;

/// Anonymous -> Authenticated. Binds a fresh token to the user's id.
pub fn establish(pool: &DbPool, user_id: i64) -> AppResult<Session> {
    let conn = pool.get()?;
    let id = Uuid::new_v4().to_string();
    let token = generate_token();
    let now = Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string();
    let expires_at = (Utc::now() + Duration::days(SESSION_DURATION_DAYS))
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string();

    conn.execute(
        "INSERT INTO sessions (id, user_id, token, expires_at, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
        rusqlite::params![id, user_id, token, expires_at, now],
    )?;

    Ok(Session {
        id,
        user_id,
        token,
        expires_at,
        created_at: now,
    })
}

/// Resolves the session cookie to its User, or None while Anonymous.
///
/// A token that is missing, expired, or whose user id no longer resolves is
/// treated as logged-out, never as a stale identity.
pub fn current(pool: &DbPool, jar: &CookieJar) -> AppResult<Option<User>> {
    let Some(cookie) = jar.get(SESSION_COOKIE) else {
        return Ok(None);
    };
    lookup(pool, cookie.value())
}

/// Like [`current`] but for API routes, where Anonymous is a 401 rather than
/// a redirect.
pub fn require(pool: &DbPool, jar: &CookieJar) -> AppResult<User> {
    current(pool, jar)?.ok_or(AppError::Unauthorized)
}

fn lookup(pool: &DbPool, token: &str) -> AppResult<Option<User>> {
    let conn = pool.get()?;
    let now = Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string();

    let mut stmt = conn.prepare(
        "SELECT u.id, u.google_id, u.email, u.name, u.dashboard_cards, u.created_at
         FROM sessions s
         JOIN users u ON u.id = s.user_id
         WHERE s.token = ?1 AND s.expires_at > ?2",
    )?;

    let result = stmt.query_row(rusqlite::params![token, now], |row| {
        Ok(User {
            id: row.get(0)?,
            google_id: row.get(1)?,
            email: row.get(2)?,
            name: row.get(3)?,
            dashboard_cards: row.get(4)?,
            created_at: row.get(5)?,
        })
    });

    match result {
        Ok(user) => Ok(Some(user)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(AppError::Database(e)),
    }
}

/// Authenticated -> Anonymous.
pub fn teardown(pool: &DbPool, token: &str) -> AppResult<()> {
    let conn = pool.get()?;
    conn.execute("DELETE FROM sessions WHERE token = ?1", rusqlite::params![token])?;
    Ok(())
}

fn generate_token() -> String {
    use base64::Engine;
    use rand::RngCore;
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}
