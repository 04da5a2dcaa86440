//! Read/write operations on a user's expense records. Every query is scoped
//! to the owning user; a row belonging to someone else behaves as missing.

use chrono::Utc;
use rusqlite::Row;
use serde::Deserialize;

use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::Expense;

#[derive(Debug, Deserialize)]
pub struct NewExpense {
    pub amount: f64,
    pub date: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub is_paid: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExpensePatch {
    pub amount: Option<f64>,
    pub date: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub is_paid: Option<bool>,
}

fn expense_from_row(row: &Row) -> rusqlite::Result<Expense> {
    Ok(Expense {
        id: row.get(0)?,
        user_id: row.get(1)?,
        amount: row.get(2)?,
        date: row.get(3)?,
        description: row.get(4)?,
        category: row.get(5)?,
        is_paid: row.get(6)?,
        created_at: row.get(7)?,
    })
}

const EXPENSE_COLUMNS: &str = "id, user_id, amount, date, description, category, is_paid, created_at";

pub fn list_for_user(pool: &DbPool, user_id: i64) -> AppResult<Vec<Expense>> {
    let conn = pool.get()?;
    let mut stmt = conn.prepare(&format!(
        "SELECT {EXPENSE_COLUMNS} FROM expenses WHERE user_id = ?1 ORDER BY date DESC, id DESC"
    ))?;
    let rows = stmt.query_map(rusqlite::params![user_id], expense_from_row)?;
    let mut expenses = Vec::new();
    for row in rows {
        expenses.push(row?);
    }
    Ok(expenses)
}

pub fn create(pool: &DbPool, user_id: i64, new: &NewExpense) -> AppResult<Expense> {
    if !new.amount.is_finite() {
        return Err(AppError::BadRequest("Amount must be a number".to_string()));
    }

    let conn = pool.get()?;
    let now = Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string();
    let date = new
        .date
        .clone()
        .unwrap_or_else(|| Utc::now().format("%Y-%m-%d").to_string());

    conn.execute(
        "INSERT INTO expenses (user_id, amount, date, description, category, is_paid, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        rusqlite::params![
            user_id,
            new.amount,
            date,
            new.description.as_deref().unwrap_or(""),
            new.category.as_deref().unwrap_or(""),
            new.is_paid.unwrap_or(false),
            now
        ],
    )?;

    get(&conn, user_id, conn.last_insert_rowid())
}

pub fn update(pool: &DbPool, user_id: i64, id: i64, patch: &ExpensePatch) -> AppResult<Expense> {
    let conn = pool.get()?;
    let changed = conn.execute(
        "UPDATE expenses SET
             amount = COALESCE(?1, amount),
             date = COALESCE(?2, date),
             description = COALESCE(?3, description),
             category = COALESCE(?4, category),
             is_paid = COALESCE(?5, is_paid)
         WHERE id = ?6 AND user_id = ?7",
        rusqlite::params![
            patch.amount,
            patch.date,
            patch.description,
            patch.category,
            patch.is_paid,
            id,
            user_id
        ],
    )?;

    if changed == 0 {
        return Err(AppError::NotFound("Expense not found".to_string()));
    }
    get(&conn, user_id, id)
}

pub fn delete(pool: &DbPool, user_id: i64, id: i64) -> AppResult<()> {
    let conn = pool.get()?;
    let changed = conn.execute(
        "DELETE FROM expenses WHERE id = ?1 AND user_id = ?2",
        rusqlite::params![id, user_id],
    )?;
    if changed == 0 {
        return Err(AppError::NotFound("Expense not found".to_string()));
    }
    Ok(())
}

fn get(conn: &rusqlite::Connection, user_id: i64, id: i64) -> AppResult<Expense> {
    conn.query_row(
        &format!("SELECT {EXPENSE_COLUMNS} FROM expenses WHERE id = ?1 AND user_id = ?2"),
        rusqlite::params![id, user_id],
        expense_from_row,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => AppError::NotFound("Expense not found".to_string()),
        e => AppError::Database(e),
    })
}
