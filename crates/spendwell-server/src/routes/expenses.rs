use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use axum_extra::extract::CookieJar;

use crate::auth::session;
use crate::error::AppResult;
use crate::models::Expense;
use crate::routes::AppState;
use crate::services::expenses::{self, ExpensePatch, NewExpense};

/// GET /api/v1/expenses
pub async fn list(State(state): State<AppState>, jar: CookieJar) -> AppResult<Json<Vec<Expense>>> {
    let user = session::require(&state.db, &jar)?;
    Ok(Json(expenses::list_for_user(&state.db, user.id)?))
}

/// POST /api/v1/expenses
pub async fn create(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<NewExpense>,
) -> AppResult<impl IntoResponse> {
    let user = session::require(&state.db, &jar)?;
    let expense = expenses::create(&state.db, user.id, &body)?;
    Ok((StatusCode::CREATED, Json(expense)))
}

/// PUT /api/v1/expenses/{id} — partial update, including "mark as paid".
pub async fn update(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<i64>,
    Json(body): Json<ExpensePatch>,
) -> AppResult<Json<Expense>> {
    let user = session::require(&state.db, &jar)?;
    Ok(Json(expenses::update(&state.db, user.id, id, &body)?))
}

/// DELETE /api/v1/expenses/{id}
pub async fn delete(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(id): Path<i64>,
) -> AppResult<Json<serde_json::Value>> {
    let user = session::require(&state.db, &jar)?;
    expenses::delete(&state.db, user.id, id)?;
    Ok(Json(serde_json::json!({ "ok": true })))
}
