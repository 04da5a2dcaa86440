use axum::extract::State;
use axum::Json;
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};

use crate::auth::session;
use crate::error::AppResult;
use crate::routes::AppState;
use crate::services::identity;

#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardCards {
    /// Comma-separated card ids, free text to the server.
    pub cards: String,
}

/// GET /api/v1/settings/cards
pub async fn get_cards(
    State(state): State<AppState>,
    jar: CookieJar,
) -> AppResult<Json<DashboardCards>> {
    let user = session::require(&state.db, &jar)?;
    Ok(Json(DashboardCards {
        cards: user.dashboard_cards,
    }))
}

/// PUT /api/v1/settings/cards
pub async fn put_cards(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<DashboardCards>,
) -> AppResult<Json<DashboardCards>> {
    let user = session::require(&state.db, &jar)?;
    identity::update_dashboard_cards(&state.db, user.id, &body.cards)?;
    Ok(Json(body))
}
