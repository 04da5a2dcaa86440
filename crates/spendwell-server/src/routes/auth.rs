use axum::extract::{Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, SameSite};
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use crate::auth::{google, session, FLASH_COOKIE, SESSION_COOKIE, STATE_COOKIE};
use crate::config::Config;
use crate::error::AppResult;
use crate::routes::AppState;
use crate::services::{identity, mail};

/// GET /login/google — begin the remote authorization handshake.
pub async fn login_start(
    State(state): State<AppState>,
    jar: CookieJar,
) -> AppResult<impl IntoResponse> {
    let oauth_state = google::generate_state();
    let url = google::authorize_url(&state.config, &oauth_state)?;

    let cookie = Cookie::build((STATE_COOKIE, oauth_state))
        .path("/login")
        .max_age(time::Duration::minutes(10))
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.config.secure_cookies)
        .build();

    Ok((jar.add(cookie), Redirect::to(&url)))
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// GET /login/google_login — provider callback.
pub async fn google_callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<CallbackQuery>,
) -> AppResult<Response> {
    // Handshake not completed: landed here early, consent denied, or the
    // state doesn't match the pinned cookie. Restart it.
    let code = match (&query.code, &query.error) {
        (Some(code), None) => code.clone(),
        _ => return Ok(Redirect::to("/login/google").into_response()),
    };
    let pinned = jar.get(STATE_COOKIE).map(|c| c.value().to_string());
    if pinned.is_none() || pinned != query.state {
        return Ok(Redirect::to("/login/google").into_response());
    }

    let access_token = google::exchange_code(&state.config, &code).await?;
    let assertion = google::fetch_profile(&state.config, &access_token).await?;

    let (user, created) = identity::link_identity(&state.db, &assertion)?;
    if created {
        // Best effort; a failed notice must not fail the sign-in.
        if let Err(e) = mail::send_welcome_email(&state.config, &user.email, &user.name).await {
            tracing::warn!("Welcome email to {} failed: {e}", user.email);
        }
    }

    let sess = session::establish(&state.db, user.id)?;
    tracing::info!("User {} signed in", user.id);

    let jar = jar
        .remove(Cookie::build(STATE_COOKIE).path("/login").build())
        .add(build_session_cookie(&state.config, sess.token))
        .add(build_flash_cookie("login_success"));
    Ok((jar, Redirect::to("/")).into_response())
}

/// GET /logout
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> AppResult<Response> {
    if session::current(&state.db, &jar)?.is_none() {
        return Ok(Redirect::to("/login/google").into_response());
    }

    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        session::teardown(&state.db, cookie.value())?;
    }

    let removal = Cookie::build(SESSION_COOKIE)
        .path("/")
        .max_age(time::Duration::ZERO)
        .http_only(true)
        .build();

    let jar = jar.add(removal).add(build_flash_cookie("logged_out"));
    Ok((jar, Redirect::to("/")).into_response())
}

fn build_session_cookie(config: &Config, token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .max_age(time::Duration::days(30))
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.secure_cookies)
        .build()
}

/// Readable by the shell, which shows the notice and clears the cookie.
fn build_flash_cookie(notice: &'static str) -> Cookie<'static> {
    Cookie::build((FLASH_COOKIE, notice))
        .path("/")
        .max_age(time::Duration::minutes(1))
        .same_site(SameSite::Lax)
        .build()
}
