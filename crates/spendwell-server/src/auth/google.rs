//! Redirect-based handshake with Google and the follow-up profile fetch.

use serde::Deserialize;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::IdentityAssertion;

const SCOPES: &str = "openid email profile";

/// Entry point of the remote authorization handshake. `state` is pinned in a
/// cookie and checked again on the callback.
pub fn authorize_url(config: &Config, state: &str) -> AppResult<String> {
    let url = reqwest::Url::parse_with_params(
        &config.google_auth_url,
        &[
            ("client_id", config.google_client_id.as_str()),
            ("redirect_uri", config.oauth_redirect_url.as_str()),
            ("response_type", "code"),
            ("scope", SCOPES),
            ("state", state),
        ],
    )
    .map_err(|e| AppError::Internal(format!("Invalid authorize URL: {e}")))?;
    Ok(url.into())
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Exchanges the callback's authorization code for an access token.
pub async fn exchange_code(config: &Config, code: &str) -> AppResult<String> {
    let client = reqwest::Client::new();
    let res = client
        .post(&config.google_token_url)
        .form(&[
            ("code", code),
            ("client_id", config.google_client_id.as_str()),
            ("client_secret", config.google_client_secret.as_str()),
            ("redirect_uri", config.oauth_redirect_url.as_str()),
            ("grant_type", "authorization_code"),
        ])
        .send()
        .await
        .map_err(|e| AppError::Upstream(format!("token exchange failed: {e}")))?;

    if !res.status().is_success() {
        return Err(AppError::Upstream(format!(
            "token endpoint returned {}",
            res.status()
        )));
    }

    let token: TokenResponse = res
        .json()
        .await
        .map_err(|e| AppError::Upstream(format!("malformed token response: {e}")))?;
    Ok(token.access_token)
}

/// Fetches the identity assertion (`id`, `email`, `name`) for an authorized
/// session with Google.
pub async fn fetch_profile(config: &Config, access_token: &str) -> AppResult<IdentityAssertion> {
    let client = reqwest::Client::new();
    let res = client
        .get(&config.google_userinfo_url)
        .bearer_auth(access_token)
        .send()
        .await
        .map_err(|e| AppError::Upstream(format!("profile fetch failed: {e}")))?;

    if !res.status().is_success() {
        return Err(AppError::Upstream(format!(
            "profile endpoint returned {}",
            res.status()
        )));
    }

    res.json()
        .await
        .map_err(|e| AppError::Upstream(format!("malformed profile response: {e}")))
}

pub fn generate_state() -> String {
    use base64::Engine;
    use rand::RngCore;
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authorize_url_carries_client_state_and_redirect() {
        let url = authorize_url(&Config::for_tests(), "abc123").unwrap();
        assert!(url.starts_with("https://accounts.google.com/o/oauth2/v2/auth?"));
        assert!(url.contains("client_id=client-id"));
        assert!(url.contains("state=abc123"));
        assert!(url.contains("response_type=code"));
        // redirect_uri must be percent-encoded
        assert!(url.contains("redirect_uri=http%3A%2F%2Flocalhost%3A4000%2Flogin%2Fgoogle_login"));
    }

    #[test]
    fn state_values_are_unique() {
        assert_ne!(generate_state(), generate_state());
    }
}
