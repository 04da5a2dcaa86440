use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    pub sqlite_path: String,
    pub session_secret: String,
    pub google_client_id: String,
    pub google_client_secret: String,
    pub google_auth_url: String,
    pub google_token_url: String,
    pub google_userinfo_url: String,
    pub oauth_redirect_url: String,
    pub cors_origin: String,
    pub secure_cookies: bool,
    pub static_dir: String,
    pub resend_api_key: Option<String>,
    pub from_email: String,
    pub app_url: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "4000".to_string())
                .parse()
                .expect("SERVER_PORT must be a valid port number"),
            sqlite_path: env::var("SQLITE_PATH")
                .unwrap_or_else(|_| "./data/spendwell.db".to_string()),
            session_secret: env::var("SESSION_SECRET")
                .unwrap_or_else(|_| "change-me-to-a-random-32-char-string".to_string()),
            google_client_id: env::var("GOOGLE_OAUTH_CLIENT_ID").unwrap_or_default(),
            google_client_secret: env::var("GOOGLE_OAUTH_CLIENT_SECRET").unwrap_or_default(),
            google_auth_url: env::var("GOOGLE_AUTH_URL")
                .unwrap_or_else(|_| "https://accounts.google.com/o/oauth2/v2/auth".to_string()),
            google_token_url: env::var("GOOGLE_TOKEN_URL")
                .unwrap_or_else(|_| "https://oauth2.googleapis.com/token".to_string()),
            google_userinfo_url: env::var("GOOGLE_USERINFO_URL")
                .unwrap_or_else(|_| "https://www.googleapis.com/oauth2/v2/userinfo".to_string()),
            oauth_redirect_url: env::var("OAUTH_REDIRECT_URL")
                .unwrap_or_else(|_| "http://localhost:4000/login/google_login".to_string()),
            cors_origin: env::var("CORS_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            secure_cookies: env::var("SECURE_COOKIES")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .unwrap_or(false),
            static_dir: env::var("STATIC_DIR").unwrap_or_else(|_| "./static".to_string()),
            resend_api_key: env::var("RESEND_API_KEY").ok(),
            from_email: env::var("FROM_EMAIL")
                .unwrap_or_else(|_| "noreply@spendwell.app".to_string()),
            app_url: env::var("APP_URL")
                .unwrap_or_else(|_| "http://localhost:4000".to_string()),
        }
    }
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Self {
        Self {
            server_port: 4000,
            sqlite_path: ":memory:".to_string(),
            session_secret: "test-secret".to_string(),
            google_client_id: "client-id".to_string(),
            google_client_secret: "client-secret".to_string(),
            google_auth_url: "https://accounts.google.com/o/oauth2/v2/auth".to_string(),
            google_token_url: "https://oauth2.googleapis.com/token".to_string(),
            google_userinfo_url: "https://www.googleapis.com/oauth2/v2/userinfo".to_string(),
            oauth_redirect_url: "http://localhost:4000/login/google_login".to_string(),
            cors_origin: "http://localhost:3000".to_string(),
            secure_cookies: false,
            static_dir: "./static".to_string(),
            resend_api_key: None,
            from_email: "noreply@spendwell.app".to_string(),
            app_url: "http://localhost:4000".to_string(),
        }
    }
}
