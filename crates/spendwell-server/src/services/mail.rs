use serde::Serialize;

use crate::config::Config;
use crate::error::{AppError, AppResult};

#[derive(Serialize)]
struct ResendEmail {
    from: String,
    to: Vec<String>,
    subject: String,
    html: String,
}

pub async fn send_email(config: &Config, to: &str, subject: &str, html: &str) -> AppResult<()> {
    let api_key = match &config.resend_api_key {
        Some(key) => key,
        None => {
            tracing::warn!("RESEND_API_KEY not set, skipping email to {to}: {subject}");
            return Ok(());
        }
    };

    let client = reqwest::Client::new();
    let payload = ResendEmail {
        from: config.from_email.clone(),
        to: vec![to.to_string()],
        subject: subject.to_string(),
        html: html.to_string(),
    };

    let res = client
        .post("https://api.resend.com/emails")
        .header("Authorization", format!("Bearer {api_key}"))
        .json(&payload)
        .send()
        .await
        .map_err(|e| AppError::Internal(format!("Failed to send email: {e}")))?;

    if !res.status().is_success() {
        let body = res.text().await.unwrap_or_default();
        tracing::error!("Resend API error: {body}");
        return Err(AppError::Internal(format!("Email send failed: {body}")));
    }

    tracing::info!("Email sent to {to}: {subject}");
    Ok(())
}

/// One-time notice after a first successful sign-in.
pub async fn send_welcome_email(config: &Config, to: &str, name: &str) -> AppResult<()> {
    let subject = "Welcome to Spendwell";
    let html = format!(
        r#"<!DOCTYPE html>
<html>
<body style="font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; max-width: 600px; margin: 0 auto; padding: 20px; color: #333;">
  <h2 style="color: #1a1a1a;">Welcome, {name}!</h2>
  <p>Your Spendwell account is ready. Head back to your dashboard to start tracking expenses:</p>
  <p style="text-align: center; margin: 30px 0;">
    <a href="{app_url}" style="display: inline-block; padding: 14px 28px; background: #2f855a; color: #fff; text-decoration: none; border-radius: 6px; font-weight: 600; font-size: 16px;">Open dashboard</a>
  </p>
  <hr style="border: none; border-top: 1px solid #eee; margin: 30px 0;" />
  <p style="font-size: 12px; color: #999;">If you didn't sign in with Google just now, you can safely ignore this email.</p>
</body>
</html>"#,
        app_url = config.app_url,
    );
    send_email(config, to, subject, &html).await
}
