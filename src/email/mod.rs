//! Welcome and trial-conversion emails.
//!
//! Two providers: `log` writes the rendered message to the log (the dev
//! sink), `resend` posts to the Resend HTTP API.

use crate::config::EmailSettings;
use crate::core::credits::{estimate_minutes, format_credits};
use crate::utils::error::{Result, VocalisError};

use reqwest::Client;
use serde_json::json;
use std::str::FromStr;
use std::time::Duration;

const RESEND_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailProvider {
    Log,
    Resend,
}

impl FromStr for EmailProvider {
    type Err = VocalisError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "log" => Ok(EmailProvider::Log),
            "resend" => Ok(EmailProvider::Resend),
            other => Err(VocalisError::InvalidConfigValueError {
                field: "email.provider".to_string(),
                value: other.to_string(),
                reason: "Valid providers: log, resend".to_string(),
            }),
        }
    }
}

pub struct Mailer {
    provider: EmailProvider,
    from_address: String,
    resend_api_key: Option<String>,
    resend_api_url: String,
    dashboard_url: String,
    docs_url: String,
    client: Client,
}

impl Mailer {
    pub fn from_settings(settings: &EmailSettings) -> Result<Self> {
        let provider = settings.provider.parse()?;
        let client = Client::builder().timeout(RESEND_TIMEOUT).build()?;
        Ok(Self {
            provider,
            from_address: settings.from_address.clone(),
            resend_api_key: settings.resend_api_key.clone(),
            resend_api_url: settings.resend_api_url.clone(),
            dashboard_url: settings.dashboard_url.clone(),
            docs_url: settings.docs_url.clone(),
            client,
        })
    }

    pub async fn send_welcome(
        &self,
        to: &str,
        first_name: &str,
        credits: u64,
        trial_days: u32,
        trial_end_date: Option<&str>,
    ) -> Result<()> {
        let subject = "Welcome to Vocalis — your trial is live";
        let html = build_welcome_html(
            first_name,
            credits,
            trial_end_date,
            &self.dashboard_url,
            &self.docs_url,
        );
        let text = build_welcome_text(
            first_name,
            credits,
            trial_days,
            trial_end_date,
            &self.dashboard_url,
            &self.docs_url,
        );
        self.deliver(to, subject, &html, &text).await
    }

    pub async fn send_conversion(
        &self,
        to: &str,
        first_name: &str,
        days_left: u32,
        trial_end_date: Option<&str>,
    ) -> Result<()> {
        let subject = format!("{days_left} days left — keep creating with Vocalis (20% off)");
        let name = display_name(first_name);
        let billing_url = format!("{}?promo=TRIAL20", self.dashboard_url.replace("/dashboard", "/billing"));
        let end_line = trial_end_date
            .map(|d| format!("Trial ends on {d}."))
            .unwrap_or_default();

        let html = format!(
            "<html><body>\
             <h2>Your trial ends in {days_left} days</h2>\
             <p>Hi {name},<br><br>Keep creating with Vocalis — upgrade now and enjoy \
             <strong>20% off</strong> your first month.</p>\
             <p><a href='{billing_url}'>See Plans</a></p>\
             <p>{end_line}</p>\
             </body></html>"
        );
        let text = format!(
            "Hi {name},\n\nYour Vocalis trial ends in {days_left} days. \
             Upgrade now for 20% off. {end_line}\nPlans: {billing_url}\n"
        );
        self.deliver(to, &subject, &html, &text).await
    }

    async fn deliver(&self, to: &str, subject: &str, html: &str, text: &str) -> Result<()> {
        match self.provider {
            EmailProvider::Log => {
                tracing::info!("📧 [log provider] to={} subject={:?}", to, subject);
                tracing::debug!("📧 body:\n{}", text);
                Ok(())
            }
            EmailProvider::Resend => self.deliver_resend(to, subject, html, text).await,
        }
    }

    async fn deliver_resend(&self, to: &str, subject: &str, html: &str, text: &str) -> Result<()> {
        let api_key = self
            .resend_api_key
            .as_deref()
            .ok_or_else(|| VocalisError::MissingConfigError {
                field: "email.resend_api_key".to_string(),
            })?;

        let payload = json!({
            "from": self.from_address,
            "to": [to],
            "subject": subject,
            "html": html,
            "text": text,
        });

        let url = format!("{}/emails", self.resend_api_url.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(VocalisError::EmailError {
                message: format!("Resend error: {status} {detail}"),
            });
        }

        tracing::info!("📧 Email sent to {} ({:?})", to, subject);
        Ok(())
    }
}

fn display_name(first_name: &str) -> &str {
    if first_name.trim().is_empty() {
        "there"
    } else {
        first_name
    }
}

fn build_welcome_html(
    first_name: &str,
    credits: u64,
    trial_end_date: Option<&str>,
    dashboard_url: &str,
    docs_url: &str,
) -> String {
    let name = display_name(first_name);
    let minutes = estimate_minutes(credits).standard;
    let end_line = trial_end_date
        .map(|d| format!("Trial ends on <strong>{d}</strong> (UTC)."))
        .unwrap_or_default();

    format!(
        "<html><body>\
         <h1>Welcome to Vocalis! 🎉</h1>\
         <p>Hey {name},<br><br>Your Vocalis account is ready. Here's what you got:</p>\
         <p><strong>{credits_fmt} credits</strong> ≈ {minutes} minutes of voice generation</p>\
         <ul>\
         <li>Standard voices: 1,000 characters = 1,000 credits</li>\
         <li>Premium voices: celebrity &amp; emotional voices at 2× rate</li>\
         </ul>\
         <p>{end_line}</p>\
         <p><a href='{dashboard_url}'>Start Creating Voices →</a></p>\
         <p>Questions? Just reply to this email. Need help? <a href='{docs_url}'>Read the docs</a>.</p>\
         </body></html>",
        credits_fmt = format_credits(credits),
    )
}

fn build_welcome_text(
    first_name: &str,
    credits: u64,
    trial_days: u32,
    trial_end_date: Option<&str>,
    dashboard_url: &str,
    docs_url: &str,
) -> String {
    let name = display_name(first_name);
    let end_line = trial_end_date
        .map(|d| format!("Trial ends on {d} (UTC)."))
        .unwrap_or_default();
    format!(
        "Hi {name},\n\n\
         Your Vocalis trial is active with {credits} credits for {trial_days} days.\n\
         {end_line}\n\n\
         Tips:\n- Standard voices: 1 credit/character\n- Premium voices: 2 credits/character\n\n\
         Get started: {dashboard_url}\nDocs: {docs_url}\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EmailSettings;
    use httpmock::prelude::*;

    fn settings(provider: &str) -> EmailSettings {
        EmailSettings {
            provider: provider.to_string(),
            ..EmailSettings::default()
        }
    }

    #[tokio::test]
    async fn test_log_provider_always_succeeds() {
        let mailer = Mailer::from_settings(&settings("log")).unwrap();
        mailer
            .send_welcome("alex@example.com", "Alex", 50_000, 14, Some("2026-08-21"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_resend_provider_requires_api_key() {
        let mailer = Mailer::from_settings(&settings("resend")).unwrap();
        let err = mailer
            .send_welcome("alex@example.com", "Alex", 50_000, 14, None)
            .await;
        assert!(matches!(
            err,
            Err(VocalisError::MissingConfigError { field }) if field == "email.resend_api_key"
        ));
    }

    #[tokio::test]
    async fn test_resend_provider_posts_payload() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/emails")
                .header("authorization", "Bearer re_test_123")
                .json_body_partial(
                    r#"{"to": ["alex@example.com"], "subject": "Welcome to Vocalis — your trial is live"}"#,
                );
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"id": "email_1"}));
        });

        let mut cfg = settings("resend");
        cfg.resend_api_key = Some("re_test_123".to_string());
        cfg.resend_api_url = server.base_url();

        let mailer = Mailer::from_settings(&cfg).unwrap();
        mailer
            .send_welcome("alex@example.com", "Alex", 50_000, 14, None)
            .await
            .unwrap();

        mock.assert();
    }

    #[tokio::test]
    async fn test_resend_error_status_is_surfaced() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/emails");
            then.status(422).body("invalid from address");
        });

        let mut cfg = settings("resend");
        cfg.resend_api_key = Some("re_test_123".to_string());
        cfg.resend_api_url = server.base_url();

        let mailer = Mailer::from_settings(&cfg).unwrap();
        let err = mailer
            .send_conversion("alex@example.com", "Alex", 3, None)
            .await;
        assert!(matches!(err, Err(VocalisError::EmailError { .. })));
    }

    #[test]
    fn test_welcome_body_mentions_credits_and_minutes() {
        let html = build_welcome_html("Alex", 50_000, None, "http://d", "http://docs");
        assert!(html.contains("50.0K credits"));
        assert!(html.contains("50 minutes"));

        // empty first name falls back to a greeting
        let text = build_welcome_text("", 50_000, 14, None, "http://d", "http://docs");
        assert!(text.starts_with("Hi there,"));
    }
}
