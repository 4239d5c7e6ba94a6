use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Mail submission settings loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub email_user: String,
    pub email_pass: String,
    pub recipient: String,
    pub smtp_host: String,
    pub smtp_port: u16,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let email_user = env::var("EMAIL_USER").context("EMAIL_USER must be set")?;
        let email_pass = env::var("EMAIL_PASS").context("EMAIL_PASS must be set")?;

        // The original workflow mails the report back to its own inbox
        let recipient = env::var("REPORT_RECIPIENT").unwrap_or_else(|_| email_user.clone());

        Ok(Self {
            email_user,
            email_pass,
            recipient,
            smtp_host: env::var("SMTP_HOST").unwrap_or_else(|_| "smtp.gmail.com".to_string()),
            smtp_port: env::var("SMTP_PORT")
                .unwrap_or_else(|_| "587".to_string())
                .parse()
                .context("SMTP_PORT must be a valid port number")?,
        })
    }
}
