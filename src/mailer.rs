use crate::config::Config;
use anyhow::{Context, Result};
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use std::fs;
use std::path::Path;
use tracing::info;

/// Sends the report over an authenticated STARTTLS submission connection
pub struct Mailer {
    transport: SmtpTransport,
    from: Mailbox,
    to: Mailbox,
}

impl Mailer {
    pub fn new(config: &Config) -> Result<Self> {
        let credentials = Credentials::new(config.email_user.clone(), config.email_pass.clone());

        let transport = SmtpTransport::starttls_relay(&config.smtp_host)
            .with_context(|| format!("Invalid SMTP relay host {}", config.smtp_host))?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        let from = config
            .email_user
            .parse()
            .with_context(|| format!("Invalid sender address {}", config.email_user))?;
        let to = config
            .recipient
            .parse()
            .with_context(|| format!("Invalid recipient address {}", config.recipient))?;

        Ok(Self {
            transport,
            from,
            to,
        })
    }

    /// Send one message with the file at `attachment_path` attached
    pub fn send(&self, subject: &str, body: &str, attachment_path: &Path) -> Result<()> {
        let message = self.build_message(subject, body, attachment_path)?;

        self.transport
            .send(&message)
            .context("SMTP send failed")?;

        info!("Email sent successfully.");
        Ok(())
    }

    fn build_message(&self, subject: &str, body: &str, attachment_path: &Path) -> Result<Message> {
        let file_data = fs::read(attachment_path)
            .with_context(|| format!("Failed to read attachment {}", attachment_path.display()))?;
        let file_name = attachment_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "report.pdf".to_string());

        let pdf_type: ContentType = "application/pdf"
            .parse()
            .context("Invalid attachment content type")?;

        Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(subject)
            .multipart(
                MultiPart::mixed()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(body.to_string()),
                    )
                    .singlepart(Attachment::new(file_name).body(file_data, pdf_type)),
            )
            .context("Failed to build email message")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn test_config() -> Config {
        Config {
            email_user: "reporter@example.com".to_string(),
            email_pass: "app-password".to_string(),
            recipient: "inbox@example.com".to_string(),
            smtp_host: "smtp.gmail.com".to_string(),
            smtp_port: 587,
        }
    }

    #[test]
    fn mailer_builds_from_valid_config() {
        assert!(Mailer::new(&test_config()).is_ok());
    }

    #[test]
    fn rejects_invalid_recipient_address() {
        let mut config = test_config();
        config.recipient = "not an address".to_string();
        assert!(Mailer::new(&config).is_err());
    }

    #[test]
    fn message_carries_exactly_one_matching_attachment() {
        // Short enough that its base64 encoding stays on a single line
        let content = b"%PDF-1.4 stub";

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weekly_real_estate_report.pdf");
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content).unwrap();

        let mailer = Mailer::new(&test_config()).unwrap();
        let message = mailer
            .build_message("Weekly Real Estate Report", "See attached.", &path)
            .unwrap();

        let rendered = String::from_utf8(message.formatted()).unwrap();

        assert!(rendered.contains("Subject: Weekly Real Estate Report"));
        assert!(rendered.contains("Content-Type: application/pdf"));
        assert!(rendered.contains("filename=\"weekly_real_estate_report.pdf\""));
        assert_eq!(rendered.matches("Content-Disposition: attachment").count(), 1);

        // Attachment body is the file's bytes, base64-encoded
        assert!(rendered.contains("JVBERi0xLjQgc3R1Yg=="));
    }

    #[test]
    fn missing_attachment_file_is_an_error() {
        let mailer = Mailer::new(&test_config()).unwrap();
        let result = mailer.build_message("s", "b", Path::new("/nonexistent/report.pdf"));
        assert!(result.is_err());
    }
}
