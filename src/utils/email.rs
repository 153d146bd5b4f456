use lettre::message::{MultiPart, SinglePart, header};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::{debug, instrument};

use jobdesk_core::AppError;

use crate::config::email::EmailConfig;

pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    #[instrument(skip(self, token))]
    pub async fn send_verification_email(
        &self,
        to_email: &str,
        to_name: &str,
        token: &str,
    ) -> Result<(), AppError> {
        let verify_link = format!("{}/verify-email?token={}", self.config.frontend_url, token);

        let html_body = self.link_template(
            to_name,
            "Verify your email",
            "Confirm your email address to activate your Jobdesk account.",
            &verify_link,
            "This link will expire in 24 hours.",
        );
        let text_body = format!(
            "Hi {},\n\n\
             Confirm your email address to activate your Jobdesk account:\n\
             {}\n\n\
             This link will expire in 24 hours.\n\n\
             If you didn't create an account, please ignore this email.",
            to_name, verify_link
        );

        self.send_email(to_email, "Verify your email", &text_body, &html_body)
            .await
    }

    #[instrument(skip(self, token))]
    pub async fn send_password_reset_email(
        &self,
        to_email: &str,
        to_name: &str,
        token: &str,
    ) -> Result<(), AppError> {
        let reset_link = format!("{}/reset-password?token={}", self.config.frontend_url, token);

        let html_body = self.link_template(
            to_name,
            "Password reset request",
            "We received a request to reset your password. Use the link below to choose a new one.",
            &reset_link,
            "This link will expire in 1 hour.",
        );
        let text_body = format!(
            "Hi {},\n\n\
             We received a request to reset your password.\n\n\
             Reset link: {}\n\n\
             This link will expire in 1 hour.\n\n\
             If you didn't request this, please ignore this email.",
            to_name, reset_link
        );

        self.send_email(to_email, "Password reset request", &text_body, &html_body)
            .await
    }

    #[instrument(skip(self, html_body, text_body))]
    async fn send_email(
        &self,
        to_email: &str,
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> Result<(), AppError> {
        if !self.config.enabled {
            debug!(to = %to_email, subject = %subject, "SMTP disabled, skipping email");
            return Ok(());
        }

        let from = format!("{} <{}>", self.config.from_name, self.config.from_email);

        let email = Message::builder()
            .from(from.parse().map_err(|e| {
                AppError::internal(anyhow::anyhow!("Invalid from email: {}", e))
            })?)
            .to(to_email.parse().map_err(|e| {
                AppError::internal(anyhow::anyhow!("Invalid to email: {}", e))
            })?)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_PLAIN)
                            .body(text_body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_HTML)
                            .body(html_body.to_string()),
                    ),
            )
            .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to build email: {}", e)))?;

        let mailer = if self.config.smtp_username.is_empty() {
            SmtpTransport::builder_dangerous(&self.config.smtp_host)
                .port(self.config.smtp_port)
                .build()
        } else {
            let creds = Credentials::new(
                self.config.smtp_username.clone(),
                self.config.smtp_password.clone(),
            );

            SmtpTransport::relay(&self.config.smtp_host)
                .map_err(|e| {
                    AppError::internal(anyhow::anyhow!("Failed to create SMTP relay: {}", e))
                })?
                .port(self.config.smtp_port)
                .credentials(creds)
                .build()
        };

        tokio::task::spawn_blocking(move || mailer.send(&email))
            .await
            .map_err(|e| AppError::internal(anyhow::anyhow!("Task join error: {}", e)))?
            .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to send email: {}", e)))?;

        Ok(())
    }

    fn link_template(
        &self,
        name: &str,
        heading: &str,
        intro: &str,
        link: &str,
        expiry_note: &str,
    ) -> String {
        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<body style="margin: 0; padding: 20px; font-family: Arial, sans-serif; background-color: #f4f4f4;">
    <table width="600" cellpadding="0" cellspacing="0" align="center" style="background-color: #ffffff; border-radius: 8px;">
        <tr>
            <td style="background-color: #0F766E; padding: 24px; text-align: center;">
                <h1 style="margin: 0; color: #ffffff; font-size: 24px;">Jobdesk</h1>
            </td>
        </tr>
        <tr>
            <td style="padding: 32px;">
                <h2 style="margin: 0 0 16px 0; color: #333333;">{heading}</h2>
                <p style="margin: 0 0 16px 0; color: #666666;">Hi <strong>{name}</strong>,</p>
                <p style="margin: 0 0 24px 0; color: #666666;">{intro}</p>
                <p style="margin: 0 0 24px 0; text-align: center;">
                    <a href="{link}" style="display: inline-block; padding: 12px 32px; background-color: #0F766E; color: #ffffff; text-decoration: none; border-radius: 6px; font-weight: bold;">{heading}</a>
                </p>
                <p style="margin: 0 0 8px 0; color: #666666; font-size: 14px;">Or copy this link into your browser:</p>
                <p style="margin: 0 0 16px 0; color: #0F766E; font-size: 14px; word-break: break-all;">{link}</p>
                <p style="margin: 0; color: #666666; font-size: 14px;"><strong>{expiry_note}</strong></p>
            </td>
        </tr>
        <tr>
            <td style="background-color: #f8f9fa; padding: 16px; text-align: center;">
                <p style="margin: 0; color: #999999; font-size: 12px;">This is an automated email from Jobdesk. Please do not reply.</p>
            </td>
        </tr>
    </table>
</body>
</html>"#
        )
    }
}
