//! Outbound notifications (email and SMS)
//!
//! [`GatewayNotifier`] posts JSON to configured HTTP gateways and only logs
//! when a gateway URL is unset. [`MemoryNotifier`] records messages instead
//! of sending them.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Serialize;
use shared::error::{AppError, ErrorCode};
use std::sync::Arc;
use thiserror::Error;

use crate::core::Config;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Gateway request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Gateway rejected message with status {0}")]
    Rejected(u16),
}

impl From<NotifyError> for AppError {
    fn from(err: NotifyError) -> Self {
        tracing::error!(error = %err, "Notification delivery failed");
        AppError::new(ErrorCode::NotificationFailed)
    }
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_email(&self, to: &str, subject: &str, body: &str) -> Result<(), NotifyError>;
    async fn send_sms(&self, to: &str, body: &str) -> Result<(), NotifyError>;
}

pub type SharedNotifier = Arc<dyn Notifier>;

// ── Message templates ───────────────────────────────────────────────

pub fn temporary_password_text(password: &str) -> String {
    format!(
        "Your temporary password is: {password}\n\
         It stays valid until you set a new password."
    )
}

pub fn account_created_text(login: &str, password: &str) -> String {
    format!(
        "An account was created for your order.\n\
         Login: {login}\n\
         Password: {password}"
    )
}

pub fn order_placed_text(number: u64) -> String {
    format!("Your order #{number} has been received.")
}

// ── HTTP gateway ────────────────────────────────────────────────────

#[derive(Serialize)]
struct EmailPayload<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

#[derive(Serialize)]
struct SmsPayload<'a> {
    sender: &'a str,
    to: &'a str,
    text: &'a str,
}

pub struct GatewayNotifier {
    client: reqwest::Client,
    mail_url: Option<String>,
    mail_from: String,
    sms_url: Option<String>,
    sms_sender: String,
}

impl GatewayNotifier {
    pub fn from_config(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            mail_url: config.mail_gateway_url.clone(),
            mail_from: config.mail_from.clone(),
            sms_url: config.sms_gateway_url.clone(),
            sms_sender: config.sms_sender.clone(),
        }
    }

    async fn post<T: Serialize + ?Sized>(&self, url: &str, payload: &T) -> Result<(), NotifyError> {
        let response = self.client.post(url).json(payload).send().await?;
        if !response.status().is_success() {
            return Err(NotifyError::Rejected(response.status().as_u16()));
        }
        Ok(())
    }
}

#[async_trait]
impl Notifier for GatewayNotifier {
    async fn send_email(&self, to: &str, subject: &str, body: &str) -> Result<(), NotifyError> {
        let Some(url) = &self.mail_url else {
            tracing::info!(to = to, subject = subject, "Mail gateway not configured, email logged only");
            return Ok(());
        };
        let payload = EmailPayload {
            from: &self.mail_from,
            to,
            subject,
            text: body,
        };
        self.post(url, &payload).await?;
        tracing::info!(to = to, subject = subject, "Email sent");
        Ok(())
    }

    async fn send_sms(&self, to: &str, body: &str) -> Result<(), NotifyError> {
        let Some(url) = &self.sms_url else {
            tracing::info!(to = to, "SMS gateway not configured, message logged only");
            return Ok(());
        };
        let payload = SmsPayload {
            sender: &self.sms_sender,
            to,
            text: body,
        };
        self.post(url, &payload).await?;
        tracing::info!(to = to, "SMS sent");
        Ok(())
    }
}

// ── In-memory recorder ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Channel {
    Email,
    Sms,
}

#[derive(Debug, Clone)]
pub struct SentMessage {
    pub channel: Channel,
    pub to: String,
    pub body: String,
}

#[derive(Default)]
pub struct MemoryNotifier {
    sent: Mutex<Vec<SentMessage>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().clone()
    }

    /// Most recent message addressed to `to`
    pub fn last_to(&self, to: &str) -> Option<SentMessage> {
        self.sent.lock().iter().rev().find(|m| m.to == to).cloned()
    }
}

#[async_trait]
impl Notifier for MemoryNotifier {
    async fn send_email(&self, to: &str, _subject: &str, body: &str) -> Result<(), NotifyError> {
        self.sent.lock().push(SentMessage {
            channel: Channel::Email,
            to: to.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }

    async fn send_sms(&self, to: &str, body: &str) -> Result<(), NotifyError> {
        self.sent.lock().push(SentMessage {
            channel: Channel::Sms,
            to: to.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}
