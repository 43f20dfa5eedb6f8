//! SmtpNotifier - SMTP リレー経由の Notifier 実装
//!
//! 送信は implicit TLS（submissions ポート）で行い、from/to は起動時に
//! 固定されます。件名と本文のテンプレートはここが持ちます。

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::domain::{NotifyError, StatusChange};
use crate::ports::Notifier;

pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl SmtpNotifier {
    pub fn new(
        host: &str,
        port: u16,
        user: &str,
        pass: &str,
        from: &str,
        to: &str,
    ) -> Result<Self, NotifyError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(host)
            .map_err(|e| NotifyError::Transport(format!("relay setup failed: {e}")))?
            .port(port)
            .credentials(Credentials::new(user.to_string(), pass.to_string()))
            .build();

        Ok(Self {
            transport,
            from: parse_mailbox("from", from)?,
            to: parse_mailbox("to", to)?,
        })
    }
}

fn parse_mailbox(which: &str, address: &str) -> Result<Mailbox, NotifyError> {
    address
        .parse::<Mailbox>()
        .map_err(|e| NotifyError::Message(format!("invalid {which} address {address:?}: {e}")))
}

/// Fixed subject template: title and the newly observed status.
fn subject(change: &StatusChange) -> String {
    format!(
        "Status of \"{}\" has been updated to \"{}\"",
        change.record.title, change.record.status
    )
}

/// Fixed plain-text body template embedding the record's body summary.
fn body(summary: &str) -> String {
    format!("Page contents brief summary:\n{summary}")
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn notify(&self, change: &StatusChange, summary: &str) -> Result<(), NotifyError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(subject(change))
            .header(ContentType::TEXT_PLAIN)
            .body(body(summary))
            .map_err(|e| NotifyError::Message(e.to_string()))?;

        let response = self
            .transport
            .send(message)
            .await
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        tracing::info!(
            record = %change.record.id,
            status = %change.record.status,
            code = %response.code(),
            "notification sent"
        );
        Ok(())
    }
}
