//! Email transport boundary.

use std::sync::Arc;

use tracing::info;

/// Outcome of a delivery attempt.
///
/// Transports report failure as a value, never as a panic or an error the
/// dispatcher would have to propagate — every call site is safe to ignore.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// The transport accepted the message.
    Sent { message_id: String },
    /// No transport is configured; the intent was logged instead.
    Logged,
    /// The transport reported an error.
    Failed { reason: String },
}

impl Delivery {
    pub fn is_failure(&self) -> bool {
        matches!(self, Delivery::Failed { .. })
    }
}

/// Outbound email transport.
pub trait EmailTransport: Send + Sync {
    fn send(&self, to: &str, subject: &str, html_body: &str) -> Delivery;
}

impl<T> EmailTransport for Arc<T>
where
    T: EmailTransport + ?Sized,
{
    fn send(&self, to: &str, subject: &str, html_body: &str) -> Delivery {
        (**self).send(to, subject, html_body)
    }
}

impl<T> EmailTransport for &T
where
    T: EmailTransport + ?Sized,
{
    fn send(&self, to: &str, subject: &str, html_body: &str) -> Delivery {
        (**self).send(to, subject, html_body)
    }
}

/// Degraded transport used when no mailer is configured.
///
/// Records the intent at info level and reports `Logged`, which callers
/// treat as success (matching the source system, which logs the email to
/// the console when its API key is absent).
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMailer;

impl NoopMailer {
    pub fn new() -> Self {
        Self
    }
}

impl EmailTransport for NoopMailer {
    fn send(&self, to: &str, subject: &str, _html_body: &str) -> Delivery {
        info!(to, subject, "email transport not configured; logging instead of sending");
        Delivery::Logged
    }
}
