//! # Telegram Notifier
//!
//! Best-effort, fire-and-forget messaging. Delivery happens AFTER the
//! database commit, off the request path, and a failure is logged and
//! forgotten: messaging problems must never fail an order or a status
//! update that already committed.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  handler (after commit)                                                 │
//! │       │                                                                 │
//! │       │ dispatch(token, chat_id, text)   ← returns immediately          │
//! │       ▼                                                                 │
//! │  tokio::spawn ──► timeout ──► Sender::send()                            │
//! │                      │             │                                    │
//! │                      │             └── Telegram Bot API sendMessage     │
//! │                      │                 with the TENANT's bot token      │
//! │                      └── elapsed / error → tracing::warn, nothing else  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The [`Sender`] trait is the seam for tests: handlers only know about
//! [`Notifier`], which can be built over a mock transport.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, warn};

/// Transport failure for one outbound message.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("HTTP transport failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Bot API returned status {status}")]
    Api { status: u16 },
}

/// One-message transport. Implemented by the real Telegram client and by
/// test mocks.
#[async_trait]
pub trait Sender: Send + Sync {
    /// Delivers `text` to `chat_id` using the given tenant credential.
    async fn send(&self, bot_token: &str, chat_id: i64, text: &str) -> Result<(), NotifyError>;
}

/// The real transport: Telegram Bot API `sendMessage` over HTTPS.
#[derive(Debug, Clone)]
pub struct TelegramSender {
    http: reqwest::Client,
}

impl TelegramSender {
    pub fn new() -> Self {
        TelegramSender {
            http: reqwest::Client::new(),
        }
    }
}

impl Default for TelegramSender {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Sender for TelegramSender {
    async fn send(&self, bot_token: &str, chat_id: i64, text: &str) -> Result<(), NotifyError> {
        let url = format!("https://api.telegram.org/bot{bot_token}/sendMessage");

        let response = self
            .http
            .post(&url)
            .json(&json!({
                "chat_id": chat_id,
                "text": text,
                "parse_mode": "Markdown",
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(NotifyError::Api {
                status: response.status().as_u16(),
            });
        }

        Ok(())
    }
}

/// Best-effort message dispatcher shared by all handlers.
#[derive(Clone)]
pub struct Notifier {
    sender: Arc<dyn Sender>,
    timeout: Duration,
}

impl Notifier {
    /// Notifier over the real Telegram transport.
    pub fn telegram(timeout: Duration) -> Self {
        Notifier::with_sender(Arc::new(TelegramSender::new()), timeout)
    }

    /// Notifier over an arbitrary transport (tests).
    pub fn with_sender(sender: Arc<dyn Sender>, timeout: Duration) -> Self {
        Notifier { sender, timeout }
    }

    /// Queues one message for delivery and returns immediately.
    ///
    /// The caller's work is already committed by the time this runs, so
    /// every failure path ends in a log line and nothing else.
    pub fn dispatch(&self, establishment_id: i64, bot_token: String, chat_id: i64, text: String) {
        let notifier = self.clone();
        tokio::spawn(async move {
            notifier
                .deliver(establishment_id, &bot_token, chat_id, &text)
                .await;
        });
    }

    /// One delivery attempt with a timeout. Never returns an error.
    async fn deliver(&self, establishment_id: i64, bot_token: &str, chat_id: i64, text: &str) {
        match tokio::time::timeout(self.timeout, self.sender.send(bot_token, chat_id, text)).await {
            Ok(Ok(())) => {
                debug!(establishment_id, chat_id, "Notification delivered");
            }
            Ok(Err(err)) => {
                warn!(establishment_id, chat_id, error = %err, "Notification failed");
            }
            Err(_) => {
                warn!(
                    establishment_id,
                    chat_id,
                    timeout_secs = self.timeout.as_secs(),
                    "Notification timed out"
                );
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records deliveries; optionally fails or stalls.
    struct MockSender {
        sent: Mutex<Vec<(String, i64, String)>>,
        fail: bool,
        delay: Option<Duration>,
    }

    impl MockSender {
        fn new() -> Arc<Self> {
            Arc::new(MockSender {
                sent: Mutex::new(Vec::new()),
                fail: false,
                delay: None,
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(MockSender {
                sent: Mutex::new(Vec::new()),
                fail: true,
                delay: None,
            })
        }

        fn stalled(delay: Duration) -> Arc<Self> {
            Arc::new(MockSender {
                sent: Mutex::new(Vec::new()),
                fail: false,
                delay: Some(delay),
            })
        }
    }

    #[async_trait]
    impl Sender for MockSender {
        async fn send(&self, bot_token: &str, chat_id: i64, text: &str) -> Result<(), NotifyError> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail {
                return Err(NotifyError::Api { status: 403 });
            }
            self.sent
                .lock()
                .unwrap()
                .push((bot_token.to_string(), chat_id, text.to_string()));
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_delivers_with_tenant_credential() {
        let mock = MockSender::new();
        let notifier = Notifier::with_sender(mock.clone(), Duration::from_secs(1));

        notifier.deliver(1, "token-1", 42, "🔔 hello").await;

        let sent = mock.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0], ("token-1".to_string(), 42, "🔔 hello".to_string()));
    }

    #[tokio::test]
    async fn test_transport_failure_is_swallowed() {
        let mock = MockSender::failing();
        let notifier = Notifier::with_sender(mock.clone(), Duration::from_secs(1));

        // Completes normally; the failure only produces a log line.
        notifier.deliver(1, "token-1", 42, "hello").await;

        assert!(mock.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_stalled_transport_times_out() {
        let mock = MockSender::stalled(Duration::from_secs(30));
        let notifier = Notifier::with_sender(mock.clone(), Duration::from_millis(10));

        notifier.deliver(1, "token-1", 42, "hello").await;

        assert!(mock.sent.lock().unwrap().is_empty());
    }
}
