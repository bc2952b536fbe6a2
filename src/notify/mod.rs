//! Best-effort owner notifications.
//!
//! Handlers hand a [`Notification`] to the [`Notifier`], which queues it and
//! returns immediately. A background worker composes the email and delivers
//! it through a [`MailTransport`], retrying with linear backoff. Delivery
//! failures are logged and never reach the request that caused them.

pub mod message;
pub mod smtp;

pub use message::{Notification, OwnerMail};
pub use smtp::SmtpMailer;

use crate::config::MailConfig;
use anyhow::Result;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Something that can deliver one composed email
pub trait MailTransport: Send + Sync + 'static {
    fn send(&self, mail: &OwnerMail) -> impl Future<Output = Result<()>> + Send;
}

/// Retry settings for a single notification
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
    pub attempt_timeout: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &MailConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            backoff: Duration::from_millis(config.retry_backoff_ms),
            attempt_timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

/// Handle used by request handlers to enqueue notifications
#[derive(Clone)]
pub struct Notifier {
    tx: Option<mpsc::Sender<Notification>>,
    pending: Arc<AtomicUsize>,
}

/// The background delivery task, kept by `main` so the queue can be drained on shutdown
pub struct NotificationWorker {
    handle: JoinHandle<()>,
    pending: Arc<AtomicUsize>,
}

impl NotificationWorker {
    /// Wait for the worker to empty its queue once every `Notifier` is gone.
    ///
    /// Returns how many notifications were abandoned because `grace` ran out.
    pub async fn drain(mut self, grace: Duration) -> usize {
        match tokio::time::timeout(grace, &mut self.handle).await {
            Ok(Ok(())) => 0,
            Ok(Err(e)) => {
                error!(error = %e, "Notification worker failed");
                self.pending.load(Ordering::SeqCst)
            }
            Err(_) => {
                self.handle.abort();
                let abandoned = self.pending.load(Ordering::SeqCst);
                error!(abandoned, "Notification queue not drained before shutdown");
                abandoned
            }
        }
    }
}

impl Notifier {
    /// A notifier that logs and discards everything
    pub fn disabled() -> Self {
        Self {
            tx: None,
            pending: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Start a delivery worker on the current runtime.
    ///
    /// The worker exits once every `Notifier` clone has been dropped and the queue drained.
    pub fn spawn<T: MailTransport>(
        transport: T,
        policy: RetryPolicy,
        capacity: usize,
    ) -> (Self, NotificationWorker) {
        let (tx, mut rx) = mpsc::channel::<Notification>(capacity.max(1));
        let pending = Arc::new(AtomicUsize::new(0));

        let in_flight = pending.clone();
        let handle = tokio::spawn(async move {
            while let Some(notification) = rx.recv().await {
                deliver(&transport, &notification, policy).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
            }
            info!("Notification worker stopped");
        });

        let notifier = Self {
            tx: Some(tx),
            pending: pending.clone(),
        };
        (notifier, NotificationWorker { handle, pending })
    }

    /// SMTP-backed notifier when mail is configured, otherwise disabled.
    ///
    /// A broken mail setup is logged and leaves notifications disabled.
    pub fn from_config(config: &MailConfig) -> (Self, Option<NotificationWorker>) {
        match SmtpMailer::from_config(config) {
            Ok(Some(mailer)) => {
                let (notifier, worker) = Self::spawn(
                    mailer,
                    RetryPolicy::from_config(config),
                    config.queue_capacity,
                );
                (notifier, Some(worker))
            }
            Ok(None) => {
                warn!("Owner email not configured, notifications are disabled");
                (Self::disabled(), None)
            }
            Err(e) => {
                error!(error = %format!("{e:#}"), "Mail setup failed, notifications are disabled");
                (Self::disabled(), None)
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.tx.is_some()
    }

    /// Queue a notification. Never blocks and never fails.
    pub fn notify(&self, notification: Notification) {
        let Some(tx) = &self.tx else {
            info!(kind = notification.kind(), "Notifications disabled, dropping");
            return;
        };

        // Counted before sending so the worker never decrements below zero
        self.pending.fetch_add(1, Ordering::SeqCst);
        match tx.try_send(notification) {
            Ok(()) => {}
            Err(TrySendError::Full(n)) => {
                self.pending.fetch_sub(1, Ordering::SeqCst);
                warn!(kind = n.kind(), "Notification queue full, dropping");
            }
            Err(TrySendError::Closed(n)) => {
                self.pending.fetch_sub(1, Ordering::SeqCst);
                error!(kind = n.kind(), "Notification worker gone, dropping");
            }
        }
    }
}

/// Try to deliver one notification, returning whether it was sent.
async fn deliver<T: MailTransport>(
    transport: &T,
    notification: &Notification,
    policy: RetryPolicy,
) -> bool {
    let mail = notification.compose();
    let kind = notification.kind();

    for attempt in 1..=policy.max_attempts {
        let outcome = tokio::time::timeout(policy.attempt_timeout, transport.send(&mail)).await;
        match outcome {
            Ok(Ok(())) => {
                info!(kind, attempt, "Owner notified");
                return true;
            }
            Ok(Err(e)) => warn!(kind, attempt, error = %e, "Email send failed"),
            Err(_) => warn!(kind, attempt, "Email send timed out"),
        }
        if attempt < policy.max_attempts {
            tokio::time::sleep(policy.backoff * attempt).await;
        }
    }

    error!(
        kind,
        attempts = policy.max_attempts,
        "Giving up on owner notification"
    );
    false
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use std::sync::atomic::Ordering;

    fn order(address: &str) -> Notification {
        Notification::Order {
            address: address.into(),
        }
    }

    #[tokio::test]
    async fn queued_notification_is_delivered() {
        let transport = RecordingTransport::default();
        let (notifier, worker) = Notifier::spawn(transport.clone(), fast_policy(3), 8);

        notifier.notify(order("12 Main St"));
        drop(notifier);
        assert_eq!(worker.drain(Duration::from_secs(5)).await, 0);

        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, "New Order Received");
    }

    #[tokio::test]
    async fn failing_transport_is_retried_then_abandoned() {
        let transport = FlakyTransport::always_failing();
        let delivered = deliver(&transport, &order("x"), fast_policy(3)).await;
        assert!(!delivered);
        assert_eq!(transport.attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn transient_failure_recovers() {
        let transport = FlakyTransport::failing_first(1);
        let delivered = deliver(&transport, &order("x"), fast_policy(3)).await;
        assert!(delivered);
        assert_eq!(transport.attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn worker_survives_failed_deliveries() {
        let transport = FlakyTransport::always_failing();
        let (notifier, worker) = Notifier::spawn(transport.clone(), fast_policy(2), 8);

        notifier.notify(order("a"));
        notifier.notify(order("b"));
        drop(notifier);
        assert_eq!(worker.drain(Duration::from_secs(5)).await, 0);

        assert_eq!(transport.attempts.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn disabled_notifier_accepts_and_drops() {
        let notifier = Notifier::disabled();
        assert!(!notifier.is_enabled());
        notifier.notify(order("12 Main St"));
    }

    #[tokio::test]
    async fn unconfigured_mail_yields_disabled_notifier() {
        let (notifier, worker) = Notifier::from_config(&MailConfig::default());
        assert!(!notifier.is_enabled());
        assert!(worker.is_none());
    }

    #[tokio::test]
    async fn invalid_owner_address_disables_notifier() {
        let config = MailConfig {
            owner_email: Some("owner at example".into()),
            password: Some("secret".into()),
            ..MailConfig::default()
        };
        let (notifier, worker) = Notifier::from_config(&config);
        assert!(!notifier.is_enabled());
        assert!(worker.is_none());
        notifier.notify(order("12 Main St"));
    }

    #[tokio::test]
    async fn drain_reports_abandoned_notifications() {
        let transport = FlakyTransport::always_failing();
        let policy = RetryPolicy {
            max_attempts: 3,
            backoff: Duration::from_secs(10),
            attempt_timeout: Duration::from_secs(1),
        };
        let (notifier, worker) = Notifier::spawn(transport, policy, 8);

        notifier.notify(order("a"));
        notifier.notify(order("b"));
        drop(notifier);

        assert_eq!(worker.drain(Duration::from_millis(50)).await, 2);
    }

    #[tokio::test]
    async fn drain_waits_for_queued_mail() {
        let transport = RecordingTransport::default();
        let (notifier, worker) = Notifier::spawn(transport.clone(), fast_policy(1), 8);

        for street in ["a", "b", "c"] {
            notifier.notify(order(street));
        }
        drop(notifier);

        assert_eq!(worker.drain(Duration::from_secs(5)).await, 0);
        assert_eq!(transport.sent.lock().unwrap().len(), 3);
    }
}
