//! Background delivery of queued emails.

use metrics::counter;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, error, info};

use crate::domain::email_event::EmailEvent;
use crate::infrastructure::mail::{EmailComposer, Mailer};

/// Delivery attempts after the first failure.
const MAX_RETRIES: usize = 3;

/// Consumes email events until every sender is dropped.
///
/// Each event is rendered with `composer` and handed to `mailer`. Failed
/// deliveries are retried with jittered exponential backoff; an email that
/// still fails after [`MAX_RETRIES`] retries is logged and dropped.
pub async fn run_email_worker(
    mut rx: mpsc::Receiver<EmailEvent>,
    composer: EmailComposer,
    mailer: Arc<dyn Mailer>,
) {
    info!(mailer = mailer.name(), "Email worker started");

    while let Some(event) = rx.recv().await {
        let message = match composer.compose(&event) {
            Ok(message) => message,
            Err(e) => {
                error!(error = %e, to = %event.email, "Failed to render email");
                counter!("emails_failed_total").increment(1);
                continue;
            }
        };

        let strategy = ExponentialBackoff::from_millis(10)
            .max_delay(Duration::from_secs(5))
            .map(jitter)
            .take(MAX_RETRIES);

        match Retry::spawn(strategy, || mailer.send(&message)).await {
            Ok(()) => {
                debug!(to = %message.to, subject = %message.subject, "Email delivered");
                counter!("emails_sent_total").increment(1);
            }
            Err(e) => {
                error!(error = %e, to = %message.to, "Email delivery failed");
                counter!("emails_failed_total").increment(1);
            }
        }
    }

    info!("Email worker stopped");
}
