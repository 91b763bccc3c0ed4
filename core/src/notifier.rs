//! Push notifications for certificates that need attention.
//!
//! Alerts go to a Bark-style webhook as a single GET request:
//! `{base_url}/{device_key}/{title}/{body}?icon={icon}`, with every path
//! segment percent-encoded. A delivery problem is logged and reported as
//! [`NotifyOutcome::Failed`]; it never interrupts a scan.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, warn};
use url::Url;

use certwatch_common::cert::notification::{NotifyOutcome, SkipReason};
use certwatch_common::cert::verdict::{Verdict, days};
use certwatch_common::config::PushConfig;
use certwatch_common::error::NotifyError;
use certwatch_common::network::target::Target;

pub mod transport;

use transport::HttpTransport;

/// Delivers an alert for one target.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(
        &self,
        verdict: &Verdict,
        target: &Target,
        expiry: Option<DateTime<Utc>>,
    ) -> NotifyOutcome;
}

/// Title and body of a push message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub title: String,
    pub body: String,
}

/// Builds the push message for `verdict`, or `None` when there is nothing to report.
pub fn compose(verdict: &Verdict, target: &Target, expiry: Option<DateTime<Utc>>) -> Option<Message> {
    let on_date = expiry
        .map(|at| format!(" on {}", at.format("%Y-%m-%d %H:%M UTC")))
        .unwrap_or_default();

    match verdict {
        Verdict::Healthy { .. } => None,
        Verdict::Expired { days_overdue } => Some(Message {
            title: "Certificate expired".to_string(),
            body: format!(
                "{target}: certificate expired {} ago{on_date}!",
                days(*days_overdue)
            ),
        }),
        Verdict::ExpiringSoon { days_remaining } => Some(Message {
            title: "Certificate expiring soon".to_string(),
            body: format!(
                "{target}: certificate expires in {}{on_date}, renew it in time.",
                days(*days_remaining)
            ),
        }),
        Verdict::ProbeFailed { reason } => Some(Message {
            title: "Certificate check failed".to_string(),
            body: format!("{target}: {reason}"),
        }),
    }
}

/// Notifier for the Bark push service (or anything speaking its URL scheme).
pub struct BarkNotifier<T> {
    transport: T,
    device_key: Option<String>,
    base_url: String,
    icon: Option<String>,
}

impl<T: HttpTransport> BarkNotifier<T> {
    pub fn new(push: &PushConfig, transport: T) -> Self {
        Self {
            transport,
            device_key: push.device_key.clone(),
            base_url: push.base_url.clone(),
            icon: push.icon.clone(),
        }
    }

    /// Request URL for `message`, in the service's `key/title/body` layout.
    pub fn endpoint(&self, device_key: &str, message: &Message) -> Result<Url, NotifyError> {
        let mut url =
            Url::parse(&self.base_url).map_err(|e| NotifyError::InvalidUrl(e.to_string()))?;

        url.path_segments_mut()
            .map_err(|_| NotifyError::InvalidUrl(format!("{} cannot be a base", self.base_url)))?
            .pop_if_empty()
            .push(device_key)
            .push(&message.title)
            .push(&message.body);

        if let Some(icon) = &self.icon {
            url.query_pairs_mut().append_pair("icon", icon);
        }

        Ok(url)
    }
}

#[async_trait]
impl<T: HttpTransport> Notifier for BarkNotifier<T> {
    async fn notify(
        &self,
        verdict: &Verdict,
        target: &Target,
        expiry: Option<DateTime<Utc>>,
    ) -> NotifyOutcome {
        let Some(device_key) = self.device_key.as_deref() else {
            debug!("No device key configured, not pushing alert for {target}");
            return NotifyOutcome::Skipped(SkipReason::NoCredential);
        };

        let Some(message) = compose(verdict, target, expiry) else {
            return NotifyOutcome::Skipped(SkipReason::NotActionable);
        };

        let url = match self.endpoint(device_key, &message) {
            Ok(url) => url,
            Err(e) => {
                warn!("Cannot push alert for {target}: {e}");
                return NotifyOutcome::Failed(e.to_string());
            }
        };

        let result = match self.transport.get(url).await {
            Ok(response) if response.status == 200 => Ok(()),
            Ok(response) => Err(NotifyError::Status {
                status: response.status,
                body: response.body,
            }),
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {
                debug!("Pushed '{}' for {target}", message.title);
                NotifyOutcome::Sent
            }
            Err(e) => {
                warn!("Push to {} failed for {target}: {e}", self.base_url);
                NotifyOutcome::Failed(e.to_string())
            }
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
