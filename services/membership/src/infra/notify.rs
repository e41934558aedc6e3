use serde_json::json;
use tracing::{info, warn};

use crate::domain::repository::NotificationSender;

/// Fire-and-forget outbound notifier. Posts `{phone, message}` to the
/// configured webhook; the core never awaits delivery and delivery failures
/// are only traced. Without a webhook URL the message is logged and dropped.
#[derive(Clone)]
pub struct WebhookNotifier {
    pub client: reqwest::Client,
    pub webhook_url: Option<String>,
}

impl NotificationSender for WebhookNotifier {
    fn send(&self, phone: &str, message: &str) {
        let Some(url) = self.webhook_url.clone() else {
            info!(phone, "notification webhook not configured, dropping message");
            return;
        };
        let client = self.client.clone();
        let body = json!({ "phone": phone, "message": message });
        tokio::spawn(async move {
            if let Err(e) = client.post(&url).json(&body).send().await {
                warn!(error = %e, "notification delivery failed");
            }
        });
    }
}
