// Ring 9: one push call per mutation
use async_trait::async_trait;
use std::sync::Arc;

use crate::observer::context::ObserverContext;
use crate::observer::error::ObserverError;
use crate::observer::traits::{AsyncObserver, Observer, ObserverRing};
use crate::services::notifier::PushNotifier;

pub struct PushNotificationObserver {
    notifier: Arc<dyn PushNotifier>,
    icon_url: String,
}

impl PushNotificationObserver {
    pub fn new(notifier: Arc<dyn PushNotifier>, icon_url: impl Into<String>) -> Self {
        Self {
            notifier,
            icon_url: icon_url.into(),
        }
    }
}

impl Observer for PushNotificationObserver {
    fn name(&self) -> &'static str {
        "PushNotificationObserver"
    }

    fn ring(&self) -> ObserverRing {
        ObserverRing::Notification
    }
}

#[async_trait]
impl AsyncObserver for PushNotificationObserver {
    async fn execute(&self, ctx: &ObserverContext) -> Result<(), ObserverError> {
        let (Some(item), Some(audience)) = (&ctx.timeline_item, &ctx.audience) else {
            return Ok(());
        };
        self.notifier
            .progeny_update_notification(
                &ctx.notification_title(),
                &ctx.notification_message(),
                item,
                &self.icon_url,
                &audience.recipients,
            )
            .await
            .map_err(|e| ObserverError::NotificationError(e.to_string()))
    }
}
