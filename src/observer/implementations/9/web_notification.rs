// Ring 9: one web notification call per mutation
use async_trait::async_trait;
use std::sync::Arc;

use crate::observer::context::ObserverContext;
use crate::observer::error::ObserverError;
use crate::observer::traits::{AsyncObserver, Observer, ObserverRing};
use crate::services::notifier::WebNotifier;

pub struct WebNotificationObserver {
    notifier: Arc<dyn WebNotifier>,
}

impl WebNotificationObserver {
    pub fn new(notifier: Arc<dyn WebNotifier>) -> Self {
        Self { notifier }
    }
}

impl Observer for WebNotificationObserver {
    fn name(&self) -> &'static str {
        "WebNotificationObserver"
    }

    fn ring(&self) -> ObserverRing {
        ObserverRing::Notification
    }
}

#[async_trait]
impl AsyncObserver for WebNotificationObserver {
    async fn execute(&self, ctx: &ObserverContext) -> Result<(), ObserverError> {
        let (Some(item), Some(audience)) = (&ctx.timeline_item, &ctx.audience) else {
            return Ok(());
        };
        self.notifier
            .send_item_notification(item, &audience.actor, &ctx.notification_title(), &audience.recipients)
            .await
            .map_err(|e| ObserverError::NotificationError(e.to_string()))
    }
}
