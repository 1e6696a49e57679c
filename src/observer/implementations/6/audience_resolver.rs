// Ring 6: progeny, actor profile and recipients for the notification ring
use async_trait::async_trait;
use std::sync::Arc;

use crate::database::models::Progeny;
use crate::database::{RecordStore, Repository};
use crate::observer::context::{Audience, ObserverContext};
use crate::observer::error::ObserverError;
use crate::observer::traits::{Observer, ObserverRing, SyncObserver};
use crate::services::notification::NotificationService;
use crate::services::user_info::UserInfoService;

pub struct AudienceResolver {
    progeny: Repository<Progeny>,
    users: UserInfoService,
    notifications: NotificationService,
}

impl AudienceResolver {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            progeny: Repository::new(store.clone()),
            users: UserInfoService::new(store.clone()),
            notifications: NotificationService::new(store),
        }
    }
}

impl Observer for AudienceResolver {
    fn name(&self) -> &'static str {
        "AudienceResolver"
    }

    fn ring(&self) -> ObserverRing {
        ObserverRing::PostDatabase
    }
}

#[async_trait]
impl SyncObserver for AudienceResolver {
    async fn execute(&self, ctx: &mut ObserverContext) -> Result<(), ObserverError> {
        let Some(progeny) = self.progeny.select_id(ctx.event.progeny_id).await? else {
            tracing::warn!("Progeny {} vanished before notification", ctx.event.progeny_id);
            return Ok(());
        };
        let actor = self.users.profile(&ctx.actor).await?;
        let recipients = self
            .notifications
            .audience(&progeny, ctx.event.access_level, &ctx.actor)
            .await?;

        ctx.audience = Some(Audience { progeny, actor, recipients });
        Ok(())
    }
}
