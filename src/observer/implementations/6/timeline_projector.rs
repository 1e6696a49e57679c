// Ring 6: keeps one timeline row per content row
use async_trait::async_trait;
use chrono::Utc;

use crate::database::models::TimeLineItem;
use crate::observer::context::ObserverContext;
use crate::observer::error::ObserverError;
use crate::observer::traits::{Observer, ObserverRing, Operation, SyncObserver};
use crate::services::timeline::TimelineService;

pub struct TimelineProjector {
    timeline: TimelineService,
}

impl TimelineProjector {
    pub fn new(timeline: TimelineService) -> Self {
        Self { timeline }
    }

    fn project(ctx: &ObserverContext, existing: Option<&TimeLineItem>) -> TimeLineItem {
        let event = &ctx.event;
        TimeLineItem {
            id: existing.map(|t| t.id).unwrap_or_default(),
            progeny_id: event.progeny_id,
            item_id: event.item_id.to_string(),
            item_type: event.item_type,
            access_level: event.access_level,
            progeny_time: event.progeny_time,
            created_time: existing.map(|t| t.created_time).unwrap_or_else(Utc::now),
            created_by: existing.map(|t| t.created_by.clone()).unwrap_or_else(|| ctx.actor.clone()),
        }
    }
}

impl Observer for TimelineProjector {
    fn name(&self) -> &'static str {
        "TimelineProjector"
    }

    fn ring(&self) -> ObserverRing {
        ObserverRing::PostDatabase
    }
}

#[async_trait]
impl SyncObserver for TimelineProjector {
    async fn execute(&self, ctx: &mut ObserverContext) -> Result<(), ObserverError> {
        let item_id = ctx.event.item_id.to_string();
        let existing = self.timeline.get_by_item_id(ctx.event.item_type, &item_id).await?;

        let projected = match ctx.operation {
            Operation::Create => self.timeline.add(&Self::project(ctx, None)).await?,
            Operation::Update => match existing {
                Some(existing) => {
                    let updated = Self::project(ctx, Some(&existing));
                    self.timeline.update(&updated).await?.unwrap_or(updated)
                }
                None => {
                    tracing::warn!("Timeline row missing for {} {}, recreating", ctx.event.item_type, item_id);
                    self.timeline.add(&Self::project(ctx, None)).await?
                }
            },
            Operation::Delete => {
                let removed = self.timeline.delete_for_item(ctx.event.item_type, &item_id).await?;
                tracing::debug!("Removed {} timeline rows for {} {}", removed, ctx.event.item_type, item_id);
                existing.unwrap_or_else(|| Self::project(ctx, None))
            }
        };

        ctx.timeline_item = Some(projected);
        Ok(())
    }
}
