// Ring 7: Audit - one structured log line per content mutation
use async_trait::async_trait;

use crate::observer::context::ObserverContext;
use crate::observer::error::ObserverError;
use crate::observer::traits::{AsyncObserver, Observer, ObserverRing};

#[derive(Default)]
pub struct AuditLog;

impl Observer for AuditLog {
    fn name(&self) -> &'static str {
        "AuditLog"
    }

    fn ring(&self) -> ObserverRing {
        ObserverRing::Audit
    }
}

#[async_trait]
impl AsyncObserver for AuditLog {
    async fn execute(&self, ctx: &ObserverContext) -> Result<(), ObserverError> {
        tracing::info!(
            target: "audit",
            operation = ?ctx.operation,
            item_type = %ctx.event.item_type,
            item_id = ctx.event.item_id,
            progeny_id = ctx.event.progeny_id,
            access_level = ctx.event.access_level,
            actor = %ctx.actor,
            "content mutation"
        );
        Ok(())
    }
}
