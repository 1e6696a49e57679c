use futures::future::join_all;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::time::timeout;

use crate::observer::context::ObserverContext;
use crate::observer::error::ObserverError;
use crate::observer::traits::{AsyncObserver, ObserverBox, ObserverRing};

/// Executes registered observers in ring order around a content write
pub struct ObserverPipeline {
    observers: BTreeMap<ObserverRing, Vec<ObserverBox>>,
    detach_async: bool,
}

impl ObserverPipeline {
    /// With `detach_async` the audit and notification rings run on a spawned
    /// task and the write returns without waiting for them.
    pub fn new(detach_async: bool) -> Self {
        Self {
            observers: BTreeMap::new(),
            detach_async,
        }
    }

    pub fn register_observer(&mut self, observer: ObserverBox) {
        let ring = observer.ring();
        let name = observer.name();
        self.observers.entry(ring).or_default().push(observer);

        tracing::debug!("Registered observer '{}' for ring {:?}", name, ring);
    }

    pub fn observer_names(&self) -> Vec<&'static str> {
        self.observers.values().flatten().map(|o| o.name()).collect()
    }

    /// Rings before the store write. The first failure aborts the write.
    pub async fn before_write(&self, ctx: &mut ObserverContext) -> Result<(), ObserverError> {
        let rings: Vec<ObserverRing> = self.observers.keys().copied().filter(|r| r.is_pre_database()).collect();
        for ring in rings {
            ctx.current_ring = Some(ring);
            self.execute_ring(ring, ctx).await;
            if let Some(error) = ctx.errors.first() {
                tracing::warn!("Observer pipeline stopped at ring {:?} due to errors", ring);
                return Err(error.clone());
            }
        }
        Ok(())
    }

    /// Post-database ring, then the async rings. The write has committed, so
    /// failures from here on are logged and never reported to the caller.
    pub async fn after_write(&self, mut ctx: ObserverContext) {
        ctx.current_ring = Some(ObserverRing::PostDatabase);
        self.execute_ring(ObserverRing::PostDatabase, &mut ctx).await;
        if !ctx.errors.is_empty() {
            tracing::error!(
                "{} post-write observer(s) failed for {:?} {} {}; the write stands",
                ctx.errors.len(),
                ctx.operation,
                ctx.event.item_type,
                ctx.event.item_id
            );
        }

        let async_observers: Vec<Arc<dyn AsyncObserver>> = self
            .observers
            .iter()
            .filter(|(ring, _)| ring.is_asynchronous())
            .flat_map(|(_, observers)| observers.iter())
            .filter(|o| o.applies(ctx.operation, ctx.event.item_type))
            .filter_map(|o| match o {
                ObserverBox::Async(observer) => Some(observer.clone()),
                ObserverBox::Sync(_) => None,
            })
            .collect();

        if async_observers.is_empty() {
            return;
        }

        let ctx = Arc::new(ctx);
        if self.detach_async {
            tokio::spawn(execute_async_observers(async_observers, ctx));
        } else {
            execute_async_observers(async_observers, ctx).await;
        }
    }

    async fn execute_ring(&self, ring: ObserverRing, ctx: &mut ObserverContext) {
        let Some(observers) = self.observers.get(&ring) else {
            tracing::debug!("No observers registered for ring {:?}", ring);
            return;
        };

        for observer in observers {
            let ObserverBox::Sync(sync_observer) = observer else { continue };
            if !observer.applies(ctx.operation, ctx.event.item_type) {
                tracing::trace!("Observer {} skipped for {:?} {}", observer.name(), ctx.operation, ctx.event.item_type);
                continue;
            }

            let observer_start = Instant::now();
            match timeout(observer.timeout(), sync_observer.execute(ctx)).await {
                Ok(Ok(())) => {
                    tracing::debug!("Observer: {} completed in {:?}", observer.name(), observer_start.elapsed());
                }
                Ok(Err(error)) => {
                    tracing::warn!("Observer: {} failed in {:?}: {}", observer.name(), observer_start.elapsed(), error);
                    ctx.add_error(error);
                }
                Err(_) => {
                    tracing::error!("Observer: {} timed out after {:?}", observer.name(), observer.timeout());
                    ctx.add_error(ObserverError::TimeoutError(format!(
                        "Observer {} timed out after {:?}",
                        observer.name(),
                        observer.timeout()
                    )));
                }
            }
        }
    }
}

/// Failures here are logged; the write they follow has already committed
async fn execute_async_observers(observers: Vec<Arc<dyn AsyncObserver>>, ctx: Arc<ObserverContext>) {
    let runs = observers.iter().map(|observer| {
        let ctx = ctx.clone();
        async move {
            match timeout(observer.timeout(), observer.execute(&ctx)).await {
                Ok(Ok(())) => {}
                Ok(Err(error)) => tracing::warn!("Async observer {} failed: {}", observer.name(), error),
                Err(_) => tracing::warn!("Async observer {} timed out after {:?}", observer.name(), observer.timeout()),
            }
        }
    });
    join_all(runs).await;
    tracing::debug!(
        "Observer pipeline finished {:?} {} {} in {:?}",
        ctx.operation,
        ctx.event.item_type,
        ctx.event.item_id,
        ctx.execution_time()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::TimeLineType;
    use crate::observer::context::ContentEvent;
    use crate::observer::traits::{Observer, Operation, SyncObserver};
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Rejecting;

    impl Observer for Rejecting {
        fn name(&self) -> &'static str {
            "Rejecting"
        }

        fn ring(&self) -> ObserverRing {
            ObserverRing::InputValidation
        }

        fn applies_to_item_type(&self, item_type: TimeLineType) -> bool {
            item_type == TimeLineType::Note
        }
    }

    #[async_trait]
    impl SyncObserver for Rejecting {
        async fn execute(&self, _ctx: &mut ObserverContext) -> Result<(), ObserverError> {
            Err(ObserverError::ValidationError("no notes".into()))
        }
    }

    struct BrokenProjection;

    impl Observer for BrokenProjection {
        fn name(&self) -> &'static str {
            "BrokenProjection"
        }

        fn ring(&self) -> ObserverRing {
            ObserverRing::PostDatabase
        }
    }

    #[async_trait]
    impl SyncObserver for BrokenProjection {
        async fn execute(&self, _ctx: &mut ObserverContext) -> Result<(), ObserverError> {
            Err(ObserverError::DatabaseError("timeline table unavailable".into()))
        }
    }

    struct Counting(Arc<AtomicUsize>);

    impl Observer for Counting {
        fn name(&self) -> &'static str {
            "Counting"
        }

        fn ring(&self) -> ObserverRing {
            ObserverRing::Notification
        }
    }

    #[async_trait]
    impl AsyncObserver for Counting {
        async fn execute(&self, _ctx: &ObserverContext) -> Result<(), ObserverError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn ctx(item_type: TimeLineType) -> ObserverContext {
        let event = ContentEvent {
            item_type,
            item_id: 1,
            progeny_id: 1,
            access_level: 0,
            progeny_time: Utc::now(),
            summary: String::new(),
            data: serde_json::Value::Null,
        };
        ObserverContext::new(Operation::Create, event, "a@b.com")
    }

    #[tokio::test]
    async fn validation_ring_failure_stops_the_write() {
        let mut pipeline = ObserverPipeline::new(false);
        pipeline.register_observer(ObserverBox::Sync(Box::new(Rejecting)));

        let mut note = ctx(TimeLineType::Note);
        assert!(matches!(pipeline.before_write(&mut note).await, Err(ObserverError::ValidationError(_))));

        let mut sleep = ctx(TimeLineType::Sleep);
        assert!(pipeline.before_write(&mut sleep).await.is_ok());
    }

    #[tokio::test]
    async fn inline_async_rings_finish_before_returning() {
        let hits = Arc::new(AtomicUsize::new(0));
        let mut pipeline = ObserverPipeline::new(false);
        pipeline.register_observer(ObserverBox::Async(Arc::new(Counting(hits.clone()))));
        pipeline.register_observer(ObserverBox::Async(Arc::new(Counting(hits.clone()))));

        pipeline.after_write(ctx(TimeLineType::Sleep)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn post_write_failures_are_logged_and_later_rings_still_run() {
        let hits = Arc::new(AtomicUsize::new(0));
        let mut pipeline = ObserverPipeline::new(false);
        pipeline.register_observer(ObserverBox::Sync(Box::new(BrokenProjection)));
        pipeline.register_observer(ObserverBox::Async(Arc::new(Counting(hits.clone()))));

        pipeline.after_write(ctx(TimeLineType::Note)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
