// Ring 6: set on create/update, remove on delete
use async_trait::async_trait;
use std::sync::Arc;

use crate::observer::context::ObserverContext;
use crate::observer::error::ObserverError;
use crate::observer::traits::{Observer, ObserverRing, Operation, SyncObserver};
use crate::services::cache::Cache;

pub struct CacheSync {
    cache: Arc<dyn Cache>,
}

impl CacheSync {
    pub fn new(cache: Arc<dyn Cache>) -> Self {
        Self { cache }
    }
}

impl Observer for CacheSync {
    fn name(&self) -> &'static str {
        "CacheSync"
    }

    fn ring(&self) -> ObserverRing {
        ObserverRing::PostDatabase
    }
}

#[async_trait]
impl SyncObserver for CacheSync {
    async fn execute(&self, ctx: &mut ObserverContext) -> Result<(), ObserverError> {
        let key = ctx.event.cache_key();
        match ctx.operation {
            Operation::Create | Operation::Update => self.cache.set(&key, ctx.event.data.clone()).await,
            Operation::Delete => self.cache.remove(&key).await,
        }
        Ok(())
    }
}
