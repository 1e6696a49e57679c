use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::database::models::TimeLineType;
use crate::observer::context::ObserverContext;
use crate::observer::error::ObserverError;

/// Observer rings with semantic meaning - synchronous (1, 6) and asynchronous (7, 9)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum ObserverRing {
    InputValidation = 1,    // Field ranges, required values
    PostDatabase = 6,       // Timeline projection, cache sync
    Audit = 7,              // Mutation log (async)
    Notification = 9,       // Push and web fan-out (async)
}

impl ObserverRing {
    pub fn is_asynchronous(&self) -> bool {
        (*self as u8) >= 7
    }

    /// Rings that run before the store write
    pub fn is_pre_database(&self) -> bool {
        (*self as u8) < 5
    }
}

/// Content mutations that emit events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl Operation {
    pub fn verb(&self) -> &'static str {
        match self {
            Operation::Create => "added",
            Operation::Update => "updated",
            Operation::Delete => "deleted",
        }
    }
}

/// Base trait for all observers with metadata and applicability checks
pub trait Observer: Send + Sync {
    fn name(&self) -> &'static str;

    fn ring(&self) -> ObserverRing;

    fn applies_to_operation(&self, _op: Operation) -> bool {
        true
    }

    fn applies_to_item_type(&self, _item_type: TimeLineType) -> bool {
        true
    }

    /// Execution timeout (default 5 seconds)
    fn timeout(&self) -> Duration {
        Duration::from_secs(5)
    }
}

/// Rings 0-6, may mutate the context
#[async_trait]
pub trait SyncObserver: Observer {
    async fn execute(&self, ctx: &mut ObserverContext) -> Result<(), ObserverError>;
}

/// Rings 7-9, read-only view after the write committed
#[async_trait]
pub trait AsyncObserver: Observer {
    async fn execute(&self, ctx: &ObserverContext) -> Result<(), ObserverError>;
}

pub enum ObserverBox {
    Sync(Box<dyn SyncObserver>),
    Async(Arc<dyn AsyncObserver>),
}

impl ObserverBox {
    pub fn name(&self) -> &'static str {
        match self {
            ObserverBox::Sync(o) => o.name(),
            ObserverBox::Async(o) => o.name(),
        }
    }

    pub fn ring(&self) -> ObserverRing {
        match self {
            ObserverBox::Sync(o) => o.ring(),
            ObserverBox::Async(o) => o.ring(),
        }
    }

    pub fn applies(&self, op: Operation, item_type: TimeLineType) -> bool {
        match self {
            ObserverBox::Sync(o) => o.applies_to_operation(op) && o.applies_to_item_type(item_type),
            ObserverBox::Async(o) => o.applies_to_operation(op) && o.applies_to_item_type(item_type),
        }
    }

    pub fn timeout(&self) -> Duration {
        match self {
            ObserverBox::Sync(o) => o.timeout(),
            ObserverBox::Async(o) => o.timeout(),
        }
    }
}
