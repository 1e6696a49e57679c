use chrono::{DateTime, Utc};
use serde_json::Value;
use std::time::{Duration, Instant};

use crate::database::models::{ContentItem, Progeny, TimeLineItem, TimeLineType, UserInfo};
use crate::observer::error::ObserverError;
use crate::observer::traits::{ObserverRing, Operation};

/// Type-erased description of one content mutation
#[derive(Debug, Clone)]
pub struct ContentEvent {
    pub item_type: TimeLineType,
    pub item_id: i32,
    pub progeny_id: i32,
    pub access_level: i32,
    pub progeny_time: DateTime<Utc>,
    pub summary: String,
    pub data: Value,
}

impl ContentEvent {
    pub fn from_item<T: ContentItem>(item: &T) -> Result<Self, serde_json::Error> {
        Ok(Self {
            item_type: T::ITEM_TYPE,
            item_id: item.id(),
            progeny_id: item.progeny_id(),
            access_level: item.access_level(),
            progeny_time: item.progeny_time(),
            summary: item.summary(),
            data: serde_json::to_value(item)?,
        })
    }

    pub fn cache_key(&self) -> String {
        format!("{}:{}", self.item_type, self.item_id)
    }
}

/// Who hears about a mutation, resolved once per event
#[derive(Debug, Clone)]
pub struct Audience {
    pub progeny: Progeny,
    pub actor: UserInfo,
    pub recipients: Vec<String>,
}

/// Flows through the pipeline; async rings receive it read-only
#[derive(Debug, Clone)]
pub struct ObserverContext {
    pub operation: Operation,
    pub event: ContentEvent,
    /// Email of the acting user
    pub actor: String,

    // Populated by ring 6
    pub timeline_item: Option<TimeLineItem>,
    pub audience: Option<Audience>,

    pub start_time: Instant,
    pub current_ring: Option<ObserverRing>,
    pub errors: Vec<ObserverError>,
}

impl ObserverContext {
    pub fn new(operation: Operation, event: ContentEvent, actor: impl Into<String>) -> Self {
        Self {
            operation,
            event,
            actor: actor.into(),
            timeline_item: None,
            audience: None,
            start_time: Instant::now(),
            current_ring: None,
            errors: Vec::new(),
        }
    }

    /// Replace the event with the row the store returned
    pub fn committed<T: ContentItem>(&mut self, item: &T) -> Result<(), ObserverError> {
        self.event = ContentEvent::from_item(item)
            .map_err(|e| ObserverError::DatabaseError(e.to_string()))?;
        Ok(())
    }

    pub fn add_error(&mut self, error: ObserverError) {
        self.errors.push(error);
    }

    pub fn execution_time(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Notification title, e.g. "Sleep added for Kaya"
    pub fn notification_title(&self) -> String {
        let who = self
            .audience
            .as_ref()
            .map(|a| if a.progeny.nick_name.is_empty() { a.progeny.name.clone() } else { a.progeny.nick_name.clone() })
            .unwrap_or_default();
        format!("{} {} for {}", self.event.item_type.label(), self.operation.verb(), who)
            .trim_end_matches(" for ")
            .to_string()
    }

    pub fn notification_message(&self) -> String {
        match &self.audience {
            Some(audience) => format!("{}: {}", audience.actor.display_name(), self.event.summary),
            None => self.event.summary.clone(),
        }
    }
}
