use chrono::Utc;
use serde_json::json;
use std::sync::Arc;

use crate::database::models::{TimeLineItem, TimeLineType};
use crate::database::{DatabaseError, RecordStore, Repository};
use crate::filter::FilterData;
use crate::services::access::AccessService;
use crate::services::error::{ServiceError, ServiceResult};
use crate::services::paging::{page_of, Numbered, Page};

/// Store operations for the feed mirror plus the visibility-filtered reads
#[derive(Clone)]
pub struct TimelineService {
    repo: Repository<TimeLineItem>,
    access: AccessService,
}

impl TimelineService {
    pub fn new(store: Arc<dyn RecordStore>, access: AccessService) -> Self {
        Self {
            repo: Repository::new(store),
            access,
        }
    }

    pub async fn add(&self, item: &TimeLineItem) -> Result<TimeLineItem, DatabaseError> {
        self.repo.insert(item).await
    }

    pub async fn update(&self, item: &TimeLineItem) -> Result<Option<TimeLineItem>, DatabaseError> {
        self.repo.update(item).await
    }

    /// Removes every mirror row of one source item
    pub async fn delete_for_item(&self, item_type: TimeLineType, item_id: &str) -> Result<u64, DatabaseError> {
        self.repo
            .delete_where(FilterData::new().where_clause(json!({ "item_type": item_type, "item_id": item_id })))
            .await
    }

    pub async fn get_by_item_id(&self, item_type: TimeLineType, item_id: &str) -> Result<Option<TimeLineItem>, DatabaseError> {
        self.repo
            .select_one(FilterData::new().where_clause(json!({ "item_type": item_type, "item_id": item_id })).order("id asc"))
            .await
    }

    /// All mirror rows of a progeny, oldest first
    pub async fn list_by_progeny(&self, progeny_id: i32) -> Result<Vec<TimeLineItem>, DatabaseError> {
        self.repo
            .select_any(
                FilterData::new()
                    .where_clause(json!({ "progeny_id": progeny_id }))
                    .order("progeny_time asc, id asc"),
            )
            .await
    }

    /// Feed entries visible to `email`, optionally of one type; future-dated
    /// entries stay hidden until their time arrives.
    pub async fn feed(
        &self,
        progeny_id: i32,
        email: &str,
        item_type: Option<TimeLineType>,
        page_index: i32,
        page_size: usize,
        sort_descending: bool,
    ) -> ServiceResult<Page<Numbered<TimeLineItem>>> {
        let access = self.access.resolve(progeny_id, email).await?;
        let now = Utc::now();
        let items: Vec<Numbered<TimeLineItem>> = self
            .list_by_progeny(progeny_id)
            .await?
            .into_iter()
            .filter(|t| access.can_view(t.access_level))
            .filter(|t| item_type.map_or(true, |wanted| t.item_type == wanted))
            .filter(|t| t.progeny_time <= now)
            .map(Numbered::from)
            .collect();
        Ok(page_of(items, page_index, page_size, sort_descending, |t, n| t.number = n))
    }

    /// Single entry for a source item, hidden as not found when above the caller's level
    pub async fn get_visible(&self, item_type: TimeLineType, item_id: &str, email: &str) -> ServiceResult<TimeLineItem> {
        let item = self
            .get_by_item_id(item_type, item_id)
            .await?
            .ok_or_else(|| ServiceError::not_found(format!("No timeline item for {} {}", item_type, item_id)))?;
        let access = self.access.resolve(item.progeny_id, email).await?;
        if !access.can_view(item.access_level) {
            return Err(ServiceError::not_found(format!("No timeline item for {} {}", item_type, item_id)));
        }
        Ok(item)
    }
}
