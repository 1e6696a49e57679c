use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::database::models::{Comment, ContentItem};
use crate::database::{DatabaseError, RecordStore, Repository};
use crate::filter::FilterData;
use crate::observer::{ContentEvent, ObserverContext, ObserverPipeline, Operation};
use crate::services::access::{AccessService, ProgenyAccess};
use crate::services::cache::Cache;
use crate::services::error::{ServiceError, ServiceResult};
use crate::services::paging::{page_of, Numbered, Page, PageRequest};
use crate::services::tags::{collect_tags, has_tag};

/// Keys an update body cannot change
const FIXED_FIELDS: &[&str] = &["id", "progeny_id", "author", "created_time"];

/// CRUD for one content type. Reads are filtered by the caller's access
/// level; writes require progeny admin rights and run through the observer
/// pipeline so the timeline, cache and notifications follow.
pub struct ContentService<T> {
    repo: Repository<T>,
    comments: Repository<Comment>,
    access: AccessService,
    pipeline: Arc<ObserverPipeline>,
    cache: Arc<dyn Cache>,
}

impl<T> Clone for ContentService<T> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            comments: self.comments.clone(),
            access: self.access.clone(),
            pipeline: self.pipeline.clone(),
            cache: self.cache.clone(),
        }
    }
}

impl<T: ContentItem> ContentService<T> {
    pub fn new(store: Arc<dyn RecordStore>, access: AccessService, pipeline: Arc<ObserverPipeline>, cache: Arc<dyn Cache>) -> Self {
        Self {
            repo: Repository::new(store.clone()),
            comments: Repository::new(store),
            access,
            pipeline,
            cache,
        }
    }

    pub fn access(&self) -> &AccessService {
        &self.access
    }

    fn not_found(id: i32) -> ServiceError {
        ServiceError::not_found(format!("{} {} not found", T::ITEM_TYPE.label(), id))
    }

    fn cache_key(id: i32) -> String {
        format!("{}:{}", T::ITEM_TYPE, id)
    }

    /// Cache first, then the store
    async fn load(&self, id: i32) -> ServiceResult<T> {
        if let Some(cached) = self.cache.get(&Self::cache_key(id)).await {
            match serde_json::from_value::<T>(cached) {
                Ok(item) => return Ok(item),
                Err(e) => tracing::warn!("Dropping unreadable cache entry {}: {}", Self::cache_key(id), e),
            }
        }
        let item = self.repo.select_id(id).await?.ok_or_else(|| Self::not_found(id))?;
        self.cache.set(&Self::cache_key(id), serde_json::to_value(&item).map_err(DatabaseError::from)?).await;
        Ok(item)
    }

    pub async fn get(&self, id: i32, email: &str) -> ServiceResult<T> {
        let item = self.load(id).await?;
        let access = self.access.resolve(item.progeny_id(), email).await?;
        if !access.can_view(item.access_level()) {
            return Err(Self::not_found(id));
        }
        Ok(item)
    }

    /// Visible items of a progeny, oldest first
    pub async fn list(&self, progeny_id: i32, email: &str, tag: Option<&str>) -> ServiceResult<Vec<T>> {
        let access = self.access.resolve(progeny_id, email).await?;
        self.list_visible(&access, tag).await
    }

    pub async fn list_visible(&self, access: &ProgenyAccess, tag: Option<&str>) -> ServiceResult<Vec<T>> {
        let tag = tag.map(str::trim).filter(|t| !t.is_empty());
        let mut items: Vec<T> = self
            .repo
            .select_progeny(access.progeny.id)
            .await?
            .into_iter()
            .filter(|item| access.can_view(item.access_level()))
            .filter(|item| match tag {
                Some(tag) => item.tags().map_or(false, |raw| has_tag(raw, tag)),
                None => true,
            })
            .collect();
        items.sort_by(|a, b| a.progeny_time().cmp(&b.progeny_time()).then(a.id().cmp(&b.id())));
        Ok(items)
    }

    pub async fn page(
        &self,
        progeny_id: i32,
        email: &str,
        request: &PageRequest,
        page_size: usize,
    ) -> ServiceResult<Page<Numbered<T>>> {
        let items = self
            .list(progeny_id, email, request.tag.as_deref())
            .await?
            .into_iter()
            .map(Numbered::from)
            .collect();
        Ok(page_of(items, request.page, page_size, request.sort_descending(), |item, n| item.number = n))
    }

    /// Distinct tags over the visible items
    pub async fn tags(&self, access: &ProgenyAccess) -> ServiceResult<Vec<String>> {
        let items = self.list_visible(access, None).await?;
        Ok(collect_tags(items.iter().filter_map(|item| item.tags())))
    }

    pub async fn create(&self, mut item: T, email: &str) -> ServiceResult<T> {
        self.access.require_admin(item.progeny_id(), email).await?;

        item.set_id(0);
        item.set_author(email);
        item.set_created(Utc::now());
        item.validate().map_err(ServiceError::Validation)?;

        let event = ContentEvent::from_item(&item).map_err(DatabaseError::from)?;
        let mut ctx = ObserverContext::new(Operation::Create, event, email);
        self.pipeline.before_write(&mut ctx).await?;

        let stored = self.repo.insert(&item).await?;
        if let Err(e) = ctx.committed(&stored) {
            tracing::warn!("Observers see the pre-insert {}: {}", T::ITEM_TYPE, e);
        }
        self.pipeline.after_write(ctx).await;

        tracing::info!("Created {} {} for progeny {}", T::ITEM_TYPE, stored.id(), stored.progeny_id());
        Ok(stored)
    }

    /// Applies the fields present in `changes` over the stored row
    pub async fn update(&self, id: i32, changes: Value, email: &str) -> ServiceResult<T> {
        let existing = self.repo.select_id(id).await?.ok_or_else(|| Self::not_found(id))?;
        self.access.require_admin(existing.progeny_id(), email).await?;

        let Value::Object(changes) = changes else {
            return Err(ServiceError::validation("update body must be a JSON object"));
        };
        let mut merged = serde_json::to_value(&existing).map_err(DatabaseError::from)?;
        if let Value::Object(row) = &mut merged {
            for (key, value) in changes.into_iter().filter(|(k, _)| !FIXED_FIELDS.contains(&k.as_str())) {
                row.insert(key, value);
            }
        }
        let mut item: T = serde_json::from_value(merged).map_err(|e| ServiceError::validation(e.to_string()))?;
        item.set_id(id);
        item.validate().map_err(ServiceError::Validation)?;

        let event = ContentEvent::from_item(&item).map_err(DatabaseError::from)?;
        let mut ctx = ObserverContext::new(Operation::Update, event, email);
        self.pipeline.before_write(&mut ctx).await?;

        let stored = self.repo.update(&item).await?.ok_or_else(|| Self::not_found(id))?;
        if let Err(e) = ctx.committed(&stored) {
            tracing::warn!("Observers see the pre-update {} {}: {}", T::ITEM_TYPE, id, e);
        }
        self.pipeline.after_write(ctx).await;

        Ok(stored)
    }

    pub async fn delete(&self, id: i32, email: &str) -> ServiceResult<T> {
        let existing = self.repo.select_id(id).await?.ok_or_else(|| Self::not_found(id))?;
        self.access.require_admin(existing.progeny_id(), email).await?;

        let event = ContentEvent::from_item(&existing).map_err(DatabaseError::from)?;
        let mut ctx = ObserverContext::new(Operation::Delete, event, email);
        self.pipeline.before_write(&mut ctx).await?;

        let removed = self.repo.delete(id).await?.ok_or_else(|| Self::not_found(id))?;
        let comments = self
            .comments
            .delete_where(FilterData::new().where_clause(json!({ "item_type": T::ITEM_TYPE, "item_id": id.to_string() })))
            .await?;
        if comments > 0 {
            tracing::debug!("Removed {} comments on {} {}", comments, T::ITEM_TYPE, id);
        }
        self.pipeline.after_write(ctx).await;

        tracing::info!("Deleted {} {}", T::ITEM_TYPE, id);
        Ok(removed)
    }
}
