use serde_json::{json, Value};
use std::sync::Arc;

use crate::database::models::progeny::normalize_emails;
use crate::database::models::UserGroup;
use crate::database::{DatabaseError, RecordStore, Repository};
use crate::filter::FilterData;
use crate::services::access::{AccessService, ACCESS_LEVEL_ADMIN, ACCESS_LEVEL_PUBLIC};
use crate::services::error::{ServiceError, ServiceResult};

#[derive(Clone)]
pub struct UserGroupService {
    repo: Repository<UserGroup>,
    access: AccessService,
}

impl UserGroupService {
    pub fn new(store: Arc<dyn RecordStore>, access: AccessService) -> Self {
        Self {
            repo: Repository::new(store),
            access,
        }
    }

    fn not_found(id: i32) -> ServiceError {
        ServiceError::not_found(format!("User group {} not found", id))
    }

    fn normalize(group: &mut UserGroup) -> ServiceResult<()> {
        if group.name.trim().is_empty() {
            return Err(ServiceError::validation("name is required"));
        }
        if !(ACCESS_LEVEL_ADMIN + 1..=ACCESS_LEVEL_PUBLIC).contains(&group.access_level) {
            return Err(ServiceError::validation("group access_level must be between 1 and 5"));
        }
        group.members = normalize_emails(std::mem::take(&mut group.members));
        Ok(())
    }

    pub async fn list_for_progeny(&self, progeny_id: i32, email: &str) -> ServiceResult<Vec<UserGroup>> {
        self.access.require_admin(progeny_id, email).await?;
        Ok(self.repo.select_progeny(progeny_id).await?)
    }

    pub async fn list_mine(&self, email: &str) -> ServiceResult<Vec<UserGroup>> {
        Ok(self
            .repo
            .select_any(FilterData::new().where_clause(json!({ "members": { "$any": [email] } })).order("id asc"))
            .await?)
    }

    /// Members and progeny admins may read a group
    pub async fn get(&self, id: i32, email: &str) -> ServiceResult<UserGroup> {
        let group = self.repo.select_id(id).await?.ok_or_else(|| Self::not_found(id))?;
        if group.has_member(email) {
            return Ok(group);
        }
        self.access.require_admin(group.progeny_id, email).await?;
        Ok(group)
    }

    pub async fn create(&self, mut group: UserGroup, email: &str) -> ServiceResult<UserGroup> {
        self.access.require_admin(group.progeny_id, email).await?;
        group.id = 0;
        Self::normalize(&mut group)?;
        Ok(self.repo.insert(&group).await?)
    }

    pub async fn update(&self, id: i32, changes: Value, email: &str) -> ServiceResult<UserGroup> {
        let existing = self.repo.select_id(id).await?.ok_or_else(|| Self::not_found(id))?;
        self.access.require_admin(existing.progeny_id, email).await?;
        let Value::Object(changes) = changes else {
            return Err(ServiceError::validation("update body must be a JSON object"));
        };
        let mut merged = serde_json::to_value(&existing).map_err(DatabaseError::from)?;
        if let Value::Object(row) = &mut merged {
            for (key, value) in changes.into_iter().filter(|(k, _)| k != "id" && k != "progeny_id") {
                row.insert(key, value);
            }
        }
        let mut group: UserGroup = serde_json::from_value(merged).map_err(|e| ServiceError::validation(e.to_string()))?;
        group.id = id;
        Self::normalize(&mut group)?;
        self.repo.update(&group).await?.ok_or_else(|| Self::not_found(id))
    }

    pub async fn delete(&self, id: i32, email: &str) -> ServiceResult<UserGroup> {
        let existing = self.repo.select_id(id).await?.ok_or_else(|| Self::not_found(id))?;
        self.access.require_admin(existing.progeny_id, email).await?;
        self.repo.delete(id).await?.ok_or_else(|| Self::not_found(id))
    }
}
