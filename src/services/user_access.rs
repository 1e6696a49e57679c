use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::database::models::{Progeny, UserAccess};
use crate::database::{RecordStore, Repository};
use crate::filter::FilterData;
use crate::services::access::{AccessService, ACCESS_LEVEL_ADMIN, ACCESS_LEVEL_PUBLIC};
use crate::services::error::{ServiceError, ServiceResult};

/// Fields an admin may change on an existing grant
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserAccessChanges {
    pub access_level: Option<i32>,
    pub can_contribute: Option<bool>,
}

#[derive(Clone)]
pub struct UserAccessService {
    repo: Repository<UserAccess>,
    progeny: Repository<Progeny>,
    access: AccessService,
}

impl UserAccessService {
    pub fn new(store: Arc<dyn RecordStore>, access: AccessService) -> Self {
        Self {
            repo: Repository::new(store.clone()),
            progeny: Repository::new(store),
            access,
        }
    }

    fn check_level(level: i32) -> ServiceResult<()> {
        if !(ACCESS_LEVEL_ADMIN..=ACCESS_LEVEL_PUBLIC).contains(&level) {
            return Err(ServiceError::validation(format!(
                "access_level must be between {} and {}",
                ACCESS_LEVEL_ADMIN, ACCESS_LEVEL_PUBLIC
            )));
        }
        Ok(())
    }

    pub async fn list_for_progeny(&self, progeny_id: i32, email: &str) -> ServiceResult<Vec<UserAccess>> {
        self.access.require_admin(progeny_id, email).await?;
        Ok(self.repo.select_progeny(progeny_id).await?)
    }

    pub async fn list_mine(&self, email: &str) -> ServiceResult<Vec<UserAccess>> {
        Ok(self
            .repo
            .select_any(FilterData::new().where_clause(json!({ "user_id": email })).order("progeny_id asc"))
            .await?)
    }

    pub async fn grant(&self, mut grant: UserAccess, email: &str) -> ServiceResult<UserAccess> {
        let access = self.access.require_admin(grant.progeny_id, email).await?;
        grant.id = 0;
        grant.user_id = grant.user_id.trim().to_lowercase();
        if !grant.user_id.contains('@') {
            return Err(ServiceError::validation("user_id must be an email address"));
        }
        Self::check_level(grant.access_level)?;

        let duplicate = self
            .repo
            .select_one(FilterData::new().where_clause(json!({ "progeny_id": grant.progeny_id, "user_id": grant.user_id })))
            .await?;
        if duplicate.is_some() {
            return Err(ServiceError::Conflict(format!(
                "{} already has access to progeny {}",
                grant.user_id, grant.progeny_id
            )));
        }

        let stored = self.repo.insert(&grant).await?;
        if stored.access_level == ACCESS_LEVEL_ADMIN {
            self.sync_admin(access.progeny, &stored.user_id, true).await?;
        }
        Ok(stored)
    }

    pub async fn update(&self, id: i32, changes: UserAccessChanges, email: &str) -> ServiceResult<UserAccess> {
        let mut grant = self
            .repo
            .select_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(format!("User access {} not found", id)))?;
        let access = self.access.require_admin(grant.progeny_id, email).await?;

        if let Some(level) = changes.access_level {
            Self::check_level(level)?;
            grant.access_level = level;
        }
        if let Some(can_contribute) = changes.can_contribute {
            grant.can_contribute = can_contribute;
        }

        self.sync_admin(access.progeny, &grant.user_id, grant.access_level == ACCESS_LEVEL_ADMIN)
            .await?;
        self.repo
            .update(&grant)
            .await?
            .ok_or_else(|| ServiceError::not_found(format!("User access {} not found", id)))
    }

    /// Admins may revoke any grant; users may drop their own
    pub async fn revoke(&self, id: i32, email: &str) -> ServiceResult<UserAccess> {
        let grant = self
            .repo
            .select_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(format!("User access {} not found", id)))?;
        let progeny = self
            .progeny
            .select_id(grant.progeny_id)
            .await?
            .ok_or_else(|| ServiceError::not_found(format!("Progeny {} not found", grant.progeny_id)))?;
        if !progeny.is_in_admin_list(email) && !grant.user_id.eq_ignore_ascii_case(email) {
            return Err(ServiceError::unauthorized("Only admins or the grantee may revoke access"));
        }

        self.sync_admin(progeny, &grant.user_id, false).await?;
        self.repo
            .delete(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(format!("User access {} not found", id)))
    }

    /// Keep `Progeny.admins` in step with level 0 grants
    async fn sync_admin(&self, mut progeny: Progeny, user: &str, is_admin: bool) -> ServiceResult<()> {
        let changed = if is_admin {
            progeny.add_admin(user)
        } else {
            if progeny.is_in_admin_list(user) && progeny.admins.len() == 1 {
                return Err(ServiceError::validation("a progeny must keep at least one admin"));
            }
            progeny.remove_admin(user)
        };
        if changed {
            self.progeny.update(&progeny).await?;
        }
        Ok(())
    }
}
