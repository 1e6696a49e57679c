use chrono_tz::Tz;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::database::models::{Family, Progeny, UserAccess};
use crate::database::{DatabaseError, RecordStore, Repository, TABLES};
use crate::filter::FilterData;
use crate::services::access::{AccessService, ProgenyAccess, ACCESS_LEVEL_ADMIN};
use crate::services::error::{ServiceError, ServiceResult};

/// Tables without a `progeny_id` column, handled separately on cascade
const UNSCOPED_TABLES: &[&str] = &["progeny", "families", "web_notifications", "push_devices", "user_info"];

#[derive(Clone)]
pub struct ProgenyService {
    store: Arc<dyn RecordStore>,
    repo: Repository<Progeny>,
    user_access: Repository<UserAccess>,
    families: Repository<Family>,
    access: AccessService,
}

impl ProgenyService {
    pub fn new(store: Arc<dyn RecordStore>, access: AccessService) -> Self {
        Self {
            repo: Repository::new(store.clone()),
            user_access: Repository::new(store.clone()),
            families: Repository::new(store.clone()),
            store,
            access,
        }
    }

    fn validate(progeny: &Progeny) -> ServiceResult<()> {
        if progeny.name.trim().is_empty() {
            return Err(ServiceError::validation("name is required"));
        }
        if !progeny.time_zone.is_empty() && progeny.time_zone.parse::<Tz>().is_err() {
            return Err(ServiceError::validation(format!("unknown time zone: {}", progeny.time_zone)));
        }
        Ok(())
    }

    /// The creator always ends up an admin; every admin gets a level 0 grant
    pub async fn create(&self, mut progeny: Progeny, email: &str) -> ServiceResult<Progeny> {
        Self::validate(&progeny)?;
        progeny.id = 0;
        progeny.add_admin(email);

        let stored = self.repo.insert(&progeny).await?;
        for admin in &stored.admins {
            self.user_access
                .insert(&UserAccess {
                    progeny_id: stored.id,
                    user_id: admin.clone(),
                    access_level: ACCESS_LEVEL_ADMIN,
                    can_contribute: true,
                    ..Default::default()
                })
                .await?;
        }
        tracing::info!("Created progeny {} with {} admins", stored.id, stored.admins.len());
        Ok(stored)
    }

    pub async fn get(&self, id: i32, email: &str) -> ServiceResult<ProgenyAccess> {
        Ok(self.access.resolve(id, email).await?)
    }

    pub async fn list_mine(&self, email: &str) -> ServiceResult<Vec<ProgenyAccess>> {
        Ok(self.access.accessible_progeny(email).await?)
    }

    /// Profile fields only; the admin list follows level 0 user access grants
    pub async fn update(&self, id: i32, changes: Value, email: &str) -> ServiceResult<Progeny> {
        let access = self.access.require_admin(id, email).await?;
        let Value::Object(changes) = changes else {
            return Err(ServiceError::validation("update body must be a JSON object"));
        };

        let mut merged = serde_json::to_value(&access.progeny).map_err(DatabaseError::from)?;
        if let Value::Object(row) = &mut merged {
            for (key, value) in changes.into_iter().filter(|(k, _)| k != "id" && k != "admins") {
                row.insert(key, value);
            }
        }
        let mut progeny: Progeny = serde_json::from_value(merged).map_err(|e| ServiceError::validation(e.to_string()))?;
        progeny.id = id;
        Self::validate(&progeny)?;

        self.repo
            .update(&progeny)
            .await?
            .ok_or_else(|| ServiceError::not_found(format!("Progeny {} not found", id)))
    }

    /// Removes the progeny and every row scoped to it
    pub async fn delete(&self, id: i32, email: &str) -> ServiceResult<Progeny> {
        self.access.require_admin(id, email).await?;

        let scoped = FilterData::new().where_clause(json!({ "progeny_id": id }));
        for table in TABLES.iter().filter(|t| !UNSCOPED_TABLES.contains(t)) {
            let removed = self.store.delete_where(table, &scoped).await?;
            if removed > 0 {
                tracing::debug!("Cascade removed {} rows from {}", removed, table);
            }
        }

        let families = self
            .families
            .select_any(FilterData::new().where_clause(json!({ "progeny_ids": { "$any": [id] } })))
            .await?;
        for mut family in families {
            family.progeny_ids.retain(|p| *p != id);
            self.families.update(&family).await?;
        }

        let removed = self
            .repo
            .delete(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(format!("Progeny {} not found", id)))?;
        tracing::info!("Deleted progeny {}", id);
        Ok(removed)
    }
}
