use serde_json::{json, Value};
use std::sync::Arc;

use crate::database::models::progeny::normalize_emails;
use crate::database::models::Family;
use crate::database::{DatabaseError, RecordStore, Repository};
use crate::filter::FilterData;
use crate::services::access::AccessService;
use crate::services::error::{ServiceError, ServiceResult};

/// Families group progeny for display. Family admins edit the family;
/// linking a progeny also requires being that progeny's admin.
#[derive(Clone)]
pub struct FamilyService {
    repo: Repository<Family>,
    access: AccessService,
}

impl FamilyService {
    pub fn new(store: Arc<dyn RecordStore>, access: AccessService) -> Self {
        Self {
            repo: Repository::new(store),
            access,
        }
    }

    fn not_found(id: i32) -> ServiceError {
        ServiceError::not_found(format!("Family {} not found", id))
    }

    async fn require_family_admin(&self, id: i32, email: &str) -> ServiceResult<Family> {
        let family = self.repo.select_id(id).await?.ok_or_else(|| Self::not_found(id))?;
        if !family.is_in_admin_list(email) {
            return Err(ServiceError::unauthorized(format!("Not an admin of family {}", id)));
        }
        Ok(family)
    }

    async fn require_progeny_admin(&self, progeny_ids: &[i32], email: &str) -> ServiceResult<()> {
        for progeny_id in progeny_ids {
            self.access.require_admin(*progeny_id, email).await?;
        }
        Ok(())
    }

    /// Families the user administers or that contain a progeny they can see
    pub async fn list_mine(&self, email: &str) -> ServiceResult<Vec<Family>> {
        let email = email.trim().to_lowercase();
        let visible: Vec<i32> = self
            .access
            .accessible_progeny(&email)
            .await?
            .into_iter()
            .map(|a| a.progeny.id)
            .collect();
        let mut families = self
            .repo
            .select_any(FilterData::new().where_clause(json!({ "admins": { "$any": [email] } })))
            .await?;
        if !visible.is_empty() {
            for family in self
                .repo
                .select_any(FilterData::new().where_clause(json!({ "progeny_ids": { "$any": visible } })))
                .await?
            {
                if !families.iter().any(|f| f.id == family.id) {
                    families.push(family);
                }
            }
        }
        families.sort_by_key(|f| f.id);
        Ok(families)
    }

    pub async fn get(&self, id: i32, email: &str) -> ServiceResult<Family> {
        self.list_mine(email)
            .await?
            .into_iter()
            .find(|f| f.id == id)
            .ok_or_else(|| Self::not_found(id))
    }

    pub async fn create(&self, mut family: Family, email: &str) -> ServiceResult<Family> {
        if family.name.trim().is_empty() {
            return Err(ServiceError::validation("name is required"));
        }
        self.require_progeny_admin(&family.progeny_ids, email).await?;
        family.id = 0;
        family.admins = normalize_emails(family.admins.into_iter().chain([email.to_string()]));
        family.progeny_ids.sort_unstable();
        family.progeny_ids.dedup();
        Ok(self.repo.insert(&family).await?)
    }

    pub async fn update(&self, id: i32, changes: Value, email: &str) -> ServiceResult<Family> {
        let existing = self.require_family_admin(id, email).await?;
        let Value::Object(changes) = changes else {
            return Err(ServiceError::validation("update body must be a JSON object"));
        };
        let mut merged = serde_json::to_value(&existing).map_err(DatabaseError::from)?;
        if let Value::Object(row) = &mut merged {
            for (key, value) in changes.into_iter().filter(|(k, _)| k != "id") {
                row.insert(key, value);
            }
        }
        let mut family: Family = serde_json::from_value(merged).map_err(|e| ServiceError::validation(e.to_string()))?;
        family.id = id;
        if family.admins.is_empty() {
            return Err(ServiceError::validation("a family must keep at least one admin"));
        }
        let added: Vec<i32> = family
            .progeny_ids
            .iter()
            .copied()
            .filter(|p| !existing.progeny_ids.contains(p))
            .collect();
        self.require_progeny_admin(&added, email).await?;
        family.progeny_ids.sort_unstable();
        family.progeny_ids.dedup();

        self.repo.update(&family).await?.ok_or_else(|| Self::not_found(id))
    }

    pub async fn add_progeny(&self, id: i32, progeny_id: i32, email: &str) -> ServiceResult<Family> {
        let mut family = self.require_family_admin(id, email).await?;
        self.access.require_admin(progeny_id, email).await?;
        if !family.progeny_ids.contains(&progeny_id) {
            family.progeny_ids.push(progeny_id);
            family.progeny_ids.sort_unstable();
        }
        self.repo.update(&family).await?.ok_or_else(|| Self::not_found(id))
    }

    pub async fn remove_progeny(&self, id: i32, progeny_id: i32, email: &str) -> ServiceResult<Family> {
        let mut family = self.require_family_admin(id, email).await?;
        family.progeny_ids.retain(|p| *p != progeny_id);
        self.repo.update(&family).await?.ok_or_else(|| Self::not_found(id))
    }

    pub async fn delete(&self, id: i32, email: &str) -> ServiceResult<Family> {
        self.require_family_admin(id, email).await?;
        self.repo.delete(id).await?.ok_or_else(|| Self::not_found(id))
    }
}
