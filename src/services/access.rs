use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::config::AccessConfig;
use crate::database::models::{Progeny, UserAccess, UserGroup};
use crate::database::{DatabaseError, RecordStore, Repository};
use crate::filter::FilterData;

/// Owner level
pub const ACCESS_LEVEL_ADMIN: i32 = 0;
/// Most restricted level, granted to anyone on the public progeny
pub const ACCESS_LEVEL_PUBLIC: i32 = 5;

#[derive(Debug, Error)]
pub enum AccessError {
    #[error("Progeny {0} not found")]
    ProgenyNotFound(i32),

    #[error("No access to progeny {0}")]
    NoAccess(i32),

    #[error("Only progeny admins may modify progeny {0}")]
    NotAdmin(i32),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Resolved rights of one user on one progeny
#[derive(Debug, Clone, Serialize)]
pub struct ProgenyAccess {
    pub progeny: Progeny,
    pub access_level: i32,
    pub is_admin: bool,
    pub can_contribute: bool,
}

impl ProgenyAccess {
    /// Whether an item stored at `item_level` is visible
    pub fn can_view(&self, item_level: i32) -> bool {
        self.is_admin || item_level >= self.access_level
    }

    pub fn can_contribute(&self) -> bool {
        self.is_admin || self.can_contribute
    }
}

/// Best (lowest) level among a direct grant and group memberships
pub fn effective_level(direct: Option<i32>, groups: impl IntoIterator<Item = i32>) -> Option<i32> {
    direct.into_iter().chain(groups).min()
}

#[derive(Clone)]
pub struct AccessService {
    progeny: Repository<Progeny>,
    user_access: Repository<UserAccess>,
    user_groups: Repository<UserGroup>,
    config: AccessConfig,
}

impl AccessService {
    pub fn new(store: Arc<dyn RecordStore>, config: AccessConfig) -> Self {
        Self {
            progeny: Repository::new(store.clone()),
            user_access: Repository::new(store.clone()),
            user_groups: Repository::new(store),
            config,
        }
    }

    pub fn public_progeny_id(&self) -> i32 {
        self.config.public_progeny_id
    }

    pub async fn resolve(&self, progeny_id: i32, email: &str) -> Result<ProgenyAccess, AccessError> {
        let progeny = self
            .progeny
            .select_id(progeny_id)
            .await?
            .ok_or(AccessError::ProgenyNotFound(progeny_id))?;
        self.resolve_for(progeny, email).await
    }

    pub async fn resolve_for(&self, progeny: Progeny, email: &str) -> Result<ProgenyAccess, AccessError> {
        let email = email.trim().to_lowercase();
        if progeny.is_in_admin_list(&email) {
            return Ok(ProgenyAccess {
                progeny,
                access_level: ACCESS_LEVEL_ADMIN,
                is_admin: true,
                can_contribute: true,
            });
        }

        let direct = self
            .user_access
            .select_one(FilterData::new().where_clause(json!({ "progeny_id": progeny.id, "user_id": email })))
            .await?;
        let groups = self
            .user_groups
            .select_any(FilterData::new().where_clause(json!({
                "progeny_id": progeny.id,
                "members": { "$any": [email] }
            })))
            .await?;

        let level = effective_level(direct.as_ref().map(|a| a.access_level), groups.iter().map(|g| g.access_level));
        let can_contribute = direct.as_ref().map(|a| a.can_contribute).unwrap_or(false);

        match level {
            Some(access_level) => Ok(ProgenyAccess {
                progeny,
                access_level,
                is_admin: false,
                can_contribute,
            }),
            None if progeny.id == self.config.public_progeny_id => Ok(ProgenyAccess {
                progeny,
                access_level: ACCESS_LEVEL_PUBLIC,
                is_admin: false,
                can_contribute: false,
            }),
            None => Err(AccessError::NoAccess(progeny.id)),
        }
    }

    pub async fn require_admin(&self, progeny_id: i32, email: &str) -> Result<ProgenyAccess, AccessError> {
        let progeny = self
            .progeny
            .select_id(progeny_id)
            .await?
            .ok_or(AccessError::ProgenyNotFound(progeny_id))?;
        if !progeny.is_in_admin_list(email) {
            return Err(AccessError::NotAdmin(progeny_id));
        }
        self.resolve_for(progeny, email).await
    }

    /// Every progeny the user can see, admin rights first
    pub async fn accessible_progeny(&self, email: &str) -> Result<Vec<ProgenyAccess>, AccessError> {
        let email = email.trim().to_lowercase();
        let mut ids: Vec<i32> = self
            .progeny
            .select_any(FilterData::new().where_clause(json!({ "admins": { "$any": [email] } })))
            .await?
            .into_iter()
            .map(|p| p.id)
            .collect();
        ids.extend(
            self.user_access
                .select_any(FilterData::new().where_clause(json!({ "user_id": email })))
                .await?
                .into_iter()
                .map(|a| a.progeny_id),
        );
        ids.extend(
            self.user_groups
                .select_any(FilterData::new().where_clause(json!({ "members": { "$any": [email] } })))
                .await?
                .into_iter()
                .map(|g| g.progeny_id),
        );
        ids.push(self.config.public_progeny_id);
        ids.sort_unstable();
        ids.dedup();

        let mut out = Vec::new();
        for id in ids {
            match self.resolve(id, &email).await {
                Ok(access) => out.push(access),
                Err(AccessError::ProgenyNotFound(_)) | Err(AccessError::NoAccess(_)) => continue,
                Err(e) => return Err(e),
            }
        }
        out.sort_by_key(|a| (a.access_level, a.progeny.id));
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryRecordStore;

    fn config() -> AccessConfig {
        AccessConfig {
            default_user_email: "testuser@niviaq.com".to_string(),
            public_progeny_id: 2,
        }
    }

    async fn seed() -> AccessService {
        let store: Arc<dyn RecordStore> = Arc::new(MemoryRecordStore::new());
        let progeny = Repository::<Progeny>::new(store.clone());
        for (name, admins) in [("Kaya", vec!["mom@example.com".to_string()]), ("Demo", vec![])] {
            progeny
                .insert(&Progeny { name: name.into(), admins, ..Default::default() })
                .await
                .unwrap();
        }
        Repository::<UserAccess>::new(store.clone())
            .insert(&UserAccess { progeny_id: 1, user_id: "gran@example.com".into(), access_level: 3, ..Default::default() })
            .await
            .unwrap();
        Repository::<UserGroup>::new(store.clone())
            .insert(&UserGroup {
                progeny_id: 1,
                name: "family".into(),
                access_level: 1,
                members: vec!["gran@example.com".into(), "aunt@example.com".into()],
                ..Default::default()
            })
            .await
            .unwrap();
        AccessService::new(store, config())
    }

    #[test]
    fn effective_level_prefers_broadest_grant() {
        assert_eq!(effective_level(Some(3), [4, 1]), Some(1));
        assert_eq!(effective_level(None, [4]), Some(4));
        assert_eq!(effective_level(None, []), None);
    }

    #[tokio::test]
    async fn admins_resolve_to_level_zero() {
        let access = seed().await.resolve(1, "Mom@Example.com").await.unwrap();
        assert!(access.is_admin);
        assert_eq!(access.access_level, 0);
    }

    #[tokio::test]
    async fn group_membership_improves_direct_grant() {
        let service = seed().await;
        assert_eq!(service.resolve(1, "gran@example.com").await.unwrap().access_level, 1);
        assert_eq!(service.resolve(1, "aunt@example.com").await.unwrap().access_level, 1);
    }

    #[tokio::test]
    async fn strangers_only_see_the_public_progeny() {
        let service = seed().await;
        assert!(matches!(service.resolve(1, "stranger@example.com").await, Err(AccessError::NoAccess(1))));
        let public = service.resolve(2, "stranger@example.com").await.unwrap();
        assert_eq!(public.access_level, ACCESS_LEVEL_PUBLIC);
        assert!(!public.can_view(4));
        assert!(public.can_view(5));
        assert!(matches!(service.resolve(9, "mom@example.com").await, Err(AccessError::ProgenyNotFound(9))));
    }

    #[tokio::test]
    async fn only_admins_pass_the_admin_check() {
        let service = seed().await;
        assert!(service.require_admin(1, "mom@example.com").await.is_ok());
        assert!(matches!(service.require_admin(1, "gran@example.com").await, Err(AccessError::NotAdmin(1))));
    }

    #[tokio::test]
    async fn lists_accessible_progeny() {
        let service = seed().await;
        let ids: Vec<i32> = service.accessible_progeny("gran@example.com").await.unwrap().iter().map(|a| a.progeny.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }
}
