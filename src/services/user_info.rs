use chrono_tz::Tz;
use serde_json::json;
use std::sync::Arc;

use crate::database::models::{Progeny, UserInfo};
use crate::database::{DatabaseError, RecordStore, Repository};
use crate::filter::FilterData;
use crate::services::error::{ServiceError, ServiceResult};

#[derive(Clone)]
pub struct UserInfoService {
    repo: Repository<UserInfo>,
}

impl UserInfoService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { repo: Repository::new(store) }
    }

    pub async fn find(&self, email: &str) -> Result<Option<UserInfo>, DatabaseError> {
        self.repo
            .select_one(FilterData::new().where_clause(json!({ "user_email": email.trim().to_lowercase() })))
            .await
    }

    /// Stored profile, or a placeholder built from the email
    pub async fn profile(&self, email: &str) -> Result<UserInfo, DatabaseError> {
        Ok(self.find(email).await?.unwrap_or_else(|| UserInfo::anonymous(email)))
    }

    /// Create or replace the caller's profile
    pub async fn save(&self, email: &str, mut info: UserInfo) -> ServiceResult<UserInfo> {
        let email = email.trim().to_lowercase();
        if !info.time_zone.is_empty() && info.time_zone.parse::<Tz>().is_err() {
            return Err(ServiceError::validation(format!("unknown time zone: {}", info.time_zone)));
        }
        info.user_email = email.clone();
        if info.user_id.is_empty() {
            info.user_id = email.clone();
        }

        match self.find(&email).await? {
            Some(existing) => {
                info.id = existing.id;
                self.repo
                    .update(&info)
                    .await?
                    .ok_or_else(|| ServiceError::not_found(format!("No profile for {}", email)))
            }
            None => Ok(self.repo.insert(&info).await?),
        }
    }

    /// Zone used for day bucketing: the user's, then the progeny's, then UTC
    pub async fn time_zone_for(&self, email: &str, progeny: &Progeny) -> Result<Tz, DatabaseError> {
        let user_zone = self.find(email).await?.map(|u| u.time_zone).unwrap_or_default();
        Ok(pick_time_zone(&user_zone, &progeny.time_zone))
    }
}

pub fn pick_time_zone(user_zone: &str, progeny_zone: &str) -> Tz {
    [user_zone, progeny_zone]
        .into_iter()
        .find_map(|z| z.parse::<Tz>().ok())
        .unwrap_or(Tz::UTC)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_zone_falls_back_in_order() {
        assert_eq!(pick_time_zone("Europe/Oslo", "America/New_York"), Tz::Europe__Oslo);
        assert_eq!(pick_time_zone("", "America/New_York"), Tz::America__New_York);
        assert_eq!(pick_time_zone("Mars/Base", "nope"), Tz::UTC);
    }
}
