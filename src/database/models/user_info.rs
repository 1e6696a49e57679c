use serde::{Deserialize, Serialize};

use crate::database::record::Record;

/// Display profile of an account
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserInfo {
    pub id: i32,
    pub user_id: String,
    pub user_email: String,
    pub user_name: String,
    pub first_name: String,
    pub last_name: String,
    pub profile_picture: String,
    pub time_zone: String,
    pub view_child: i32,
}

impl UserInfo {
    /// Placeholder profile for accounts without a stored row
    pub fn anonymous(email: &str) -> Self {
        Self {
            user_id: email.to_string(),
            user_email: email.to_string(),
            user_name: email.to_string(),
            ..Default::default()
        }
    }

    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let full = full.trim();
        if !full.is_empty() {
            full.to_string()
        } else if !self.user_name.is_empty() {
            self.user_name.clone()
        } else {
            self.user_email.clone()
        }
    }
}

impl Record for UserInfo {
    const TABLE: &'static str = "user_info";

    fn id(&self) -> i32 {
        self.id
    }

    fn set_id(&mut self, id: i32) {
        self.id = id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_falls_back_to_email() {
        let mut info = UserInfo::anonymous("a@b.com");
        info.user_name.clear();
        assert_eq!(info.display_name(), "a@b.com");
        info.first_name = "Ana".into();
        assert_eq!(info.display_name(), "Ana");
    }
}
