use serde::{Deserialize, Serialize};

use crate::database::record::Record;

/// Named set of users sharing one access level for a progeny
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserGroup {
    pub id: i32,
    pub progeny_id: i32,
    pub name: String,
    pub description: String,
    pub access_level: i32,
    pub members: Vec<String>,
}

impl UserGroup {
    pub fn has_member(&self, email: &str) -> bool {
        self.members.iter().any(|m| m.eq_ignore_ascii_case(email))
    }
}

impl Record for UserGroup {
    const TABLE: &'static str = "user_groups";

    fn id(&self) -> i32 {
        self.id
    }

    fn set_id(&mut self, id: i32) {
        self.id = id;
    }
}
