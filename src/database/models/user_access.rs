use serde::{Deserialize, Serialize};

use crate::database::record::Record;

/// Per-user grant to one progeny
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserAccess {
    pub id: i32,
    pub progeny_id: i32,
    pub user_id: String,
    pub access_level: i32,
    pub can_contribute: bool,
}

impl Record for UserAccess {
    const TABLE: &'static str = "user_access";

    fn id(&self) -> i32 {
        self.id
    }

    fn set_id(&mut self, id: i32) {
        self.id = id;
    }
}
