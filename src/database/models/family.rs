use serde::{Deserialize, Serialize};

use crate::database::models::progeny::admin_list;
use crate::database::record::Record;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Family {
    pub id: i32,
    pub name: String,
    pub description: String,
    #[serde(deserialize_with = "admin_list")]
    pub admins: Vec<String>,
    pub progeny_ids: Vec<i32>,
}

impl Family {
    pub fn is_in_admin_list(&self, email: &str) -> bool {
        self.admins.iter().any(|a| a.eq_ignore_ascii_case(email.trim()))
    }
}

impl Record for Family {
    const TABLE: &'static str = "families";

    fn id(&self) -> i32 {
        self.id
    }

    fn set_id(&mut self, id: i32) {
        self.id = id;
    }
}
