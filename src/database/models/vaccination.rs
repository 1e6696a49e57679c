use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::database::models::{ContentItem, TimeLineType};
use crate::{content_common, impl_record};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vaccination {
    pub id: i32,
    pub progeny_id: i32,
    pub access_level: i32,
    pub author: String,
    pub vaccination_name: String,
    pub vaccination_description: String,
    pub vaccination_date: DateTime<Utc>,
    pub notes: String,
}

impl_record!(Vaccination, "vaccinations");

impl ContentItem for Vaccination {
    const ITEM_TYPE: TimeLineType = TimeLineType::Vaccination;

    content_common!();

    fn progeny_time(&self) -> DateTime<Utc> {
        self.vaccination_date
    }

    fn summary(&self) -> String {
        self.vaccination_name.clone()
    }

    fn validate(&self) -> Result<(), String> {
        if self.vaccination_name.trim().is_empty() {
            return Err("vaccination_name is required".to_string());
        }
        Ok(())
    }
}
