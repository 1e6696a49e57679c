use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::database::models::{ContentItem, TimeLineType};
use crate::{content_common, impl_record};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Location {
    pub id: i32,
    pub progeny_id: i32,
    pub access_level: i32,
    pub author: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub street_name: String,
    pub house_number: String,
    pub city: String,
    pub district: String,
    pub county: String,
    pub state: String,
    pub country: String,
    pub postal_code: String,
    pub notes: String,
    pub tags: String,
    pub date: Option<DateTime<Utc>>,
    pub date_added: DateTime<Utc>,
}

impl_record!(Location, "locations");

impl ContentItem for Location {
    const ITEM_TYPE: TimeLineType = TimeLineType::Location;

    content_common!();

    fn progeny_time(&self) -> DateTime<Utc> {
        self.date.unwrap_or(self.date_added)
    }

    fn summary(&self) -> String {
        self.name.clone()
    }

    fn tags(&self) -> Option<&str> {
        Some(&self.tags)
    }

    fn set_created(&mut self, now: DateTime<Utc>) {
        self.date_added = now;
    }

    fn validate(&self) -> Result<(), String> {
        if !(-90.0..=90.0).contains(&self.latitude) || !(-180.0..=180.0).contains(&self.longitude) {
            return Err("coordinates out of range".to_string());
        }
        Ok(())
    }
}
