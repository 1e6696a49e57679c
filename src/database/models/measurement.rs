use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::database::models::{ContentItem, TimeLineType};
use crate::{content_common, impl_record};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Measurement {
    pub id: i32,
    pub progeny_id: i32,
    pub access_level: i32,
    pub author: String,
    pub date: DateTime<Utc>,
    pub weight: Decimal,
    pub height: Decimal,
    pub circumference: Decimal,
    pub eye_color: String,
    pub hair_color: String,
    pub created_date: DateTime<Utc>,
}

impl_record!(Measurement, "measurements");

impl ContentItem for Measurement {
    const ITEM_TYPE: TimeLineType = TimeLineType::Measurement;

    content_common!();

    fn progeny_time(&self) -> DateTime<Utc> {
        self.date
    }

    fn summary(&self) -> String {
        format!("Height: {} Weight: {}", self.height, self.weight)
    }

    fn set_created(&mut self, now: DateTime<Utc>) {
        self.created_date = now;
    }

    fn validate(&self) -> Result<(), String> {
        if self.weight.is_sign_negative() || self.height.is_sign_negative() || self.circumference.is_sign_negative() {
            return Err("measurements cannot be negative".to_string());
        }
        Ok(())
    }
}
