use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::database::record::Record;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Progeny {
    pub id: i32,
    pub name: String,
    pub nick_name: String,
    pub birthday: Option<DateTime<Utc>>,
    pub time_zone: String,
    pub picture_link: String,
    #[serde(deserialize_with = "admin_list")]
    pub admins: Vec<String>,
}

impl Progeny {
    /// Exact, case-insensitive membership test
    pub fn is_in_admin_list(&self, email: &str) -> bool {
        let email = email.trim();
        !email.is_empty() && self.admins.iter().any(|a| a.eq_ignore_ascii_case(email))
    }

    pub fn add_admin(&mut self, email: &str) -> bool {
        if self.is_in_admin_list(email) {
            return false;
        }
        self.admins.push(email.trim().to_lowercase());
        true
    }

    pub fn remove_admin(&mut self, email: &str) -> bool {
        let before = self.admins.len();
        self.admins.retain(|a| !a.eq_ignore_ascii_case(email.trim()));
        before != self.admins.len()
    }
}

impl Record for Progeny {
    const TABLE: &'static str = "progeny";

    fn id(&self) -> i32 {
        self.id
    }

    fn set_id(&mut self, id: i32) {
        self.id = id;
    }
}

/// Split a legacy `;`/`,` delimited admin string into normalized entries
pub fn parse_admin_list(raw: &str) -> Vec<String> {
    normalize_emails(raw.split([';', ',']).map(str::to_string))
}

pub fn normalize_emails(entries: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for entry in entries {
        let entry = entry.trim().to_lowercase();
        if !entry.is_empty() && !out.contains(&entry) {
            out.push(entry);
        }
    }
    out
}

/// Accepts a JSON list, a delimited string or null
pub(crate) fn admin_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        List(Vec<String>),
        Delimited(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::List(list)) => normalize_emails(list),
        Some(Raw::Delimited(s)) => parse_admin_list(&s),
        None => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_legacy_delimited_admins() {
        let p: Progeny = serde_json::from_value(json!({
            "name": "Kaya",
            "admins": " Mom@Example.com; dad@example.com ,, mom@example.com"
        }))
        .unwrap();
        assert_eq!(p.admins, vec!["mom@example.com", "dad@example.com"]);
    }

    #[test]
    fn admin_membership_is_exact_not_substring() {
        let p: Progeny = serde_json::from_value(json!({ "admins": ["mom@example.com"] })).unwrap();
        assert!(p.is_in_admin_list("MOM@example.com"));
        assert!(!p.is_in_admin_list("om@example.com"));
        assert!(!p.is_in_admin_list("mom@example.com.evil"));
        assert!(!p.is_in_admin_list(""));
    }

    #[test]
    fn add_and_remove_admins() {
        let mut p = Progeny::default();
        assert!(p.add_admin("A@x.com"));
        assert!(!p.add_admin("a@x.com"));
        assert_eq!(p.admins, vec!["a@x.com"]);
        assert!(p.remove_admin("A@X.COM"));
        assert!(p.admins.is_empty());
    }

    #[test]
    fn null_admins_become_empty() {
        let p: Progeny = serde_json::from_value(json!({ "admins": null })).unwrap();
        assert!(p.admins.is_empty());
    }
}
