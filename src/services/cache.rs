use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Opaque key-value cache for content rows, keyed `"<item_type>:<id>"`
#[async_trait]
pub trait Cache: Send + Sync {
    async fn get(&self, key: &str) -> Option<Value>;

    async fn set(&self, key: &str, value: Value);

    async fn remove(&self, key: &str);
}

#[derive(Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, Value>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get(&self, key: &str) -> Option<Value> {
        self.entries.read().await.get(key).cloned()
    }

    async fn set(&self, key: &str, value: Value) {
        self.entries.write().await.insert(key.to_string(), value);
    }

    async fn remove(&self, key: &str) {
        self.entries.write().await.remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn set_get_remove() {
        let cache = MemoryCache::new();
        cache.set("note:1", json!({ "id": 1 })).await;
        cache.set("note:1", json!({ "id": 1, "title": "x" })).await;
        assert_eq!(cache.len().await, 1);
        assert_eq!(cache.get("note:1").await.unwrap()["title"], "x");

        cache.remove("note:1").await;
        assert!(cache.get("note:1").await.is_none());
        assert_eq!(cache.len().await, 0);
    }
}
