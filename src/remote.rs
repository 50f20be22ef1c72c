//! Remote catalog client.
//!
//! Thin adapter over the backend document store. The store never talks HTTP
//! directly; it goes through [`RemoteCatalog`], which keeps the reconciliation
//! logic testable against [`MemoryRemoteCatalog`] and keeps an unconfigured
//! deployment ([`OfflineCatalog`]) on the same code path as an unreachable one.

use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use crate::error::{ServiceError, ServiceResult};
use crate::metadata;
use crate::types::{ContentItem, ContentType, Level, Module, Visibility};

/// Storage-shape record. The wire uses snake_case column names
/// (`thumbnail_url`, `created_at`, `updated_at`); nested modules are a
/// document column and keep the in-memory shape. Absent optional fields
/// serialize to an explicit `null`, never omission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteRecord {
    pub id: String,
    pub slug: String,
    #[serde(rename = "type")]
    pub kind: ContentType,
    pub title: String,
    pub description: String,
    pub category: String,
    pub level: Option<Level>,
    pub duration: String,
    pub thumbnail_url: String,
    pub visibility: Visibility,
    pub locked: bool,
    #[serde(default)]
    pub modules: Vec<Module>,
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<ContentItem> for RemoteRecord {
    fn from(item: ContentItem) -> Self {
        Self {
            id: item.id,
            slug: item.slug,
            kind: item.kind,
            title: item.title,
            description: item.description,
            category: item.category,
            level: item.level,
            duration: item.duration,
            thumbnail_url: item.thumbnail_url,
            visibility: item.visibility,
            locked: item.locked,
            modules: item.modules,
            style: item.style,
            tags: item.tags,
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}

impl From<RemoteRecord> for ContentItem {
    fn from(record: RemoteRecord) -> Self {
        Self {
            id: record.id,
            slug: record.slug,
            kind: record.kind,
            title: record.title,
            description: record.description,
            category: record.category,
            level: record.level,
            duration: record.duration,
            thumbnail_url: record.thumbnail_url,
            visibility: record.visibility,
            locked: record.locked,
            modules: record.modules,
            style: record.style,
            tags: record.tags,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Generic document read/write/delete contract the store consumes.
pub trait RemoteCatalog: Send + Sync {
    fn list_all(&self) -> ServiceResult<Vec<RemoteRecord>>;
    fn upsert_many(&self, records: &[RemoteRecord]) -> ServiceResult<()>;
    fn delete_one(&self, id: &str) -> ServiceResult<()>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    pub base_url: String,
    pub api_key: Option<String>,
}

/// HTTP implementation against the backend's REST surface.
pub struct HttpRemoteCatalog {
    base_url: String,
    api_key: Option<String>,
}

impl HttpRemoteCatalog {
    pub fn new(config: RemoteConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
        }
    }

    fn request(&self, req: ureq::Request) -> ureq::Request {
        let req = req.set("User-Agent", metadata::USER_AGENT);
        if let Some(api_key) = &self.api_key {
            req.set("Authorization", &format!("Bearer {}", api_key))
        } else {
            req
        }
    }

    fn map_err(context: &str, e: ureq::Error) -> ServiceError {
        match e {
            ureq::Error::Status(code, _) => {
                ServiceError::Api(format!("{context}: HTTP {code}"))
            }
            ureq::Error::Transport(t) => ServiceError::Network(format!("{context}: {t}")),
        }
    }
}

impl RemoteCatalog for HttpRemoteCatalog {
    fn list_all(&self) -> ServiceResult<Vec<RemoteRecord>> {
        let url = format!("{}/api/content_items", self.base_url);
        let response = self
            .request(ureq::get(&url))
            .call()
            .map_err(|e| Self::map_err("list content items", e))?;
        response
            .into_json::<Vec<RemoteRecord>>()
            .map_err(|e| ServiceError::Network(format!("read list response: {e}")))
    }

    fn upsert_many(&self, records: &[RemoteRecord]) -> ServiceResult<()> {
        let url = format!("{}/api/content_items/upsert", self.base_url);
        self.request(ureq::post(&url))
            .send_json(serde_json::json!({ "records": records }))
            .map_err(|e| Self::map_err("upsert content items", e))?;
        Ok(())
    }

    fn delete_one(&self, id: &str) -> ServiceResult<()> {
        let url = format!("{}/api/content_items/{}", self.base_url, id);
        self.request(ureq::delete(&url))
            .call()
            .map_err(|e| Self::map_err("delete content item", e))?;
        Ok(())
    }
}

/// Stand-in when no remote is configured. Every call reports the remote as
/// unavailable, which routes the store through its fallback chain.
pub struct OfflineCatalog;

impl RemoteCatalog for OfflineCatalog {
    fn list_all(&self) -> ServiceResult<Vec<RemoteRecord>> {
        Err(ServiceError::Network("remote catalog not configured".into()))
    }

    fn upsert_many(&self, _records: &[RemoteRecord]) -> ServiceResult<()> {
        Err(ServiceError::Network("remote catalog not configured".into()))
    }

    fn delete_one(&self, _id: &str) -> ServiceResult<()> {
        Err(ServiceError::Network("remote catalog not configured".into()))
    }
}

/// In-memory remote for tests: configurable failures, call counting, and a
/// peek at the stored records.
pub struct MemoryRemoteCatalog {
    records: Mutex<Vec<RemoteRecord>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    write_calls: AtomicU32,
}

impl MemoryRemoteCatalog {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
            write_calls: AtomicU32::new(0),
        }
    }

    pub fn with_records(self, records: Vec<RemoteRecord>) -> Self {
        *self.records.lock().unwrap() = records;
        self
    }

    pub fn with_fail_reads(self, fail: bool) -> Self {
        self.fail_reads.store(fail, Ordering::SeqCst);
        self
    }

    pub fn with_fail_writes(self, fail: bool) -> Self {
        self.fail_writes.store(fail, Ordering::SeqCst);
        self
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn records(&self) -> Vec<RemoteRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn write_calls(&self) -> u32 {
        self.write_calls.load(Ordering::SeqCst)
    }
}

impl Default for MemoryRemoteCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl RemoteCatalog for MemoryRemoteCatalog {
    fn list_all(&self) -> ServiceResult<Vec<RemoteRecord>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(ServiceError::Network("memory remote: reads disabled".into()));
        }
        Ok(self.records.lock().unwrap().clone())
    }

    fn upsert_many(&self, records: &[RemoteRecord]) -> ServiceResult<()> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(ServiceError::Api("memory remote: writes rejected".into()));
        }
        let mut stored = self.records.lock().unwrap();
        for record in records {
            match stored.iter().position(|r| r.id == record.id) {
                Some(idx) => stored[idx] = record.clone(),
                None => stored.push(record.clone()),
            }
        }
        Ok(())
    }

    fn delete_one(&self, id: &str) -> ServiceResult<()> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(ServiceError::Api("memory remote: writes rejected".into()));
        }
        self.records.lock().unwrap().retain(|r| r.id != id);
        Ok(())
    }
}

/// Build a client from a connection string like `localhost:8000` or
/// `https://backend.example.com`.
pub fn create_remote_catalog(
    connection_string: &str,
    api_key: Option<String>,
) -> ServiceResult<HttpRemoteCatalog> {
    let base_url = if connection_string.starts_with("http") {
        connection_string.to_string()
    } else {
        format!("http://{}", connection_string)
    };

    Ok(HttpRemoteCatalog::new(RemoteConfig { base_url, api_key }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::default_catalog;

    #[test]
    fn connection_string_parsing() {
        let client = create_remote_catalog("localhost:8000", None).unwrap();
        assert_eq!(client.base_url, "http://localhost:8000");

        let client2 =
            create_remote_catalog("https://backend.example.com/", Some("key".to_string())).unwrap();
        assert_eq!(client2.base_url, "https://backend.example.com");
        assert_eq!(client2.api_key, Some("key".to_string()));
    }

    #[test]
    fn record_uses_storage_column_names() {
        let item = default_catalog().remove(0);
        let record = RemoteRecord::from(item);
        let value = serde_json::to_value(&record).unwrap();
        let obj = value.as_object().unwrap();
        assert!(obj.contains_key("thumbnail_url"));
        assert!(obj.contains_key("created_at"));
        assert!(obj.contains_key("updated_at"));
        assert!(obj.contains_key("type"));
        assert!(!obj.contains_key("thumbnailUrl"));
    }

    #[test]
    fn absent_optionals_serialize_as_explicit_null() {
        let mut item = default_catalog().remove(7);
        item.level = None;
        item.style = None;
        let value = serde_json::to_value(&RemoteRecord::from(item)).unwrap();
        let obj = value.as_object().unwrap();
        assert!(obj["level"].is_null());
        assert!(obj["style"].is_null());
    }

    #[test]
    fn record_round_trips_through_item() {
        let item = default_catalog().remove(0);
        let restored = ContentItem::from(RemoteRecord::from(item.clone()));
        assert_eq!(restored, item);
    }

    #[test]
    fn memory_remote_upserts_by_id() {
        let remote = MemoryRemoteCatalog::new();
        let mut record = RemoteRecord::from(default_catalog().remove(0));
        remote.upsert_many(std::slice::from_ref(&record)).unwrap();
        record.title = "Renamed".to_string();
        remote.upsert_many(std::slice::from_ref(&record)).unwrap();

        let stored = remote.records();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].title, "Renamed");
        assert_eq!(remote.write_calls(), 2);
    }

    #[test]
    fn memory_remote_failure_toggles() {
        let remote = MemoryRemoteCatalog::new()
            .with_fail_reads(true)
            .with_fail_writes(true);
        assert!(remote.list_all().is_err());
        assert!(remote.delete_one("anything").is_err());
    }
}
