//! The content store.
//!
//! Reconciles three sources into one authoritative in-memory collection:
//! the remote catalog (wins when reachable), the local mirror (fallback),
//! and the built-in default catalog (always merged in, so a cold install is
//! never empty). Writes commit locally first and push to the remote as a
//! best-effort second phase tracked per item in [`SyncStatus`].

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::Utc;

use crate::catalog::default_catalog;
use crate::error::{ServiceError, ServiceResult};
use crate::mirror::Mirror;
use crate::remote::{RemoteCatalog, RemoteRecord};
use crate::types::{ContentItem, ContentType, Role, SyncStatus};

pub struct ContentStore {
    items: Vec<ContentItem>,
    loading: bool,
    error: Option<String>,
    sync: HashMap<String, SyncStatus>,
    mirror: Mirror,
    remote: Arc<dyn RemoteCatalog>,
}

impl ContentStore {
    pub fn new(mirror: Mirror, remote: Arc<dyn RemoteCatalog>) -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: None,
            sync: HashMap::new(),
            mirror,
            remote,
        }
    }

    pub fn items(&self) -> &[ContentItem] {
        &self.items
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Last non-fatal error, if any. Informational for load failures,
    /// a sync warning for rejected writes.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Remote phase state for an item. `None` means the item has never been
    /// part of a remote exchange (a local fixture).
    pub fn sync_status(&self, id: &str) -> Option<SyncStatus> {
        self.sync.get(id).copied()
    }

    pub fn items_of_type(&self, kind: ContentType) -> impl Iterator<Item = &ContentItem> {
        self.items.iter().filter(move |i| i.kind == kind)
    }

    pub fn find(&self, kind: ContentType, slug: &str) -> Option<&ContentItem> {
        self.items.iter().find(|i| i.kind == kind && i.slug == slug)
    }

    pub fn find_by_id(&self, id: &str) -> Option<&ContentItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Merge a candidate list against the default catalog: every candidate
    /// once (first occurrence per id wins), then every default whose id is
    /// not already present. Pure; the model for all dedup in this store.
    pub fn merge_with_defaults(
        candidates: Vec<ContentItem>,
        defaults: Vec<ContentItem>,
    ) -> Vec<ContentItem> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut merged: Vec<ContentItem> = Vec::with_capacity(candidates.len() + defaults.len());
        for item in candidates {
            if seen.insert(item.id.clone()) {
                merged.push(item);
            }
        }
        for item in defaults {
            if seen.insert(item.id.clone()) {
                merged.push(item);
            }
        }
        merged
    }

    /// Seed the reconciled collection. Remote first; on any remote failure
    /// the mirror; on a missing or unparseable mirror the defaults alone.
    /// Every path ends with the default catalog merged in and
    /// `loading == false`.
    pub async fn load(&mut self) {
        self.loading = true;
        self.error = None;

        let remote = Arc::clone(&self.remote);
        let fetched = tokio::task::spawn_blocking(move || remote.list_all()).await;

        let records = match fetched {
            Ok(Ok(records)) => Some(records),
            Ok(Err(e)) => {
                tracing::info!(error = %e, "remote catalog unavailable, using local fallback");
                self.error = Some(format!("remote catalog unavailable: {e}"));
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "remote fetch task failed, using local fallback");
                self.error = Some(format!("remote catalog unavailable: {e}"));
                None
            }
        };

        match records {
            Some(records) => {
                let remote_ids: HashSet<String> =
                    records.iter().map(|r| r.id.clone()).collect();
                let mut candidates: Vec<ContentItem> =
                    records.into_iter().map(ContentItem::from).collect();
                for item in &mut candidates {
                    item.normalize();
                }

                self.items = Self::merge_with_defaults(candidates, default_catalog());
                for id in &remote_ids {
                    self.sync.insert(id.clone(), SyncStatus::Synced);
                }
                self.persist_mirror();
                self.heal_remote_seed(&remote_ids).await;
            }
            None => {
                let cached: Vec<ContentItem> = self
                    .mirror
                    .read()
                    .and_then(|blob| match serde_json::from_str::<Vec<ContentItem>>(&blob) {
                        Ok(items) => Some(items),
                        Err(e) => {
                            tracing::warn!(error = %e, "mirror blob unparseable, treating as absent");
                            None
                        }
                    })
                    .map(|mut items| {
                        for item in &mut items {
                            item.normalize();
                        }
                        items
                    })
                    .unwrap_or_default();

                self.items = Self::merge_with_defaults(cached, default_catalog());
            }
        }

        self.loading = false;
    }

    /// Push default-catalog entries the remote has never seen back to it, so
    /// an empty backend converges on the seed. Best effort; failures are
    /// logged and ignored.
    async fn heal_remote_seed(&mut self, remote_ids: &HashSet<String>) {
        let missing: Vec<RemoteRecord> = default_catalog()
            .into_iter()
            .filter(|item| !remote_ids.contains(&item.id))
            .map(RemoteRecord::from)
            .collect();
        if missing.is_empty() {
            return;
        }

        let missing_ids: Vec<String> = missing.iter().map(|r| r.id.clone()).collect();
        let remote = Arc::clone(&self.remote);
        let pushed =
            tokio::task::spawn_blocking(move || remote.upsert_many(&missing)).await;
        match pushed {
            Ok(Ok(())) => {
                for id in missing_ids {
                    self.sync.insert(id, SyncStatus::Synced);
                }
            }
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "seed push failed");
            }
            Err(e) => {
                tracing::warn!(error = %e, "seed push task failed");
            }
        }
    }

    fn authorize(&self, role: Role, action: &str) -> ServiceResult<()> {
        if role.is_admin() {
            Ok(())
        } else {
            Err(ServiceError::Unauthorized(format!(
                "{action} requires the admin role"
            )))
        }
    }

    /// Local phase of an upsert: normalize, stamp, replace-or-append, mirror.
    /// Authoritative for callers as soon as it returns; the remote phase
    /// never rolls it back.
    pub fn apply_upsert(&mut self, role: Role, mut item: ContentItem) -> ServiceResult<ContentItem> {
        self.authorize(role, "upsert")?;

        item.normalize();
        let now = Utc::now().to_rfc3339();
        if let Some(idx) = self.items.iter().position(|i| i.id == item.id) {
            if item.created_at.is_empty() {
                item.created_at = self.items[idx].created_at.clone();
            }
            item.updated_at = now;
            self.items[idx] = item.clone();
        } else {
            if item.created_at.is_empty() {
                item.created_at = now.clone();
            }
            item.updated_at = now;
            self.items.push(item.clone());
        }

        self.sync.insert(item.id.clone(), SyncStatus::Pending);
        self.persist_mirror();
        Ok(item)
    }

    /// Remote phase of an upsert. Failure marks the item `Failed` and records
    /// a warning; no rollback, no automatic retry.
    pub async fn push_item(&mut self, id: &str) {
        let Some(item) = self.find_by_id(id).cloned() else {
            return;
        };
        let record = RemoteRecord::from(item);
        let remote = Arc::clone(&self.remote);
        let result =
            tokio::task::spawn_blocking(move || remote.upsert_many(&[record])).await;
        self.finish_remote_phase(id, flatten(result));
    }

    pub async fn upsert(&mut self, role: Role, item: ContentItem) -> ServiceResult<ContentItem> {
        let item = self.apply_upsert(role, item)?;
        self.push_item(&item.id).await;
        Ok(item)
    }

    /// Local phase of a delete. Removing a default-catalog id only holds
    /// until the next cold load re-merges the seed; see DESIGN.md.
    pub fn apply_delete(&mut self, role: Role, id: &str) -> ServiceResult<()> {
        self.authorize(role, "delete")?;

        let before = self.items.len();
        self.items.retain(|i| i.id != id);
        if self.items.len() == before {
            return Err(ServiceError::NotFound(id.to_string()));
        }
        self.sync.insert(id.to_string(), SyncStatus::Pending);
        self.persist_mirror();
        Ok(())
    }

    /// Remote phase of a delete, same non-fatal semantics as [`push_item`].
    pub async fn push_delete(&mut self, id: &str) {
        let owned = id.to_string();
        let remote = Arc::clone(&self.remote);
        let result = tokio::task::spawn_blocking(move || remote.delete_one(&owned)).await;
        match flatten(result) {
            Ok(()) => {
                self.sync.remove(id);
            }
            Err(e) => {
                tracing::warn!(id, error = %e, "remote delete failed");
                self.sync.insert(id.to_string(), SyncStatus::Failed);
                self.error = Some(format!("delete of {id} may not have synced: {e}"));
            }
        }
    }

    pub async fn delete(&mut self, role: Role, id: &str) -> ServiceResult<()> {
        self.apply_delete(role, id)?;
        self.push_delete(id).await;
        Ok(())
    }

    fn finish_remote_phase(&mut self, id: &str, result: ServiceResult<()>) {
        match result {
            Ok(()) => {
                self.sync.insert(id.to_string(), SyncStatus::Synced);
            }
            Err(e) => {
                tracing::warn!(id, error = %e, "remote upsert failed");
                self.sync.insert(id.to_string(), SyncStatus::Failed);
                self.error = Some(format!("changes to {id} may not have synced: {e}"));
            }
        }
    }

    fn persist_mirror(&mut self) {
        match serde_json::to_string(&self.items) {
            Ok(blob) => {
                if let Err(e) = self.mirror.write(&blob) {
                    tracing::warn!(error = %e, "mirror write failed");
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "mirror serialization failed");
            }
        }
    }
}

fn flatten(result: Result<ServiceResult<()>, tokio::task::JoinError>) -> ServiceResult<()> {
    match result {
        Ok(inner) => inner,
        Err(e) => Err(ServiceError::Other(format!("remote task failed: {e}"))),
    }
}
