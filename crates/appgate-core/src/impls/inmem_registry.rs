//! InMemoryExAppRegistry - 開発用・テスト用の Registry
//!
//! # 実装詳細
//! - HashMap<AppId, ExApp> を RwLock で保護
//! - lookup は clone したスナップショットを返すので、後続の更新は影響しない

use crate::domain::{AppId, ExApp};
use crate::ports::{ExAppRegistry, RegistryError};
use parking_lot::RwLock;
use std::collections::HashMap;

/// InMemoryExAppRegistry は appId → ExApp のマップ
///
/// # 使用例
/// ```ignore
/// let registry = InMemoryExAppRegistry::new();
/// registry.register(ExApp::new("weather", "1.0", "Weather"))?;
/// let exapp = registry.lookup(&AppId::new("weather"));
/// ```
#[derive(Debug, Default)]
pub struct InMemoryExAppRegistry {
    apps: RwLock<HashMap<AppId, ExApp>>,
}

impl InMemoryExAppRegistry {
    pub fn new() -> Self {
        Self {
            apps: RwLock::new(HashMap::new()),
        }
    }

    /// Build a registry from records, rejecting duplicate ids.
    pub fn from_records(records: impl IntoIterator<Item = ExApp>) -> Result<Self, RegistryError> {
        let registry = Self::new();
        for exapp in records {
            registry.register(exapp)?;
        }
        Ok(registry)
    }

    pub fn register(&self, exapp: ExApp) -> Result<(), RegistryError> {
        let mut apps = self.apps.write();
        if apps.contains_key(&exapp.app_id) {
            return Err(RegistryError::AlreadyRegistered(exapp.app_id));
        }
        apps.insert(exapp.app_id.clone(), exapp);
        Ok(())
    }

    /// Insert or replace. Returns the previous record.
    pub fn upsert(&self, exapp: ExApp) -> Option<ExApp> {
        self.apps.write().insert(exapp.app_id.clone(), exapp)
    }

    pub fn remove(&self, app_id: &AppId) -> Option<ExApp> {
        self.apps.write().remove(app_id)
    }

    /// Registered ids, sorted.
    pub fn app_ids(&self) -> Vec<AppId> {
        let mut ids: Vec<AppId> = self.apps.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.apps.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.apps.read().is_empty()
    }
}

impl ExAppRegistry for InMemoryExAppRegistry {
    fn lookup(&self, app_id: &AppId) -> Option<ExApp> {
        self.apps.read().get(app_id).cloned()
    }
}
