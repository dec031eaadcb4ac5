//! GatewayBuilder - Gateway の構築とワイヤリング
//!
//! # Fail-fast 設計
//! - registry / dispatcher が未設定なら BuildError
//! - expect_apps() で登録済みであるべき appId を宣言
//! - build() 時に「期待集合 ⊆ 登録済み集合」をチェック

use std::sync::Arc;

use tracing::info;

use super::gateway::Gateway;
use crate::domain::AppId;
use crate::ports::{DispatchService, ExAppRegistry};

/// GatewayBuilder は Gateway を構築
///
/// # 使用例
/// ```ignore
/// let gateway = GatewayBuilder::new()
///     .registry(Arc::new(registry))
///     .dispatcher(Arc::new(dispatch))
///     .expect_apps(&["weather"])
///     .build()?;
/// ```
#[derive(Default)]
pub struct GatewayBuilder {
    registry: Option<Arc<dyn ExAppRegistry>>,
    dispatcher: Option<Arc<dyn DispatchService>>,
    expected_apps: Option<Vec<AppId>>,
}

/// BuildError は Gateway 構築時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("No ExApp registry configured")]
    MissingRegistry,

    #[error("No dispatch service configured")]
    MissingDispatcher,

    #[error("Missing ExApps: {0:?}. These apps were expected but are not registered.")]
    MissingApps(Vec<String>),
}

impl GatewayBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registry(mut self, registry: Arc<dyn ExAppRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn dispatcher(mut self, dispatcher: Arc<dyn DispatchService>) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    /// 登録済みであるべき appId のリストを設定
    pub fn expect_apps(mut self, app_ids: &[&str]) -> Self {
        self.expected_apps = Some(app_ids.iter().map(|&id| AppId::new(id)).collect());
        self
    }

    pub fn build(self) -> Result<Gateway, BuildError> {
        let registry = self.registry.ok_or(BuildError::MissingRegistry)?;
        let dispatcher = self.dispatcher.ok_or(BuildError::MissingDispatcher)?;

        if let Some(expected_apps) = &self.expected_apps {
            let missing_apps: Vec<String> = expected_apps
                .iter()
                .filter(|id| registry.lookup(id).is_none())
                .map(|id| id.to_string())
                .collect();
            if !missing_apps.is_empty() {
                return Err(BuildError::MissingApps(missing_apps));
            }
            info!(apps = expected_apps.len(), "expected ExApps are registered");
        }

        Ok(Gateway::new(registry, dispatcher))
    }
}
