//! ExApp - 登録済みの外部アプリケーション
//!
//! ExApp のライフサイクル（登録・更新・削除）は Registry が所有します。
//! Gateway は lookup で得たスナップショットを読むだけで、書き換えません。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::AppId;

/// Scheme used to reach an ExApp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    #[default]
    Http,
    Https,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Http => "http",
            Protocol::Https => "https",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered external application.
///
/// Only `app_id`, `version`, `name` and `enabled` are meant for outside
/// callers; see [`AppSummary`]. The rest is connection and auth data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExApp {
    pub app_id: AppId,
    pub version: String,
    pub name: String,
    pub enabled: bool,

    #[serde(default)]
    pub protocol: Protocol,
    pub host: String,
    pub port: u16,

    /// Shared secret used in `AUTHORIZATION-APP-API`.
    pub secret: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_time: Option<DateTime<Utc>>,
}

impl ExApp {
    pub fn new(
        app_id: impl Into<AppId>,
        version: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            app_id: app_id.into(),
            version: version.into(),
            name: name.into(),
            enabled: true,
            protocol: Protocol::Http,
            host: "localhost".to_string(),
            port: 23000,
            secret: String::new(),
            created_time: None,
        }
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_endpoint(mut self, protocol: Protocol, host: impl Into<String>, port: u16) -> Self {
        self.protocol = protocol;
        self.host = host.into();
        self.port = port;
        self
    }

    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = secret.into();
        self
    }

    pub fn with_created_time(mut self, created_time: DateTime<Utc>) -> Self {
        self.created_time = Some(created_time);
        self
    }

    /// Base URL without a trailing slash, e.g. `http://localhost:23000`.
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.protocol, self.host, self.port)
    }
}

/// The caller-facing view of an ExApp.
///
/// Serialized with exactly four keys: `appId`, `version`, `name`, `enabled`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSummary {
    pub app_id: AppId,
    pub version: String,
    pub name: String,
    pub enabled: bool,
}

impl From<&ExApp> for AppSummary {
    fn from(exapp: &ExApp) -> Self {
        Self {
            app_id: exapp.app_id.clone(),
            version: exapp.version.clone(),
            name: exapp.name.clone(),
            enabled: exapp.enabled,
        }
    }
}
