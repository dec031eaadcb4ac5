//! Transport port - 1 件の HTTP リクエストを送る
//!
//! HttpDispatchService はこの trait の上に載ります。
//! リトライ・タイムアウトの扱いは実装側の責務です。

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, Method};

use crate::domain::{DispatchError, ExAppResponse};

/// A fully-built outbound request: URL resolved, auth headers injected.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
    /// Upper bound requested by the caller's options, if any.
    pub timeout: Option<Duration>,
}

/// Sends one request to an ExApp.
///
/// `HttpDispatchService::forward_sync` drives `send` with
/// `futures::executor::block_on` on the caller's thread. An implementation
/// used on the sync path must make progress without an active tokio reactor
/// on that thread; one that needs a runtime (a hyper/reqwest client) is only
/// safe through `forward_async`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: OutboundRequest) -> Result<ExAppResponse, DispatchError>;
}
