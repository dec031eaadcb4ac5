//! DispatchService port - ExApp へのリクエスト転送
//!
//! 同期（blocking）と非同期（handle を返す）の 2 つの契約を持ちます。
//! どちらも解決済みの ExApp を受け取り、存在チェックはしません。

use futures::future::BoxFuture;

use crate::domain::{DispatchError, DispatchRequest, ErrorPayload, ExApp, ExAppResponse};

/// Handle for a dispatch in flight. Resolution and rejection belong to the
/// dispatch service; dropping it cancels the request.
pub type PendingResponse = BoxFuture<'static, Result<ExAppResponse, DispatchError>>;

/// DispatchService は ExApp にリクエストを転送する
///
/// # Thread Safety
/// - `Send + Sync` を要求（Gateway から `Arc<dyn DispatchService>` で共有）
pub trait DispatchService: Send + Sync {
    /// Forward and block until the ExApp answers. Failures come back as data.
    fn forward_sync(
        &self,
        exapp: &ExApp,
        request: DispatchRequest,
    ) -> Result<ExAppResponse, ErrorPayload>;

    /// Start forwarding and return immediately.
    fn forward_async(&self, exapp: &ExApp, request: DispatchRequest) -> PendingResponse;
}
