//! Gateway - ExApp を解決して DispatchService に委譲する
//!
//! 3 つの操作はどれも「lookup → 委譲 or 失敗」の 1 ステップで、
//! 呼び出し間で状態を持ちません。
//!
//! # ExApp が見つからないとき
//! - `dispatch_sync`: `ErrorPayload` を値として返す（raise しない）
//! - `dispatch_async`: handle を作る前に `GatewayError` を返す
//! - `get_exapp_info`: `None`
//!
//! 同期と非同期でエラーの出し方が違うのは意図的な契約です。

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::{
    AppId, AppSummary, DispatchRequest, ErrorPayload, ExApp, ExAppResponse, GatewayError,
};
use crate::ports::{DispatchService, ExAppRegistry, PendingResponse};

/// Gateway forwards requests to registered ExApps.
#[derive(Clone)]
pub struct Gateway {
    registry: Arc<dyn ExAppRegistry>,
    dispatcher: Arc<dyn DispatchService>,
}

impl Gateway {
    pub fn new(registry: Arc<dyn ExAppRegistry>, dispatcher: Arc<dyn DispatchService>) -> Self {
        Self {
            registry,
            dispatcher,
        }
    }

    /// Forward and wait. A missing ExApp comes back as an `ErrorPayload`;
    /// anything the dispatch service returns is passed through as is.
    pub fn dispatch_sync(
        &self,
        app_id: &AppId,
        request: DispatchRequest,
    ) -> Result<ExAppResponse, ErrorPayload> {
        let exapp = match self.resolve(app_id) {
            Ok(exapp) => exapp,
            Err(err) => return Err(ErrorPayload::from(err)),
        };
        debug!(app_id = %app_id, route = %request.route, method = %request.method, "dispatching (sync)");
        self.dispatcher.forward_sync(&exapp, request)
    }

    /// Start forwarding. A missing ExApp is an immediate `Err`; no handle is
    /// created and the dispatch service is not called.
    pub fn dispatch_async(
        &self,
        app_id: &AppId,
        request: DispatchRequest,
    ) -> Result<PendingResponse, GatewayError> {
        let exapp = self.resolve(app_id)?;
        debug!(app_id = %app_id, route = %request.route, method = %request.method, "dispatching (async)");
        Ok(self.dispatcher.forward_async(&exapp, request))
    }

    pub fn get_exapp_info(&self, app_id: &AppId) -> Option<AppSummary> {
        self.registry
            .lookup(app_id)
            .map(|exapp| AppSummary::from(&exapp))
    }

    fn resolve(&self, app_id: &AppId) -> Result<ExApp, GatewayError> {
        self.registry.lookup(app_id).ok_or_else(|| {
            warn!(app_id = %app_id, "ExApp not found");
            GatewayError::ExAppNotFound(app_id.clone())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DispatchError, RequestContext};
    use crate::impls::InMemoryExAppRegistry;
    use http::{HeaderMap, HeaderValue, Method, StatusCode};
    use parking_lot::Mutex;
    use rstest::rstest;
    use serde_json::json;

    /// DispatchService double: records every call and answers with a canned
    /// response.
    #[derive(Default)]
    struct RecordingDispatch {
        sync_calls: Mutex<Vec<(ExApp, DispatchRequest)>>,
        async_calls: Mutex<Vec<(ExApp, DispatchRequest)>>,
        sync_reply: Option<Result<ExAppResponse, ErrorPayload>>,
        async_reply: Option<Result<ExAppResponse, DispatchError>>,
    }

    impl RecordingDispatch {
        fn total_calls(&self) -> usize {
            self.sync_calls.lock().len() + self.async_calls.lock().len()
        }
    }

    impl DispatchService for RecordingDispatch {
        fn forward_sync(
            &self,
            exapp: &ExApp,
            request: DispatchRequest,
        ) -> Result<ExAppResponse, ErrorPayload> {
            self.sync_calls.lock().push((exapp.clone(), request));
            self.sync_reply
                .clone()
                .unwrap_or_else(|| Ok(ExAppResponse::ok("sync")))
        }

        fn forward_async(&self, exapp: &ExApp, request: DispatchRequest) -> PendingResponse {
            self.async_calls.lock().push((exapp.clone(), request));
            let reply = self
                .async_reply
                .clone()
                .unwrap_or_else(|| Ok(ExAppResponse::ok("async")));
            Box::pin(async move { reply })
        }
    }

    fn weather() -> ExApp {
        ExApp::new("weather", "1.0", "Weather").with_secret("s3cr3t")
    }

    fn gateway_with(dispatch: Arc<RecordingDispatch>) -> Gateway {
        let registry = InMemoryExAppRegistry::from_records([weather()]).unwrap();
        Gateway::new(Arc::new(registry), dispatch)
    }

    fn full_request() -> DispatchRequest {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("10.0.0.1"));

        DispatchRequest::new("/api/forecast")
            .with_user("alice")
            .with_method(Method::PUT)
            .with_param("city", "Berlin")
            .with_options(json!({"timeout": 3}).as_object().cloned().unwrap())
            .with_request(
                RequestContext::new()
                    .with_request_id("req-1")
                    .with_headers(headers),
            )
    }

    #[rstest]
    #[case::ghost("ghost")]
    #[case::empty("")]
    #[case::case_differs("Weather")]
    fn dispatch_sync_missing_app_returns_payload(#[case] app_id: &str) {
        let dispatch = Arc::new(RecordingDispatch::default());
        let gateway = gateway_with(dispatch.clone());

        let err = gateway
            .dispatch_sync(&AppId::new(app_id), DispatchRequest::new("/r"))
            .unwrap_err();

        assert_eq!(err.error, format!("ExApp `{app_id}` not found"));
        assert_eq!(dispatch.total_calls(), 0);
    }

    #[rstest]
    #[case::ghost("ghost")]
    #[case::case_differs("WEATHER")]
    fn dispatch_async_missing_app_fails_before_handle(#[case] app_id: &str) {
        let dispatch = Arc::new(RecordingDispatch::default());
        let gateway = gateway_with(dispatch.clone());

        let result = gateway.dispatch_async(&AppId::new(app_id), DispatchRequest::new("/r"));

        match result {
            Err(GatewayError::ExAppNotFound(id)) => assert_eq!(id.as_str(), app_id),
            Ok(_) => panic!("expected ExAppNotFound"),
        }
        assert_eq!(dispatch.total_calls(), 0);
    }

    #[test]
    fn ghost_scenario() {
        let gateway = gateway_with(Arc::default());
        let ghost = AppId::new("ghost");

        let payload = gateway
            .dispatch_sync(&ghost, DispatchRequest::new("/r"))
            .unwrap_err();
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({"error": "ExApp `ghost` not found"})
        );

        let err = gateway
            .dispatch_async(&ghost, DispatchRequest::new("/r"))
            .err()
            .unwrap();
        assert!(err.to_string().contains("ghost"));
    }

    #[test]
    fn dispatch_sync_passes_request_through_unchanged() {
        let dispatch = Arc::new(RecordingDispatch::default());
        let gateway = gateway_with(dispatch.clone());

        let resp = gateway
            .dispatch_sync(&AppId::new("weather"), full_request())
            .unwrap();
        assert_eq!(resp.text(), "sync");

        let calls = dispatch.sync_calls.lock();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, weather());
        assert_eq!(calls[0].1, full_request());
        assert!(dispatch.async_calls.lock().is_empty());
    }

    #[test]
    fn dispatch_sync_returns_dispatch_error_verbatim() {
        let dispatch = Arc::new(RecordingDispatch {
            sync_reply: Some(Err(ErrorPayload::new("transport error: refused"))),
            ..Default::default()
        });
        let gateway = gateway_with(dispatch);

        let err = gateway
            .dispatch_sync(&AppId::new("weather"), DispatchRequest::new("/r"))
            .unwrap_err();
        assert_eq!(err, ErrorPayload::new("transport error: refused"));
    }

    #[test]
    fn dispatch_sync_returns_response_verbatim() {
        let canned = ExAppResponse::new(StatusCode::IM_A_TEAPOT, "short and stout")
            .with_header(http::header::ETAG, HeaderValue::from_static("\"v1\""));
        let dispatch = Arc::new(RecordingDispatch {
            sync_reply: Some(Ok(canned.clone())),
            ..Default::default()
        });
        let gateway = gateway_with(dispatch);

        let resp = gateway
            .dispatch_sync(&AppId::new("weather"), DispatchRequest::new("/r"))
            .unwrap();
        assert_eq!(resp, canned);
    }

    #[tokio::test]
    async fn dispatch_async_passes_request_through_unchanged() {
        let dispatch = Arc::new(RecordingDispatch::default());
        let gateway = gateway_with(dispatch.clone());

        let pending = gateway
            .dispatch_async(&AppId::new("weather"), full_request())
            .unwrap();

        {
            let calls = dispatch.async_calls.lock();
            assert_eq!(calls.len(), 1);
            assert_eq!(calls[0].0, weather());
            assert_eq!(calls[0].1, full_request());
        }
        assert!(dispatch.sync_calls.lock().is_empty());

        let resp = pending.await.unwrap();
        assert_eq!(resp.text(), "async");
    }

    #[tokio::test]
    async fn dispatch_async_rejection_belongs_to_handle() {
        let dispatch = Arc::new(RecordingDispatch {
            async_reply: Some(Err(DispatchError::Transport("reset".into()))),
            ..Default::default()
        });
        let gateway = gateway_with(dispatch);

        let pending = gateway
            .dispatch_async(&AppId::new("weather"), DispatchRequest::new("/r"))
            .expect("lookup succeeds, so a handle is returned");
        let err = pending.await.unwrap_err();
        assert_eq!(err, DispatchError::Transport("reset".into()));
    }

    #[test]
    fn default_arguments_match_explicit_ones() {
        let dispatch = Arc::new(RecordingDispatch::default());
        let gateway = gateway_with(dispatch.clone());
        let app = AppId::new("weather");

        gateway
            .dispatch_sync(&app, DispatchRequest::new("/route"))
            .unwrap();
        gateway
            .dispatch_sync(
                &app,
                DispatchRequest::new("/route")
                    .with_method(Method::POST)
                    .with_params(Default::default())
                    .with_options(Default::default()),
            )
            .unwrap();

        let calls = dispatch.sync_calls.lock();
        assert_eq!(calls[0].1, calls[1].1);
        assert_eq!(calls[0].1.method, Method::POST);
        assert!(calls[0].1.user_id.is_none());
        assert!(calls[0].1.request.is_none());
    }

    #[test]
    fn get_exapp_info_projects_summary() {
        let dispatch = Arc::new(RecordingDispatch::default());
        let gateway = gateway_with(dispatch.clone());

        let summary = gateway.get_exapp_info(&AppId::new("weather")).unwrap();
        assert_eq!(
            serde_json::to_value(&summary).unwrap(),
            json!({"appId": "weather", "version": "1.0", "name": "Weather", "enabled": true})
        );
        assert_eq!(dispatch.total_calls(), 0);
    }

    #[test]
    fn get_exapp_info_missing_is_none() {
        let dispatch = Arc::new(RecordingDispatch::default());
        let gateway = gateway_with(dispatch.clone());

        assert!(gateway.get_exapp_info(&AppId::new("missing")).is_none());
        assert_eq!(dispatch.total_calls(), 0);
    }

    #[test]
    fn disabled_apps_are_still_dispatched() {
        let registry = InMemoryExAppRegistry::from_records([weather().with_enabled(false)]).unwrap();
        let dispatch = Arc::new(RecordingDispatch::default());
        let gateway = Gateway::new(Arc::new(registry), dispatch.clone());

        assert!(gateway
            .dispatch_sync(&AppId::new("weather"), DispatchRequest::new("/r"))
            .is_ok());
        assert_eq!(
            gateway.get_exapp_info(&AppId::new("weather")).map(|s| s.enabled),
            Some(false)
        );
    }

    #[test]
    fn concurrent_calls_do_not_interact() {
        let dispatch = Arc::new(RecordingDispatch::default());
        let gateway = gateway_with(dispatch.clone());

        std::thread::scope(|s| {
            for i in 0..8 {
                let gateway = gateway.clone();
                s.spawn(move || {
                    let app = if i % 2 == 0 { "weather" } else { "ghost" };
                    let result = gateway.dispatch_sync(&AppId::new(app), DispatchRequest::new("/r"));
                    assert_eq!(result.is_ok(), app == "weather");
                });
            }
        });

        assert_eq!(dispatch.sync_calls.lock().len(), 4);
    }
}
