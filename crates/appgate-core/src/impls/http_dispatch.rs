//! HttpDispatchService - Transport の上に載る DispatchService 実装
//!
//! # 実装
//! 1. ExApp から URL を組み立てる（`{protocol}://{host}:{port}/{route}`）
//! 2. params を GET/HEAD ならクエリ、それ以外は JSON body にする
//! 3. options の `headers` を入れてから認証ヘッダーで上書きする
//! 4. options の `timeout`（秒）を OutboundRequest に載せる
//! 5. Transport に渡す

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use tracing::{debug, warn};

use super::auth::AuthHeaders;
use crate::domain::{
    DispatchError, DispatchRequest, ErrorPayload, ExApp, ExAppResponse, Params, RequestOptions,
};
use crate::ports::{DispatchService, OutboundRequest, PendingResponse, Transport};

/// Characters left unescaped in query components (RFC 3986 unreserved).
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

pub struct HttpDispatchService {
    transport: Arc<dyn Transport>,
    auth: AuthHeaders,
}

impl HttpDispatchService {
    pub fn new(transport: Arc<dyn Transport>, auth: AuthHeaders) -> Self {
        Self { transport, auth }
    }

    /// Turn a dispatch request into the request the transport sends.
    pub fn build_outbound(
        &self,
        exapp: &ExApp,
        request: &DispatchRequest,
    ) -> Result<OutboundRequest, DispatchError> {
        let mut url = format!(
            "{}/{}",
            exapp.base_url(),
            request.route.trim_start_matches('/')
        );

        let mut headers = option_headers(&request.options)?;
        let auth = self.auth.build(
            exapp,
            request.user_id.as_deref(),
            request.request.as_ref(),
        )?;
        for (name, value) in auth.iter() {
            headers.insert(name.clone(), value.clone());
        }

        let mut body = None;
        if sends_query(&request.method) {
            if !request.params.is_empty() {
                url.push(if url.contains('?') { '&' } else { '?' });
                url.push_str(&encode_query(&request.params));
            }
        } else if !request.params.is_empty() {
            let json = serde_json::to_vec(&request.params)
                .map_err(|e| DispatchError::InvalidRequest(format!("json encode: {e}")))?;
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            body = Some(Bytes::from(json));
        }

        Ok(OutboundRequest {
            method: request.method.clone(),
            url,
            headers,
            body,
            timeout: option_timeout(&request.options)?,
        })
    }
}

impl DispatchService for HttpDispatchService {
    /// Blocks the calling thread on the transport. Do not call from inside
    /// an async task on a single-threaded runtime.
    fn forward_sync(
        &self,
        exapp: &ExApp,
        request: DispatchRequest,
    ) -> Result<ExAppResponse, ErrorPayload> {
        let outbound = self.build_outbound(exapp, &request)?;
        debug!(app_id = %exapp.app_id, method = %outbound.method, url = %outbound.url, "forwarding (sync)");

        futures::executor::block_on(self.transport.send(outbound)).map_err(|e| {
            warn!(app_id = %exapp.app_id, kind = ?e.kind(), error = %e, "dispatch failed");
            ErrorPayload::from(e)
        })
    }

    fn forward_async(&self, exapp: &ExApp, request: DispatchRequest) -> PendingResponse {
        let outbound = self.build_outbound(exapp, &request);
        let transport = Arc::clone(&self.transport);
        let app_id = exapp.app_id.clone();

        Box::pin(async move {
            let result = match outbound {
                Ok(outbound) => {
                    debug!(app_id = %app_id, method = %outbound.method, url = %outbound.url, "forwarding (async)");
                    transport.send(outbound).await
                }
                Err(e) => Err(e),
            };
            result.inspect_err(|e| {
                warn!(app_id = %app_id, kind = ?e.kind(), error = %e, "dispatch failed");
            })
        })
    }
}

fn sends_query(method: &Method) -> bool {
    *method == Method::GET || *method == Method::HEAD
}

fn encode_query(params: &Params) -> String {
    params
        .iter()
        .map(|(key, value)| {
            let value = match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            format!(
                "{}={}",
                utf8_percent_encode(key, QUERY_COMPONENT),
                utf8_percent_encode(&value, QUERY_COMPONENT)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

fn option_headers(options: &RequestOptions) -> Result<HeaderMap, DispatchError> {
    let mut headers = HeaderMap::new();
    let Some(raw) = options.get("headers") else {
        return Ok(headers);
    };
    let Some(map) = raw.as_object() else {
        return Err(DispatchError::InvalidRequest(
            "options.headers must be an object".to_string(),
        ));
    };
    for (name, value) in map {
        let Some(value) = value.as_str() else {
            return Err(DispatchError::InvalidRequest(format!(
                "options.headers.{name} must be a string"
            )));
        };
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| DispatchError::InvalidRequest(format!("header name {name}: {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| DispatchError::InvalidRequest(format!("header {name}: {e}")))?;
        headers.insert(name, value);
    }
    Ok(headers)
}

fn option_timeout(options: &RequestOptions) -> Result<Option<Duration>, DispatchError> {
    match options.get("timeout") {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(value) => match value.as_f64() {
            Some(secs) if secs > 0.0 => Duration::try_from_secs_f64(secs)
                .map(Some)
                .map_err(|e| {
                    DispatchError::InvalidRequest(format!("options.timeout {value}: {e}"))
                }),
            _ => Err(DispatchError::InvalidRequest(format!(
                "options.timeout must be a positive number of seconds, got {value}"
            ))),
        },
    }
}
