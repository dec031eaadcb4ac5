//! LoopbackTransport - 送らずにエコーを返す Transport
//!
//! ネットワークなしで dispatch の経路全体を動かすためのものです（CLI, テスト）。
//! 受け取った OutboundRequest を JSON にして `200 OK` で返します。

use std::collections::BTreeMap;

use async_trait::async_trait;
use http::HeaderValue;
use http::header::CONTENT_TYPE;
use serde::Serialize;

use crate::domain::{DispatchError, ExAppResponse};
use crate::ports::{OutboundRequest, Transport};

#[derive(Debug, Clone, Copy, Default)]
pub struct LoopbackTransport;

impl LoopbackTransport {
    pub fn new() -> Self {
        Self
    }
}

/// Body of a loopback response.
#[derive(Debug, Serialize)]
struct Echo<'a> {
    method: &'a str,
    url: &'a str,
    headers: BTreeMap<&'a str, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    timeout_ms: Option<u128>,
    body: serde_json::Value,
}

#[async_trait]
impl Transport for LoopbackTransport {
    async fn send(&self, request: OutboundRequest) -> Result<ExAppResponse, DispatchError> {
        let headers = request
            .headers
            .iter()
            .map(|(name, value)| (name.as_str(), String::from_utf8_lossy(value.as_bytes()).into_owned()))
            .collect();

        let body = match &request.body {
            None => serde_json::Value::Null,
            Some(raw) => serde_json::from_slice(raw)
                .unwrap_or_else(|_| serde_json::Value::String(String::from_utf8_lossy(raw).into_owned())),
        };

        let echo = Echo {
            method: request.method.as_str(),
            url: &request.url,
            headers,
            timeout_ms: request.timeout.map(|t| t.as_millis()),
            body,
        };
        let json = serde_json::to_vec(&echo)
            .map_err(|e| DispatchError::Transport(format!("loopback encode: {e}")))?;

        Ok(ExAppResponse::ok(json)
            .with_header(CONTENT_TYPE, HeaderValue::from_static("application/json")))
    }
}
