//! Request model: what a caller asks the gateway to forward.
//!
//! A `DispatchRequest` is built per call and never persisted. The gateway
//! hands it to the dispatch service untouched; only the dispatch service
//! gives meaning to `params` and `options`.

use http::{HeaderMap, Method};

/// Request parameters / body data.
pub type Params = serde_json::Map<String, serde_json::Value>;

/// Transport options (headers, timeout, ...). Opaque to the gateway.
pub type RequestOptions = serde_json::Map<String, serde_json::Value>;

/// The inbound request a dispatch is made on behalf of.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestContext {
    pub request_id: Option<String>,
    pub remote_addr: Option<String>,
    pub headers: HeaderMap,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    pub fn with_remote_addr(mut self, remote_addr: impl Into<String>) -> Self {
        self.remote_addr = Some(remote_addr.into());
        self
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }
}

/// One request to forward to an ExApp.
///
/// `DispatchRequest::new(route)` carries the defaults: `POST`, no user,
/// empty params and options, no inbound request.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchRequest {
    pub route: String,
    pub user_id: Option<String>,
    pub method: Method,
    pub params: Params,
    pub options: RequestOptions,
    pub request: Option<RequestContext>,
}

impl DispatchRequest {
    pub fn new(route: impl Into<String>) -> Self {
        Self {
            route: route.into(),
            user_id: None,
            method: Method::POST,
            params: Params::new(),
            options: RequestOptions::new(),
            request: None,
        }
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn with_options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_request(mut self, request: RequestContext) -> Self {
        self.request = Some(request);
        self
    }
}
