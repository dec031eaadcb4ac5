//! AuthHeaders - ExApp への転送に載せる認証ヘッダー
//!
//! | header                  | value                                   |
//! |-------------------------|-----------------------------------------|
//! | `AA-VERSION`            | gateway version                         |
//! | `EX-APP-ID`             | ExApp の appId                          |
//! | `EX-APP-VERSION`        | ExApp の version                        |
//! | `AUTHORIZATION-APP-API` | base64(`{userId}:{secret}`)             |
//! | `AA-REQUEST-ID`         | inbound の request id、なければ新規 ULID |
//! | `X-Origin-IP`           | inbound の remote address（あれば）     |

use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use http::{HeaderMap, HeaderName, HeaderValue};

use crate::domain::{DispatchError, ExApp, RequestContext};
use crate::ports::RequestIdGenerator;

pub const AA_VERSION: HeaderName = HeaderName::from_static("aa-version");
pub const EX_APP_ID: HeaderName = HeaderName::from_static("ex-app-id");
pub const EX_APP_VERSION: HeaderName = HeaderName::from_static("ex-app-version");
pub const AUTHORIZATION_APP_API: HeaderName = HeaderName::from_static("authorization-app-api");
pub const AA_REQUEST_ID: HeaderName = HeaderName::from_static("aa-request-id");
pub const X_ORIGIN_IP: HeaderName = HeaderName::from_static("x-origin-ip");

pub struct AuthHeaders {
    aa_version: String,
    ids: Arc<dyn RequestIdGenerator>,
}

impl AuthHeaders {
    pub fn new(aa_version: impl Into<String>, ids: Arc<dyn RequestIdGenerator>) -> Self {
        Self {
            aa_version: aa_version.into(),
            ids,
        }
    }

    /// `AUTHORIZATION-APP-API` value. An app-level call uses an empty user.
    pub fn authorization(user_id: Option<&str>, secret: &str) -> String {
        STANDARD.encode(format!("{}:{}", user_id.unwrap_or_default(), secret))
    }

    pub fn build(
        &self,
        exapp: &ExApp,
        user_id: Option<&str>,
        context: Option<&RequestContext>,
    ) -> Result<HeaderMap, DispatchError> {
        let request_id = context
            .and_then(|c| c.request_id.clone())
            .unwrap_or_else(|| self.ids.generate_request_id().to_string());

        let mut headers = HeaderMap::new();
        headers.insert(AA_VERSION, header_value(&AA_VERSION, &self.aa_version)?);
        headers.insert(EX_APP_ID, header_value(&EX_APP_ID, exapp.app_id.as_str())?);
        headers.insert(EX_APP_VERSION, header_value(&EX_APP_VERSION, &exapp.version)?);
        headers.insert(
            AUTHORIZATION_APP_API,
            header_value(
                &AUTHORIZATION_APP_API,
                &Self::authorization(user_id, &exapp.secret),
            )?,
        );
        headers.insert(AA_REQUEST_ID, header_value(&AA_REQUEST_ID, &request_id)?);
        if let Some(addr) = context.and_then(|c| c.remote_addr.as_deref()) {
            headers.insert(X_ORIGIN_IP, header_value(&X_ORIGIN_IP, addr)?);
        }
        Ok(headers)
    }
}

fn header_value(name: &HeaderName, value: &str) -> Result<HeaderValue, DispatchError> {
    HeaderValue::from_str(value)
        .map_err(|e| DispatchError::InvalidRequest(format!("header {name}: {e}")))
}
