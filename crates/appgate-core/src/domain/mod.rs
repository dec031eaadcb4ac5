//! Domain model (IDs, ExApp records, requests, responses, errors).

pub mod errors;
pub mod exapp;
pub mod ids;
pub mod request;
pub mod response;

pub use self::errors::{DispatchError, ErrorKind, GatewayError};
pub use self::exapp::{AppSummary, ExApp, Protocol};
pub use self::ids::{AppId, RequestId};
pub use self::request::{DispatchRequest, Params, RequestContext, RequestOptions};
pub use self::response::{ErrorPayload, ExAppResponse};
