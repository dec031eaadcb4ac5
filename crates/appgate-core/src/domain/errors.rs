//! Errors - エラー型と分類
//!
//! - `GatewayError`: Gateway 自身が所有するエラー（ExApp が見つからない）
//! - `DispatchError`: Dispatch Service / Transport が所有するエラー。
//!   Gateway はこれを包まず、そのまま呼び出し元へ渡します。

use std::time::Duration;

use thiserror::Error;

use super::ids::AppId;

/// ErrorKind は dispatch エラーの運用分類
///
/// - Transient: 一時的なエラー（リトライ推奨）
/// - Permanent: 恒久的なエラー（リトライ無意味）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transient,
    Permanent,
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("ExApp `{0}` not found")]
    ExAppNotFound(AppId),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),
}

impl DispatchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DispatchError::InvalidRequest(_) => ErrorKind::Permanent,
            DispatchError::Transport(_) | DispatchError::Timeout(_) => ErrorKind::Transient,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn not_found_message_names_the_app() {
        let err = GatewayError::ExAppNotFound(AppId::new("ghost"));
        assert_eq!(err.to_string(), "ExApp `ghost` not found");
    }

    #[rstest]
    #[case::invalid(DispatchError::InvalidRequest("bad header".into()), ErrorKind::Permanent)]
    #[case::transport(DispatchError::Transport("refused".into()), ErrorKind::Transient)]
    #[case::timeout(DispatchError::Timeout(Duration::from_secs(3)), ErrorKind::Transient)]
    fn dispatch_errors_are_classified(#[case] err: DispatchError, #[case] kind: ErrorKind) {
        assert_eq!(err.kind(), kind);
    }
}
