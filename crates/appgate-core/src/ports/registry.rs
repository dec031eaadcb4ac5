//! ExAppRegistry port - appId から ExApp を引く
//!
//! 登録・更新・削除は Registry 側の責務です。
//! Gateway は `lookup` しか使いません。

use crate::domain::{AppId, ExApp};

/// ExAppRegistry は appId を ExApp レコードに解決
///
/// # 契約
/// - 同期・副作用なし（in-process read）
/// - 戻り値は呼び出し時点のスナップショット（所有権ごと返す）
pub trait ExAppRegistry: Send + Sync {
    fn lookup(&self, app_id: &AppId) -> Option<ExApp>;
}

/// RegistryError は Registry の書き込み操作のエラー
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("ExApp `{0}` is already registered")]
    AlreadyRegistered(AppId),
}
