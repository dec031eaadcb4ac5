//! App - アプリケーション層
//!
//! ports を組み合わせて Gateway を提供します。
//!
//! # 主要コンポーネント
//! - **Gateway**: ExApp の解決と DispatchService への委譲
//! - **GatewayBuilder**: Gateway の構築とワイヤリング（Fail-fast）

pub mod builder;
pub mod gateway;

pub use self::builder::{BuildError, GatewayBuilder};
pub use self::gateway::Gateway;
