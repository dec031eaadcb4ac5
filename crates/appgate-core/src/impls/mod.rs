//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **InMemoryExAppRegistry**: 開発用・テスト用の Registry
//! - **HttpDispatchService**: 認証ヘッダーを付けて Transport に渡す DispatchService
//! - **AuthHeaders**: 認証ヘッダーの組み立て
//! - **LoopbackTransport**: ネットワークなしでエコーを返す Transport

pub mod auth;
pub mod http_dispatch;
pub mod inmem_registry;
pub mod loopback;

pub use self::auth::AuthHeaders;
pub use self::http_dispatch::HttpDispatchService;
pub use self::inmem_registry::InMemoryExAppRegistry;
pub use self::loopback::LoopbackTransport;
