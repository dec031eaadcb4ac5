//! Ports - 抽象化レイヤー
//!
//! Gateway が依存する外部コラボレーターの trait を定義します。
//! 実装の詳細（保存先、HTTP クライアント）はここには現れません。
//!
//! - **ExAppRegistry**: appId → ExApp
//! - **DispatchService**: 同期 / 非同期の転送
//! - **Transport**: 1 件の HTTP 送信（DispatchService の下層）
//! - **Clock / RequestIdGenerator**: 時刻と相関 ID

pub mod clock;
pub mod dispatch;
pub mod id_generator;
pub mod registry;
pub mod transport;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::dispatch::{DispatchService, PendingResponse};
pub use self::id_generator::{RequestIdGenerator, UlidGenerator};
pub use self::registry::{ExAppRegistry, RegistryError};
pub use self::transport::{OutboundRequest, Transport};
