//! appgate-core
//!
//! Request gateway for registered external applications (ExApps).
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, exapp, request, response, errors）
//! - **ports**: 抽象化レイヤー（ExAppRegistry, DispatchService, Transport, Clock, RequestIdGenerator）
//! - **impls**: ports の実装（InMemoryExAppRegistry, HttpDispatchService, LoopbackTransport）
//! - **app**: Gateway と GatewayBuilder
//! - **config**: 環境変数からの設定読み込み

pub mod app;
pub mod config;
pub mod domain;
pub mod impls;
pub mod ports;

pub use app::{Gateway, GatewayBuilder};
