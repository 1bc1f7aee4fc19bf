//! # KG Explorer
//!
//! Client library and command-line front end for the quality knowledge-graph
//! backend: document upload and extraction, entity/relation browsing, graph
//! data, dictionary and system management, plus guided flow and cause path
//! queries with a persistent query history.
//!
//! ## Architecture
//!
//! ```text
//! CLI / views → Explorer → KgApi ─┬→ HttpTransport → backend (HTTP)
//!                  ↓              └→ MockProvider (offline fixtures)
//!              QueryStore → Storage (SQLite)
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use kg_explorer::{Config, Explorer, KgApi, QueryStore};
//! use kg_explorer::storage::{SqliteStorage, Storage};
//! use kg_explorer::transport::NotificationQueue;
//! use kg_explorer::api::FlowQueryParams;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let storage: Arc<dyn Storage> = Arc::new(SqliteStorage::new(&config.storage).await?);
//!     let notifications = Arc::new(NotificationQueue::new());
//!     let api = KgApi::from_config(&config, notifications.clone(), storage.clone())?;
//!     let store = Arc::new(QueryStore::load(storage).await);
//!     let explorer = Explorer::new(api, store);
//!     let items = explorer.search_flow(FlowQueryParams::new("X1", "camera")).await?;
//!     println!("{} items", items.len());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

/// Backend API facade and request/response types.
pub mod api;
/// Command-line interface definitions and execution.
pub mod cli;
/// Configuration management.
pub mod config;
/// Error types and result aliases for the application.
pub mod error;
/// Guided query runner on top of the API and the store.
pub mod explorer;
/// Offline mock backend.
pub mod mock;
/// Page routes and document titles.
pub mod router;
/// Durable key/value storage.
pub mod storage;
/// Query history and result state.
pub mod store;
/// HTTP transport, response envelope, and user notifications.
pub mod transport;

pub use api::KgApi;
pub use config::Config;
pub use error::{AppError, AppResult};
pub use explorer::Explorer;
pub use store::QueryStore;
