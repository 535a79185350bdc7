//! Table module providing concurrent multi-table play with an async actor model.
//!
//! This module implements:
//! - TableActor: Async actor owning a single blackjack table
//! - SessionRegistry: Lookup and lazy creation of table actors
//! - Message-based communication with tokio channels
//! - Table event subscriptions
//!
//! ## Architecture
//!
//! Each table runs in a separate Tokio task with an mpsc message inbox.
//! Actions on one table are applied strictly one after another, card
//! fetches included; different tables make progress independently.
//!
//! ## Example
//!
//! ```
//! use blackjack_table::{
//!     ledger::InMemoryLedger,
//!     supplier::ShoeSupplier,
//!     table::{SessionRegistry, TableConfig},
//! };
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let registry = SessionRegistry::new(
//!     TableConfig::default(),
//!     Arc::new(ShoeSupplier::new(1)),
//!     Arc::new(InMemoryLedger::new(100)),
//! );
//!
//! let snapshot = registry.bet(1, 42, 10).await.unwrap();
//! assert_eq!(snapshot.turn_order, vec![42]);
//! # }
//! ```

pub mod actor;
pub mod config;
pub mod messages;
pub mod registry;

pub use actor::{TableActor, TableHandle};
pub use config::TableConfig;
pub use messages::{ActionReply, TableEvent, TableMessage};
pub use registry::{SessionRegistry, Subscription};
