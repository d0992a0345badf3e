//! # trolley-session: Cart Engine and Session Facade
//!
//! Binds the pure decisions in `trolley-core` to inventory queries, the
//! snapshot store and the notification sink.
//!
//! ## Module Organization
//! ```text
//! trolley_session
//! ├── session  - CartSession + builder (hydration, public API)
//! ├── engine   - CartEngine (operation gate, commits, rejections)
//! ├── writer   - ordered background snapshot writer
//! └── notify   - NotificationSink + TracingSink / ChannelSink / RecordingSink
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! use std::sync::Arc;
//! use trolley_session::{CartSession, UpdateProductAmount};
//!
//! let session = CartSession::builder(Arc::new(client))
//!     .store(Arc::new(db.kv()))
//!     .open()
//!     .await;
//!
//! session.add_product(ProductId::new(1)).await?;
//! session
//!     .update_product_amount(UpdateProductAmount::new(ProductId::new(1), 3))
//!     .await?;
//! ```

pub mod engine;
pub mod notify;
pub mod session;
mod writer;

pub use engine::{CartEngine, UpdateProductAmount};
pub use notify::{ChannelSink, NotificationSink, RecordingSink, TracingSink};
pub use session::{CartSession, CartSessionBuilder};
