//! [`FeedStore`](crate::framework::FeedStore) implementations.

pub mod feed_client;
pub mod memory_store;
pub mod transport;

pub use feed_client::*;
pub use memory_store::*;
pub use transport::*;
