//! Runtime configuration and observability setup.
//!
//! - [`FeedConfig`] - Explicit settings value for the feed client
//! - [`setup_tracing`] - Initializes the tracing/logging infrastructure

pub mod config;
pub mod tracing;

pub use self::config::{FeedConfig, FeedKind};
pub use self::tracing::setup_tracing;
