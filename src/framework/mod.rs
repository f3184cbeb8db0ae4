//! Generic record-to-feed mapping layer.
//!
//! This module provides the building blocks for mapping spreadsheet rows onto
//! feed documents and keeping them in sync with a remote store.
//!
//! # Main Components
//!
//! - [`Document`] - One feed entry as a namespaced element tree
//! - [`RecordKind`] - Trait that concrete row types implement
//! - [`Record`] - Generic row wrapper with load / synchronize / persist
//! - [`FeedStore`] - The remote store contract
//! - [`FeedError`] - Common error type
//!
//! # Testing
//!
//! See [`mock`] module for a scripted store that records every call.

pub mod document;
pub mod error;
pub mod mock;
pub mod record;
pub mod store;

pub use document::{Document, Element, ATOM_NS, EXTENDED_NS, METADATA_NS};
pub use error::{FeedError, FeedResult};
pub use record::{FieldMapping, Record, RecordKind, RecordState};
pub use store::FeedStore;
