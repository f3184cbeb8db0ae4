//! # FeedStore Trait
//!
//! The contract between a [`Record`](crate::framework::Record) and whatever
//! talks to the remote tabular service. The record only ever needs these four
//! calls; how they reach the server (HTTP, an in-memory table, a test double)
//! is the implementor's business.
//!
//! Every call blocks until the remote side answers. Failures come back as
//! [`FeedError::Transport`](crate::framework::FeedError::Transport) carrying the
//! underlying message; retrying is left to the implementor.

use crate::framework::document::Document;
use crate::framework::error::FeedResult;
use std::sync::Arc;

/// Remote store operations used by the record lifecycle.
pub trait FeedStore {
    /// Resolves a human-readable collection name to its id.
    ///
    /// Names match case-insensitively. Fails with `CollectionNotFound`.
    fn resolve_collection_id(&self, store_id: &str, collection_name: &str) -> FeedResult<String>;

    /// Finds the first document whose `identity_field` equals `identity_value`.
    fn find_document(
        &self,
        store_id: &str,
        collection_id: &str,
        identity_field: &str,
        identity_value: &str,
    ) -> FeedResult<Option<Document>>;

    /// Creates `document` in the collection and returns the server's copy,
    /// including the assigned `id` and edit link.
    fn create_document(
        &self,
        store_id: &str,
        collection_id: &str,
        document: &Document,
    ) -> FeedResult<Document>;

    /// Sends `document` to its edit link and returns the updated copy.
    fn update_document(&self, store_id: &str, document: &Document) -> FeedResult<Document>;
}

macro_rules! forward_feed_store {
    ($($wrapper:ty),*) => {
        $(
            impl<S: FeedStore + ?Sized> FeedStore for $wrapper {
                fn resolve_collection_id(&self, store_id: &str, collection_name: &str) -> FeedResult<String> {
                    (**self).resolve_collection_id(store_id, collection_name)
                }

                fn find_document(
                    &self,
                    store_id: &str,
                    collection_id: &str,
                    identity_field: &str,
                    identity_value: &str,
                ) -> FeedResult<Option<Document>> {
                    (**self).find_document(store_id, collection_id, identity_field, identity_value)
                }

                fn create_document(
                    &self,
                    store_id: &str,
                    collection_id: &str,
                    document: &Document,
                ) -> FeedResult<Document> {
                    (**self).create_document(store_id, collection_id, document)
                }

                fn update_document(&self, store_id: &str, document: &Document) -> FeedResult<Document> {
                    (**self).update_document(store_id, document)
                }
            }
        )*
    };
}

forward_feed_store!(&S, Box<S>, Arc<S>);
