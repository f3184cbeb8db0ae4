//! # Mock Store & Testing Guide
//!
//! [`MockStore`] implements [`FeedStore`] entirely in memory with queued
//! expectations. It lets you test record logic against exact call sequences
//! ("exactly one create, no lookup") without a server.
//!
//! ## When to use the Mock vs the MemoryStore
//!
//! | Feature | MockStore | MemoryStore |
//! |---------|-----------|-------------|
//! | **State** | None (scripted responses) | Real rows with ids and edit links |
//! | **Call log** | Every call recorded | No |
//! | **Error Injection** | Easy (`return_err`) | Only `CollectionNotFound` |
//! | **Use Case** | Asserting the protocol | Round trips, demos |
//!
//! ## Example
//!
//! ```rust
//! use sheet_record::framework::mock::{MockStore, StoreCall};
//! use sheet_record::framework::{Document, Record, RecordKind};
//!
//! struct Note;
//! impl RecordKind for Note {
//!     fn collection_name(&self) -> &str { "notes" }
//!     fn identity_field(&self) -> Option<&str> { None }
//! }
//!
//! let mock = MockStore::new();
//! mock.expect_resolve("notes").return_ok("od6");
//! mock.expect_create().return_ok(Document::fresh());
//!
//! let mut record = Record::new(&mock, "spreadsheet-key", Note).unwrap();
//! record.set_field("text", "hello");
//! record.persist().unwrap();
//!
//! assert!(matches!(mock.calls()[1], StoreCall::Create { .. }));
//! mock.verify();
//! ```
//!
//! A call with no matching expectation panics, as does [`MockStore::verify`]
//! when expectations are left over.

use crate::framework::document::{Document, Element, ATOM_NS};
use crate::framework::error::FeedResult;
use crate::framework::store::FeedStore;
use crate::framework::FeedError;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A call received by the mock, in order of arrival.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    Resolve {
        store_id: String,
        collection_name: String,
    },
    Find {
        store_id: String,
        collection_id: String,
        identity_field: String,
        identity_value: String,
    },
    Create {
        store_id: String,
        collection_id: String,
        document: Document,
    },
    Update {
        store_id: String,
        edit_link: Option<String>,
        document: Document,
    },
}

enum Expectation {
    Resolve {
        collection_name: String,
        response: FeedResult<String>,
    },
    Find {
        identity_field: String,
        identity_value: String,
        response: FeedResult<Option<Document>>,
    },
    Create {
        response: FeedResult<Document>,
    },
    Update {
        response: FeedResult<Document>,
    },
}

type Expectations = Arc<Mutex<VecDeque<Expectation>>>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A scripted [`FeedStore`] that records every call.
#[derive(Default)]
pub struct MockStore {
    expectations: Expectations,
    calls: Arc<Mutex<Vec<StoreCall>>>,
}

impl MockStore {
    /// Creates a mock with no expectations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Expects a collection lookup by `collection_name`.
    pub fn expect_resolve(&self, collection_name: &str) -> ResolveExpectationBuilder {
        ResolveExpectationBuilder {
            collection_name: collection_name.to_string(),
            expectations: self.expectations.clone(),
        }
    }

    /// Expects a lookup of `identity_value` in the `identity_field` column.
    pub fn expect_find(&self, identity_field: &str, identity_value: &str) -> FindExpectationBuilder {
        FindExpectationBuilder {
            identity_field: identity_field.to_string(),
            identity_value: identity_value.to_string(),
            expectations: self.expectations.clone(),
        }
    }

    /// Expects a `create_document` call.
    pub fn expect_create(&self) -> DocumentExpectationBuilder {
        DocumentExpectationBuilder {
            update: false,
            expectations: self.expectations.clone(),
        }
    }

    /// Expects an `update_document` call.
    pub fn expect_update(&self) -> DocumentExpectationBuilder {
        DocumentExpectationBuilder {
            update: true,
            expectations: self.expectations.clone(),
        }
    }

    /// Every call received so far.
    pub fn calls(&self) -> Vec<StoreCall> {
        lock(&self.calls).clone()
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let remaining = lock(&self.expectations).len();
        if remaining > 0 {
            panic!("Not all expectations were met. {} remaining", remaining);
        }
    }

    fn next(&self, call: StoreCall) -> Expectation {
        let description = format!("{call:?}");
        lock(&self.calls).push(call);
        lock(&self.expectations)
            .pop_front()
            .unwrap_or_else(|| panic!("Unexpected call: {description}"))
    }
}

impl FeedStore for MockStore {
    fn resolve_collection_id(&self, store_id: &str, collection_name: &str) -> FeedResult<String> {
        let call = StoreCall::Resolve {
            store_id: store_id.to_string(),
            collection_name: collection_name.to_string(),
        };
        match self.next(call) {
            Expectation::Resolve {
                collection_name: expected,
                response,
            } => {
                assert_eq!(expected, collection_name, "resolved collection name");
                response
            }
            _ => panic!("Unexpected request or expectation mismatch: resolve {collection_name}"),
        }
    }

    fn find_document(
        &self,
        store_id: &str,
        collection_id: &str,
        identity_field: &str,
        identity_value: &str,
    ) -> FeedResult<Option<Document>> {
        let call = StoreCall::Find {
            store_id: store_id.to_string(),
            collection_id: collection_id.to_string(),
            identity_field: identity_field.to_string(),
            identity_value: identity_value.to_string(),
        };
        match self.next(call) {
            Expectation::Find {
                identity_field: expected_field,
                identity_value: expected,
                response,
            } => {
                assert_eq!(expected_field, identity_field, "identity field");
                assert_eq!(expected, identity_value, "identity value");
                response
            }
            _ => panic!("Unexpected request or expectation mismatch: find {identity_value}"),
        }
    }

    fn create_document(
        &self,
        store_id: &str,
        collection_id: &str,
        document: &Document,
    ) -> FeedResult<Document> {
        let call = StoreCall::Create {
            store_id: store_id.to_string(),
            collection_id: collection_id.to_string(),
            document: document.clone(),
        };
        match self.next(call) {
            Expectation::Create { response } => response,
            _ => panic!("Unexpected request or expectation mismatch: create"),
        }
    }

    fn update_document(&self, store_id: &str, document: &Document) -> FeedResult<Document> {
        let call = StoreCall::Update {
            store_id: store_id.to_string(),
            edit_link: document.edit_link().map(str::to_string),
            document: document.clone(),
        };
        match self.next(call) {
            Expectation::Update { response } => response,
            _ => panic!("Unexpected request or expectation mismatch: update"),
        }
    }
}

/// Builder for `resolve` expectations.
pub struct ResolveExpectationBuilder {
    collection_name: String,
    expectations: Expectations,
}

impl ResolveExpectationBuilder {
    /// Sets the expectation to return a collection id.
    pub fn return_ok(self, collection_id: &str) {
        lock(&self.expectations).push_back(Expectation::Resolve {
            collection_name: self.collection_name,
            response: Ok(collection_id.to_string()),
        });
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: FeedError) {
        lock(&self.expectations).push_back(Expectation::Resolve {
            collection_name: self.collection_name,
            response: Err(error),
        });
    }
}

/// Builder for `find` expectations.
pub struct FindExpectationBuilder {
    identity_field: String,
    identity_value: String,
    expectations: Expectations,
}

impl FindExpectationBuilder {
    /// Sets the expectation to return a match (or none).
    pub fn return_ok(self, document: Option<Document>) {
        lock(&self.expectations).push_back(Expectation::Find {
            identity_field: self.identity_field,
            identity_value: self.identity_value,
            response: Ok(document),
        });
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: FeedError) {
        lock(&self.expectations).push_back(Expectation::Find {
            identity_field: self.identity_field,
            identity_value: self.identity_value,
            response: Err(error),
        });
    }
}

/// Builder for `create` and `update` expectations.
pub struct DocumentExpectationBuilder {
    update: bool,
    expectations: Expectations,
}

impl DocumentExpectationBuilder {
    /// Sets the expectation to return the server's copy of the document.
    pub fn return_ok(self, document: Document) {
        self.push(Ok(document));
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: FeedError) {
        self.push(Err(error));
    }

    fn push(self, response: FeedResult<Document>) {
        let expectation = if self.update {
            Expectation::Update { response }
        } else {
            Expectation::Create { response }
        };
        lock(&self.expectations).push_back(expectation);
    }
}

/// Builds an entry the way the server returns it: identity, edit link, cells.
pub fn server_document(identity: &str, edit_link: &str, fields: &[(&str, &str)]) -> Document {
    let mut document = Document::from_element(Element::new(None, "entry", Some(ATOM_NS)));
    document.set_identity(identity);
    document.set_edit_link(edit_link);
    for (field, value) in fields {
        document.write(field, *value);
    }
    document
}
