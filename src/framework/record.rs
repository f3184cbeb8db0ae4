//! # Record & RecordKind
//!
//! A [`Record`] wraps one [`Document`] and knows how to load it from, and push
//! it back to, a [`FeedStore`]. What a record *is* (which collection, which
//! column identifies a row, which cells to push) comes from its [`RecordKind`].
//!
//! ## Lifecycle
//!
//! ```text
//!   load(store_id, identity?)
//!        │
//!        ├─ resolve collection id ─────────────── CollectionNotFound
//!        │
//!        ├─ identity field + value? ── find ──┬─ found ──► Hydrated
//!        │                                    └─ none  ──► Fresh
//!        └─ otherwise ───────────────────────────────────► Fresh
//!
//!   synchronize()  kind's field mapping ──► document
//!   persist()      is_new() ? create : update (edit link)
//! ```
//!
//! The state is decided at construction and only re-evaluated by
//! [`Record::refresh`]. [`Record::is_new`] on the other hand always reflects
//! the document: a fresh record that has been persisted is no longer new.
//!
//! Dropping a record never writes anything.

use crate::framework::document::Document;
use crate::framework::error::{FeedError, FeedResult};
use crate::framework::store::FeedStore;
use tracing::{debug, info, instrument};

/// Logical field name to cell value.
pub type FieldMapping = Vec<(String, String)>;

/// What a concrete record type declares about itself.
///
/// # Example
///
/// ```rust
/// use sheet_record::framework::{FieldMapping, RecordKind};
///
/// struct Signup {
///     email: String,
/// }
///
/// impl RecordKind for Signup {
///     fn collection_name(&self) -> &str {
///         "signups"
///     }
///
///     fn identity_field(&self) -> Option<&str> {
///         Some("email")
///     }
///
///     fn field_mapping(&self) -> FieldMapping {
///         vec![("email".into(), self.email.clone())]
///     }
/// }
/// ```
pub trait RecordKind {
    /// Human-readable name of the target collection. Matched case-insensitively.
    fn collection_name(&self) -> &str;

    /// Column used to find an existing row.
    ///
    /// `None` declares a push-only kind: no lookup, every persist creates.
    fn identity_field(&self) -> Option<&str>;

    /// Cells written by [`Record::synchronize`].
    fn field_mapping(&self) -> FieldMapping {
        Vec::new()
    }
}

/// How a record's document was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordState {
    /// Built locally; nothing matched remotely (or no lookup was made).
    Fresh,
    /// Loaded from an existing remote row.
    Hydrated,
}

/// One spreadsheet row mapped onto a feed document.
pub struct Record<K: RecordKind, S: FeedStore> {
    store: S,
    kind: K,
    store_id: String,
    collection_id: String,
    identity_value: Option<String>,
    document: Document,
    state: RecordState,
}

impl<K: RecordKind, S: FeedStore> Record<K, S> {
    /// Opens a fresh record. No identity lookup is made.
    pub fn new(store: S, store_id: &str, kind: K) -> FeedResult<Self> {
        Self::load(store, store_id, kind, None)
    }

    /// Opens the row whose identity field equals `identity_value`, or a fresh
    /// record when there is none.
    #[instrument(skip(store, kind))]
    pub fn load(
        store: S,
        store_id: &str,
        kind: K,
        identity_value: Option<&str>,
    ) -> FeedResult<Self> {
        if store_id.trim().is_empty() {
            return Err(FeedError::MissingStoreIdentifier);
        }

        let collection_id = store.resolve_collection_id(store_id, kind.collection_name())?;
        debug!(collection = kind.collection_name(), %collection_id, "Resolved collection");

        let mut record = Self {
            store,
            kind,
            store_id: store_id.to_string(),
            collection_id,
            identity_value: identity_value.map(str::to_string),
            document: Document::fresh(),
            state: RecordState::Fresh,
        };
        record.initialize_document()?;
        Ok(record)
    }

    fn initialize_document(&mut self) -> FeedResult<()> {
        let found = match (self.kind.identity_field(), self.identity_value.as_deref()) {
            (Some(field), Some(value)) => self.store.find_document(
                &self.store_id,
                &self.collection_id,
                field,
                &value.to_ascii_lowercase(),
            )?,
            _ => None,
        };

        match found {
            Some(mut document) => {
                document.adopt_server_namespaces();
                self.document = document;
                self.state = RecordState::Hydrated;
            }
            None => {
                self.document = Document::fresh();
                self.state = RecordState::Fresh;
            }
        }
        debug!(state = ?self.state, "Document initialized");
        Ok(())
    }

    /// Re-fetches the row with the identity value given at construction,
    /// discarding local changes.
    #[instrument(skip(self), fields(collection = %self.collection_id))]
    pub fn refresh(&mut self) -> FeedResult<()> {
        self.initialize_document()
    }

    /// True while the document carries no server-assigned `id`.
    pub fn is_new(&self) -> bool {
        !self.document.has_identity()
    }

    pub fn state(&self) -> RecordState {
        self.state
    }

    pub fn get_field(&self, name: &str) -> Option<&str> {
        self.document.read(name)
    }

    pub fn set_field(&mut self, name: &str, value: impl Into<String>) {
        self.document.write(name, value);
    }

    /// Name-based accessor.
    ///
    /// `"field="` with exactly one argument writes the field and yields `None`.
    /// A bare `"field"` with no arguments yields its text, empty if unset.
    /// Anything else is an [`FeedError::UnsupportedOperation`].
    pub fn dispatch(&mut self, name: &str, args: &[&str]) -> FeedResult<Option<String>> {
        match (name.strip_suffix('='), args) {
            (Some(field), [value]) if !field.is_empty() => {
                self.set_field(field, *value);
                Ok(None)
            }
            (None, []) if !name.is_empty() => {
                Ok(Some(self.get_field(name).unwrap_or_default().to_string()))
            }
            _ => Err(FeedError::UnsupportedOperation(format!(
                "`{name}` with {} argument(s)",
                args.len()
            ))),
        }
    }

    /// Copies the kind's field mapping into the document.
    pub fn synchronize(&mut self) {
        for (field, value) in self.kind.field_mapping() {
            self.document.write(&field, value);
        }
    }

    /// Creates the row when new, otherwise updates it through its edit link.
    #[instrument(skip(self), fields(collection = %self.collection_id))]
    pub fn persist(&mut self) -> FeedResult<()> {
        let mut response = if self.is_new() {
            debug!("Creating row");
            self.store
                .create_document(&self.store_id, &self.collection_id, &self.document)?
        } else {
            debug!(edit_link = ?self.document.edit_link(), "Updating row");
            self.store.update_document(&self.store_id, &self.document)?
        };
        response.adopt_server_namespaces();
        self.document.adopt_identity(&response);
        info!(identity = ?self.document.identity(), "Persisted");
        Ok(())
    }

    /// [`synchronize`](Self::synchronize) then [`persist`](Self::persist).
    /// Fields written by the first step stay in place if the second fails.
    pub fn synchronize_and_persist(&mut self) -> FeedResult<()> {
        self.synchronize();
        self.persist()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.document.fields()
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn kind(&self) -> &K {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut K {
        &mut self.kind
    }

    pub fn store_id(&self) -> &str {
        &self.store_id
    }

    pub fn collection_id(&self) -> &str {
        &self.collection_id
    }

    pub fn identity_value(&self) -> Option<&str> {
        self.identity_value.as_deref()
    }
}
