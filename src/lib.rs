//! # sheet-record
//!
//! > **Spreadsheet rows as records, synchronized over Atom list feeds.**
//!
//! A record declares which worksheet it lives in, which column identifies it,
//! and which cells it pushes. The crate takes care of the rest: finding the
//! worksheet, fetching an existing row, mapping named fields onto `gsx:` cells
//! of an Atom `entry`, and deciding whether a push is a create or an update.
//!
//! ## 🏗️ Design
//!
//! ### The document decides
//! A record is *new* exactly when its document carries no server-assigned
//! `id`. There is no separate flag to drift out of sync: after a successful
//! create the server id is adopted and the next persist becomes an update
//! through the row's edit link.
//!
//! ### Generics: `Record<K, S>`
//! `K: RecordKind` says *what* a row is, `S: FeedStore` says *where* it lives.
//! The lifecycle (load, synchronize, persist) is written once and works for
//! every kind against every store.
//!
//! ### Blocking by design
//! Every store call blocks the calling thread and is tried exactly once.
//! Errors surface to the caller as [`FeedError`](framework::FeedError).
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Core ([`framework`])
//! - **Key items**: [`Document`](framework::Document),
//!   [`RecordKind`](framework::RecordKind), [`Record`](framework::Record),
//!   [`FeedStore`](framework::FeedStore).
//! - **Testing**: [`MockStore`](framework::mock::MockStore) scripts store
//!   responses and records every call.
//!
//! ### 2. The Stores ([`clients`])
//! - [`FeedClient`](clients::FeedClient) talks to the worksheet and list feeds
//!   through a pluggable [`Transport`](clients::Transport).
//! - [`MemoryStore`](clients::MemoryStore) keeps rows in memory with versioned
//!   edit links.
//!
//! ### 3. The Row Types ([`domain`])
//! [`SyncLog`](domain::SyncLog) (push-only) and [`OrderRow`](domain::OrderRow)
//! (identified by `id`).
//!
//! ### 4. Configuration & Logging ([`runtime`])
//! [`FeedConfig`](runtime::FeedConfig) from YAML and
//! [`setup_tracing`](runtime::setup_tracing) for binaries.
//!
//! ## 🚀 Quick Start
//!
//! ```rust
//! use sheet_record::clients::MemoryStore;
//! use sheet_record::domain::OrderRow;
//! use sheet_record::framework::Record;
//!
//! let store = MemoryStore::new().with_collection("key", "od6", "Orders");
//!
//! let mut order = Record::load(&store, "key", OrderRow::new("7", "new", "9.50"), Some("7")).unwrap();
//! assert!(order.is_new());
//! order.synchronize_and_persist().unwrap();
//! assert!(!order.is_new());
//! ```
//!
//! ### Running the Demo
//!
//! ```bash
//! RUST_LOG=info cargo run
//! ```

pub mod clients;
pub mod domain;
pub mod framework;
pub mod runtime;
