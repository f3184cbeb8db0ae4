//! # Observability & Tracing
//!
//! Store clients and the record lifecycle are instrumented with `tracing`
//! spans and structured fields. The library never installs a subscriber; the
//! binary calls [`setup_tracing`] once at startup.
//!
//! ## Usage Examples
//!
//! ```bash
//! # Compact logs (default)
//! RUST_LOG=info cargo run
//!
//! # Show request URLs and document state transitions
//! RUST_LOG=debug cargo run
//!
//! # Filter to the feed client only
//! RUST_LOG=sheet_record::clients=debug cargo run
//! ```
//!
//! **With `RUST_LOG=debug`**:
//!
//! ```text
//! DEBUG load: Resolved collection collection="orders" collection_id="od7"
//! DEBUG load: Document initialized state=Hydrated
//! DEBUG persist: Updating row edit_link=Some("memory://key/od7/1/1")
//!  INFO persist: Persisted identity=Some("memory://key/od7/1")
//! ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
