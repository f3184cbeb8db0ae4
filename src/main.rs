//! # sheet-record demo
//!
//! Runs the record lifecycle against an in-memory store:
//! 1.  Appends a [`SyncLog`] line (push-only, one create).
//! 2.  Creates an [`OrderRow`].
//! 3.  Re-loads the order by its id and updates its status.
//!
//! ```bash
//! RUST_LOG=debug cargo run
//! ```

use sheet_record::clients::MemoryStore;
use sheet_record::domain::{OrderRow, SyncLog};
use sheet_record::framework::{FeedError, FeedResult, Record};
use sheet_record::runtime::setup_tracing;
use tracing::{error, info};

const SPREADSHEET: &str = "demo-spreadsheet";

fn main() -> Result<(), String> {
    setup_tracing();

    let store = MemoryStore::new()
        .with_collection(SPREADSHEET, "od6", "Sync Log")
        .with_collection(SPREADSHEET, "od7", "Orders");

    if let Err(e) = run(&store) {
        error!(error = %e, "Demo failed");
        return Err(e.to_string());
    }

    let rows = store.rows(SPREADSHEET, "od7").map_err(|e| e.to_string())?;
    for row in &rows {
        info!(fields = ?row.fields().collect::<Vec<_>>(), "Order row");
    }
    Ok(())
}

fn run(store: &MemoryStore) -> FeedResult<()> {
    let span = tracing::info_span!("sync_log");
    span.in_scope(|| {
        let mut log = Record::new(store, SPREADSHEET, SyncLog::new("demo started"))?;
        log.synchronize_and_persist()?;
        info!(identity = ?log.document().identity(), "Log line appended");
        Ok::<_, FeedError>(())
    })?;

    let span = tracing::info_span!("order_create");
    span.in_scope(|| {
        let order = OrderRow::new("A-100", "pending", "42.00");
        let mut record = Record::load(store, SPREADSHEET, order, Some("A-100"))?;
        info!(state = ?record.state(), "Order opened");
        record.synchronize_and_persist()
    })?;

    let span = tracing::info_span!("order_update");
    span.in_scope(|| {
        let order = OrderRow::new("A-100", "shipped", "42.00");
        let mut record = Record::load(store, SPREADSHEET, order, Some("A-100"))?;
        info!(state = ?record.state(), status = ?record.get_field("status"), "Order reloaded");
        record.synchronize_and_persist()?;
        info!(edit_link = ?record.document().edit_link(), "Order updated");
        Ok(())
    })
}
