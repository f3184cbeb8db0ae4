//! Concrete row types implementing [`RecordKind`](crate::framework::RecordKind).

pub mod order;
pub mod sync_log;

pub use order::*;
pub use sync_log::*;
