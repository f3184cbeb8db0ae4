use crate::framework::{FieldMapping, RecordKind};

/// A row of the "orders" worksheet, identified by its `id` column.
///
/// Amounts are kept as the text shown in the sheet; the cell is written
/// verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRow {
    pub id: String,
    pub status: String,
    pub total: String,
}

impl OrderRow {
    pub fn new(id: impl Into<String>, status: impl Into<String>, total: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: status.into(),
            total: total.into(),
        }
    }
}

impl RecordKind for OrderRow {
    fn collection_name(&self) -> &str {
        "orders"
    }

    fn identity_field(&self) -> Option<&str> {
        Some("id")
    }

    fn field_mapping(&self) -> FieldMapping {
        vec![
            ("id".to_string(), self.id.clone()),
            ("status".to_string(), self.status.clone()),
            ("total".to_string(), self.total.clone()),
        ]
    }
}
