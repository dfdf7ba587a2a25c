use serde::{Serialize, Deserialize};

/// Snapshot of store and index sizes for monitoring
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseStats {
    // Storage
    pub record_count: usize,
    pub capacity: usize,

    // Order views
    pub views_len: usize,
    pub views_current: bool,

    // Grade index
    pub index_entries: usize,
    pub index_references: usize,
    pub index_current: bool,
}

impl DatabaseStats {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}
