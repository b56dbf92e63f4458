use serde::Deserialize;

/// Id reserved for the synthetic "no results" row.
pub const NO_RESULTS_ID: i64 = -1;
pub const NO_RESULTS_LABEL: &str = "No results found";

/// Minimal shape a record needs to be offered as a suggestion.
///
/// Only `id` and `name` are read by matching and selection; richer records
/// keep the rest of their fields and hand them back through selection events.
pub trait Candidate: Clone + Send + Sync + 'static {
    fn id(&self) -> i64;
    fn name(&self) -> &str;
}

pub fn is_sentinel_id(id: i64) -> bool {
    id == NO_RESULTS_ID
}

/// Bare `{ id, name }` record.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Record {
    pub id: i64,
    pub name: String,
}

impl Record {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl Candidate for Record {
    fn id(&self) -> i64 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}
