pub mod config;
pub mod core;
pub mod logging;
pub mod runtime;
pub mod store;
pub mod terminal;
pub mod ui;
pub mod widgets;

pub use crate::core::candidate::{Candidate, NO_RESULTS_ID, NO_RESULTS_LABEL, Record};
pub use crate::core::search::matcher::{FilterResult, MatchSpan, Suggestion, filter};
pub use crate::core::user::User;
pub use store::{CandidateStore, DataSource, FetchError, HttpDataSource, StaticDataSource};
pub use widgets::autocomplete::{
    Autocomplete, AutocompleteEvent, AutocompleteListener, InputController,
};

/// Bundled copy of the user directory, used when running offline.
pub const SAMPLE_USERS_JSON: &str = include_str!("../data/users.json");

pub fn sample_users() -> Result<Vec<User>, FetchError> {
    store::source::decode_candidates(SAMPLE_USERS_JSON)
}
