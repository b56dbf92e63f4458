pub mod candidate;
pub mod search;
pub mod user;
