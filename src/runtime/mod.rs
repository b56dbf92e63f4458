pub mod command;
pub mod event;
pub mod key_bindings;
pub mod runner;
pub mod scheduler;

pub use runner::Runtime;
