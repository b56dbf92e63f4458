pub mod autocomplete;
pub mod components;
pub mod inputs;
pub mod traits;
