//! Environment-driven configuration.

pub mod table;

pub use table::TableDefaults;
