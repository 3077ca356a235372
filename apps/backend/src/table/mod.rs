//! Table layer: wire messages, per-table sessions and the table hub.

pub mod hub;
pub mod protocol;
pub mod session;

pub use hub::TableHub;
pub use protocol::{ClientMsg, Outbound, Recipient, ServerMsg};
pub use session::TableSession;

#[cfg(test)]
mod tests_session;
