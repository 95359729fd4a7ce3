//! In-memory state for the chat service: registered accounts and the message
//! log. Both live for the lifetime of the process and are shared behind `Arc`.

pub mod accounts;
pub mod messages;

pub use accounts::{Account, AccountError, AccountStore};
pub use messages::MessageLog;
