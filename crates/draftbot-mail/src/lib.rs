//! Draftbot mail — minimal async IMAP client and the `MailStore` seam.

pub mod imap;
pub mod parse;
pub mod store;

pub use store::{ImapStore, MailStore};
