pub mod action;

pub use action::{ActionId, ActionRecord, RecordTimestamp};
