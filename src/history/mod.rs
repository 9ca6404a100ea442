//! Result history and its persistence boundary.

mod label;
mod record;
mod store;

pub use label::ResultLabel;
pub use record::{HISTORY_CAPACITY, MalformedHistory, ResultHistory};
pub use store::{HISTORY_KEY, HistoryStore, MemoryStore, NullStore, StoreError};
