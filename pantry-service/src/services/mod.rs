pub mod providers;
pub mod store;

pub use providers::ChatProvider;
pub use store::{RecordStore, RowQuery};
