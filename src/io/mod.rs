pub mod board_io;
pub mod prompt;
pub mod recovery;
pub mod resource;
pub mod store;

pub use store::{StoreError, TaskListStore};
