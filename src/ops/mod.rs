pub mod detail_session;
pub mod search;
pub mod task_ops;
