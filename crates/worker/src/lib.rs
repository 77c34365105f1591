pub mod executors;
pub mod worker;

pub use executors::{ImapsyncExecutor, JobExecutor};
pub use worker::{elapsed_minutes, Worker};
