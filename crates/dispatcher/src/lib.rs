//! 任务派发：固定大小的worker池、直接交接队列、完成计数与协作式取消

pub mod pool;
pub mod sequencer;
pub mod tally;

pub use pool::{DispatchReport, Dispatcher, DispatcherConfig};
pub use sequencer::Sequencer;
pub use tally::CompletionTally;
