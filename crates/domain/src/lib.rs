pub mod entities;
pub mod job_list;

pub use entities::*;
pub use job_list::{load_job_list, parse_job_line, parse_job_list};
pub use mailsync_errors::{SyncError, SyncResult};
