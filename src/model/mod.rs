mod process_info;
mod system_snapshot;
pub mod startup_entry;

pub use process_info::{PriorityLevel, ProcessInfo};
pub use startup_entry::{StartupEntry, StartupScope, StartupStatus};
pub use system_snapshot::*;
