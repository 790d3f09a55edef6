mod tasks;

pub use tasks::{start_archive_task, start_settlement_task, ScheduleConfig};
