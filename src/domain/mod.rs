pub mod enums;
pub mod format;
pub mod task;
pub mod views;

pub use enums::{DeadlineClass, Filter, UiMode};
pub use format::{format_age, format_deadline, time_left_badge};
pub use task::{parse_deadline_input, Task, TaskId};
pub use views::{compute_stats, deadline_class, filter_tasks};
