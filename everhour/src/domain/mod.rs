mod project;
mod task;
mod time_record;
mod timer;

pub use project::*;
pub use task::*;
pub use time_record::*;
pub use timer::*;
