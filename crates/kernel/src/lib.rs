pub mod platform;
pub mod process;
pub mod runtime;

pub use dockyard_protocol::{AppError, AppResult, ResultExt};
pub use process::{run_with_timeout, run_with_timeout_blocking};
pub use runtime::blocking::run_blocking;
