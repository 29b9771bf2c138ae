//! CLI command implementations.

mod analyze;
mod console;
mod report;

pub use analyze::cmd_analyze;
pub use self::console::cmd_console;
pub use report::cmd_report;
