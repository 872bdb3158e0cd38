pub mod commands;
pub mod core;
pub mod formatters;
pub mod io;
pub mod output;
pub mod registry;
pub mod selectors;
pub mod shell;
pub mod shell_context;
pub mod system_clock;

pub use shell::{run_cli, run_script};
pub use shell_context::ShellContext;
