mod commands;
mod context;
pub mod output;
pub mod registry;
mod shell;
pub mod table;

pub use context::{CliMode, CommandError, CommandResult, ShellContext};
pub use shell::{run_cli, SCRIPT_ENV};
