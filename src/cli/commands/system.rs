use crate::cli::context::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandDefinition;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new("help", "Show available commands", "help [command]", cmd_help),
        CommandDefinition::new("version", "Show build information", "version", cmd_version),
        CommandDefinition::new("exit", "Leave the shell", "exit", cmd_exit),
    ]
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(name) = args.first() {
        let name = name.to_lowercase();
        let Some(entry) = context.registry.get(&name) else {
            return Err(CommandError::InvalidArguments(format!(
                "no help available for `{name}`"
            )));
        };
        output::section(format!("Help: {}", entry.name));
        output::info(format!("  {}", entry.description));
        output::info(format!("  Usage: {}", entry.usage));
        return Ok(());
    }

    output::section("Available commands");
    for entry in context.registry.iter() {
        output::info(format!("  {:<16} {}", entry.name, entry.description));
    }
    output::info("Use `help <command>` for details.");
    Ok(())
}

pub(crate) fn version_line() -> String {
    format!(
        "family_budget {} (build {}, {}, {} {})",
        env!("CARGO_PKG_VERSION"),
        env!("FAMILY_BUDGET_BUILD_HASH"),
        env!("FAMILY_BUDGET_BUILD_TIMESTAMP"),
        env!("FAMILY_BUDGET_BUILD_TARGET"),
        env!("FAMILY_BUDGET_BUILD_PROFILE"),
    )
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::info(version_line());
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
