use crate::cli::context::{CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandDefinition;

use super::usage_error;

const CONFIG_USAGE: &str = "config [show | set <usd-rate|shared|data_dir> <value>]";

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![CommandDefinition::new(
        "config",
        "Show or change the configuration",
        CONFIG_USAGE,
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] | ["show"] => {
            show(context);
            Ok(())
        }
        ["set", key, value @ ..] if !value.is_empty() => set(context, key, &value.join(" ")),
        _ => Err(usage_error(CONFIG_USAGE)),
    }
}

fn show(context: &ShellContext) {
    let config = &context.config;
    output::section("Configuration");
    output::info(format!("usd_to_ars_rate  {}", config.usd_to_ars_rate));
    output::info(format!("shared_storage   {}", config.shared_storage));
    output::info(format!(
        "data_dir         {}",
        context.config_manager.data_root(config).display()
    ));
    output::info(format!(
        "config file      {}",
        context.config_manager.path().display()
    ));
}

fn set(context: &mut ShellContext, key: &str, value: &str) -> CommandResult {
    let mut updated = context.config.clone();
    updated.set_value(key, value)?;
    context.config_manager.save(&updated)?;

    let storage_moved =
        updated.scope() != context.config.scope() || updated.data_dir != context.config.data_dir;
    context.config = updated;
    if storage_moved {
        context.reopen()?;
        output::success(format!(
            "Configuration saved; now using {} storage.",
            context.manager.scope()
        ));
    } else {
        context.manager.set_converter(context.config.converter());
        output::success("Configuration saved.");
    }
    Ok(())
}
