//! Shell state, dispatch, and error reporting shared by every command.

use std::io;

use dialoguer::{theme::ColorfulTheme, Confirm};
use strsim::levenshtein;

use crate::{
    config::{Config, ConfigManager},
    core::{services::ServiceError, BudgetManager, LoadReport},
    errors::{BudgetError, CliError},
    storage::JsonFileStore,
};

use super::commands;
use super::output;
use super::registry::CommandRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Core(#[from] BudgetError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<ServiceError> for CommandError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Core(err) => CommandError::Core(err),
            ServiceError::Invalid(message) => CommandError::InvalidArguments(message),
        }
    }
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::Core(inner) => CliError::Core(inner),
            CommandError::InvalidArguments(message) => CliError::Input(message),
            other => CliError::Command(other.to_string()),
        }
    }
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub manager: BudgetManager,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_config_manager(mode, ConfigManager::new()?)
    }

    pub fn with_config_manager(
        mode: CliMode,
        config_manager: ConfigManager,
    ) -> Result<Self, CliError> {
        let config = config_manager.load()?;
        let manager = open_manager(&config_manager, &config)?;
        Ok(Self {
            mode,
            registry: CommandRegistry::new(commands::all_definitions()),
            config_manager,
            config,
            manager,
            last_command: None,
            running: true,
        })
    }

    /// Re-reads the book after a storage-relevant configuration change.
    pub(crate) fn reopen(&mut self) -> Result<(), CommandError> {
        self.manager = open_manager(&self.config_manager, &self.config)?;
        Ok(())
    }

    pub fn prompt(&self) -> String {
        format!("budget [{}]> ", self.manager.scope())
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    #[cfg(test)]
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = crate::cli::shell::parse_command_line(line)
            .map_err(|err| CommandError::InvalidArguments(err.to_string()))?;
        let Some((raw, rest)) = tokens.split_first() else {
            return Ok(LoopControl::Continue);
        };
        let args: Vec<&str> = rest.iter().map(String::as_str).collect();
        self.dispatch(&raw.to_lowercase(), raw, &args)
    }

    pub(crate) fn closest_command(&self, input: &str) -> Option<&'static str> {
        let input = input.to_lowercase();
        self.registry
            .names()
            .map(|name| (levenshtein(name, &input), name))
            .filter(|(distance, _)| *distance <= 3)
            .min_by_key(|(distance, _)| *distance)
            .map(|(_, name)| name)
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{input}`. Type `help` to see available commands."
        ));
        if let Some(best) = self.closest_command(input) {
            output::hint(format!("Did you mean `{best}`?"));
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("Exit the budget shell?")
            .default(true)
            .interact()
            .map_err(|err| CliError::Command(err.to_string()))
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::hint("Use `help <command>` for usage details.");
            }
            CommandError::Core(BudgetError::CategoryNotFound(id)) => {
                output::error(format!("Category not found: {id}"));
                output::hint("Use `categories` to list valid category ids.");
            }
            other => output::error(other),
        }
    }

    /// Warns when the last mutation could not be persisted.
    pub(crate) fn report_save(&self) {
        if let Some(report) = self.manager.last_save() {
            for failure in &report.failures {
                output::warning(format!("Change kept in memory but not saved: {failure}"));
            }
        }
    }
}

fn open_manager(config_manager: &ConfigManager, config: &Config) -> Result<BudgetManager, BudgetError> {
    let store = JsonFileStore::new(Some(config_manager.data_root(config)), None)?;
    let mut manager =
        BudgetManager::new(Box::new(store), config.scope()).with_converter(config.converter());
    let report = manager.load();
    report_load(&report);
    Ok(manager)
}

fn report_load(report: &LoadReport) {
    for failure in &report.failures {
        output::warning(format!("Could not read {failure}; starting with an empty list."));
    }
    for warning in &report.warnings {
        output::warning(warning);
    }
}
