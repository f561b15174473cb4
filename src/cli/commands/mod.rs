use std::collections::HashMap;

use chrono::NaiveDate;

pub mod category;
pub mod config;
pub mod report;
pub mod system;
pub mod transaction;

use crate::cli::context::CommandError;
use crate::cli::registry::CommandDefinition;
use crate::currency::Currency;
use crate::domain::{CategoryId, EntryKind};

pub(crate) fn all_definitions() -> Vec<CommandDefinition> {
    let mut commands = Vec::new();
    commands.extend(system::definitions());
    commands.extend(transaction::definitions());
    commands.extend(category::definitions());
    commands.extend(report::definitions());
    commands.extend(config::definitions());
    commands
}

/// Positional arguments plus `--flag value` options.
#[derive(Debug, Default)]
pub(crate) struct ParsedArgs<'a> {
    pub positional: Vec<&'a str>,
    options: HashMap<&'static str, &'a str>,
}

impl<'a> ParsedArgs<'a> {
    pub fn parse(args: &[&'a str], known: &[&'static str]) -> Result<Self, CommandError> {
        let mut parsed = ParsedArgs::default();
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            let Some(flag) = arg.strip_prefix("--") else {
                parsed.positional.push(*arg);
                continue;
            };
            let Some(name) = known.iter().find(|name| **name == flag) else {
                return Err(CommandError::InvalidArguments(format!(
                    "unknown option `--{flag}`"
                )));
            };
            let value = iter.next().ok_or_else(|| {
                CommandError::InvalidArguments(format!("option `--{flag}` needs a value"))
            })?;
            parsed.options.insert(*name, *value);
        }
        Ok(parsed)
    }

    pub fn option(&self, name: &str) -> Option<&'a str> {
        self.options.get(name).copied()
    }

    pub fn expect_positional(&self, count: usize, usage: &str) -> Result<(), CommandError> {
        if self.positional.len() < count {
            return Err(CommandError::InvalidArguments(format!("usage: {usage}")));
        }
        Ok(())
    }
}

pub(crate) fn usage_error(usage: &str) -> CommandError {
    CommandError::InvalidArguments(format!("usage: {usage}"))
}

pub(crate) fn parse_kind(input: &str) -> Result<EntryKind, CommandError> {
    input.parse().map_err(CommandError::InvalidArguments)
}

pub(crate) fn parse_currency(input: Option<&str>) -> Result<Currency, CommandError> {
    input
        .map(|value| value.parse().map_err(CommandError::InvalidArguments))
        .unwrap_or(Ok(Currency::ARS))
}

pub(crate) fn parse_amount(input: &str) -> Result<f64, CommandError> {
    let normalized = input.trim().replace(',', ".");
    normalized
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| CommandError::InvalidArguments(format!("`{input}` is not a valid amount")))
}

pub(crate) fn parse_date(input: &str) -> Result<NaiveDate, CommandError> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| {
        CommandError::InvalidArguments(format!("invalid date `{input}` (use YYYY-MM-DD)"))
    })
}

pub(crate) fn category_id(input: &str) -> CategoryId {
    CategoryId::new(input.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separates_options_from_positionals() {
        let args = ["expense", "100", "comida", "--note", "super", "--currency", "usd"];
        let parsed = ParsedArgs::parse(&args, &["note", "currency", "date"]).unwrap();
        assert_eq!(parsed.positional, vec!["expense", "100", "comida"]);
        assert_eq!(parsed.option("note"), Some("super"));
        assert_eq!(parse_currency(parsed.option("currency")).unwrap(), Currency::USD);
        assert_eq!(parsed.option("date"), None);
    }

    #[test]
    fn rejects_unknown_or_dangling_options() {
        assert!(ParsedArgs::parse(&["--color"], &["note"]).is_err());
        assert!(ParsedArgs::parse(&["--note"], &["note"]).is_err());
    }

    #[test]
    fn amounts_accept_decimal_commas() {
        assert_eq!(parse_amount("1234,5").unwrap(), 1234.5);
        assert!(parse_amount("NaN").is_err());
        assert!(parse_amount("ten").is_err());
    }
}
