use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Provides access to a human-friendly entity name.
pub trait NamedEntity {
    fn name(&self) -> &str;
}

/// Supplies a presentation-ready label for CLI output or logs.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// Direction of a money movement. Categories and transactions share it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Income,
    Expense,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Income => "income",
            EntryKind::Expense => "expense",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntryKind::Income => "Income",
            EntryKind::Expense => "Expense",
        };
        f.write_str(label)
    }
}

impl FromStr for EntryKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "income" | "ingreso" => Ok(EntryKind::Income),
            "expense" | "gasto" => Ok(EntryKind::Expense),
            other => Err(format!("unknown entry type `{other}` (expected income or expense)")),
        }
    }
}
