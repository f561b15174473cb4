//! Supported currencies, the fixed-rate normalization used by every
//! aggregate, and es-AR amount formatting.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Pesos per dollar applied when no configured rate is supplied.
pub const DEFAULT_USD_TO_ARS_RATE: f64 = 1000.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum Currency {
    #[default]
    ARS,
    USD,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Currency::ARS => "ARS",
            Currency::USD => "USD",
        }
    }

    fn symbol(&self) -> &'static str {
        match self {
            Currency::ARS => "$",
            Currency::USD => "US$",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "ARS" => Ok(Currency::ARS),
            "USD" => Ok(Currency::USD),
            other => Err(format!("unsupported currency `{other}` (expected ARS or USD)")),
        }
    }
}

/// Converts amounts into pesos with a fixed multiplicative factor.
///
/// There is no live exchange rate: the factor is an approximation taken from
/// configuration and applied uniformly to every historical transaction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurrencyConverter {
    usd_to_ars: f64,
}

impl Default for CurrencyConverter {
    fn default() -> Self {
        Self {
            usd_to_ars: DEFAULT_USD_TO_ARS_RATE,
        }
    }
}

impl CurrencyConverter {
    /// Builds a converter, falling back to the default factor for
    /// non-finite or non-positive rates.
    pub fn new(usd_to_ars: f64) -> Self {
        if usd_to_ars.is_finite() && usd_to_ars > 0.0 {
            Self { usd_to_ars }
        } else {
            tracing::warn!(rate = usd_to_ars, "ignoring invalid USD rate, using default");
            Self::default()
        }
    }

    pub fn usd_to_ars(&self) -> f64 {
        self.usd_to_ars
    }

    pub fn normalize(&self, amount: f64, currency: Currency) -> f64 {
        match currency {
            Currency::ARS => amount,
            Currency::USD => amount * self.usd_to_ars,
        }
    }
}

/// Formats an amount the way the household is used to reading it:
/// `.` groups thousands, `,` separates two decimals.
pub fn format_currency(amount: f64, currency: Currency) -> String {
    if !amount.is_finite() {
        return "N/A".into();
    }
    let negative = amount < 0.0;
    let cents = (amount.abs() * 100.0).round() as u128;
    let whole = cents / 100;
    let fraction = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if negative && cents > 0 { "-" } else { "" };
    format!("{sign}{} {grouped},{fraction:02}", currency.symbol())
}
