//! Recorded money movements.

use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::currency::Currency;
use crate::domain::category::CategoryId;
use crate::domain::common::{Displayable, EntryKind};

/// Transaction identifier. New records get a time-ordered UUID (v7);
/// records imported from older data keep their numeric millisecond ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TransactionId {
    Uuid(Uuid),
    Legacy(u64),
}

impl TransactionId {
    pub fn generate() -> Self {
        Self::Uuid(Uuid::now_v7())
    }

    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Uuid::parse_str(value)
            .map(Self::Uuid)
            .ok()
            .or_else(|| value.parse().ok().map(Self::Legacy))
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uuid(id) => id.fmt(f),
            Self::Legacy(millis) => millis.fmt(f),
        }
    }
}

/// Calendar month used as the grouping key for monthly aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// User-supplied fields of a transaction before it is recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub kind: EntryKind,
    pub amount: f64,
    pub currency: Currency,
    pub category: CategoryId,
    pub note: Option<String>,
    pub date: NaiveDate,
}

impl NewTransaction {
    pub fn new(
        kind: EntryKind,
        amount: f64,
        currency: Currency,
        category: impl Into<CategoryId>,
        date: NaiveDate,
    ) -> Self {
        Self {
            kind,
            amount,
            currency,
            category: category.into(),
            note: None,
            date,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        let note = note.into();
        self.note = if note.trim().is_empty() { None } else { Some(note) };
        self
    }
}

/// A recorded income or expense. Never edited in place.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: TransactionId,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub amount: f64,
    pub currency: Currency,
    pub category: CategoryId,
    /// Top-level ancestor of `category`, cached for aggregation.
    pub main_category: CategoryId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub date: NaiveDate,
    pub timestamp: DateTime<Utc>,
}

impl Transaction {
    pub(crate) fn record(
        draft: NewTransaction,
        main_category: CategoryId,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: TransactionId::generate(),
            kind: draft.kind,
            amount: draft.amount,
            currency: draft.currency,
            category: draft.category,
            main_category,
            note: draft.note,
            date: draft.date,
            timestamp,
        }
    }

    pub fn month(&self) -> YearMonth {
        YearMonth::of(self.date)
    }

    pub fn references(&self, category: &CategoryId) -> bool {
        &self.category == category || &self.main_category == category
    }
}

impl Displayable for Transaction {
    fn display_label(&self) -> String {
        format!(
            "{} {} {:.2} {} [{}]",
            self.date, self.kind, self.amount, self.currency, self.category
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn year_month_orders_chronologically() {
        let dec = YearMonth::of(date(2023, 12, 31));
        let jan = YearMonth::of(date(2024, 1, 1));
        assert!(dec < jan);
        assert_eq!(jan.to_string(), "2024-01");
    }

    #[test]
    fn ids_parse_from_display_form() {
        let id = TransactionId::generate();
        assert_eq!(TransactionId::parse(&id.to_string()), Some(id));
        assert_eq!(TransactionId::parse("not-an-id"), None);
        assert_eq!(
            TransactionId::parse("1700000000000"),
            Some(TransactionId::Legacy(1_700_000_000_000))
        );
    }

    #[test]
    fn blank_notes_are_dropped() {
        let draft = NewTransaction::new(
            EntryKind::Expense,
            10.0,
            Currency::ARS,
            "comida",
            date(2024, 5, 1),
        )
        .with_note("   ");
        assert_eq!(draft.note, None);
    }

    #[test]
    fn serializes_camel_case_fields() {
        let draft = NewTransaction::new(
            EntryKind::Expense,
            10.0,
            Currency::USD,
            "sub-1",
            date(2024, 5, 1),
        );
        let txn = Transaction::record(draft, CategoryId::new("comida"), Utc::now());
        let json = serde_json::to_value(&txn).unwrap();
        assert_eq!(json["mainCategory"], "comida");
        assert_eq!(json["type"], "expense");
        assert_eq!(json["currency"], "USD");
        assert_eq!(json["date"], "2024-05-01");
        assert!(json.get("note").is_none());
    }
}
