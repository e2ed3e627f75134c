//! Доменные модели выписки: дни, стартовые сальдо и проводки.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum DebitCredit {
    Debit,
    Credit,
}

impl DebitCredit {
    /// `C`/`RC` → Credit, `D`/`RD` → Debit.
    pub fn from_mark(mark: &str) -> Option<Self> {
        match mark {
            "C" | "RC" => Some(DebitCredit::Credit),
            "D" | "RD" => Some(DebitCredit::Debit),
            _ => None,
        }
    }

    pub fn as_mark(self) -> &'static str {
        match self {
            DebitCredit::Debit => "D",
            DebitCredit::Credit => "C",
        }
    }
}

/// Стартовое сальдо дня (:60F: / :60M:).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Balance {
    pub direction: DebitCredit,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub currency: String,
}

/// Исходная сумма или комиссия в иностранной валюте (/OCMT/, /CHGS/).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForeignAmount {
    pub currency: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
}

/// Одна проводка: пара :61: + :86:.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub booking_date: Option<NaiveDate>,
    pub valuta_date: Option<NaiveDate>,
    /// Всегда неотрицательна, знак — в `direction`.
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub direction: DebitCredit,
    /// `false` для предварительных (ещё не проведённых) записей.
    pub booked: bool,
    /// Geschäftsvorfall-Code, первые три символа :86:.
    pub booking_code: String,
    pub booking_text: String,
    pub description_1: String,
    pub description_2: String,
    pub structured_description: BTreeMap<String, String>,
    pub bank_code: String,
    pub account_number: String,
    pub name: String,
    pub primanota_number: String,
    pub text_key_addition: String,
    pub customer_reference: String,
    pub institute_reference: String,
    /// Код операции из :61: (три символа после `N`).
    pub transaction_type_code: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub original_amount: Option<ForeignAmount>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub charges: Option<ForeignAmount>,
}

impl Transaction {
    fn structured(&self, key: &str) -> &str {
        self.structured_description
            .get(key)
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Назначение платежа (SVWZ).
    pub fn main_description(&self) -> &str {
        self.structured("SVWZ")
    }

    /// End-to-end reference (EREF).
    pub fn end_to_end_id(&self) -> &str {
        self.structured("EREF")
    }

    pub fn mandate_reference(&self) -> &str {
        self.structured("MREF")
    }

    pub fn creditor_id(&self) -> &str {
        self.structured("CRED")
    }

    pub fn signed_amount(&self) -> Decimal {
        match self.direction {
            DebitCredit::Credit => self.amount,
            DebitCredit::Debit => -self.amount,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatementDay {
    pub date: NaiveDate,
    pub start_balance: Balance,
    pub transactions: Vec<Transaction>,
}

/// Результат разбора: дни выписки, упорядоченные по дате.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StatementOfAccount {
    pub days: BTreeMap<NaiveDate, StatementDay>,
}

impl StatementOfAccount {
    pub fn day(&self, date: NaiveDate) -> Option<&StatementDay> {
        self.days.get(&date)
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Все проводки подряд, в порядке дней и исходного текста.
    pub fn transactions(&self) -> impl Iterator<Item = (&StatementDay, &Transaction)> {
        self.days
            .values()
            .flat_map(|d| d.transactions.iter().map(move |t| (d, t)))
    }
}
