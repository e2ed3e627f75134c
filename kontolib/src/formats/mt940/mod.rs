//! MT940/MT942 выписки (формат FinTS): :60F:/:60M: сальдо, пары :61: + :86:.
//!
//! Текст режется на дни по `<разделитель>-`, дни — на теги по `<разделитель>:`.
//! Разделитель — либо CRLF, либо `@@`, смотря что чаще встречается перед `-`.

mod tag61;
mod tag86;

use crate::{
    error::{FormatError, KontoError, Result},
    model::{Balance, DebitCredit, StatementDay, StatementOfAccount, Transaction},
    traits::ReadFormat,
};
use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;
use std::{
    io::{BufRead, Read},
    str::FromStr,
};
use tracing::{debug, trace, warn};

const CRLF: &str = "\r\n";
const AT_AT: &str = "@@";

/// Какой разделитель строк использовать.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DividerMode {
    /// Выбрать по частоте `\r\n-` против `@@-`.
    #[default]
    Auto,
    Crlf,
    AtAt,
}

/// Представление результата. Пока только одно — дни выписки.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParseTarget {
    #[default]
    Days,
}

impl FromStr for ParseTarget {
    type Err = KontoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "days" | "array" => Ok(ParseTarget::Days),
            other => Err(KontoError::UnsupportedTarget(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParserOptions {
    pub divider: DividerMode,
}

/// Парсер выписки. Состояния между вызовами не хранит.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mt940 {
    options: ParserOptions,
}

impl Mt940 {
    pub fn new(options: ParserOptions) -> Self {
        Self { options }
    }

    pub fn with_divider(divider: DividerMode) -> Self {
        Self::new(ParserOptions { divider })
    }

    pub fn parse_as(&self, raw: &str, target: ParseTarget) -> Result<StatementOfAccount> {
        match target {
            ParseTarget::Days => self.parse(raw),
        }
    }

    pub fn parse(&self, raw: &str) -> Result<StatementOfAccount> {
        let divider = match self.options.divider {
            DividerMode::Auto => detect_divider(raw)?,
            DividerMode::Crlf => CRLF,
            DividerMode::AtAt => AT_AT,
        };
        debug!(divider = ?divider, "divider selected");

        let cleaned = unwrap_lines(raw, divider);
        let mut state = ParseState {
            current_day: None,
            result: StatementOfAccount::default(),
            preliminary: Regex::new(r"\+@[0-9]+@$")?,
        };
        let day_separator = format!("{divider}-");
        let tag_separator = format!("{divider}:");

        for (n, segment) in cleaned.split(day_separator.as_str()).enumerate() {
            let fields: Vec<&str> = segment.split(tag_separator.as_str()).collect();
            trace!(segment = n, fields = fields.len(), "segment");
            state.parse_segment(&fields)?;
        }

        debug!(days = state.result.days.len(), "statement parsed");
        Ok(state.result)
    }
}

impl ReadFormat for Mt940 {
    fn read<R: BufRead>(mut r: R) -> Result<StatementOfAccount> {
        let mut buf = Vec::new();
        r.read_to_end(&mut buf)?;
        Mt940::default().parse(&decode_latin1(&buf))
    }
}

/// Каждый байт Latin-1 — ровно один символ с тем же кодом.
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Состояние одного вызова `parse`: текущий день и накопленный результат.
struct ParseState {
    current_day: Option<NaiveDate>,
    result: StatementOfAccount,
    /// Признак предварительной записи: поле заканчивается на `+@<цифры>@`.
    preliminary: Regex,
}

/// Состояние одного сегмента дня.
struct SegmentContext {
    booked: bool,
}

impl ParseState {
    fn parse_segment(&mut self, fields: &[&str]) -> Result<()> {
        let mut ctx = SegmentContext { booked: true };

        for (i, &field) in fields.iter().enumerate() {
            // первое поле текста сохраняет ведущее `:`
            let field = if i == 0 { field.strip_prefix(':').unwrap_or(field) } else { field };

            if self.preliminary.is_match(field.trim()) {
                ctx.booked = false;
            }

            if let Some(balance) = field.strip_prefix("60F:").or_else(|| field.strip_prefix("60M:")) {
                trace!(tag = &field[..3], "start balance");
                self.open_day(balance)?;
            } else if let Some(line) = field.strip_prefix("61:") {
                match fields.get(i + 1).and_then(|f| f.strip_prefix("86:")) {
                    Some(description) => self.push_transaction(line, description, ctx.booked)?,
                    None => warn!(line, ":61: without adjacent :86:, ignored"),
                }
            }
        }
        Ok(())
    }

    // 60F:C160401EUR1234,56
    fn open_day(&mut self, raw: &str) -> Result<()> {
        let invalid = || FormatError::InvalidBalance(raw.to_string());

        let mark = raw.get(..1).ok_or_else(invalid)?;
        let direction = DebitCredit::from_mark(mark).ok_or_else(invalid)?;
        let date = mt_date(raw.get(1..7).ok_or_else(invalid)?)?;
        let currency = raw.get(7..10).ok_or_else(invalid)?.to_string();
        let amount = parse_amount(raw.get(10..).ok_or_else(invalid)?)?;

        let start_balance = Balance {
            direction,
            amount,
            currency,
        };
        self.result
            .days
            .entry(date)
            .and_modify(|day| day.start_balance = start_balance.clone())
            .or_insert_with(|| StatementDay {
                date,
                start_balance,
                transactions: Vec::new(),
            });
        self.current_day = Some(date);
        Ok(())
    }

    fn push_transaction(&mut self, line: &str, description: &str, booked: bool) -> Result<()> {
        let day_date = self
            .current_day
            .ok_or_else(|| FormatError::TransactionBeforeBalance(line.to_string()))?;

        let t61 = tag61::decode(line)?;
        let t86 = tag86::decode(description);
        trace!(amount = %t61.amount, code = %t86.booking_code, "transaction");

        let transaction = Transaction {
            booking_date: Some(t61.booking_date.unwrap_or(day_date)),
            valuta_date: Some(t61.valuta_date),
            amount: t61.amount,
            direction: t61.direction,
            booked,
            booking_code: t86.booking_code,
            booking_text: t86.booking_text,
            description_1: t86.description_1,
            description_2: t86.description_2,
            structured_description: t86.structured_description,
            bank_code: t86.bank_code,
            account_number: t86.account_number,
            name: t86.name,
            primanota_number: t86.primanota_number,
            text_key_addition: t86.text_key_addition,
            customer_reference: t61.customer_reference,
            institute_reference: t61.institute_reference,
            transaction_type_code: t61.transaction_type_code,
            original_amount: t61.original_amount,
            charges: t61.charges,
        };

        if let Some(day) = self.result.days.get_mut(&day_date) {
            day.transactions.push(transaction);
        }
        Ok(())
    }
}

/// Разделитель, который чаще стоит перед `-`. Если `-` нет совсем, решают
/// разделители перед тегами `:`.
fn detect_divider(raw: &str) -> Result<&'static str> {
    let pick = |crlf: usize, at_at: usize| match (crlf, at_at) {
        (0, 0) => None,
        (c, a) if c > a => Some(CRLF),
        _ => Some(AT_AT),
    };

    let by_day = pick(raw.matches("\r\n-").count(), raw.matches("@@-").count());
    let by_tag = || pick(raw.matches("\r\n:").count(), raw.matches("@@:").count());
    by_day
        .or_else(by_tag)
        .ok_or_else(|| FormatError::NoDivider.into())
}

/// Склеивает перенесённые строки: разделитель остаётся только перед тегом
/// (`:`) и перед концом дня (`-` + разделитель или конец текста).
fn unwrap_lines(raw: &str, divider: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(i) = rest.find(divider) {
        out.push_str(&rest[..i]);
        let after = &rest[i + divider.len()..];
        let keep = after.is_empty()
            || after.starts_with(':')
            || after
                .strip_prefix('-')
                .is_some_and(|tail| tail.is_empty() || tail.starts_with(divider));
        if keep {
            out.push_str(divider);
        }
        rest = after;
    }
    out.push_str(rest);
    out
}

/// YYMMDD, век всегда 20.
pub(crate) fn mt_date(yymmdd: &str) -> std::result::Result<NaiveDate, FormatError> {
    let invalid = || FormatError::InvalidDate(yymmdd.to_string());
    if yymmdd.len() != 6 || !yymmdd.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let part = |r: std::ops::Range<usize>| yymmdd[r].parse::<u32>().map_err(|_| invalid());
    let year = 2000 + part(0..2)? as i32;
    NaiveDate::from_ymd_opt(year, part(2..4)?, part(4..6)?).ok_or_else(invalid)
}

/// `1234,56` → 1234.56. Допускается `100,` и `,50`.
pub(crate) fn parse_amount(s: &str) -> std::result::Result<Decimal, FormatError> {
    let invalid = || FormatError::InvalidAmount(s.to_string());
    let trimmed = s.trim();
    if trimmed.is_empty()
        || trimmed.matches(',').count() > 1
        || !trimmed.bytes().all(|b| b.is_ascii_digit() || b == b',')
    {
        return Err(invalid());
    }
    let normalized = trimmed.replacen(',', ".", 1);
    let normalized = normalized.trim_end_matches('.');
    let normalized = if normalized.starts_with('.') {
        format!("0{normalized}")
    } else {
        normalized.to_string()
    };
    Decimal::from_str(&normalized).map_err(|_| invalid())
}
