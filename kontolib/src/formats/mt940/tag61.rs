//! Разбор строки проводки :61:.
//!
//! `YYMMDD[MMDD]<C|D|RC|RD>[буква валюты]<сумма>N<код><ref>[//<instref>][CRLF<доп. поля>]`
//!
//! Позиции символов значимы, поэтому разбор идёт по смещениям, без регулярок.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use tracing::debug;

use super::{mt_date, parse_amount};
use crate::error::FormatError;
use crate::model::{DebitCredit, ForeignAmount};

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Tag61 {
    pub valuta_date: NaiveDate,
    /// `None`, если дата проводки не указана — тогда берётся дата дня.
    pub booking_date: Option<NaiveDate>,
    pub direction: DebitCredit,
    pub amount: Decimal,
    pub transaction_type_code: String,
    pub customer_reference: String,
    pub institute_reference: String,
    pub original_amount: Option<ForeignAmount>,
    pub charges: Option<ForeignAmount>,
}

pub(crate) fn decode(raw: &str) -> Result<Tag61, FormatError> {
    let bytes = raw.as_bytes();
    let missing_mark = || FormatError::MissingDirectionMarker(raw.to_string());

    if bytes.len() < 6 || !bytes[..6].iter().all(u8::is_ascii_digit) {
        return Err(missing_mark());
    }
    let valuta_date = mt_date(&raw[..6])?;

    let mut next = 6;
    let booking_mmdd = match bytes.get(6..10) {
        Some(mmdd) if mmdd.iter().all(u8::is_ascii_digit) => {
            next = 10;
            Some(&raw[6..10])
        }
        _ => None,
    };
    let booking_date = booking_mmdd
        .map(|mmdd| resolve_booking_date(valuta_date, &raw[2..4], mmdd))
        .transpose()?;

    let rest = &raw[next..];
    let (direction, mark_len) = if rest.starts_with("RC") || rest.starts_with("RD") {
        (DebitCredit::from_mark(&rest[..2]), 2)
    } else {
        (rest.get(..1).and_then(DebitCredit::from_mark), 1)
    };
    let direction = direction.ok_or_else(missing_mark)?;
    next += mark_len;

    // третья буква валюты (EUR → R), пропускаем
    if bytes.get(next).is_some_and(u8::is_ascii_uppercase) {
        next += 1;
    }

    let n_pos = raw[next..]
        .find('N')
        .map(|i| next + i)
        .ok_or_else(|| FormatError::InvalidAmount(raw.to_string()))?;
    let amount = parse_amount(&raw[next..n_pos])?;

    let code_start = n_pos + 1;
    let code_end = raw[code_start..]
        .char_indices()
        .nth(3)
        .map(|(i, _)| code_start + i)
        .unwrap_or(raw.len());
    let transaction_type_code = raw[code_start..code_end].to_string();

    next = code_end;
    let tail = &raw[next..];
    let ref_end = match (tail.find("//"), tail.find("\r\n")) {
        (Some(a), Some(b)) => a.min(b),
        (Some(a), None) => a,
        (None, Some(b)) => b,
        (None, None) => tail.len(),
    };
    let customer_reference = tail[..ref_end].to_string();
    next += ref_end;

    let mut institute_reference = String::new();
    if raw[next..].starts_with("//") {
        next += 2;
        let end = raw[next..].find("\r\n").map(|i| next + i).unwrap_or(raw.len());
        institute_reference = raw[next..end].to_string();
        next = end;
    }

    let (mut original_amount, mut charges) = (None, None);
    if raw[next..].starts_with("\r\n") {
        let extra = &raw[next + 2..];
        original_amount = sub_field(extra, "/OCMT/");
        charges = sub_field(extra, "/CHGS/");
    }

    Ok(Tag61 {
        valuta_date,
        booking_date,
        direction,
        amount,
        transaction_type_code,
        customer_reference,
        institute_reference,
        original_amount,
        charges,
    })
}

/// Дата проводки несёт только MMDD, год берём у валютирования с поправкой на
/// переход через Новый год (валюта 12, проводка 01 и наоборот).
fn resolve_booking_date(valuta: NaiveDate, valuta_month: &str, mmdd: &str) -> Result<NaiveDate, FormatError> {
    let mut year = valuta.year();
    match (valuta_month, &mmdd[..2]) {
        ("12", "01") => year += 1,
        ("01", "12") => year -= 1,
        _ => {}
    }
    let month: u32 = mmdd[..2].parse().map_err(|_| FormatError::InvalidDate(mmdd.to_string()))?;
    let day: u32 = mmdd[2..].parse().map_err(|_| FormatError::InvalidDate(mmdd.to_string()))?;
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| FormatError::InvalidDate(format!("{year}{mmdd}")))
}

/// `/OCMT/EUR12,50/` → валюта + сумма. Нечитаемые значения пропускаются.
fn sub_field(extra: &str, marker: &str) -> Option<ForeignAmount> {
    let start = extra.find(marker)? + marker.len();
    let currency = extra.get(start..start + 3)?;
    let amount_start = start + 3;
    let amount_end = extra[amount_start..]
        .find('/')
        .map(|i| amount_start + i)
        .unwrap_or(extra.len());
    match parse_amount(&extra[amount_start..amount_end]) {
        Ok(amount) => Some(ForeignAmount {
            currency: currency.to_string(),
            amount,
        }),
        Err(e) => {
            debug!(marker, error = %e, "skipping unreadable sub-field");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn debit_with_currency_letter() {
        let t = decode("1603310331DR637,39N033NONREF").unwrap();
        assert_eq!(t.valuta_date, d(2016, 3, 31));
        assert_eq!(t.booking_date, Some(d(2016, 3, 31)));
        assert_eq!(t.direction, DebitCredit::Debit);
        assert_eq!(t.amount, Decimal::new(63739, 2));
        assert_eq!(t.transaction_type_code, "033");
        assert_eq!(t.customer_reference, "NONREF");
        assert_eq!(t.institute_reference, "");
    }

    #[test]
    fn institute_reference_after_double_slash() {
        let t = decode("1906070607CR8000,00N060NONREF//063000110706").unwrap();
        assert_eq!(t.direction, DebitCredit::Credit);
        assert_eq!(t.amount, Decimal::new(800000, 2));
        assert_eq!(t.customer_reference, "NONREF");
        assert_eq!(t.institute_reference, "063000110706");
    }

    #[test]
    fn storno_marks_keep_direction() {
        let t = decode("1905150515RD44,87NDDTNONREF").unwrap();
        assert_eq!(t.direction, DebitCredit::Debit);
        assert_eq!(t.amount, Decimal::new(4487, 2));
        assert_eq!(t.transaction_type_code, "DDT");

        let t = decode("1905150515RC1,00NMSCNONREF").unwrap();
        assert_eq!(t.direction, DebitCredit::Credit);
    }

    #[test]
    fn booking_date_optional() {
        let t = decode("160511D198,02NMSCNONREF").unwrap();
        assert_eq!(t.valuta_date, d(2016, 5, 11));
        assert_eq!(t.booking_date, None);
        assert_eq!(t.amount, Decimal::new(19802, 2));
    }

    #[test]
    fn year_rollover() {
        let t = decode("1612310102C5,00NTRFNONREF").unwrap();
        assert_eq!(t.valuta_date, d(2016, 12, 31));
        assert_eq!(t.booking_date, Some(d(2017, 1, 2)));

        let t = decode("1701021231C5,00NTRFNONREF").unwrap();
        assert_eq!(t.valuta_date, d(2017, 1, 2));
        assert_eq!(t.booking_date, Some(d(2016, 12, 31)));
    }

    #[test]
    fn missing_direction_marker() {
        let err = decode("1603310331X637,39N033NONREF").unwrap_err();
        assert!(matches!(err, FormatError::MissingDirectionMarker(_)));
        assert!(matches!(
            decode("garbage").unwrap_err(),
            FormatError::MissingDirectionMarker(_)
        ));
    }

    #[test]
    fn foreign_amounts_in_crlf_tail() {
        let raw = "1606070607C8000,00NTRFREF1//BANK1\r\n/OCMT/USD9000,00//CHGS/EUR2,50/";
        let t = decode(raw).unwrap();
        assert_eq!(t.customer_reference, "REF1");
        assert_eq!(t.institute_reference, "BANK1");
        assert_eq!(
            t.original_amount,
            Some(ForeignAmount { currency: "USD".into(), amount: Decimal::new(900000, 2) })
        );
        assert_eq!(
            t.charges,
            Some(ForeignAmount { currency: "EUR".into(), amount: Decimal::new(250, 2) })
        );
    }

    #[test]
    fn reference_stops_at_crlf() {
        let t = decode("1606070607C1,NTRFABC\r\nmore").unwrap();
        assert_eq!(t.customer_reference, "ABC");
        assert_eq!(t.institute_reference, "");
        assert_eq!(t.amount, Decimal::new(1, 0));
    }
}
