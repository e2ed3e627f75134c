//! Простой XML-вывод (не CAMT!): <Statement><day date=".."><transaction>...</transaction></day></Statement>

use crate::{
    error::{KontoError, Result},
    model::{Balance, StatementOfAccount, Transaction},
};
use quick_xml::se::to_string_with_root;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize, Debug)]
struct XmlBalance {
    dc: &'static str,
    #[serde(with = "rust_decimal::serde::str")]
    amount: Decimal,
    currency: String,
}

#[derive(Serialize, Debug)]
struct XmlField {
    #[serde(rename = "@key")]
    key: String,
    #[serde(rename = "$text")]
    value: String,
}

#[derive(Serialize, Debug)]
struct XmlTransaction {
    #[serde(skip_serializing_if = "Option::is_none")]
    booking_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    valuta_date: Option<String>,
    #[serde(with = "rust_decimal::serde::str")]
    amount: Decimal,
    dc: &'static str,
    booked: bool,
    booking_code: String,
    booking_text: String,
    name: String,
    bank_code: String,
    account_number: String,
    customer_reference: String,
    institute_reference: String,
    #[serde(rename = "field")]
    structured_description: Vec<XmlField>,
}

#[derive(Serialize, Debug)]
struct XmlDay {
    #[serde(rename = "@date")]
    date: String,
    start_balance: XmlBalance,
    #[serde(rename = "transaction")]
    transactions: Vec<XmlTransaction>,
}

#[derive(Serialize, Debug)]
struct XmlStatement {
    #[serde(rename = "day")]
    days: Vec<XmlDay>,
}

fn xml_balance(b: &Balance) -> XmlBalance {
    XmlBalance {
        dc: b.direction.as_mark(),
        amount: b.amount,
        currency: b.currency.clone(),
    }
}

fn xml_transaction(t: &Transaction) -> XmlTransaction {
    XmlTransaction {
        booking_date: t.booking_date.map(|d| d.format("%Y-%m-%d").to_string()),
        valuta_date: t.valuta_date.map(|d| d.format("%Y-%m-%d").to_string()),
        amount: t.amount,
        dc: t.direction.as_mark(),
        booked: t.booked,
        booking_code: t.booking_code.clone(),
        booking_text: t.booking_text.clone(),
        name: t.name.clone(),
        bank_code: t.bank_code.clone(),
        account_number: t.account_number.clone(),
        customer_reference: t.customer_reference.clone(),
        institute_reference: t.institute_reference.clone(),
        structured_description: t
            .structured_description
            .iter()
            .map(|(key, value)| XmlField {
                key: key.clone(),
                value: value.clone(),
            })
            .collect(),
    }
}

pub struct Xml;

impl crate::traits::WriteFormat for Xml {
    fn write<W: Write>(mut w: W, soa: &StatementOfAccount) -> Result<()> {
        let x = XmlStatement {
            days: soa
                .days
                .values()
                .map(|day| XmlDay {
                    date: day.date.format("%Y-%m-%d").to_string(),
                    start_balance: xml_balance(&day.start_balance),
                    transactions: day.transactions.iter().map(xml_transaction).collect(),
                })
                .collect(),
        };

        let s = to_string_with_root("Statement", &x).map_err(|e| KontoError::Xml(format!("{e}")))?;
        w.write_all(s.as_bytes())?;
        Ok(())
    }
}
