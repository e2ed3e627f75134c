//! CSV: одна строка на проводку, плюс дата дня и его стартовое сальдо.
//! day,start_dc,start_amount,start_currency,booking_date,valuta_date,amount,dc,booked,booking_code,booking_text,name,bank_code,account_number,main_description,end_to_end_id,customer_reference,institute_reference

use crate::{error::Result, model::StatementOfAccount};
use csv::WriterBuilder;
use std::io::Write;

#[derive(serde::Serialize)]
struct CsvOutRow<'a> {
    day: String,
    start_dc: &'a str,
    start_amount: String,
    start_currency: &'a str,
    booking_date: Option<String>,
    valuta_date: Option<String>,
    amount: String,
    dc: &'a str,
    booked: bool,
    booking_code: &'a str,
    booking_text: &'a str,
    name: &'a str,
    bank_code: &'a str,
    account_number: &'a str,
    main_description: &'a str,
    end_to_end_id: &'a str,
    customer_reference: &'a str,
    institute_reference: &'a str,
}

pub struct Csv;

impl crate::traits::WriteFormat for Csv {
    fn write<W: Write>(mut w: W, soa: &StatementOfAccount) -> Result<()> {
        let mut wrt = WriterBuilder::new().from_writer(&mut w);

        for (day, t) in soa.transactions() {
            let out = CsvOutRow {
                day: day.date.format("%Y-%m-%d").to_string(),
                start_dc: day.start_balance.direction.as_mark(),
                start_amount: day.start_balance.amount.to_string(),
                start_currency: &day.start_balance.currency,
                booking_date: t.booking_date.map(|d| d.format("%Y-%m-%d").to_string()),
                valuta_date: t.valuta_date.map(|d| d.format("%Y-%m-%d").to_string()),
                amount: t.amount.to_string(),
                dc: t.direction.as_mark(),
                booked: t.booked,
                booking_code: &t.booking_code,
                booking_text: &t.booking_text,
                name: &t.name,
                bank_code: &t.bank_code,
                account_number: &t.account_number,
                main_description: t.main_description(),
                end_to_end_id: t.end_to_end_id(),
                customer_reference: &t.customer_reference,
                institute_reference: &t.institute_reference,
            };
            wrt.serialize(out)?;
        }
        wrt.flush()?;
        Ok(())
    }
}
