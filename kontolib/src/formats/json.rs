//! JSON-вывод: объект `days`, ключи — даты `YYYY-MM-DD`.

use crate::{error::Result, model::StatementOfAccount};
use std::io::Write;

pub struct Json;

impl crate::traits::WriteFormat for Json {
    fn write<W: Write>(mut w: W, soa: &StatementOfAccount) -> Result<()> {
        serde_json::to_writer_pretty(&mut w, soa)?;
        w.write_all(b"\n")?;
        Ok(())
    }
}
