//! Трэйты чтения выписки и записи результата на основе std::io::{BufRead, Write}.

use crate::{error::Result, model::StatementOfAccount};
use std::io::{BufRead, Write};

pub trait ReadFormat {
    fn read<R: BufRead>(r: R) -> Result<StatementOfAccount>;
}

pub trait WriteFormat {
    fn write<W: Write>(w: W, soa: &StatementOfAccount) -> Result<()>;
}
