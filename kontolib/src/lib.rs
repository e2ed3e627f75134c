//! kontolib — разбор выписок MT940/MT942 (FinTS) в дни со стартовым сальдо и проводками.

pub mod error;
pub mod model;
pub mod traits;

pub mod formats {
    pub mod mt940;
    pub mod json;
    pub mod csv;
    pub mod xml;
}

pub use error::{FormatError, KontoError, Result};
pub use formats::mt940::{decode_latin1, DividerMode, Mt940, ParseTarget, ParserOptions};
pub use model::{Balance, DebitCredit, ForeignAmount, StatementDay, StatementOfAccount, Transaction};
