#![allow(dead_code)]

/// Один день: старт 1234,56 EUR на 2016-04-01, зарплата 8000,00 от 2016-06-07.
/// Строка :86: перенесена, как это делают банки.
pub const ONE_DAY_CRLF: &str = ":20:STARTUMS\r\n\
:25:10020030/1234567\r\n\
:28C:0\r\n\
:60F:C160401EUR1234,56\r\n\
:61:1606070607CR8000,00N060NONREF//063000110706\r\n\
:86:166?00SEPA-UEBERWEISUNG?109310?20EREF+ABC123?21SVWZ+Gehalt Juni\r\n\
?22Firma GmbH?30DEUTDEFF?31DE89370400440532013000?32FIRMA GMBH\r\n\
:62F:C160607EUR9234,56\r\n\
-\r\n";

/// Два дня и предварительная часть (MT942) с маркером `+@1@`.
pub const MULTI_DAY_CRLF: &str = ":20:STARTUMS\r\n\
:25:10020030/1234567\r\n\
:28C:0\r\n\
:60F:C160401EUR1234,56\r\n\
:61:1604010401CR100,00NTRFNONREF\r\n\
:86:166?00GUTSCHRIFT?20Erstattung\r\n\
:61:1604010401DR34,56NMSCNONREF\r\n\
:62F:C160401EUR1334,56\r\n\
-\r\n\
:20:STARTUMS\r\n\
:25:10020030/1234567\r\n\
:28C:0\r\n\
:60M:C160402EUR1334,56\r\n\
:61:160402D50,00NMSCNONREF\r\n\
:86:005?00LASTSCHRIFT?20EREF+E2E-77?21MREF+M-1?22CRED+DE98ZZZ09999999999\r\n\
?23SVWZ+Miete April\r\n\
:NS:22Ende\r\n\
:62F:C160402EUR1284,56\r\n\
-\r\n\
:20:STARTDISPE\r\n\
:25:10020030/1234567\r\n\
:28C:00001/001+@1@ \r\n\
:60F:C160402EUR1284,56\r\n\
:61:1604020402C7,50NTRFNONREF\r\n\
:86:166?00GUTSCHRIFT?20Vorgemerkt\r\n\
-\r\n";

pub fn at_at(crlf: &str) -> String {
    crlf.replace("\r\n", "@@")
}
