//! Разбор многоцелевого поля :86: (`GVC?00текст?20текст...`).

use std::collections::BTreeMap;

/// Обычная длина строки назначения платежа.
const REMITTANCE_LINE_LEN: usize = 27;

/// Результат разбора :86:. Ничего не мутирует снаружи — всё возвращается здесь.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Tag86 {
    /// Сырые подполя `?NN`, ключ — номер.
    pub fields: BTreeMap<u8, String>,
    pub booking_code: String,
    pub booking_text: String,
    pub primanota_number: String,
    pub description_1: String,
    pub description_2: String,
    pub bank_code: String,
    pub account_number: String,
    pub name: String,
    pub text_key_addition: String,
    /// Непустые строки назначения (?20-?29, ?60-?63) в исходном порядке.
    pub remittance_lines: Vec<String>,
    pub structured_description: BTreeMap<String, String>,
}

impl Tag86 {
    fn field(&self, index: u8) -> &str {
        self.fields.get(&index).map(String::as_str).unwrap_or("")
    }
}

pub(crate) fn decode(raw: &str) -> Tag86 {
    let booking_code: String = raw.chars().take(3).collect();
    let normalized = raw.replace("? ", "?");

    let mut out = Tag86 {
        booking_code,
        ..Tag86::default()
    };

    for (index, text) in sub_fields(&normalized) {
        match index {
            20..=29 => out.description_1.push_str(text),
            60..=63 => out.description_2.push_str(text),
            _ => {}
        }
        if matches!(index, 20..=29 | 60..=63) && !text.is_empty() {
            out.remittance_lines.push(text.to_string());
        }
        out.fields.insert(index, text.to_string());
    }

    out.booking_text = out.field(0).trim().to_string();
    out.primanota_number = out.field(10).trim().to_string();
    out.description_1 = out.description_1.trim().to_string();
    out.bank_code = out.field(30).trim().to_string();
    out.account_number = out.field(31).trim().to_string();
    out.name = format!("{}{}", out.field(32), out.field(33)).trim().to_string();
    out.text_key_addition = out.field(34).trim().to_string();
    out.structured_description = structured_description(&out.remittance_lines);
    out
}

/// Все вхождения `?NN<текст>`, где текст непуст и тянется до следующего `?`.
fn sub_fields(s: &str) -> Vec<(u8, &str)> {
    let bytes = s.as_bytes();
    let mut out = Vec::new();
    let mut pos = 0;

    while let Some(q) = s[pos..].find('?').map(|i| pos + i) {
        let digits = bytes.get(q + 1..q + 3);
        let text_start = q + 3;
        let text_end = s
            .get(text_start..)
            .and_then(|t| t.find('?'))
            .map(|i| text_start + i)
            .unwrap_or(s.len());

        match digits {
            Some(d) if d.iter().all(u8::is_ascii_digit) && text_end > text_start => {
                let index = (d[0] - b'0') * 10 + (d[1] - b'0');
                out.push((index, &s[text_start..text_end]));
                pos = text_end;
            }
            _ => pos = q + 1,
        }
    }
    out
}

/// Разбивает строки назначения на SEPA-ключи (`EREF+`, `SVWZ+`, ...).
/// Если первая строка не начинается с `XXXX+`, весь текст уходит в `SVWZ`.
pub(crate) fn structured_description(lines: &[String]) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();

    if !lines.first().is_some_and(|l| opens_tag(l)) {
        out.insert("SVWZ".to_string(), lines.concat());
        return out;
    }

    let mut current: Option<(String, String)> = None;
    for line in lines {
        if opens_tag(line) {
            if let Some((key, value)) = current.take() {
                out.insert(key, value.trim().to_string());
            }
            let key: String = line.chars().take(4).collect();
            let value: String = line.chars().skip(5).collect();
            current = Some((key, value));
        } else if let Some((_, value)) = current.as_mut() {
            value.push_str(line);
        }

        // короткая строка: либо конец значения, либо банк срезал хвостовые
        // пробелы; один пробел сохраняет границу слов, лишний срежется trim
        if line.chars().count() < REMITTANCE_LINE_LEN {
            if let Some((_, value)) = current.as_mut() {
                value.push(' ');
            }
        }
    }
    if let Some((key, value)) = current {
        out.insert(key, value.trim().to_string());
    }
    out
}

fn opens_tag(line: &str) -> bool {
    line.chars().nth(4) == Some('+')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_fields() {
        let t = decode(
            "166?00SEPA-UEBERWEISUNG?109310?20EREF+ABC123?21SVWZ+SOME PAYMENT?22INFO\
             ?30DEUTDEFF?31DE89370400440532013000?32MAX MUSTER?33MANN?34997",
        );
        assert_eq!(t.booking_code, "166");
        assert_eq!(t.booking_text, "SEPA-UEBERWEISUNG");
        assert_eq!(t.primanota_number, "9310");
        assert_eq!(t.description_1, "EREF+ABC123SVWZ+SOME PAYMENTINFO");
        assert_eq!(t.bank_code, "DEUTDEFF");
        assert_eq!(t.account_number, "DE89370400440532013000");
        assert_eq!(t.name, "MAX MUSTERMANN");
        assert_eq!(t.text_key_addition, "997");
        assert_eq!(t.structured_description["EREF"], "ABC123");
        assert_eq!(t.structured_description["SVWZ"], "SOME PAYMENT INFO");
    }

    #[test]
    fn space_after_question_mark_is_dropped() {
        let t = decode("005? 00LASTSCHRIFT? 20Miete");
        assert_eq!(t.booking_text, "LASTSCHRIFT");
        assert_eq!(t.remittance_lines, vec!["Miete".to_string()]);
    }

    #[test]
    fn description_2_is_not_trimmed() {
        let t = decode("166?20A?60 tail ?61more ");
        assert_eq!(t.description_2, " tail more ");
        assert_eq!(t.remittance_lines, vec!["A", " tail ", "more "]);
    }

    #[test]
    fn empty_and_invalid_markers_are_skipped() {
        let t = decode("166?20?21Text?x?2");
        assert_eq!(t.fields.get(&20), None);
        assert_eq!(t.fields.get(&21).map(String::as_str), Some("Text"));
        assert_eq!(t.remittance_lines, vec!["Text".to_string()]);
    }

    #[test]
    fn unstructured_falls_back_to_svwz() {
        let t = decode("166?2020+TEST?21SOME PAYMENT?24INFO");
        assert_eq!(t.structured_description.len(), 1);
        assert_eq!(t.structured_description["SVWZ"], "20+TESTSOME PAYMENTINFO");
    }

    #[test]
    fn no_lines_gives_empty_svwz() {
        let t = decode("166?00GUTSCHRIFT");
        assert_eq!(t.structured_description["SVWZ"], "");
    }

    #[test]
    fn full_length_lines_are_joined_without_space() {
        let lines = vec![
            "SVWZ+RECHNUNG 2016-04 KUNDE".to_string(),
            "NNUMMER 4711".to_string(),
        ];
        assert_eq!(lines[0].chars().count(), 27);
        let s = structured_description(&lines);
        assert_eq!(s["SVWZ"], "RECHNUNG 2016-04 KUNDENNUMMER 4711");
    }

    #[test]
    fn repeated_key_keeps_last_value() {
        let lines = vec!["SVWZ+eins".to_string(), "SVWZ+zwei".to_string()];
        assert_eq!(structured_description(&lines)["SVWZ"], "zwei");
    }
}
