//! Display text for stored values
//!
//! Date formats use the spreadsheet notation (`yyyy-mm-dd HH:mm:ss`) and are
//! translated to `chrono` strftime before rendering.

use crate::config::{DEFAULT_DATE_FORMAT, INTEGER_FORMAT};
use crate::types::CellValue;
use chrono::NaiveDateTime;

/// Render `value` the way a spreadsheet would show it under `number_format`
pub fn render(value: &CellValue, number_format: Option<&str>) -> String {
    match value {
        CellValue::Empty | CellValue::Binary(_) => String::new(),
        CellValue::String(s) => s.clone(),
        CellValue::Int(i) => {
            let mut buffer = itoa::Buffer::new();
            buffer.format(*i).to_string()
        }
        CellValue::Float(f) => {
            if number_format == Some(INTEGER_FORMAT) && f.is_finite() {
                let mut buffer = itoa::Buffer::new();
                buffer.format(f.round() as i64).to_string()
            } else {
                f.to_string()
            }
        }
        CellValue::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        CellValue::DateTime(d) => format_date(d, number_format.unwrap_or(DEFAULT_DATE_FORMAT)),
    }
}

/// Format a date/time with a spreadsheet-style format string
pub fn format_date(value: &NaiveDateTime, format: &str) -> String {
    value.format(&to_strftime(format)).to_string()
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Year(usize),
    // month or minute, decided once neighbours are known
    M(usize),
    Day(usize),
    Hour(usize),
    Second(usize),
    AmPm,
    Literal(String),
}

fn tokenize(format: &str) -> Vec<Token> {
    let chars: Vec<char> = format.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c == '"' {
            let end = chars[i + 1..]
                .iter()
                .position(|&ch| ch == '"')
                .map(|p| i + 1 + p)
                .unwrap_or(chars.len());
            tokens.push(Token::Literal(chars[i + 1..end].iter().collect()));
            i = end + 1;
            continue;
        }

        if c == '\\' {
            if let Some(&next) = chars.get(i + 1) {
                tokens.push(Token::Literal(next.to_string()));
            }
            i += 2;
            continue;
        }

        let rest: String = chars[i..].iter().take(5).collect();
        if rest.eq_ignore_ascii_case("am/pm") {
            tokens.push(Token::AmPm);
            i += 5;
            continue;
        }

        let lower = c.to_ascii_lowercase();
        if matches!(lower, 'y' | 'm' | 'd' | 'h' | 's') {
            let run = chars[i..]
                .iter()
                .take_while(|ch| ch.to_ascii_lowercase() == lower)
                .count();
            tokens.push(match lower {
                'y' => Token::Year(run),
                'm' => Token::M(run),
                'd' => Token::Day(run),
                'h' => Token::Hour(run),
                _ => Token::Second(run),
            });
            i += run;
            continue;
        }

        tokens.push(Token::Literal(c.to_string()));
        i += 1;
    }

    tokens
}

fn is_minute(tokens: &[Token], index: usize) -> bool {
    let previous = tokens[..index]
        .iter()
        .rev()
        .find(|t| !matches!(t, Token::Literal(_)));
    let next = tokens[index + 1..]
        .iter()
        .find(|t| !matches!(t, Token::Literal(_)));
    matches!(previous, Some(Token::Hour(_))) || matches!(next, Some(Token::Second(_)))
}

/// Translate a spreadsheet date format into a strftime string
pub fn to_strftime(format: &str) -> String {
    let tokens = tokenize(format);
    let twelve_hour = tokens.contains(&Token::AmPm);
    let mut out = String::with_capacity(format.len() * 2);

    for (index, token) in tokens.iter().enumerate() {
        match token {
            Token::Year(n) if *n <= 2 => out.push_str("%y"),
            Token::Year(_) => out.push_str("%Y"),
            Token::M(n) if is_minute(&tokens, index) => {
                out.push_str(if *n == 1 { "%-M" } else { "%M" })
            }
            Token::M(1) => out.push_str("%-m"),
            Token::M(2) => out.push_str("%m"),
            Token::M(3) => out.push_str("%b"),
            Token::M(_) => out.push_str("%B"),
            Token::Day(1) => out.push_str("%-d"),
            Token::Day(2) => out.push_str("%d"),
            Token::Day(3) => out.push_str("%a"),
            Token::Day(_) => out.push_str("%A"),
            Token::Hour(n) => out.push_str(match (twelve_hour, *n == 1) {
                (true, true) => "%-I",
                (true, false) => "%I",
                (false, true) => "%-H",
                (false, false) => "%H",
            }),
            Token::Second(1) => out.push_str("%-S"),
            Token::Second(_) => out.push_str("%S"),
            Token::AmPm => out.push_str("%p"),
            Token::Literal(s) => out.push_str(&s.replace('%', "%%")),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(14, 7, 9)
            .unwrap()
    }

    #[test]
    fn test_default_date_format() {
        assert_eq!(to_strftime(DEFAULT_DATE_FORMAT), "%Y-%m-%d %H:%M:%S");
        assert_eq!(format_date(&sample(), DEFAULT_DATE_FORMAT), "2024-03-05 14:07:09");
    }

    #[test]
    fn test_month_minute_disambiguation() {
        assert_eq!(to_strftime("hh:mm"), "%H:%M");
        assert_eq!(to_strftime("mm:ss"), "%M:%S");
        assert_eq!(to_strftime("yyyy/mm"), "%Y/%m");
        assert_eq!(to_strftime("d mmm yy"), "%-d %b %y");
    }

    #[test]
    fn test_literals_and_am_pm() {
        assert_eq!(format_date(&sample(), "h:mm AM/PM"), "2:07 PM");
        assert_eq!(format_date(&sample(), r#"yyyy"年"m"月""#), "2024年3月");
        assert_eq!(to_strftime("100%"), "100%%");
    }

    #[test]
    fn test_render_values() {
        assert_eq!(render(&CellValue::Empty, None), "");
        assert_eq!(render(&CellValue::Int(-42), Some(INTEGER_FORMAT)), "-42");
        assert_eq!(render(&CellValue::Float(2.5), None), "2.5");
        assert_eq!(render(&CellValue::Float(2.6), Some(INTEGER_FORMAT)), "3");
        assert_eq!(render(&CellValue::Bool(true), None), "TRUE");
        assert_eq!(
            render(&CellValue::DateTime(sample()), Some("yyyy-mm-dd")),
            "2024-03-05"
        );
        assert_eq!(render(&CellValue::Binary(vec![1, 2, 3]), None), "");
    }
}
