use chrono::NaiveDate;
use crate::model::{Balance, Currency};
use crate::error::ParseError;

/// Формат даты в колонках выписки
pub(crate) const DATE_FORMAT: &str = "%d.%m.%Y";

/// Курс фиксации лата: 0.702804 LVL за 1 EUR, в миллионных долях
const LVL_PER_EUR_MICROS: i128 = 702_804;

pub(crate) fn parse_currency(raw: &str) -> Currency {
    let s = raw.trim();
    let upper = s.to_uppercase();

    match upper.as_str() {
        "EUR" => Currency::EUR,
        "LVL" => Currency::LVL,
        "USD" => Currency::USD,

        // Всё остальное — как есть:
        _ => Currency::Other(upper),
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, ParseError> {
    Ok(NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)?)
}

/// Разбирает сумму в "центы".
///
/// Допускает десятичную запятую вместо точки и ведущий минус.
pub(crate) fn parse_amount(raw: &str) -> Result<Balance, ParseError> {
    let cleaned = raw.trim().replace(' ', "").replace(',', ".");

    if cleaned.is_empty() {
        return Err(ParseError::InvalidAmount("empty amount".into()));
    }

    let (negative, unsigned) = match cleaned.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, cleaned.as_str()),
    };

    let mut split = unsigned.split('.');
    // split всегда отдаёт хотя бы один элемент
    let int_part = split.next().unwrap_or("");
    let dec_part = split.next().unwrap_or("");
    if split.next().is_some() {
        // больше одного разделителя — странный формат
        return Err(ParseError::InvalidAmount(format!("too many separators in amount: {raw}")));
    }

    if int_part.is_empty() || !int_part.chars().all(|c| c.is_ascii_digit()) {
        return Err(ParseError::InvalidAmount(format!("invalid integer part: {raw}")));
    }
    if !dec_part.chars().all(|c| c.is_ascii_digit()) {
        return Err(ParseError::InvalidAmount(format!("invalid fractional part: {raw}")));
    }

    let int_part: i128 = int_part.parse()?;

    let dec_part: i128 = match dec_part.len() {
        0 => 0,
        1 => dec_part.parse::<i128>()? * 10,
        2 => dec_part.parse()?,
        _ => {
            return Err(ParseError::InvalidAmount(format!("too many fractional digits in amount: {raw}")));
        }
    };

    let minor = int_part
        .checked_mul(100)
        .and_then(|v| v.checked_add(dec_part))
        .ok_or_else(|| ParseError::InvalidAmount(format!("amount out of range: {raw}")))?;
    Ok(if negative { -minor } else { minor })
}

/// Пересчитывает сумму в латах в евро по курсу фиксации.
///
/// Округление до цента, половина — от нуля.
pub(crate) fn convert_lvl_to_eur(minor: Balance) -> Result<Balance, ParseError> {
    let scaled = minor.checked_mul(1_000_000).ok_or_else(|| {
        ParseError::InvalidAmount(format!("LVL amount out of range: {minor}"))
    })?;
    let quotient = scaled / LVL_PER_EUR_MICROS;
    let remainder = scaled % LVL_PER_EUR_MICROS;

    if 2 * remainder.abs() >= LVL_PER_EUR_MICROS {
        Ok(quotient + scaled.signum())
    } else {
        Ok(quotient)
    }
}

/// Форматирует сумму в "центах" в человекочитаемый вид, со знаком
pub(crate) fn format_minor_units(value: Balance, decimal_separator: char) -> String {
    let sign = if value < 0 { "-" } else { "" };
    let v = value.unsigned_abs();
    let units = v / 100;
    let frac = v % 100;

    format!("{sign}{units}{decimal_separator}{frac:02}")
}
