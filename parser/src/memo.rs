use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use crate::error::ParseError;

/// Покупка по карте: `PIRKUMS <карта> <YYYY.MM.DD> <текст> (<чек>)<текст>`
static CARD_PURCHASE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^PIRKUMS \d+ (\d{4}\.\d{2}\.\d{2}) .* \((\d+)\).*")
        .expect("valid card purchase regex")
});

/// Данные покупки по карте, извлечённые из назначения платежа
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardPurchase {
    /// дата покупки (отличается от даты проводки)
    pub date_user: NaiveDate,
    /// номер чека
    pub check_no: String,
}

/// Пытается распознать покупку по карте в тексте назначения платежа.
///
/// Отсутствие совпадения — не ошибка. Если шаблон совпал, а дата в нём
/// несуществующая, возвращается ошибка парсинга даты.
pub fn parse_card_purchase(memo: &str) -> Result<Option<CardPurchase>, ParseError> {
    let Some(caps) = CARD_PURCHASE_RE.captures(memo) else {
        return Ok(None);
    };

    let raw_date = caps[1].replace('.', "-");
    let date_user = NaiveDate::parse_from_str(&raw_date, "%Y-%m-%d")?;

    Ok(Some(CardPurchase {
        date_user,
        check_no: caps[2].to_string(),
    }))
}
