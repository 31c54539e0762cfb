use csv::StringRecord;
use crate::error::ParseError;

/// Минимальное число колонок в строке выписки
pub(crate) const MIN_FIELDS: usize = 10;

/// Тип строки выписки (колонка 1)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowType {
    /// "10" — открывающий баланс
    OpeningBalance,
    /// "20" — транзакция
    Transaction,
    /// "86" — закрывающий баланс
    ClosingBalance,
    /// служебные строки, которые парсер пропускает
    Other(String),
}

impl RowType {
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "10" => RowType::OpeningBalance,
            "20" => RowType::Transaction,
            "86" => RowType::ClosingBalance,
            other => RowType::Other(other.to_string()),
        }
    }
}

/// Строка выписки Swedbank LV с полями по именам
///
/// Расположение колонок:
/// 0 счёт, 1 тип строки, 2 дата, 3 получатель, 4 назначение, 5 сумма,
/// 6 валюта, 7 признак дебета, 8 референс, 9 код операции
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwedbankRow {
    pub account_id: String,
    pub row_type: RowType,
    pub date: String,
    pub payee: String,
    pub memo: String,
    pub amount: String,
    pub currency: String,
    pub dc_flag: String,
    pub reference: String,
    pub category: String,
}

impl SwedbankRow {
    /// признак дебета в колонке 7
    pub(crate) const DEBIT_MARK: &'static str = "D";
    /// код комиссии в колонке 9
    pub(crate) const SERVICE_CHARGE_CODE: &'static str = "KOM";
    /// код лата в колонке 6
    pub(crate) const LEGACY_CURRENCY: &'static str = "LVL";

    /// Распаковывает колонки записи в структуру.
    ///
    /// Лишние колонки в конце игнорируются.
    pub fn from_string_record(row: &StringRecord) -> Result<Self, ParseError> {
        if row.len() < MIN_FIELDS {
            return Err(ParseError::ShortRow { expected: MIN_FIELDS, found: row.len() });
        }

        // длина уже проверена
        let get = |idx: usize| -> String { row.get(idx).unwrap_or("").to_string() };

        Ok(SwedbankRow {
            account_id: get(0),
            row_type: RowType::from_code(&get(1)),
            date: get(2),
            payee: get(3),
            memo: get(4),
            amount: get(5),
            currency: get(6),
            dc_flag: get(7),
            reference: get(8),
            category: get(9),
        })
    }

    pub fn is_debit(&self) -> bool {
        self.dc_flag == Self::DEBIT_MARK
    }

    pub fn is_service_charge(&self) -> bool {
        self.category == Self::SERVICE_CHARGE_CODE
    }

    /// Сумма в латах, которую надо пересчитать в евро.
    ///
    /// Сравнение точное, без обрезки пробелов и смены регистра.
    pub fn is_legacy_currency(&self) -> bool {
        self.currency == Self::LEGACY_CURRENCY
    }
}
