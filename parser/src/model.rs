use chrono::NaiveDate;
use std::fmt;

/// Тип для хранения денежных сумм в "центах", signed
pub type Balance = i128;

/// Валюты, которые встречаются в выписках Swedbank LV
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Currency {
    /// Евро
    EUR,
    /// Латвийский лат, выведен из обращения в 2014 году
    LVL,
    /// Американский доллар
    USD,

    /// Прочая валюта
    ///
    /// Содержится как строка в верхнем регистре
    Other(String),
}

impl Currency {
    /// Трёхбуквенный код валюты
    pub fn code(&self) -> &str {
        match self {
            Currency::EUR => "EUR",
            Currency::LVL => "LVL",
            Currency::USD => "USD",
            Currency::Other(code) => code,
        }
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::EUR
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Тип транзакции для дальнейшего экспорта
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionType {
    /// Поступление
    Deposit,
    /// Списание
    Debit,
    /// Комиссия банка
    ServiceCharge,
}

impl TransactionType {
    pub fn code(&self) -> &'static str {
        match self {
            TransactionType::Deposit => "DEP",
            TransactionType::Debit => "DEBIT",
            TransactionType::ServiceCharge => "SRVCHG",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Баланс вместе с датой, на которую он указан
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatedBalance {
    pub amount: Balance,
    pub date: NaiveDate,
}

/// Одна нормализованная транзакция из выписки.
///
/// Валюта отдельно не хранится: она общая для всей [`Statement`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    /// дата проводки
    pub date: NaiveDate,
    /// дата покупки по карте, если её удалось достать из назначения платежа
    pub date_user: Option<NaiveDate>,
    /// получатель/плательщик
    pub payee: String,
    /// назначение платежа
    pub memo: String,
    /// сумма со знаком (в "центах")
    pub amount: Balance,
    pub trn_type: TransactionType,
    /// номер чека по карте
    pub check_no: Option<String>,
    /// референс банка
    pub id: String,
}

/// Центральная структура библиотеки: одна выписка по одному счёту.
///
/// Заполняется построчно во время парсинга. Открывающий баланс пишется
/// не более одного раза, закрывающий перезаписывается последней строкой.
///
/// Пример использования:
/// ```no_run
/// use swedbank_lv::{Settings, StatementInput, SwedbankParser};
/// use std::path::Path;
///
/// let parser = SwedbankParser::new(Settings::default());
/// let statement = parser.parse(StatementInput::Path(Path::new("statement.csv")))?;
///
/// for tx in &statement.transactions {
///     println!("{tx}");
/// }
/// # Ok::<(), swedbank_lv::ParseError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Statement {
    /// идентификатор счёта
    pub account_id: Option<String>,
    /// валюта отчёта
    pub currency: Currency,
    /// открывающий баланс
    pub opening: Option<DatedBalance>,
    /// закрывающий баланс
    pub closing: Option<DatedBalance>,
    /// транзакции в порядке строк файла
    pub transactions: Vec<Transaction>,
}

impl Statement {
    /// Пустая выписка в заданной валюте
    pub fn new(currency: Currency) -> Self {
        Statement {
            currency,
            ..Default::default()
        }
    }

    /// Сумма всех транзакций выписки
    pub fn net_movement(&self) -> Balance {
        self.transactions.iter().map(|tx| tx.amount).sum()
    }

    /// Сходится ли открывающий баланс + обороты с закрывающим.
    ///
    /// `None`, если одного из балансов нет.
    pub fn is_balanced(&self) -> Option<bool> {
        let opening = self.opening?;
        let closing = self.closing?;
        Some(opening.amount + self.net_movement() == closing.amount)
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let date_user_str = self
            .date_user
            .map(|d| d.to_string())
            .unwrap_or_default();

        let check_no_str = self.check_no.as_deref().unwrap_or("");

        write!(
            f,
            "{:<10} {:<10} {:<6} {:>15} {} {} {}",
            self.date,
            date_user_str,
            self.trn_type,
            crate::utils::format_minor_units(self.amount, '.'),
            check_no_str,
            self.payee,
            self.memo,
        )
    }
}
