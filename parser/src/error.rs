use std::io::Error as IoError;
use chrono::ParseError as ChronoParseError;
use thiserror::Error;

/// Ошибки при парсинге выписки
#[derive(Debug, Error)]
pub enum ParseError {
    // обёртки

    /// обёртка csv::Error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    /// обёртка chrono::ParseError
    #[error("date parse error: {0}")]
    Date(#[from] ChronoParseError),
    /// обёртка std::num::ParseIntError
    #[error("number parse error: {0}")]
    Int(#[from] std::num::ParseIntError),
    /// обёртка std::io::Error
    #[error("io error: {0}")]
    Io(#[from] IoError),

    // логические ошибки

    /// ошибка при парсинге валюты
    #[error("invalid currency: {0}")]
    InvalidCurrency(String),
    /// ошибка при парсинге денежной суммы
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    /// в строке меньше колонок, чем требует формат
    #[error("row has {found} fields, expected at least {expected}")]
    ShortRow { expected: usize, found: usize },
    /// кодировка, которую парсер не умеет читать
    #[error("unsupported charset: {0}")]
    UnsupportedCharset(String),
    /// ошибка, привязанная к номеру строки входного файла (с единицы)
    #[error("line {line}: {source}")]
    AtLine {
        line: usize,
        #[source]
        source: Box<ParseError>,
    },
}

impl ParseError {
    pub(crate) fn at_line(self, line: usize) -> Self {
        ParseError::AtLine { line, source: Box::new(self) }
    }
}
