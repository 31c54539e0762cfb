//! Парсер CSV-выписок латвийского Swedbank.
//!
//! Превращает выгрузку банка (`;` как разделитель) в нормализованную [`Statement`]:
//! счёт, открывающий и закрывающий балансы, список транзакций.

pub mod error;
pub mod model;
pub mod csv_parser;
pub mod memo;
pub mod input;
pub mod settings;
pub mod serialization;

mod utils;

pub use crate::model::{Statement, Transaction, TransactionType, Currency, Balance, DatedBalance};
pub use crate::csv_parser::{SwedbankParser, RowOutcome, parse_record};
pub use crate::input::StatementInput;
pub use crate::settings::{Settings, Charset};
pub use crate::error::ParseError;
