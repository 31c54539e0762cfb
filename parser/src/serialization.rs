use std::io::Write;
use csv::WriterBuilder;
use serde::Serialize;
use crate::error::ParseError;
use crate::model::{Statement, Transaction};
use crate::utils::format_minor_units;

/// Строка нормализованного CSV
#[derive(Debug, Serialize)]
struct NormalizedRow<'a> {
    date: String,
    date_user: String,
    payee: &'a str,
    memo: &'a str,
    amount: String,
    trntype: &'static str,
    check_no: &'a str,
    id: &'a str,
    currency: &'a str,
}

impl<'a> NormalizedRow<'a> {
    fn new(tx: &'a Transaction, currency: &'a str) -> Self {
        NormalizedRow {
            date: tx.date.format("%Y-%m-%d").to_string(),
            date_user: tx
                .date_user
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            payee: &tx.payee,
            memo: &tx.memo,
            amount: format_minor_units(tx.amount, '.'),
            trntype: tx.trn_type.code(),
            check_no: tx.check_no.as_deref().unwrap_or(""),
            id: &tx.id,
            currency,
        }
    }
}

impl Statement {
    /// Записывает транзакции выписки в нормализованный CSV
    /// (запятая как разделитель, первая строка — заголовки колонок)
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), ParseError> {
        let mut wtr = WriterBuilder::new()
            .has_headers(true)
            .from_writer(writer);

        let currency = self.currency.code();

        if self.transactions.is_empty() {
            // serialize пишет заголовки только вместе с первой записью
            wtr.write_record([
                "date", "date_user", "payee", "memo", "amount", "trntype", "check_no", "id", "currency",
            ])?;
        }

        for tx in &self.transactions {
            wtr.serialize(NormalizedRow::new(tx, currency))?;
        }

        wtr.flush()?;
        Ok(())
    }
}
