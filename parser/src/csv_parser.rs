mod row;

use std::io::Read;
use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, trace};
use crate::error::ParseError;
use crate::input::StatementInput;
use crate::memo::parse_card_purchase;
use crate::model::{DatedBalance, Statement, Transaction, TransactionType};
use crate::settings::Settings;
use crate::utils::{convert_lvl_to_eur, format_minor_units, parse_amount, parse_date};

pub use row::{RowType, SwedbankRow};

/// Результат обработки одной строки выписки
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    /// строка ничего не поменяла: заголовок, неизвестный тип, повторный открывающий баланс
    Skipped,
    /// нормализованная транзакция
    Transaction(Transaction),
    /// записан открывающий баланс
    OpeningBalance,
    /// записан (или перезаписан) закрывающий баланс
    ClosingBalance,
}

/// Обрабатывает одну строку выписки.
///
/// `record_no` — номер записи с единицы, первая запись всегда заголовок.
/// Балансы и счёт пишутся прямо в `statement`, транзакция возвращается
/// вызывающему и в `statement` не добавляется.
pub fn parse_record(
    statement: &mut Statement,
    record_no: usize,
    record: &StringRecord,
) -> Result<RowOutcome, ParseError> {
    if record_no == 1 {
        trace!("skipping header row");
        return Ok(RowOutcome::Skipped);
    }

    let row = SwedbankRow::from_string_record(record)?;

    // счёт берём из первой строки, где он есть, и больше не трогаем
    if statement.account_id.is_none() && !row.account_id.is_empty() {
        statement.account_id = Some(row.account_id.clone());
    }

    let row_type = row.row_type.clone();
    match row_type {
        RowType::Transaction => {
            let tx = normalize_transaction(row)?;
            debug!(
                date = %tx.date,
                amount = %format_minor_units(tx.amount, '.'),
                trn_type = %tx.trn_type,
                "transaction"
            );
            Ok(RowOutcome::Transaction(tx))
        }
        RowType::OpeningBalance => {
            if statement.opening.is_some() {
                debug!(record_no, "opening balance already set, ignoring row");
                return Ok(RowOutcome::Skipped);
            }
            let balance = parse_dated_balance(&row)?;
            debug!(
                date = %balance.date,
                amount = %format_minor_units(balance.amount, '.'),
                "opening balance"
            );
            statement.opening = Some(balance);
            Ok(RowOutcome::OpeningBalance)
        }
        RowType::ClosingBalance => {
            let balance = parse_dated_balance(&row)?;
            debug!(
                date = %balance.date,
                amount = %format_minor_units(balance.amount, '.'),
                "closing balance"
            );
            statement.closing = Some(balance);
            Ok(RowOutcome::ClosingBalance)
        }
        RowType::Other(code) => {
            trace!(record_no, code = %code, "skipping row of unknown type");
            Ok(RowOutcome::Skipped)
        }
    }
}

fn parse_dated_balance(row: &SwedbankRow) -> Result<DatedBalance, ParseError> {
    Ok(DatedBalance {
        amount: parse_amount(&row.amount)?,
        date: parse_date(&row.date)?,
    })
}

fn normalize_transaction(row: SwedbankRow) -> Result<Transaction, ParseError> {
    let mut amount = parse_amount(&row.amount)?;
    if row.is_legacy_currency() {
        amount = convert_lvl_to_eur(amount)?;
    }

    let date = parse_date(&row.date)?;

    let mut trn_type = TransactionType::Deposit;
    if row.is_debit() {
        amount = -amount;
        trn_type = TransactionType::Debit;
    }
    // комиссия перекрывает дебет, знак суммы остаётся
    if row.is_service_charge() {
        trn_type = TransactionType::ServiceCharge;
    }

    let (date_user, check_no) = match parse_card_purchase(&row.memo)? {
        Some(purchase) => (Some(purchase.date_user), Some(purchase.check_no)),
        None => (None, None),
    };

    Ok(Transaction {
        date,
        date_user,
        payee: row.payee,
        memo: row.memo,
        amount,
        trn_type,
        check_no,
        id: row.reference,
    })
}

/// Парсер CSV-выписок Swedbank LV
#[derive(Debug, Clone, Default)]
pub struct SwedbankParser {
    settings: Settings,
}

impl SwedbankParser {
    pub fn new(settings: Settings) -> Self {
        SwedbankParser { settings }
    }

    /// Открывает источник и парсит выписку.
    ///
    /// Чем владеет парсер, а чем вызывающий, определяется вариантом [`StatementInput`].
    pub fn parse(&self, input: StatementInput<'_>) -> Result<Statement, ParseError> {
        debug!(source = input.kind(), charset = %self.settings.charset, "opening statement input");
        let reader = input.open()?;
        self.parse_reader(reader)
    }

    /// Парсит выписку из уже открытого потока в кодировке из настроек
    pub fn parse_reader<R: Read>(&self, reader: R) -> Result<Statement, ParseError> {
        let reader = self.settings.charset.decode(reader);
        let mut rdr = ReaderBuilder::new()
            .delimiter(b';')
            .quote(b'"')
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut statement = Statement::new(self.settings.currency.clone());

        for (idx, result) in rdr.records().enumerate() {
            let record_no = idx + 1;
            let record = result?;

            let outcome = parse_record(&mut statement, record_no, &record)
                .map_err(|e| e.at_line(record_no))?;

            if let RowOutcome::Transaction(tx) = outcome {
                statement.transactions.push(tx);
            }
        }

        debug!(
            account = statement.account_id.as_deref().unwrap_or(""),
            transactions = statement.transactions.len(),
            "statement parsed"
        );

        Ok(statement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Currency;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(line: &str) -> StringRecord {
        StringRecord::from(line.split(';').collect::<Vec<_>>())
    }

    fn transaction(line: &str) -> Transaction {
        let mut stmt = Statement::default();
        match parse_record(&mut stmt, 2, &record(line)).unwrap() {
            RowOutcome::Transaction(tx) => tx,
            other => panic!("expected transaction, got {other:?}"),
        }
    }

    #[test]
    fn header_row_is_skipped() {
        let mut stmt = Statement::default();
        let outcome = parse_record(&mut stmt, 1, &record("ACC1;20;02.01.2021;Shop;Coffee;5,50;EUR;D;;")).unwrap();
        assert_eq!(outcome, RowOutcome::Skipped);
        assert_eq!(stmt, Statement::default());
    }

    #[test]
    fn header_row_is_not_structurally_checked() {
        let mut stmt = Statement::default();
        let outcome = parse_record(&mut stmt, 1, &record("Klienta konts;Rindas tips")).unwrap();
        assert_eq!(outcome, RowOutcome::Skipped);
    }

    #[test]
    fn deposit_keeps_positive_amount() {
        let tx = transaction("ACC1;20;02.01.2021;Employer;Salary;1500,00;EUR;K;REF9;");
        assert_eq!(tx.amount, 150_000);
        assert_eq!(tx.trn_type, TransactionType::Deposit);
        assert_eq!(tx.date, date(2021, 1, 2));
        assert_eq!(tx.payee, "Employer");
        assert_eq!(tx.memo, "Salary");
        assert_eq!(tx.id, "REF9");
        assert_eq!(tx.date_user, None);
        assert_eq!(tx.check_no, None);
    }

    #[test]
    fn debit_negates_amount() {
        let tx = transaction("ACC1;20;02.01.2021;Shop;Coffee;5,50;EUR;D;;");
        assert_eq!(tx.amount, -550);
        assert_eq!(tx.trn_type, TransactionType::Debit);
    }

    #[test]
    fn service_charge_overrides_debit_and_keeps_sign() {
        let tx = transaction("ACC1;20;02.01.2021;;Monthly fee;1,42;EUR;D;;KOM");
        assert_eq!(tx.amount, -142);
        assert_eq!(tx.trn_type, TransactionType::ServiceCharge);
    }

    #[test]
    fn credit_service_charge_stays_positive() {
        let tx = transaction("ACC1;20;02.01.2021;;Fee refund;1,42;EUR;K;;KOM");
        assert_eq!(tx.amount, 142);
        assert_eq!(tx.trn_type, TransactionType::ServiceCharge);
    }

    #[test]
    fn lats_are_converted_to_euro() {
        let tx = transaction("ACC1;20;02.01.2013;Shop;Bread;100,00;LVL;D;;");
        assert_eq!(tx.amount, -14_229);
    }

    #[test]
    fn lowercase_lats_code_is_not_converted() {
        let tx = transaction("ACC1;20;02.01.2013;Shop;Bread;100,00;lvl;D;;");
        assert_eq!(tx.amount, -10_000);
    }

    #[test]
    fn oversized_amount_is_parse_error() {
        let mut stmt = Statement::default();
        let line = "ACC1;20;02.01.2021;Shop;Coffee;9999999999999999999999999999999999999;EUR;D;;";
        let err = parse_record(&mut stmt, 2, &record(line)).unwrap_err();
        assert!(matches!(err, ParseError::InvalidAmount(_)), "got {err:?}");
    }

    #[test]
    fn oversized_lats_amount_is_parse_error() {
        let mut stmt = Statement::default();
        let line = "ACC1;20;02.01.2013;Shop;Bread;9999999999999999999999999999999,00;LVL;D;;";
        let err = parse_record(&mut stmt, 2, &record(line)).unwrap_err();
        assert!(matches!(err, ParseError::InvalidAmount(_)), "got {err:?}");
    }

    #[test]
    fn card_memo_with_impossible_date_fails_loudly() {
        let mut stmt = Statement::default();
        let line = "ACC1;20;07.05.2021;SHOP;PIRKUMS 123 2021.13.40 SHOP (1);12,00;EUR;D;;";
        let err = parse_record(&mut stmt, 2, &record(line)).unwrap_err();
        assert!(matches!(err, ParseError::Date(_)), "got {err:?}");
    }

    #[test]
    fn other_currencies_pass_through() {
        let tx = transaction("ACC1;20;02.01.2021;Shop;Book;100.00;USD;;;");
        assert_eq!(tx.amount, 10_000);
    }

    #[test]
    fn card_purchase_memo_fills_user_date_and_check() {
        let tx = transaction(
            "ACC1;20;07.05.2021;SOME SHOP;PIRKUMS 123 2021.05.06 SOME SHOP (998877) extra;12,00;EUR;D;;",
        );
        assert_eq!(tx.date_user, Some(date(2021, 5, 6)));
        assert_eq!(tx.check_no.as_deref(), Some("998877"));
    }

    #[test]
    fn account_id_is_set_once() {
        let mut stmt = Statement::default();
        parse_record(&mut stmt, 2, &record("ACC1;10;01.01.2021;;;1000,00;EUR;;;")).unwrap();
        parse_record(&mut stmt, 3, &record("ACC2;20;02.01.2021;Shop;Coffee;5,50;EUR;D;;")).unwrap();
        assert_eq!(stmt.account_id.as_deref(), Some("ACC1"));
    }

    #[test]
    fn empty_account_field_does_not_set_account() {
        let mut stmt = Statement::default();
        parse_record(&mut stmt, 2, &record(";99;;;;;;;;")).unwrap();
        assert_eq!(stmt.account_id, None);
        parse_record(&mut stmt, 3, &record("ACC1;99;;;;;;;;")).unwrap();
        assert_eq!(stmt.account_id.as_deref(), Some("ACC1"));
    }

    #[test]
    fn second_opening_balance_is_ignored() {
        let mut stmt = Statement::default();
        let first = parse_record(&mut stmt, 2, &record("ACC1;10;01.01.2021;;;1000,00;EUR;;;")).unwrap();
        let second = parse_record(&mut stmt, 3, &record("ACC1;10;15.01.2021;;;1,00;EUR;;;")).unwrap();

        assert_eq!(first, RowOutcome::OpeningBalance);
        assert_eq!(second, RowOutcome::Skipped);
        assert_eq!(
            stmt.opening,
            Some(DatedBalance { amount: 100_000, date: date(2021, 1, 1) })
        );
    }

    #[test]
    fn second_opening_balance_is_not_parsed() {
        let mut stmt = Statement::default();
        parse_record(&mut stmt, 2, &record("ACC1;10;01.01.2021;;;1000,00;EUR;;;")).unwrap();
        let outcome = parse_record(&mut stmt, 3, &record("ACC1;10;garbage;;;garbage;EUR;;;")).unwrap();
        assert_eq!(outcome, RowOutcome::Skipped);
    }

    #[test]
    fn last_closing_balance_wins() {
        let mut stmt = Statement::default();
        parse_record(&mut stmt, 2, &record("ACC1;86;30.01.2021;;;950,00;EUR;;;")).unwrap();
        parse_record(&mut stmt, 3, &record("ACC1;86;31.01.2021;;;900,00;EUR;;;")).unwrap();
        assert_eq!(
            stmt.closing,
            Some(DatedBalance { amount: 90_000, date: date(2021, 1, 31) })
        );
    }

    #[test]
    fn unknown_row_type_is_ignored() {
        let mut stmt = Statement::default();
        let outcome = parse_record(&mut stmt, 2, &record("ACC1;82;31.01.2021;;Turnover;not a number;EUR;;;")).unwrap();
        assert_eq!(outcome, RowOutcome::Skipped);
        assert_eq!(stmt.opening, None);
        assert_eq!(stmt.closing, None);
    }

    #[test]
    fn bad_amount_fails_loudly() {
        let mut stmt = Statement::default();
        let err = parse_record(&mut stmt, 2, &record("ACC1;20;02.01.2021;Shop;Coffee;five;EUR;D;;")).unwrap_err();
        assert!(matches!(err, ParseError::InvalidAmount(_)));
    }

    #[test]
    fn bad_date_fails_loudly() {
        let mut stmt = Statement::default();
        let err = parse_record(&mut stmt, 2, &record("ACC1;86;2021-01-31;;;900,00;EUR;;;")).unwrap_err();
        assert!(matches!(err, ParseError::Date(_)));
    }

    #[test]
    fn short_row_fails() {
        let mut stmt = Statement::default();
        let err = parse_record(&mut stmt, 2, &record("ACC1;20;02.01.2021")).unwrap_err();
        assert!(matches!(err, ParseError::ShortRow { .. }));
    }

    #[test]
    fn parse_reader_collects_transactions_and_balances() {
        let data = "\
\"Klienta konts\";\"Rindas tips\";\"Datums\";\"Saņēmējs/Maksātājs\";\"Informācija saņēmējam\";\"Summa\";\"Valūta\";\"Debets/Kredīts\";\"Arhīva kods\";\"Maksājuma veids\"
ACC1;10;01.01.2021;;;1000,00;EUR;;;
ACC1;20;02.01.2021;Shop;Coffee;5,50;EUR;D;;
ACC1;86;31.01.2021;;;900,00;EUR;;;
";
        let stmt = SwedbankParser::default().parse_reader(data.as_bytes()).unwrap();

        assert_eq!(stmt.account_id.as_deref(), Some("ACC1"));
        assert_eq!(stmt.currency, Currency::EUR);
        assert_eq!(stmt.transactions.len(), 1);
        assert_eq!(stmt.transactions[0].amount, -550);
        assert_eq!(stmt.transactions[0].trn_type, TransactionType::Debit);
        assert_eq!(stmt.opening, Some(DatedBalance { amount: 100_000, date: date(2021, 1, 1) }));
        assert_eq!(stmt.closing, Some(DatedBalance { amount: 90_000, date: date(2021, 1, 31) }));
    }

    #[test]
    fn parse_reader_reports_failing_line() {
        let data = "header\nACC1;10;01.01.2021;;;1000,00;EUR;;;\nACC1;20;bad;Shop;Coffee;5,50;EUR;D;;\n";
        let err = SwedbankParser::default().parse_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, ParseError::AtLine { line: 3, .. }), "got {err:?}");
    }
}
