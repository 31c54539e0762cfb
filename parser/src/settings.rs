use std::fmt;
use std::io::{self, Read};
use std::str::FromStr;
use encoding_rs::{Encoding, UTF_8};
use encoding_rs_io::{DecodeReaderBytes, DecodeReaderBytesBuilder};
use crate::error::ParseError;
use crate::model::Currency;
use crate::utils::parse_currency;

/// Кодировка входного файла
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Charset(&'static Encoding);

impl Charset {
    pub fn encoding(&self) -> &'static Encoding {
        self.0
    }

    /// Оборачивает поток так, чтобы на выходе всегда был UTF-8.
    ///
    /// UTF-8 пропускается как есть: битые байты должен увидеть csv-ридер.
    pub(crate) fn decode<R: Read>(&self, reader: R) -> Decoded<R> {
        if self.0 == UTF_8 {
            Decoded::Utf8(reader)
        } else {
            Decoded::Transcoded(
                DecodeReaderBytesBuilder::new()
                    .encoding(Some(self.0))
                    .build(reader),
            )
        }
    }
}

impl Default for Charset {
    fn default() -> Self {
        Charset(UTF_8)
    }
}

impl FromStr for Charset {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim();
        Encoding::for_label(label.as_bytes())
            .map(Charset)
            .ok_or_else(|| ParseError::UnsupportedCharset(label.to_string()))
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.name())
    }
}

/// Поток, перекодированный в UTF-8
pub(crate) enum Decoded<R: Read> {
    Utf8(R),
    Transcoded(DecodeReaderBytes<R, Vec<u8>>),
}

impl<R: Read> Read for Decoded<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Decoded::Utf8(r) => r.read(buf),
            Decoded::Transcoded(r) => r.read(buf),
        }
    }
}

/// Настройки парсера
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Settings {
    /// валюта отчёта
    pub currency: Currency,
    /// кодировка входного файла
    pub charset: Charset,
}

impl Settings {
    /// Собирает настройки из строковых значений, как их передаёт CLI
    pub fn from_strings(currency: &str, charset: &str) -> Result<Self, ParseError> {
        let code = currency.trim();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ParseError::InvalidCurrency(currency.to_string()));
        }

        Ok(Settings {
            currency: parse_currency(code),
            charset: charset.parse()?,
        })
    }
}
