use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::ParseError;

/// Источник данных выписки.
///
/// Вариант определяет, кто владеет ресурсом:
/// - [`StatementInput::Path`] — парсер сам открывает файл и сам его закрывает;
/// - [`StatementInput::Bytes`] — сырые байты в памяти;
/// - [`StatementInput::Owned`] — парсер забирает поток и закрывает его по окончании;
/// - [`StatementInput::Borrowed`] — поток остаётся у вызывающего, парсер его не закрывает.
pub enum StatementInput<'a> {
    Path(&'a Path),
    Bytes(&'a [u8]),
    Owned(Box<dyn Read + 'a>),
    Borrowed(&'a mut dyn Read),
}

impl<'a> StatementInput<'a> {
    /// Открывает источник для чтения.
    ///
    /// Возвращённый reader владеет файлом для `Path` и потоком для `Owned`,
    /// поэтому они закрываются вместе с ним на любом пути выхода.
    pub(crate) fn open(self) -> Result<Box<dyn Read + 'a>, ParseError> {
        match self {
            StatementInput::Path(path) => {
                let file = File::open(path)?;
                Ok(Box::new(BufReader::new(file)))
            }
            StatementInput::Bytes(bytes) => Ok(Box::new(bytes)),
            StatementInput::Owned(reader) => Ok(reader),
            StatementInput::Borrowed(reader) => Ok(Box::new(reader)),
        }
    }

    pub(crate) fn kind(&self) -> &'static str {
        match self {
            StatementInput::Path(_) => "path",
            StatementInput::Bytes(_) => "bytes",
            StatementInput::Owned(_) => "owned reader",
            StatementInput::Borrowed(_) => "borrowed reader",
        }
    }
}
