use std::convert::From;
use std::io;

use thiserror::Error;

use crate::table::TableError;

#[derive(Debug, Error)]
#[error("LoadError {kind:?} {message}")]
pub struct LoadError {
    pub kind: LoadErrorKind,
    pub message: String,
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum LoadErrorKind {
    Io,
    Csv,
    MissingHeader,
    InvalidKey,
    InvalidValue,
    Table,
}

impl LoadError {
    pub(super) fn new(kind: LoadErrorKind, message: String) -> Self {
        LoadError { kind, message }
    }
}

impl From<io::Error> for LoadError {
    fn from(error: io::Error) -> Self {
        LoadError { kind: LoadErrorKind::Io, message: error.to_string() }
    }
}

impl From<csv::Error> for LoadError {
    fn from(error: csv::Error) -> Self {
        LoadError { kind: LoadErrorKind::Csv, message: error.to_string() }
    }
}

impl From<TableError> for LoadError {
    fn from(error: TableError) -> Self {
        LoadError { kind: LoadErrorKind::Table, message: error.to_string() }
    }
}
