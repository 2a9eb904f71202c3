//! Column decoding helpers shared by the query modules.

use std::str::FromStr;

use jiff::{civil::Date, Timestamp};
use rusqlite::{types::Type, Row};

use crate::models::plan::horizon_from;

/// Reads a text column and parses it with `FromStr`, reporting parse
/// failures as conversion errors on that column.
pub(crate) fn parse_column<T>(row: &Row, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw: String = row.get(idx)?;
    raw.parse::<T>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            format!("Invalid value '{raw}': {e}").into(),
        )
    })
}

/// Reads a nullable timestamp column.
pub(crate) fn optional_timestamp(row: &Row, idx: usize) -> rusqlite::Result<Option<Timestamp>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|s| {
        s.parse::<Timestamp>().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
        })
    })
    .transpose()
}

/// Reads an integer column that must fit in `u8`.
pub(crate) fn small_int(row: &Row, idx: usize) -> rusqlite::Result<u8> {
    let raw: i64 = row.get(idx)?;
    u8::try_from(raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, Type::Integer, Box::new(e))
    })
}

/// Reads an integer ID column.
pub(crate) fn id(row: &Row, idx: usize) -> rusqlite::Result<u64> {
    let raw: i64 = row.get(idx)?;
    u64::try_from(raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, Type::Integer, Box::new(e))
    })
}

/// Expands a stored start date and length into the horizon's day buckets.
pub(crate) fn horizon(row: &Row, start_idx: usize, len_idx: usize) -> rusqlite::Result<Vec<Date>> {
    let start: Date = parse_column(row, start_idx)?;
    let len: i64 = row.get(len_idx)?;
    let len = u16::try_from(len).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(len_idx, Type::Integer, Box::new(e))
    })?;
    horizon_from(start, len).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(start_idx, Type::Text, Box::new(e))
    })
}
