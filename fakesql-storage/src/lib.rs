#![deny(rust_2018_idioms)]

mod cursor;
mod data_record;
mod error;
mod row;
mod table;

pub use fakesql_core::{LogicalType, Value};

pub use self::cursor::{CursorState, DataReader, Rows};
pub use self::data_record::{DataRecord, RecordColumn};
pub use self::error::{Error, Result};
pub use self::row::Row;
pub use self::table::{Column, Table};
