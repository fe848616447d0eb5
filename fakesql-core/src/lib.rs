#![deny(rust_2018_idioms)]

mod record;
pub mod ty;
pub mod value;

pub use smol_str::SmolStr;

pub use self::record::{Field, FieldSelection, Record, Visibility};
pub use self::ty::{LogicalType, ValueType};
pub use self::value::{CastError, Decimal, FromValue, NaiveDateTime, Ulid, Value};

