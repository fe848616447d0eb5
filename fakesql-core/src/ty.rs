use std::fmt;
use std::str::FromStr;

use anyhow::bail;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use ulid::Ulid;

use crate::value::Value;

/// The declared type of a column or parameter.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub enum LogicalType {
    /// The type of the null literal. Never used as a column type.
    Null,
    Bool,
    Byte,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    Decimal,
    Char,
    Text,
    DateTime,
    Guid,
    Bytes,
}

impl FromStr for LogicalType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bool" | "boolean" => Ok(Self::Bool),
            "byte" | "tinyint" => Ok(Self::Byte),
            "smallint" | "int16" => Ok(Self::Int16),
            "int" | "integer" | "int32" => Ok(Self::Int32),
            "bigint" | "int64" => Ok(Self::Int64),
            "real" | "float" => Ok(Self::Float32),
            "double" => Ok(Self::Float64),
            "decimal" | "numeric" => Ok(Self::Decimal),
            "char" => Ok(Self::Char),
            "text" | "varchar" | "string" => Ok(Self::Text),
            "datetime" | "timestamp" => Ok(Self::DateTime),
            "guid" | "uniqueidentifier" => Ok(Self::Guid),
            "bytes" | "blob" | "varbinary" => Ok(Self::Bytes),
            _ => bail!("unhandled value `{s}` in LogicalType::from_str"),
        }
    }
}

impl LogicalType {
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The type a column gets when it is inferred from `value`.
    /// Nulls carry no type information so the column falls back to text.
    #[inline]
    pub fn infer(value: &Value) -> Self {
        match value.ty() {
            LogicalType::Null => LogicalType::Text,
            ty => ty,
        }
    }
}

impl fmt::Display for LogicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalType::Null => write!(f, "null"),
            LogicalType::Bool => write!(f, "boolean"),
            LogicalType::Byte => write!(f, "byte"),
            LogicalType::Int16 => write!(f, "smallint"),
            LogicalType::Int32 => write!(f, "int"),
            LogicalType::Int64 => write!(f, "bigint"),
            LogicalType::Float32 => write!(f, "real"),
            LogicalType::Float64 => write!(f, "double"),
            LogicalType::Decimal => write!(f, "decimal"),
            LogicalType::Char => write!(f, "char"),
            LogicalType::Text => write!(f, "text"),
            LogicalType::DateTime => write!(f, "datetime"),
            LogicalType::Guid => write!(f, "guid"),
            LogicalType::Bytes => write!(f, "bytes"),
        }
    }
}

/// A rust type that is stored as a [`Value`] of a fixed [`LogicalType`].
pub trait ValueType: Into<Value> {
    const LOGICAL_TYPE: LogicalType;
}

macro_rules! impl_value_type {
    ($($ty:ty => $logical:ident),* $(,)?) => {
        $(
            impl ValueType for $ty {
                const LOGICAL_TYPE: LogicalType = LogicalType::$logical;
            }
        )*
    };
}

impl_value_type! {
    bool => Bool,
    u8 => Byte,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    f32 => Float32,
    f64 => Float64,
    Decimal => Decimal,
    char => Char,
    String => Text,
    NaiveDateTime => DateTime,
    Ulid => Guid,
    Vec<u8> => Bytes,
}

impl<T: ValueType> ValueType for Option<T> {
    const LOGICAL_TYPE: LogicalType = T::LOGICAL_TYPE;
}
