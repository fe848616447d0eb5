use std::error::Error;
use std::fmt;

pub use chrono::NaiveDateTime;
use itertools::Itertools;
pub use rust_decimal::Decimal;
pub use ulid::Ulid;

use crate::ty::LogicalType;

pub struct CastError {
    value: Value,
    target: &'static str,
}

impl CastError {
    pub fn new<T>(value: Value) -> Self {
        Self { value, target: std::any::type_name::<T>() }
    }

    #[inline]
    pub fn value(&self) -> &Value {
        &self.value
    }

    #[inline]
    pub fn target(&self) -> &'static str {
        self.target
    }
}

impl fmt::Debug for CastError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl fmt::Display for CastError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot cast value {:?} of type {} to {}", self.value, self.value.ty(), self.target)
    }
}

impl Error for CastError {}

/// A cell, parameter or scalar value.
///
/// Equality is strict: values of different variants are never equal, so `Int32(1)`
/// does not equal `Int64(1)` nor `Text("1")`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Byte(u8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    Decimal(Decimal),
    Char(char),
    Text(String),
    DateTime(NaiveDateTime),
    Guid(Ulid),
    Bytes(Box<[u8]>),
}

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                #[inline]
                fn from(v: $ty) -> Self {
                    Self::$variant(v)
                }
            }
        )*
    };
}

impl_from! {
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
    Box<[u8]> => Bytes,
}

impl From<&str> for Value {
    #[inline]
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

impl From<Vec<u8>> for Value {
    #[inline]
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(v.into_boxed_slice())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    #[inline]
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl Value {
    #[inline]
    pub fn take(&mut self) -> Self {
        std::mem::replace(self, Value::Null)
    }

    #[inline]
    pub fn cast<T: FromValue>(self) -> Result<Option<T>, CastError> {
        if self.is_null() {
            return Ok(None);
        }

        self.cast_non_null().map(Some)
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[inline]
    pub fn cast_non_null<T: FromValue>(self) -> Result<T, CastError> {
        if self.is_null() {
            return Err(CastError::new::<T>(self));
        }

        T::from_value(self)
    }

    #[inline]
    pub fn ty(&self) -> LogicalType {
        match self {
            Value::Null => LogicalType::Null,
            Value::Bool(_) => LogicalType::Bool,
            Value::Byte(_) => LogicalType::Byte,
            Value::Int16(_) => LogicalType::Int16,
            Value::Int32(_) => LogicalType::Int32,
            Value::Int64(_) => LogicalType::Int64,
            Value::Float32(_) => LogicalType::Float32,
            Value::Float64(_) => LogicalType::Float64,
            Value::Decimal(_) => LogicalType::Decimal,
            Value::Char(_) => LogicalType::Char,
            Value::Text(_) => LogicalType::Text,
            Value::DateTime(_) => LogicalType::DateTime,
            Value::Guid(_) => LogicalType::Guid,
            Value::Bytes(_) => LogicalType::Bytes,
        }
    }
}

impl fmt::Display for Value {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Byte(b) => write!(f, "{b}"),
            Value::Int16(i) => write!(f, "{i}"),
            Value::Int32(i) => write!(f, "{i}"),
            Value::Int64(i) => write!(f, "{i}"),
            Value::Float32(x) => write!(f, "{x}"),
            Value::Float64(x) => write!(f, "{x}"),
            Value::Decimal(d) => write!(f, "{d}"),
            Value::Char(c) => write!(f, "{c}"),
            Value::Text(s) => write!(f, "{s}"),
            Value::DateTime(dt) => write!(f, "{dt}"),
            Value::Guid(id) => write!(f, "{id}"),
            Value::Bytes(bytes) => write!(f, "[{:02x}]", bytes.iter().format(" ")),
        }
    }
}

/// Checked conversion from a [`Value`] into a rust value.
///
/// Only exact variant matches and lossless widenings succeed.
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Result<Self, CastError>;
}

impl FromValue for Value {
    #[inline]
    fn from_value(value: Value) -> Result<Self, CastError> {
        Ok(value)
    }
}

impl<T: FromValue> FromValue for Option<T> {
    #[inline]
    fn from_value(value: Value) -> Result<Self, CastError> {
        value.cast()
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self, CastError> {
        match value {
            Value::Bool(b) => Ok(b),
            _ => Err(CastError::new::<Self>(value)),
        }
    }
}

impl FromValue for u8 {
    fn from_value(value: Value) -> Result<Self, CastError> {
        match value {
            Value::Byte(b) => Ok(b),
            _ => Err(CastError::new::<Self>(value)),
        }
    }
}

impl FromValue for i16 {
    fn from_value(value: Value) -> Result<Self, CastError> {
        match value {
            Value::Byte(b) => Ok(b.into()),
            Value::Int16(i) => Ok(i),
            _ => Err(CastError::new::<Self>(value)),
        }
    }
}

impl FromValue for i32 {
    fn from_value(value: Value) -> Result<Self, CastError> {
        match value {
            Value::Byte(b) => Ok(b.into()),
            Value::Int16(i) => Ok(i.into()),
            Value::Int32(i) => Ok(i),
            _ => Err(CastError::new::<Self>(value)),
        }
    }
}

impl FromValue for i64 {
    fn from_value(value: Value) -> Result<Self, CastError> {
        match value {
            Value::Byte(b) => Ok(b.into()),
            Value::Int16(i) => Ok(i.into()),
            Value::Int32(i) => Ok(i.into()),
            Value::Int64(i) => Ok(i),
            _ => Err(CastError::new::<Self>(value)),
        }
    }
}

impl FromValue for f32 {
    fn from_value(value: Value) -> Result<Self, CastError> {
        match value {
            Value::Float32(x) => Ok(x),
            _ => Err(CastError::new::<Self>(value)),
        }
    }
}

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self, CastError> {
        match value {
            Value::Float32(x) => Ok(x.into()),
            Value::Float64(x) => Ok(x),
            _ => Err(CastError::new::<Self>(value)),
        }
    }
}

impl FromValue for Decimal {
    fn from_value(value: Value) -> Result<Self, CastError> {
        match value {
            Value::Decimal(d) => Ok(d),
            _ => Err(CastError::new::<Self>(value)),
        }
    }
}

impl FromValue for char {
    fn from_value(value: Value) -> Result<Self, CastError> {
        match value {
            Value::Char(c) => Ok(c),
            _ => Err(CastError::new::<Self>(value)),
        }
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self, CastError> {
        match value {
            Value::Text(s) => Ok(s),
            _ => Err(CastError::new::<Self>(value)),
        }
    }
}

impl FromValue for NaiveDateTime {
    fn from_value(value: Value) -> Result<Self, CastError> {
        match value {
            Value::DateTime(dt) => Ok(dt),
            _ => Err(CastError::new::<Self>(value)),
        }
    }
}

impl FromValue for Ulid {
    fn from_value(value: Value) -> Result<Self, CastError> {
        match value {
            Value::Guid(id) => Ok(id),
            _ => Err(CastError::new::<Self>(value)),
        }
    }
}

impl FromValue for Box<[u8]> {
    fn from_value(value: Value) -> Result<Self, CastError> {
        match value {
            Value::Bytes(b) => Ok(b),
            _ => Err(CastError::new::<Self>(value)),
        }
    }
}

impl FromValue for Vec<u8> {
    #[inline]
    fn from_value(value: Value) -> Result<Self, CastError> {
        match value {
            Value::Bytes(b) => Ok(b.into_vec()),
            _ => Err(CastError::new::<Self>(value)),
        }
    }
}
