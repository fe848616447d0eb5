use fakesql_core::{FromValue, LogicalType, Value};
use smol_str::SmolStr;

use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct RecordColumn {
    name: SmolStr,
    value: Value,
    ty: Option<LogicalType>,
}

impl RecordColumn {
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// The declared type, if one was given.
    #[inline]
    pub fn declared_type(&self) -> Option<LogicalType> {
        self.ty
    }
}

/// A single row detached from any table: named values in column order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataRecord {
    columns: Vec<RecordColumn>,
}

impl DataRecord {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl AsRef<str>, value: impl Into<Value>) {
        self.columns.push(RecordColumn { name: SmolStr::new(name), value: value.into(), ty: None });
    }

    pub fn push_typed(&mut self, name: impl AsRef<str>, value: impl Into<Value>, ty: LogicalType) {
        self.columns.push(RecordColumn {
            name: SmolStr::new(name),
            value: value.into(),
            ty: Some(ty),
        });
    }

    #[inline]
    pub fn columns(&self) -> &[RecordColumn] {
        &self.columns
    }

    #[inline]
    pub fn field_count(&self) -> usize {
        self.columns.len()
    }

    /// The ordinal of the column named `name`, if present.
    pub fn get_ordinal(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column.name == name)
    }

    pub fn get_name(&self, ordinal: usize) -> Result<&str> {
        self.column(ordinal).map(RecordColumn::name)
    }

    pub fn get_value(&self, ordinal: usize) -> Result<&Value> {
        self.column(ordinal).map(RecordColumn::value)
    }

    #[inline]
    pub fn is_null(&self, ordinal: usize) -> Result<bool> {
        self.get_value(ordinal).map(Value::is_null)
    }

    /// The type of the value at `ordinal`. A null value reports its declared type when it has
    /// one.
    pub fn get_field_type(&self, ordinal: usize) -> Result<LogicalType> {
        let column = self.column(ordinal)?;
        Ok(match (&column.value, column.ty) {
            (Value::Null, Some(ty)) => ty,
            (value, _) => value.ty(),
        })
    }

    pub fn get<T: FromValue>(&self, ordinal: usize) -> Result<T> {
        let value = self.get_value(ordinal)?.clone();
        Ok(T::from_value(value)?)
    }

    fn column(&self, ordinal: usize) -> Result<&RecordColumn> {
        self.columns
            .get(ordinal)
            .ok_or(Error::OrdinalOutOfRange { ordinal, field_count: self.columns.len() })
    }
}

impl<S: AsRef<str>> FromIterator<(S, Value, LogicalType)> for DataRecord {
    fn from_iter<I: IntoIterator<Item = (S, Value, LogicalType)>>(iter: I) -> Self {
        let mut record = Self::new();
        for (name, value, ty) in iter {
            record.push_typed(name, value, ty);
        }
        record
    }
}
