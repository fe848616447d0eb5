use std::fmt;
use std::ops::Index;

use fakesql_core::{FieldSelection, LogicalType, Record, Value};
use smol_str::SmolStr;

use crate::{Error, Result, Row};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Column {
    name: SmolStr,
    ty: LogicalType,
}

impl Column {
    #[inline]
    pub fn new(name: impl AsRef<str>, ty: LogicalType) -> Self {
        Self { name: SmolStr::new(name), ty }
    }

    /// A column named after its 1-based position (`Col1`, `Col2`, ...).
    #[inline]
    pub fn positional(index: usize, ty: LogicalType) -> Self {
        Self { name: SmolStr::new(format!("Col{}", index + 1)), ty }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn logical_type(&self) -> LogicalType {
        self.ty
    }
}

/// A static, in-memory result set: ordered columns and ordered rows.
///
/// Every row has exactly one value per column. Tables are built up front and are not
/// modified while a [`DataReader`](crate::DataReader) walks over them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    rows: Vec<Row>,
}

impl Table {
    pub(crate) const EMPTY: Table = Table { columns: Vec::new(), rows: Vec::new() };

    /// An empty table with the given columns.
    #[inline]
    pub fn new(columns: impl IntoIterator<Item = Column>) -> Self {
        Self { columns: columns.into_iter().collect(), rows: vec![] }
    }

    /// A table with explicitly named and typed columns.
    pub fn with_columns<R: Into<Row>>(
        columns: impl IntoIterator<Item = Column>,
        rows: impl IntoIterator<Item = R>,
    ) -> Result<Self> {
        let mut table = Self::new(columns);
        for row in rows {
            table.add_row(row)?;
        }
        Ok(table)
    }

    /// A table with the given column names, the column types are inferred from the first row.
    pub fn with_column_names<S: AsRef<str>, R: Into<Row>>(
        names: impl IntoIterator<Item = S>,
        rows: impl IntoIterator<Item = R>,
    ) -> Result<Self> {
        let names = names.into_iter().map(|name| SmolStr::new(name.as_ref())).collect::<Vec<_>>();
        let mut rows = rows.into_iter().map(Into::into).peekable();

        let columns: Vec<Column> = match rows.peek() {
            Some(first) => {
                if first.width() != names.len() {
                    return Err(Error::RowWidthMismatch {
                        expected: names.len(),
                        actual: first.width(),
                    });
                }
                names
                    .into_iter()
                    .zip(first.values())
                    .map(|(name, value)| Column { name, ty: LogicalType::infer(value) })
                    .collect()
            }
            None => names.into_iter().map(|name| Column { name, ty: LogicalType::Text }).collect(),
        };

        Self::with_columns(columns, rows)
    }

    /// A table whose columns are derived from the first row: one column per value, named
    /// `Col1, Col2, ...` and typed after that value.
    pub fn from_rows<R: Into<Row>>(rows: impl IntoIterator<Item = R>) -> Result<Self> {
        let mut rows = rows.into_iter().map(Into::into).peekable();
        let columns = match rows.peek() {
            Some(first) => first
                .values()
                .iter()
                .enumerate()
                .map(|(i, value)| Column::positional(i, LogicalType::infer(value)))
                .collect(),
            None => vec![],
        };

        Self::with_columns(columns, rows)
    }

    /// An empty table with one column per public field of `T`.
    #[inline]
    pub fn for_record<T: Record>() -> Self {
        Self::for_record_with::<T>(&FieldSelection::public())
    }

    /// An empty table with one column per field of `T` picked by `selection`.
    pub fn for_record_with<T: Record>(selection: &FieldSelection) -> Self {
        Self::new(
            selection
                .select::<T>()
                .into_iter()
                .map(|field| Column::new(field.name(), field.logical_type())),
        )
    }

    /// A table with one column per public field of `T` and one row per record.
    #[inline]
    pub fn from_records<T: Record>(records: &[T]) -> Self {
        Self::from_records_with(records, &FieldSelection::public())
    }

    pub fn from_records_with<T: Record>(records: &[T], selection: &FieldSelection) -> Self {
        let fields = selection.select::<T>();
        let columns = fields.iter().map(|field| Column::new(field.name(), field.logical_type()));
        let rows = records
            .iter()
            .map(|record| fields.iter().map(|field| field.get(record)).collect())
            .collect();
        Self { columns: columns.collect(), rows }
    }

    /// Appends a row. Fails if the row width differs from the column count.
    pub fn add_row(&mut self, row: impl Into<Row>) -> Result<()> {
        let row = row.into();
        if row.width() != self.columns.len() {
            return Err(Error::RowWidthMismatch {
                expected: self.columns.len(),
                actual: row.width(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Appends a row read from `record`, matching columns to fields by name.
    /// Columns that `T` does not describe are filled with null.
    pub fn add_record<T: Record>(&mut self, record: &T) {
        let fields = T::describe_fields();
        let row = self
            .columns
            .iter()
            .map(|column| {
                fields
                    .iter()
                    .find(|field| field.name() == column.name())
                    .map_or(Value::Null, |field| field.get(record))
            })
            .collect();
        self.rows.push(row);
    }

    #[inline]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    #[inline]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[inline]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    #[inline]
    pub fn column(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    #[inline]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    #[inline]
    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// The index of the column named `name` (case-sensitive).
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|column| column.name == name)
            .ok_or_else(|| Error::ColumnNotFound { name: SmolStr::new(name) })
    }

    #[inline]
    pub fn get(&self, row: usize, column: usize) -> Option<&Value> {
        self.rows.get(row)?.get(column)
    }

    /// # Panics
    ///
    /// Panics if `row` or `column` is out of bounds.
    #[inline]
    pub fn cell(&self, row: usize, column: usize) -> &Value {
        &self.rows[row][column]
    }

    /// # Panics
    ///
    /// Panics if `row` is out of bounds.
    #[inline]
    pub fn cell_by_name(&self, row: usize, name: &str) -> Result<&Value> {
        let column = self.column_index(name)?;
        Ok(self.cell(row, column))
    }
}

impl Index<(usize, usize)> for Table {
    type Output = Value;

    #[inline]
    fn index(&self, (row, column): (usize, usize)) -> &Self::Output {
        self.cell(row, column)
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut builder = tabled::builder::Builder::default();
        builder.push_record(self.columns.iter().map(|column| column.name.to_string()));
        for row in &self.rows {
            builder.push_record(row.values().iter().map(|value| value.to_string()));
        }
        write!(f, "{}", builder.build())
    }
}
