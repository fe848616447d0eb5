use std::sync::Arc;

use fakesql_core::{Decimal, FromValue, LogicalType, NaiveDateTime, Ulid, Value};
use smol_str::SmolStr;

use crate::{DataRecord, Error, Result, Row, Table};

static EMPTY_SCHEMA_TABLE: Table = Table::EMPTY;

/// The observable position of a [`DataReader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CursorState {
    /// No result set is selected, either because `next_result` was never called or because
    /// the result sets ran out.
    Unpositioned,
    /// A result set is selected and the row position is before its first row.
    PositionedAtResultSet,
    /// Positioned on the row with the given index of the current result set.
    PositionedAtRow(usize),
    /// Past the last row of the current result set.
    Exhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResultSetPosition {
    Before,
    At(usize),
    Past,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowPosition {
    BeforeFirst,
    At(usize),
    AfterLast,
}

/// A forward-only cursor over one or more in-memory result sets.
///
/// The cursor shares its tables with whoever supplied them and never modifies them.
#[derive(Debug, Clone)]
pub struct DataReader {
    tables: Vec<Arc<Table>>,
    result_set: ResultSetPosition,
    row: RowPosition,
    /// One schema table per result set, empty until installed.
    schema_tables: Vec<Table>,
    closed: bool,
    disposed: bool,
}

impl DataReader {
    /// A cursor that starts without a selected result set; call [`DataReader::next_result`]
    /// before reading rows.
    pub fn from_tables<T: Into<Arc<Table>>>(tables: impl IntoIterator<Item = T>) -> Self {
        let tables = tables.into_iter().map(Into::into).collect::<Vec<_>>();
        Self {
            schema_tables: vec![Table::default(); tables.len()],
            tables,
            result_set: ResultSetPosition::Before,
            row: RowPosition::BeforeFirst,
            closed: false,
            disposed: false,
        }
    }

    /// A cursor over a single table, positioned on it.
    #[inline]
    pub fn new(table: impl Into<Arc<Table>>) -> Self {
        Self::open([table.into()])
    }

    /// A cursor over `tables`, positioned on the first one if there is any.
    pub fn open<T: Into<Arc<Table>>>(tables: impl IntoIterator<Item = T>) -> Self {
        let mut reader = Self::from_tables(tables);
        reader.next_result();
        reader
    }

    /// Advances to the next result set and puts the row position before its first row.
    /// Returns `false` once the result sets are used up, the cursor then has no table.
    pub fn next_result(&mut self) -> bool {
        let next = match self.result_set {
            ResultSetPosition::Before => 0,
            ResultSetPosition::At(idx) => idx + 1,
            ResultSetPosition::Past => self.tables.len(),
        };

        self.row = RowPosition::BeforeFirst;
        if next < self.tables.len() {
            self.result_set = ResultSetPosition::At(next);
            tracing::trace!(result_set = next, "advanced to next result set");
            true
        } else {
            self.result_set = ResultSetPosition::Past;
            tracing::trace!("no more result sets");
            false
        }
    }

    /// Advances to the next row of the current result set.
    pub fn read(&mut self) -> Result<bool> {
        let row_count = self.table()?.row_count();
        let next = match self.row {
            RowPosition::BeforeFirst => 0,
            RowPosition::At(idx) => idx + 1,
            RowPosition::AfterLast => return Ok(false),
        };

        if next < row_count {
            self.row = RowPosition::At(next);
            tracing::trace!(row = next, "advanced to next row");
            Ok(true)
        } else {
            self.row = RowPosition::AfterLast;
            tracing::trace!("result set exhausted");
            Ok(false)
        }
    }

    pub fn state(&self) -> CursorState {
        match (self.result_set, self.row) {
            (ResultSetPosition::At(_), RowPosition::BeforeFirst) => {
                CursorState::PositionedAtResultSet
            }
            (ResultSetPosition::At(_), RowPosition::At(idx)) => CursorState::PositionedAtRow(idx),
            (ResultSetPosition::At(_), RowPosition::AfterLast) => CursorState::Exhausted,
            _ => CursorState::Unpositioned,
        }
    }

    /// The selected result set, if any.
    #[inline]
    pub fn current_table(&self) -> Option<&Table> {
        match self.result_set {
            ResultSetPosition::At(idx) => self.tables.get(idx).map(|table| &**table),
            _ => None,
        }
    }

    #[inline]
    pub fn result_set_count(&self) -> usize {
        self.tables.len()
    }

    #[inline]
    pub fn field_count(&self) -> usize {
        self.current_table().map_or(0, Table::column_count)
    }

    #[inline]
    pub fn has_rows(&self) -> bool {
        self.current_table().map_or(false, |table| table.row_count() > 0)
    }

    /// The row count of the current result set.
    #[inline]
    pub fn records_affected(&self) -> usize {
        self.current_table().map_or(0, Table::row_count)
    }

    /// Nesting depth of the current row, always zero.
    #[inline]
    pub fn depth(&self) -> usize {
        0
    }

    #[inline]
    pub fn close(&mut self) {
        self.closed = true;
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Closes the reader and marks it as disposed.
    #[inline]
    pub fn dispose(&mut self) {
        self.close();
        self.disposed = true;
    }

    #[inline]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// The schema table of the current result set, empty when none was installed or no
    /// result set is selected.
    pub fn get_schema_table(&self) -> &Table {
        match self.result_set {
            ResultSetPosition::At(idx) => &self.schema_tables[idx],
            _ => &EMPTY_SCHEMA_TABLE,
        }
    }

    /// Installs the schema table of the current result set.
    pub fn set_schema_table(&mut self, table: Table) -> Result<()> {
        match self.result_set {
            ResultSetPosition::At(idx) => {
                self.schema_tables[idx] = table;
                Ok(())
            }
            _ => Err(Error::InvalidState("no result set is selected")),
        }
    }

    /// Computes the schema table of every result set that has none yet, with the reader
    /// positioned on that result set while `f` runs. The position is restored afterwards.
    pub fn resolve_schema_tables(&mut self, mut f: impl FnMut(&DataReader) -> Table) {
        let (result_set, row) = (self.result_set, self.row);
        for idx in 0..self.tables.len() {
            if self.schema_tables[idx].column_count() > 0 {
                continue;
            }
            self.result_set = ResultSetPosition::At(idx);
            self.row = RowPosition::BeforeFirst;
            let schema_table = f(self);
            self.schema_tables[idx] = schema_table;
        }
        self.result_set = result_set;
        self.row = row;
    }

    /// The rows of the current result set. This does not move the cursor.
    pub fn rows(&self) -> Rows<'_> {
        Rows { inner: self.current_table().map_or(&[][..], Table::rows).iter() }
    }

    /// The ordinal of the column named `name` in the current result set (case-sensitive).
    pub fn get_ordinal(&self, name: &str) -> Result<usize> {
        self.table()?
            .columns()
            .iter()
            .position(|column| column.name() == name)
            .ok_or_else(|| Error::IndexOutOfRange { name: SmolStr::new(name) })
    }

    pub fn get_name(&self, ordinal: usize) -> Result<&str> {
        let table = self.table()?;
        Self::check_ordinal(table, ordinal)?;
        Ok(table.columns()[ordinal].name())
    }

    /// The declared type of the column at `ordinal`.
    pub fn get_field_type(&self, ordinal: usize) -> Result<LogicalType> {
        let table = self.table()?;
        Self::check_ordinal(table, ordinal)?;
        Ok(table.columns()[ordinal].logical_type())
    }

    /// The type name of the value at `ordinal` in the current row, or of the declared column
    /// type when the value is null.
    pub fn get_data_type_name(&self, ordinal: usize) -> Result<String> {
        let value = self.get_value(ordinal)?;
        let ty = if value.is_null() { self.get_field_type(ordinal)? } else { value.ty() };
        Ok(ty.to_string())
    }

    pub fn get_value(&self, ordinal: usize) -> Result<&Value> {
        let row = self.current_row()?;
        Self::check_ordinal(self.table()?, ordinal)?;
        Ok(&row[ordinal])
    }

    pub fn get_value_by_name(&self, name: &str) -> Result<&Value> {
        let ordinal = self.get_ordinal(name)?;
        self.get_value(ordinal)
    }

    #[inline]
    pub fn is_null(&self, ordinal: usize) -> Result<bool> {
        self.get_value(ordinal).map(Value::is_null)
    }

    /// Copies the values of the current row into `values` and returns how many were copied.
    pub fn get_values(&self, values: &mut [Value]) -> Result<usize> {
        let row = self.current_row()?;
        let n = values.len().min(row.width());
        values[..n].clone_from_slice(&row.values()[..n]);
        Ok(n)
    }

    /// A snapshot of the current row.
    pub fn current_record(&self) -> Result<DataRecord> {
        let table = self.table()?;
        let row = self.current_row()?;
        Ok(table
            .columns()
            .iter()
            .zip(row)
            .map(|(column, value)| (column.name(), value.clone(), column.logical_type()))
            .collect())
    }

    /// Reads the value at `ordinal` of the current row as a `T`.
    pub fn get<T: FromValue>(&self, ordinal: usize) -> Result<T> {
        let value = self.get_value(ordinal)?.clone();
        Ok(T::from_value(value)?)
    }

    #[inline]
    pub fn get_bool(&self, ordinal: usize) -> Result<bool> {
        self.get(ordinal)
    }

    #[inline]
    pub fn get_byte(&self, ordinal: usize) -> Result<u8> {
        self.get(ordinal)
    }

    #[inline]
    pub fn get_i16(&self, ordinal: usize) -> Result<i16> {
        self.get(ordinal)
    }

    #[inline]
    pub fn get_i32(&self, ordinal: usize) -> Result<i32> {
        self.get(ordinal)
    }

    #[inline]
    pub fn get_i64(&self, ordinal: usize) -> Result<i64> {
        self.get(ordinal)
    }

    #[inline]
    pub fn get_f32(&self, ordinal: usize) -> Result<f32> {
        self.get(ordinal)
    }

    #[inline]
    pub fn get_f64(&self, ordinal: usize) -> Result<f64> {
        self.get(ordinal)
    }

    #[inline]
    pub fn get_decimal(&self, ordinal: usize) -> Result<Decimal> {
        self.get(ordinal)
    }

    #[inline]
    pub fn get_char(&self, ordinal: usize) -> Result<char> {
        self.get(ordinal)
    }

    #[inline]
    pub fn get_string(&self, ordinal: usize) -> Result<String> {
        self.get(ordinal)
    }

    #[inline]
    pub fn get_datetime(&self, ordinal: usize) -> Result<NaiveDateTime> {
        self.get(ordinal)
    }

    #[inline]
    pub fn get_guid(&self, ordinal: usize) -> Result<Ulid> {
        self.get(ordinal)
    }

    pub fn get_bytes(
        &self,
        _ordinal: usize,
        _data_offset: u64,
        _buffer: &mut [u8],
        _buffer_offset: usize,
        _length: usize,
    ) -> Result<usize> {
        Err(Error::NotSupported("streaming byte reads"))
    }

    pub fn get_chars(
        &self,
        _ordinal: usize,
        _data_offset: u64,
        _buffer: &mut [char],
        _buffer_offset: usize,
        _length: usize,
    ) -> Result<usize> {
        Err(Error::NotSupported("streaming character reads"))
    }

    fn table(&self) -> Result<&Table> {
        self.current_table().ok_or(Error::InvalidState("no result set is selected"))
    }

    fn current_row(&self) -> Result<&Row> {
        let table = self.table()?;
        match self.row {
            RowPosition::At(idx) => {
                table.row(idx).ok_or(Error::InvalidState("the current row does not exist"))
            }
            RowPosition::BeforeFirst => Err(Error::InvalidState("call `read` first")),
            RowPosition::AfterLast => Err(Error::InvalidState("no more rows to read")),
        }
    }

    fn check_ordinal(table: &Table, ordinal: usize) -> Result<()> {
        if ordinal < table.column_count() {
            Ok(())
        } else {
            Err(Error::OrdinalOutOfRange { ordinal, field_count: table.column_count() })
        }
    }
}

/// Iterator over the rows of a [`DataReader`]'s current result set.
#[derive(Debug, Clone)]
pub struct Rows<'a> {
    inner: std::slice::Iter<'a, Row>,
}

impl<'a> Iterator for Rows<'a> {
    type Item = &'a Row;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Rows<'_> {}
