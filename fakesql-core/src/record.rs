use std::fmt;

use smol_str::SmolStr;

use crate::ty::LogicalType;
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    Public,
    NonPublic,
}

/// A data-carrying field of a [`Record`] type.
pub struct Field<T> {
    name: &'static str,
    ty: LogicalType,
    visibility: Visibility,
    accessor: fn(&T) -> Value,
}

impl<T> Field<T> {
    #[inline]
    pub const fn new(
        name: &'static str,
        ty: LogicalType,
        visibility: Visibility,
        accessor: fn(&T) -> Value,
    ) -> Self {
        Self { name, ty, visibility, accessor }
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn logical_type(&self) -> LogicalType {
        self.ty
    }

    #[inline]
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    #[inline]
    pub fn get(&self, record: &T) -> Value {
        (self.accessor)(record)
    }
}

impl<T> Clone for Field<T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Field<T> {}

impl<T> fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .field("visibility", &self.visibility)
            .finish_non_exhaustive()
    }
}

/// A type whose fields can be laid out as the columns of a table.
/// Usually implemented with `#[derive(Record)]`.
pub trait Record: Sized {
    /// The fields of the type in declaration order.
    fn describe_fields() -> Vec<Field<Self>>;
}

/// Decides which fields of a [`Record`] become columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSelection {
    include_non_public: bool,
    include: Vec<SmolStr>,
}

impl FieldSelection {
    /// Only public fields.
    #[inline]
    pub fn public() -> Self {
        Self::default()
    }

    /// Public and non-public fields.
    #[inline]
    pub fn all() -> Self {
        Self { include_non_public: true, include: vec![] }
    }

    /// Restrict the selection to the named fields. An empty list does not restrict anything.
    pub fn include<S: AsRef<str>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.include = names.into_iter().map(|name| SmolStr::new(name.as_ref())).collect();
        self
    }

    #[inline]
    pub fn includes_non_public(&self) -> bool {
        self.include_non_public
    }

    pub fn is_selected<T>(&self, field: &Field<T>) -> bool {
        if field.visibility == Visibility::NonPublic && !self.include_non_public {
            return false;
        }

        self.include.is_empty() || self.include.iter().any(|name| name == field.name)
    }

    /// The selected fields of `T`, still in declaration order.
    pub fn select<T: Record>(&self) -> Vec<Field<T>> {
        T::describe_fields().into_iter().filter(|field| self.is_selected(field)).collect()
    }
}
