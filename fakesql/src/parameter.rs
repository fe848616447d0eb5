use std::ops::Index;

use fakesql_core::{LogicalType, Value};
use smol_str::SmolStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ParameterDirection {
    #[default]
    Input,
    Output,
    InputOutput,
    ReturnValue,
}

/// A named command parameter.
///
/// Only the name and the value take part in validation, the remaining metadata is stored
/// as given.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Parameter {
    name: SmolStr,
    value: Value,
    direction: ParameterDirection,
    ty: Option<LogicalType>,
    nullable: bool,
    size: u32,
    precision: u8,
    scale: u8,
    source_column: Option<SmolStr>,
}

impl Parameter {
    pub fn new(name: impl AsRef<str>, value: impl Into<Value>) -> Self {
        Self { name: SmolStr::new(name), value: value.into(), ..Self::default() }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn value(&self) -> &Value {
        &self.value
    }

    #[inline]
    pub fn direction(&self) -> ParameterDirection {
        self.direction
    }

    /// The declared type, if one was set.
    #[inline]
    pub fn declared_type(&self) -> Option<LogicalType> {
        self.ty
    }

    #[inline]
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    #[inline]
    pub fn size(&self) -> u32 {
        self.size
    }

    #[inline]
    pub fn precision(&self) -> u8 {
        self.precision
    }

    #[inline]
    pub fn scale(&self) -> u8 {
        self.scale
    }

    #[inline]
    pub fn source_column(&self) -> Option<&str> {
        self.source_column.as_deref()
    }

    /// Whether this parameter is called `name`, ignoring ascii case.
    #[inline]
    pub fn has_name(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    pub fn set_name(&mut self, name: impl AsRef<str>) {
        self.name = SmolStr::new(name);
    }

    pub fn set_value(&mut self, value: impl Into<Value>) {
        self.value = value.into();
    }

    #[inline]
    pub fn set_direction(&mut self, direction: ParameterDirection) {
        self.direction = direction;
    }

    #[inline]
    pub fn set_declared_type(&mut self, ty: Option<LogicalType>) {
        self.ty = ty;
    }

    #[inline]
    pub fn set_nullable(&mut self, nullable: bool) {
        self.nullable = nullable;
    }

    #[inline]
    pub fn set_size(&mut self, size: u32) {
        self.size = size;
    }

    #[inline]
    pub fn set_precision(&mut self, precision: u8) {
        self.precision = precision;
    }

    #[inline]
    pub fn set_scale(&mut self, scale: u8) {
        self.scale = scale;
    }

    pub fn set_source_column(&mut self, column: Option<&str>) {
        self.source_column = column.map(SmolStr::new);
    }

    #[inline]
    pub fn with_direction(mut self, direction: ParameterDirection) -> Self {
        self.direction = direction;
        self
    }

    #[inline]
    pub fn with_declared_type(mut self, ty: LogicalType) -> Self {
        self.ty = Some(ty);
        self
    }

    #[inline]
    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }
}

/// An ordered collection of parameters. Lookups by name ignore ascii case.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParameterCollection {
    parameters: Vec<Parameter>,
}

impl ParameterCollection {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `parameter` and returns its index.
    pub fn add(&mut self, parameter: Parameter) -> usize {
        self.parameters.push(parameter);
        self.parameters.len() - 1
    }

    /// Appends a parameter named `name` holding `value` and returns its index.
    #[inline]
    pub fn add_with_value(&mut self, name: impl AsRef<str>, value: impl Into<Value>) -> usize {
        self.add(Parameter::new(name, value))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Parameter> {
        self.parameters.get(index)
    }

    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Parameter> {
        self.parameters.get_mut(index)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.parameters.iter().position(|parameter| parameter.has_name(name))
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    pub fn get_by_name(&self, name: &str) -> Option<&Parameter> {
        self.index_of(name).map(|idx| &self.parameters[idx])
    }

    pub fn get_by_name_mut(&mut self, name: &str) -> Option<&mut Parameter> {
        self.index_of(name).map(|idx| &mut self.parameters[idx])
    }

    /// Removes the first parameter named `name`.
    pub fn remove(&mut self, name: &str) -> Option<Parameter> {
        self.index_of(name).map(|idx| self.parameters.remove(idx))
    }

    pub fn remove_at(&mut self, index: usize) -> Option<Parameter> {
        (index < self.parameters.len()).then(|| self.parameters.remove(index))
    }

    #[inline]
    pub fn clear(&mut self) {
        self.parameters.clear();
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Parameter> {
        self.parameters.iter()
    }

    #[inline]
    pub fn as_slice(&self) -> &[Parameter] {
        &self.parameters
    }

    #[inline]
    pub fn into_vec(self) -> Vec<Parameter> {
        self.parameters
    }
}

impl Index<usize> for ParameterCollection {
    type Output = Parameter;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.parameters[index]
    }
}

impl<'a> IntoIterator for &'a ParameterCollection {
    type Item = &'a Parameter;
    type IntoIter = std::slice::Iter<'a, Parameter>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<Parameter> for ParameterCollection {
    fn from_iter<I: IntoIterator<Item = Parameter>>(iter: I) -> Self {
        Self { parameters: iter.into_iter().collect() }
    }
}

impl From<Vec<Parameter>> for ParameterCollection {
    #[inline]
    fn from(parameters: Vec<Parameter>) -> Self {
        Self { parameters }
    }
}
