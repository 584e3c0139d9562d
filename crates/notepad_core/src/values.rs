//! Typed caller inputs: column values and filters.

use rusqlite::types::{Null, Value};
use std::collections::BTreeMap;

/// Conversion into a SQLite value for column writes and filter arguments.
pub trait IntoValue {
    fn into_value(self) -> Value;
}

impl IntoValue for Value {
    fn into_value(self) -> Value {
        self
    }
}

impl IntoValue for &str {
    fn into_value(self) -> Value {
        Value::Text(self.to_string())
    }
}

impl IntoValue for String {
    fn into_value(self) -> Value {
        Value::Text(self)
    }
}

impl IntoValue for &String {
    fn into_value(self) -> Value {
        Value::Text(self.clone())
    }
}

impl IntoValue for i64 {
    fn into_value(self) -> Value {
        Value::Integer(self)
    }
}

impl IntoValue for i32 {
    fn into_value(self) -> Value {
        Value::Integer(i64::from(self))
    }
}

impl IntoValue for Null {
    fn into_value(self) -> Value {
        Value::Null
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    fn into_value(self) -> Value {
        self.map_or(Value::Null, IntoValue::into_value)
    }
}

/// Column values for insert/update, keyed by external column name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentValues {
    values: BTreeMap<String, Value>,
}

impl ContentValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets one column, replacing any earlier value.
    pub fn put(&mut self, column: &str, value: impl IntoValue) -> &mut Self {
        self.values.insert(column.to_string(), value.into_value());
        self
    }

    /// Builder form of [`Self::put`].
    pub fn with(mut self, column: &str, value: impl IntoValue) -> Self {
        self.put(column, value);
        self
    }

    /// Sets one column only when it is not present yet.
    pub fn put_if_absent(&mut self, column: &str, value: impl IntoValue) {
        self.values
            .entry(column.to_string())
            .or_insert_with(|| value.into_value());
    }

    pub fn contains_key(&self, column: &str) -> bool {
        self.values.contains_key(column)
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values.get(column)
    }

    pub fn get_i64(&self, column: &str) -> Option<i64> {
        match self.values.get(column) {
            Some(Value::Integer(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(column, value)| (column.as_str(), value))
    }
}

/// Caller-supplied WHERE fragment with positional `?` arguments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    clause: Option<String>,
    args: Vec<Value>,
}

impl Selection {
    /// No filter.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn new<I, V>(clause: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: IntoValue,
    {
        Self {
            clause: Some(clause.into()),
            args: args.into_iter().map(IntoValue::into_value).collect(),
        }
    }

    /// Blank clauses count as no filter.
    pub fn clause(&self) -> Option<&str> {
        self.clause
            .as_deref()
            .map(str::trim)
            .filter(|clause| !clause.is_empty())
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// Combines an optional identity clause with the caller clause:
    /// `(identity) AND (caller)`, either side optional.
    pub(crate) fn compose_where(&self, identity: Option<&str>) -> Option<String> {
        match (identity, self.clause()) {
            (Some(id), Some(caller)) => Some(format!("({id}) AND ({caller})")),
            (Some(id), None) => Some(format!("({id})")),
            (None, Some(caller)) => Some(format!("({caller})")),
            (None, None) => None,
        }
    }
}
