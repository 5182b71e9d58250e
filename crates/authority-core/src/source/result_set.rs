//! Tabular query results.

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;

/// A single cell value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// SQL NULL.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Text value.
    Text(String),
    /// Array value, as returned for list-typed columns.
    List(Vec<String>),
}

impl Value {
    /// Whether this is SQL NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Borrow the text content, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Text(s) => write!(f, "'{}'", s),
            Value::List(items) => write!(f, "[{}]", items.join(",")),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Value::List(items)
    }
}

/// Ordered rows with named columns.
///
/// Column lookup by name ignores ASCII case, matching how catalog columns
/// are addressed (`User` and `user` are the same column).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Vec<BTreeMap<String, Value>>")]
pub struct ResultSet {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl ResultSet {
    /// Create an empty result with the given columns.
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row. Missing trailing cells are filled with NULL and extra
    /// cells are dropped.
    pub fn push_row(&mut self, mut row: Vec<Value>) {
        row.resize(self.columns.len(), Value::Null);
        self.rows.push(row);
    }

    /// Builder form of [`push_row`](Self::push_row).
    pub fn with_row(mut self, row: Vec<Value>) -> Self {
        self.push_row(row);
        self
    }

    /// Column names in result order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Position of a column, ignoring case.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(name))
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the result has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate over rows.
    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(move |values| Row {
            result: self,
            values,
        })
    }
}

impl From<Vec<BTreeMap<String, Value>>> for ResultSet {
    fn from(records: Vec<BTreeMap<String, Value>>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for record in &records {
            for name in record.keys() {
                if !columns.iter().any(|c| c == name) {
                    columns.push(name.clone());
                }
            }
        }

        let rows = records
            .into_iter()
            .map(|mut record| {
                columns
                    .iter()
                    .map(|c| record.remove(c).unwrap_or(Value::Null))
                    .collect()
            })
            .collect();

        Self { columns, rows }
    }
}

/// A borrowed row of a [`ResultSet`].
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    result: &'a ResultSet,
    values: &'a [Value],
}

impl<'a> Row<'a> {
    /// Value of the named column, or `None` if there is no such column.
    pub fn get(&self, column: &str) -> Option<&'a Value> {
        self.result
            .column_index(column)
            .and_then(|i| self.values.get(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_lookup_ignores_case() {
        let rs = ResultSet::new(["User", "Host"]).with_row(vec!["root".into(), "localhost".into()]);
        let row = rs.rows().next().unwrap();
        assert_eq!(row.get("user"), Some(&Value::Text("root".into())));
        assert_eq!(row.get("HOST"), Some(&Value::Text("localhost".into())));
        assert_eq!(row.get("Db"), None);
    }

    #[test]
    fn test_short_rows_are_padded() {
        let rs = ResultSet::new(["a", "b"]).with_row(vec![Value::Int(1)]);
        let row = rs.rows().next().unwrap();
        assert_eq!(row.get("b"), Some(&Value::Null));
    }

    #[test]
    fn test_deserialize_from_records() {
        let json = r#"[
            {"user": "root", "host": "localhost", "Super_priv": "Y"},
            {"user": "app", "host": "%", "Select_priv": true}
        ]"#;
        let rs: ResultSet = serde_json::from_str(json).unwrap();
        assert_eq!(rs.len(), 2);
        assert_eq!(rs.columns().len(), 4);

        let rows: Vec<_> = rs.rows().collect();
        assert_eq!(rows[0].get("Super_priv"), Some(&Value::Text("Y".into())));
        assert_eq!(rows[0].get("Select_priv"), Some(&Value::Null));
        assert_eq!(rows[1].get("Select_priv"), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_deserialize_list_value() {
        let rs: ResultSet =
            serde_json::from_str(r#"[{"Table_priv": ["Select", "Insert"]}]"#).unwrap();
        let row = rs.rows().next().unwrap();
        assert_eq!(
            row.get("table_priv"),
            Some(&Value::List(vec!["Select".into(), "Insert".into()]))
        );
    }
}
