use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// A single cell as delivered by the query pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    /// Milliseconds since the unix epoch.
    Time(i64),
}

impl CellValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Int(v) | CellValue::Time(v) => Some(*v as f64),
            CellValue::Float(v) => Some(*v),
            CellValue::Text(s) => s.trim().parse::<f64>().ok(),
            CellValue::Null | CellValue::Bool(_) => None,
        }
    }

    pub fn as_epoch_millis(&self) -> Option<i64> {
        match self {
            CellValue::Time(v) | CellValue::Int(v) => Some(*v),
            CellValue::Float(v) if v.is_finite() => Some(*v as i64),
            CellValue::Text(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Int(v) | CellValue::Time(v) => write!(f, "{v}"),
            CellValue::Float(v) if v.is_infinite() && *v > 0.0 => f.write_str("Infinity"),
            CellValue::Float(v) if v.is_infinite() => f.write_str("-Infinity"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Int(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Float(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Time,
    Number,
    Text,
    Other,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ColumnType::Time => "time",
            ColumnType::Number => "number",
            ColumnType::Text => "text",
            ColumnType::Other => "other",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub kind: ColumnType,
    pub values: Vec<CellValue>,
    pub labels: BTreeMap<String, String>,
    pub display_name: Option<String>,
}

impl Column {
    pub fn new(name: impl Into<String>, kind: ColumnType, values: Vec<CellValue>) -> Self {
        Column {
            name: name.into(),
            kind,
            values,
            labels: BTreeMap::new(),
            display_name: None,
        }
    }

    pub fn time(name: impl Into<String>, millis: impl IntoIterator<Item = i64>) -> Self {
        Column::new(
            name,
            ColumnType::Time,
            millis.into_iter().map(CellValue::Time).collect(),
        )
    }

    pub fn text<S: Into<String>>(name: impl Into<String>, values: impl IntoIterator<Item = S>) -> Self {
        Column::new(
            name,
            ColumnType::Text,
            values.into_iter().map(|v| CellValue::Text(v.into())).collect(),
        )
    }

    pub fn number(name: impl Into<String>, values: impl IntoIterator<Item = f64>) -> Self {
        Column::new(
            name,
            ColumnType::Number,
            values.into_iter().map(CellValue::Float).collect(),
        )
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Name shown in option lists: an explicit display name, the `name`
    /// label, or the plain column name, in that order.
    pub fn display_name(&self) -> &str {
        self.display_name
            .as_deref()
            .or_else(|| self.labels.get("name").map(String::as_str))
            .unwrap_or(&self.name)
    }

    pub fn is_time(&self) -> bool {
        self.kind == ColumnType::Time
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn value(&self, row: usize) -> Option<&CellValue> {
        self.values.get(row)
    }

    pub fn as_string(&self) -> String {
        format!(
            "\"{}\" ({}), {} values",
            self.name,
            self.kind,
            self.values.len()
        )
    }
}

/// One series: columns sharing a row index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub name: Option<String>,
    pub columns: Vec<Column>,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Self {
        Table {
            name: None,
            columns,
        }
    }

    pub fn named(name: impl Into<String>, columns: Vec<Column>) -> Self {
        Table {
            name: Some(name.into()),
            columns,
        }
    }

    pub fn column(&self, idx: usize) -> Option<&Column> {
        self.columns.get(idx)
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map(Column::len).unwrap_or(0)
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("???")
    }
}

/// The result set handed over by the host for one render pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataSet {
    pub series: Vec<Table>,
    pub error: Option<String>,
}

impl DataSet {
    pub fn new(series: Vec<Table>) -> Self {
        DataSet {
            series,
            error: None,
        }
    }

    pub fn single(table: Table) -> Self {
        DataSet::new(vec![table])
    }

    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error = Some(message.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_values_print_like_the_host() {
        assert_eq!(CellValue::Float(3.0).to_string(), "3");
        assert_eq!(CellValue::Float(2.5).to_string(), "2.5");
        assert_eq!(CellValue::Float(f64::INFINITY).to_string(), "Infinity");
        assert_eq!(CellValue::Null.to_string(), "");
        assert_eq!(CellValue::Bool(true).to_string(), "true");
        assert_eq!(CellValue::from("up").to_string(), "up");
    }

    #[test]
    fn numeric_views() {
        assert_eq!(CellValue::from(" 42 ").as_f64(), Some(42.0));
        assert_eq!(CellValue::from("abc").as_f64(), None);
        assert_eq!(CellValue::Time(1000).as_epoch_millis(), Some(1000));
        assert_eq!(CellValue::Bool(false).as_epoch_millis(), None);
    }

    #[test]
    fn display_name_precedence() {
        let plain = Column::text("value", ["a"]);
        assert_eq!(plain.display_name(), "value");

        let labelled = Column::text("value", ["a"]).with_label("name", "host-1");
        assert_eq!(labelled.display_name(), "host-1");

        let explicit = labelled.with_display_name("Host one");
        assert_eq!(explicit.display_name(), "Host one");
    }

    #[test]
    fn row_count_follows_first_column() {
        let table = Table::new(vec![
            Column::time("time", [1, 2, 3]),
            Column::text("status", ["a", "b", "c"]),
        ]);
        assert_eq!(table.row_count(), 3);
        assert_eq!(Table::default().row_count(), 0);
    }
}
