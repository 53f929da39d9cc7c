use serde::Serialize;

use crate::table::{ColumnType, Table};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectOption<T> {
    pub value: T,
    pub label: String,
}

impl SelectOption<String> {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        SelectOption {
            value: value.into(),
            label: label.into(),
        }
    }

    pub fn first_non_time() -> Self {
        SelectOption::new("", "First non time field")
    }

    pub fn use_icon_field() -> Self {
        SelectOption::new("", "Use icon field")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldRef {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ColumnType,
}

/// Column names across all series, optionally led by a synthetic entry.
pub fn list_fields(tables: &[Table], first: Option<SelectOption<String>>) -> Vec<SelectOption<String>> {
    first
        .into_iter()
        .chain(tables.iter().flat_map(|t| {
            t.columns.iter().map(|c| {
                let name = c.display_name();
                SelectOption::new(name, name)
            })
        }))
        .collect()
}

pub fn list_typed_fields(tables: &[Table]) -> Vec<SelectOption<FieldRef>> {
    tables
        .iter()
        .flat_map(|t| t.columns.iter())
        .map(|c| SelectOption {
            value: FieldRef {
                name: c.display_name().to_string(),
                kind: c.kind,
            },
            label: c.display_name().to_string(),
        })
        .collect()
}

pub fn find_first_non_time_field(tables: &[Table]) -> Option<FieldRef> {
    tables
        .iter()
        .flat_map(|t| t.columns.iter())
        .find(|c| !c.is_time())
        .map(|c| FieldRef {
            name: c.name.clone(),
            kind: c.kind,
        })
}

/// Dropdown contents of the panel editor. Alt and tooltip fall back to the
/// icon column, so their lists lead with that entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldOptions {
    pub icon: Vec<SelectOption<String>>,
    pub alt: Vec<SelectOption<String>>,
    pub tooltip: Vec<SelectOption<String>>,
    pub typed: Vec<SelectOption<FieldRef>>,
    pub first_non_time: Option<FieldRef>,
}

pub fn field_options(tables: &[Table]) -> FieldOptions {
    FieldOptions {
        icon: list_fields(tables, Some(SelectOption::first_non_time())),
        alt: list_fields(tables, Some(SelectOption::use_icon_field())),
        tooltip: list_fields(tables, Some(SelectOption::use_icon_field())),
        typed: list_typed_fields(tables),
        first_non_time: find_first_non_time_field(tables),
    }
}
