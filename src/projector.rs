use serde::Serialize;
use tracing::trace;

use crate::binding::BindingEvaluator;
use crate::config::{BindingRules, PanelOptions};
use crate::resolver::ResolvedRoles;
use crate::table::{CellValue, Table};
use crate::timefmt::TimeFormatter;

pub const TOOLTIP_SEPARATOR: &str = " - ";

static NULL: CellValue = CellValue::Null;

/// What the rendering layer needs for one image.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageDescriptor {
    pub icon_url: String,
    pub alt: String,
    pub tooltip: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlay_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub underline_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub underline_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_url: Option<String>,
}

/// Per-row formatting policy, taken from the panel options.
#[derive(Debug, Clone)]
pub struct Formatting {
    pub base_url: String,
    pub suffix: String,
    pub tooltip: bool,
    pub tooltip_include_date: bool,
    pub tooltip_date_elapsed: bool,
    pub tooltip_include_field: bool,
    pub time: TimeFormatter,
    pub overlay: BindingRules,
    pub underline: BindingRules,
    pub link: BindingRules,
    pub link_prefix: String,
}

impl Formatting {
    pub fn from_options(options: &PanelOptions, time: TimeFormatter) -> Self {
        Formatting {
            base_url: options.base_url.clone(),
            suffix: options.suffix.clone(),
            tooltip: options.tooltip,
            tooltip_include_date: options.tooltip_include_date,
            tooltip_date_elapsed: options.tooltip_date_elapsed,
            tooltip_include_field: options.tooltip_include_field,
            time,
            overlay: options.overlay.bindings.clone(),
            underline: options.underline.bindings.clone(),
            link: options.link.bindings.clone(),
            link_prefix: options.link.url_prefix.clone(),
        }
    }

    pub fn icon_url(&self, icon: &CellValue) -> String {
        format!("{}{}{}", self.base_url, icon, self.suffix)
    }
}

fn cell(table: &Table, column: usize, row: usize) -> &CellValue {
    table
        .column(column)
        .and_then(|c| c.value(row))
        .unwrap_or(&NULL)
}

fn tooltip(table: &Table, resolved: &ResolvedRoles, fmt: &Formatting, row: usize) -> String {
    if !fmt.tooltip {
        return String::new();
    }
    let mut text = String::new();
    if fmt.tooltip_include_date
        && let Some(idx) = resolved.tooltip_time
    {
        text = fmt.time.format(cell(table, idx, row), fmt.tooltip_date_elapsed);
    }
    if fmt.tooltip_include_field
        && let Some(idx) = resolved.tooltip_text
    {
        if !text.is_empty() {
            text.push_str(TOOLTIP_SEPARATOR);
        }
        text.push_str(&cell(table, idx, row).to_string());
    }
    text
}

/// One descriptor per row of the icon column.
pub fn project(
    table: &Table,
    resolved: &ResolvedRoles,
    formatting: &Formatting,
    evaluator: &dyn BindingEvaluator,
) -> Vec<ImageDescriptor> {
    let rows = table.column(resolved.icon).map_or(0, |c| c.len());

    (0..rows)
        .map(|row| {
            let icon = cell(table, resolved.icon, row);
            let overlay_color = resolved
                .overlay_binding
                .and_then(|idx| evaluator.evaluate(cell(table, idx, row), &formatting.overlay));
            let (underline_text, underline_color) = match resolved.underline_binding {
                Some(idx) => {
                    let value = cell(table, idx, row);
                    (
                        Some(value.to_string()),
                        evaluator.evaluate(value, &formatting.underline),
                    )
                }
                None => (None, None),
            };
            let link_url = resolved.link.map(|idx| {
                let value = cell(table, idx, row);
                let target = evaluator
                    .evaluate(value, &formatting.link)
                    .unwrap_or_else(|| value.to_string());
                format!("{}{}", formatting.link_prefix, target)
            });

            let descriptor = ImageDescriptor {
                icon_url: formatting.icon_url(icon),
                alt: cell(table, resolved.alt, row).to_string(),
                tooltip: tooltip(table, resolved, formatting, row),
                overlay_color,
                underline_text,
                underline_color,
                link_url,
            };
            trace!("Row {row}: {descriptor:?}");
            descriptor
        })
        .collect()
}
