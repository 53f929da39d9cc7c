use serde::Serialize;
use tracing::{debug, error};

use crate::binding::BindingEvaluator;
use crate::config::{PanelOptions, Position, Size, SlideshowOptions};
use crate::domain::{PlaceholderKind, RenderError};
use crate::projector::{Formatting, ImageDescriptor, project};
use crate::resolver::{ResolvedRoles, resolve};
use crate::table::DataSet;
use crate::timefmt::TimeFormatter;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Layout {
    /// The only image fills the whole panel.
    Single,
    Grid { width: u32, height: u32 },
    Slideshow(SlideshowOptions),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayStyle {
    pub position: Position,
    pub width: Size,
    pub height: Size,
}

/// Feature gates after resolution: a decoration whose field could not be
/// found is off for this pass even if the options ask for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Features {
    pub tooltip: bool,
    pub overlay: Option<OverlayStyle>,
    pub underline_text_size: Option<u32>,
    pub link_new_tab: Option<bool>,
}

impl Features {
    fn from_resolved(options: &PanelOptions, resolved: &ResolvedRoles) -> Self {
        Features {
            tooltip: options.tooltip,
            overlay: resolved.overlay_binding.map(|_| OverlayStyle {
                position: options.overlay.position,
                width: options.overlay.width,
                height: options.overlay.height,
            }),
            underline_text_size: resolved
                .underline_binding
                .map(|_| options.underline.text_size),
            link_new_tab: resolved.link.map(|_| options.link.new_tab),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel {
    pub layout: Layout,
    pub features: Features,
    pub images: Vec<ImageDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placeholder {
    pub kind: PlaceholderKind,
    pub message: String,
}

impl From<&RenderError> for Placeholder {
    fn from(err: &RenderError) -> Self {
        Placeholder {
            kind: err.kind(),
            message: err.placeholder().to_string(),
        }
    }
}

pub fn choose_layout(options: &PanelOptions, images: usize) -> Layout {
    if options.single_fill && images == 1 {
        Layout::Single
    } else if options.slideshow.enable {
        Layout::Slideshow(options.slideshow.clone())
    } else {
        Layout::Grid {
            width: options.width,
            height: options.height,
        }
    }
}

fn log_data_set(data: &DataSet) {
    for (i, table) in data.series.iter().enumerate() {
        debug!(series = i, name = table.display_name(), "series");
        for (j, column) in table.columns.iter().enumerate() {
            debug!(
                series = i,
                field = j,
                column = %column.name,
                kind = %column.kind,
                values = column.len(),
                "field"
            );
        }
    }
}

/// One full render pass: checks the result set, resolves the roles and
/// projects the rows.
pub fn render(
    data: &DataSet,
    options: &PanelOptions,
    time: TimeFormatter,
    evaluator: &dyn BindingEvaluator,
) -> Result<Panel, RenderError> {
    if data.series.is_empty() {
        error!("data is empty");
        return Err(RenderError::EmptyData);
    }
    if let Some(message) = &data.error {
        error!(reason = %message, "query returned an error");
        return Err(RenderError::QueryError(message.clone()));
    }

    log_data_set(data);

    if data.series.len() > 1 {
        error!(series = data.series.len(), "multiple series, expected one");
        for (i, table) in data.series.iter().enumerate() {
            error!(series = i, name = table.display_name(), "series");
        }
        return Err(RenderError::MultipleSeries(data.series.len()));
    }

    let table = &data.series[0];
    let resolved = resolve(table, &options.roles())?;
    let formatting = Formatting::from_options(options, time);
    let images = project(table, &resolved, &formatting, evaluator);

    if images.is_empty() {
        error!("series contains no values");
        return Err(RenderError::EmptyResult);
    }
    for (i, image) in images.iter().enumerate() {
        let tooltip = if options.tooltip {
            image.tooltip.as_str()
        } else {
            "disabled"
        };
        debug!(image = i, url = %image.icon_url, alt = %image.alt, tooltip, "image");
    }

    Ok(Panel {
        layout: choose_layout(options, images.len()),
        features: Features::from_resolved(options, &resolved),
        images,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::ThresholdEvaluator;
    use crate::domain::Role;
    use crate::table::{Column, Table};
    use chrono::{TimeZone, Utc};

    fn time() -> TimeFormatter {
        TimeFormatter::utc(Utc.timestamp_millis_opt(0).unwrap())
    }

    fn table(rows: usize) -> Table {
        Table::new(vec![
            Column::time("time", (0..rows as i64).map(|i| i * 1000)),
            Column::text("status", (0..rows).map(|i| format!("s{i}"))),
        ])
    }

    fn run(data: &DataSet, options: &PanelOptions) -> Result<Panel, RenderError> {
        render(data, options, time(), &ThresholdEvaluator)
    }

    #[test]
    fn empty_data_and_query_errors() {
        let options = PanelOptions::default();
        assert_eq!(run(&DataSet::default(), &options), Err(RenderError::EmptyData));
        let failed = DataSet::single(table(1)).with_error("timeout");
        assert_eq!(
            run(&failed, &options),
            Err(RenderError::QueryError("timeout".into()))
        );
    }

    #[test]
    fn multiple_series_are_rejected() {
        let data = DataSet::new(vec![table(2), table(2)]);
        assert_eq!(
            run(&data, &PanelOptions::default()),
            Err(RenderError::MultipleSeries(2))
        );
    }

    #[test]
    fn zero_rows_is_no_data() {
        let err = run(&DataSet::single(table(0)), &PanelOptions::default()).unwrap_err();
        assert_eq!(err, RenderError::EmptyResult);
        assert_eq!(Placeholder::from(&err).kind, PlaceholderKind::NoData);
    }

    #[test]
    fn resolution_errors_surface() {
        let options = PanelOptions::default().icon_field("nope");
        let err = run(&DataSet::single(table(2)), &options).unwrap_err();
        assert_eq!(
            err,
            RenderError::FieldNotFound {
                role: Role::Icon,
                name: "nope".into()
            }
        );
        assert_eq!(Placeholder::from(&err).message, "Can't find field for image.");
    }

    #[test]
    fn layouts() {
        let data = DataSet::single(table(1));
        let panel = run(&data, &PanelOptions::default()).unwrap();
        assert_eq!(panel.layout, Layout::Single);
        assert_eq!(panel.images.len(), 1);

        let panel = run(&data, &PanelOptions::default().single_fill(false)).unwrap();
        assert_eq!(panel.layout, Layout::Grid { width: 75, height: 75 });

        let mut options = PanelOptions::default();
        options.slideshow.enable = true;
        let panel = run(&DataSet::single(table(3)), &options).unwrap();
        assert!(matches!(panel.layout, Layout::Slideshow(ref s) if s.duration == 5000));
    }

    #[test]
    fn unresolved_decorations_are_switched_off() {
        let mut options = PanelOptions::default().show_overlay(true).show_link(true);
        options.overlay.field = "status".into();
        options.link.field = "nope".into();
        let panel = run(&DataSet::single(table(2)), &options).unwrap();
        assert!(panel.features.overlay.is_some());
        assert_eq!(panel.features.link_new_tab, None);
        assert_eq!(panel.features.underline_text_size, None);
    }
}
