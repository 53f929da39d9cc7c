use std::path::PathBuf;

use chrono::{TimeZone, Utc};
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

use dynimg::html::{panel_html, placeholder_html};
use dynimg::loader::load_data_set;
use dynimg::logging::CaptureLayer;
use dynimg::{
    DataSet, Layout, PanelOptions, Placeholder, PlaceholderKind, RenderError, ThresholdEvaluator,
    TimeFormatter, render,
};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn load(names: &[&str]) -> DataSet {
    let paths: Vec<PathBuf> = names.iter().map(|n| fixture(n)).collect();
    load_data_set(&paths).unwrap()
}

fn time() -> TimeFormatter {
    TimeFormatter::utc(Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap())
}

fn icons() -> PanelOptions {
    PanelOptions::from_json(r#"{"baseUrl": "/icons/", "suffix": ".png"}"#).unwrap()
}

fn run(data: &DataSet, options: &PanelOptions) -> Result<dynimg::Panel, RenderError> {
    render(data, options, time(), &ThresholdEvaluator)
}

#[test]
fn status_column_becomes_icon_urls() {
    let panel = run(&load(&["status.csv"]), &icons()).unwrap();
    let urls: Vec<&str> = panel.images.iter().map(|d| d.icon_url.as_str()).collect();
    assert_eq!(urls, ["/icons/up.png", "/icons/down.png", "/icons/up.png"]);
    let alts: Vec<&str> = panel.images.iter().map(|d| d.alt.as_str()).collect();
    assert_eq!(alts, ["up", "down", "up"]);
    assert_eq!(
        panel.layout,
        Layout::Grid {
            width: 75,
            height: 75
        }
    );
}

#[test]
fn tooltip_joins_date_and_text() {
    let options = PanelOptions::from_json(
        r#"{
            "baseUrl": "/icons/",
            "suffix": ".png",
            "tooltip": true,
            "tooltip_include_date": true,
            "tooltip_field": "host"
        }"#,
    )
    .unwrap();
    let panel = run(&load(&["status.csv"]), &options).unwrap();
    assert_eq!(panel.images[0].tooltip, "2024-01-01 00:00:00 - alpha");
    assert_eq!(panel.images[2].tooltip, "2024-01-01 00:02:00 - gamma");
}

#[test]
fn bindings_decorate_images() {
    let options = PanelOptions::from_json(
        r##"{
            "show_overlay": true,
            "overlay": {
                "field": "latency",
                "bindings": {"unbounded": "green", "thresholds": [{"value": 50, "color": "red"}]}
            },
            "show_link": true,
            "link": {"field": "host", "url_prefix": "https://hosts/"}
        }"##,
    )
    .unwrap();
    let panel = run(&load(&["status.csv"]), &options).unwrap();
    let colors: Vec<Option<&str>> = panel
        .images
        .iter()
        .map(|d| d.overlay_color.as_deref())
        .collect();
    assert_eq!(colors, [Some("green"), Some("red"), Some("green")]);
    assert_eq!(panel.images[1].link_url.as_deref(), Some("https://hosts/beta"));

    let html = panel_html(&panel);
    assert!(html.contains(r#"href="https://hosts/beta""#));
    assert!(html.contains("background-color: red"));
}

#[test]
fn multiple_series_render_an_error_placeholder() {
    let err = run(&load(&["status.csv", "cpu.csv"]), &icons()).unwrap_err();
    assert_eq!(err, RenderError::MultipleSeries(2));
    let placeholder = Placeholder::from(&err);
    assert_eq!(placeholder.kind, PlaceholderKind::Error);
    assert!(placeholder_html(&placeholder).contains("panel-empty"));
}

#[test]
fn header_only_file_is_no_data() {
    let err = run(&load(&["empty.csv"]), &icons()).unwrap_err();
    assert_eq!(err, RenderError::EmptyResult);
    assert_eq!(err.kind(), PlaceholderKind::NoData);
}

#[test]
fn only_time_columns_has_no_default_field() {
    let err = run(&load(&["times_only.csv"]), &icons()).unwrap_err();
    assert_eq!(err, RenderError::MissingDefaultField);
}

#[test]
fn missing_required_field_names_the_role() {
    let options = icons().icon_field("nope");
    let err = run(&load(&["status.csv"]), &options).unwrap_err();
    assert!(matches!(err, RenderError::FieldNotFound { .. }));
    assert!(!Placeholder::from(&err).message.contains("nope"));
}

#[test]
fn render_is_idempotent() {
    let data = load(&["status.csv"]);
    let options = icons().tooltip(true);
    assert_eq!(run(&data, &options), run(&data, &options));
}

#[test]
fn missing_optional_field_is_reported_as_warning() {
    let capture = CaptureLayer::new();
    let subscriber = Registry::default().with(capture.clone());
    let data = load(&["status.csv"]);
    let options = PanelOptions::from_json(r#"{"show_overlay": true, "overlay": {"field": "nope"}}"#)
        .unwrap();

    let panel = tracing::subscriber::with_default(subscriber, || run(&data, &options)).unwrap();
    assert!(panel.images.iter().all(|d| d.overlay_color.is_none()));
    assert!(panel.features.overlay.is_none());

    let warnings = capture.at_level(Level::WARN);
    assert!(
        warnings
            .iter()
            .any(|r| r.field("role") == Some("overlay_binding"))
    );
    assert!(capture.at_level(Level::ERROR).is_empty());
}

#[test]
fn failed_render_is_reported_as_error() {
    let capture = CaptureLayer::new();
    let subscriber = Registry::default().with(capture.clone());
    let data = load(&["status.csv", "cpu.csv"]);

    let result = tracing::subscriber::with_default(subscriber, || run(&data, &icons()));
    assert!(result.is_err());
    let errors = capture.at_level(Level::ERROR);
    assert!(errors.iter().any(|r| r.field("series") == Some("2")));
}
