use std::fmt;
use std::fs;
use std::path::Path;

use derive_setters::Setters;
use serde::{Deserialize, Serialize};

use crate::domain::AppError;
use crate::timefmt::TimeZoneMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Position {
    #[serde(rename = "Top left")]
    TopLeft,
    #[default]
    #[serde(rename = "Top right")]
    TopRight,
    #[serde(rename = "Bottom left")]
    BottomLeft,
    #[serde(rename = "Bottom right")]
    BottomRight,
}

impl Position {
    pub fn css(&self) -> &'static str {
        match self {
            Position::TopLeft => "top: 0; left: 0;",
            Position::TopRight => "top: 0; right: 0;",
            Position::BottomLeft => "bottom: 0; left: 0;",
            Position::BottomRight => "bottom: 0; right: 0;",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SizeUnit {
    #[default]
    #[serde(rename = "%")]
    Percent,
    #[serde(rename = "px")]
    Pixel,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub size: f64,
    pub unit: SizeUnit,
}

impl Default for Size {
    fn default() -> Self {
        Size {
            size: 5.0,
            unit: SizeUnit::Percent,
        }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.unit {
            SizeUnit::Percent => write!(f, "{}%", self.size),
            SizeUnit::Pixel => write!(f, "{}px", self.size),
        }
    }
}

/// Numeric step: applies to values greater or equal to `value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Threshold {
    pub value: f64,
    #[serde(alias = "color")]
    pub result: String,
}

/// Exact match on the cell's text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueBinding {
    pub value: String,
    #[serde(alias = "color")]
    pub result: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BindingRules {
    pub unbounded: String,
    pub thresholds: Vec<Threshold>,
    pub bindings: Vec<ValueBinding>,
}

impl BindingRules {
    pub fn unbounded(result: impl Into<String>) -> Self {
        BindingRules {
            unbounded: result.into(),
            ..Default::default()
        }
    }

    pub fn threshold(mut self, value: f64, result: impl Into<String>) -> Self {
        self.thresholds.push(Threshold {
            value,
            result: result.into(),
        });
        self
    }

    pub fn binding(mut self, value: impl Into<String>, result: impl Into<String>) -> Self {
        self.bindings.push(ValueBinding {
            value: value.into(),
            result: result.into(),
        });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Setters)]
#[serde(default)]
#[setters(into)]
pub struct OverlayOptions {
    pub field: String,
    pub position: Position,
    pub width: Size,
    pub height: Size,
    pub bindings: BindingRules,
}

impl Default for OverlayOptions {
    fn default() -> Self {
        OverlayOptions {
            field: String::new(),
            position: Position::TopRight,
            width: Size::default(),
            height: Size::default(),
            bindings: BindingRules::unbounded("#299c46"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Setters)]
#[serde(default)]
#[setters(into)]
pub struct UnderlineOptions {
    pub field: String,
    pub text_size: u32,
    pub bindings: BindingRules,
}

impl Default for UnderlineOptions {
    fn default() -> Self {
        UnderlineOptions {
            field: String::new(),
            text_size: 14,
            bindings: BindingRules::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Setters)]
#[serde(default)]
#[setters(into)]
pub struct LinkOptions {
    pub field: String,
    pub url_prefix: String,
    pub bindings: BindingRules,
    pub new_tab: bool,
}

impl Default for LinkOptions {
    fn default() -> Self {
        LinkOptions {
            field: String::new(),
            url_prefix: String::new(),
            bindings: BindingRules::default(),
            new_tab: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transition {
    #[default]
    Slide,
    Fade,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Setters)]
#[serde(default)]
#[setters(into)]
pub struct SlideshowOptions {
    pub enable: bool,
    pub duration: u64,
    pub transition: Transition,
    pub transition_duration: u64,
    pub pause_on_hover: bool,
    pub infinite: bool,
}

impl Default for SlideshowOptions {
    fn default() -> Self {
        SlideshowOptions {
            enable: false,
            duration: 5000,
            transition: Transition::Slide,
            transition_duration: 1000,
            pause_on_hover: true,
            infinite: true,
        }
    }
}

/// Panel options as persisted by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Setters)]
#[serde(default)]
#[setters(into)]
pub struct PanelOptions {
    #[serde(rename = "baseUrl")]
    pub base_url: String,
    pub icon_field: String,
    pub suffix: String,
    pub width: u32,
    pub height: u32,
    #[serde(rename = "singleFill")]
    pub single_fill: bool,
    pub alt_field: String,

    pub tooltip: bool,
    pub tooltip_include_field: bool,
    pub tooltip_field: String,
    pub tooltip_include_date: bool,
    pub tooltip_time_field: String,
    pub tooltip_date_elapsed: bool,
    pub time_zone: TimeZoneMode,

    pub show_overlay: bool,
    pub overlay: OverlayOptions,
    pub show_underline: bool,
    pub underline: UnderlineOptions,
    pub show_link: bool,
    pub link: LinkOptions,
    pub slideshow: SlideshowOptions,
}

impl Default for PanelOptions {
    fn default() -> Self {
        PanelOptions {
            base_url: String::new(),
            icon_field: String::new(),
            suffix: String::new(),
            width: 75,
            height: 75,
            single_fill: true,
            alt_field: String::new(),
            tooltip: false,
            tooltip_include_field: true,
            tooltip_field: String::new(),
            tooltip_include_date: false,
            tooltip_time_field: String::new(),
            tooltip_date_elapsed: false,
            time_zone: TimeZoneMode::Local,
            show_overlay: false,
            overlay: OverlayOptions::default(),
            show_underline: false,
            underline: UnderlineOptions::default(),
            show_link: false,
            link: LinkOptions::default(),
            slideshow: SlideshowOptions::default(),
        }
    }
}

/// Column references per role. `None` means the role is not requested by
/// the current options, an empty string means "use the default".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoleConfig {
    pub icon: String,
    pub alt: String,
    pub tooltip_text: Option<String>,
    pub tooltip_time: Option<String>,
    pub overlay_binding: Option<String>,
    pub underline_binding: Option<String>,
    pub link: Option<String>,
}

impl PanelOptions {
    pub fn from_json(json: &str) -> Result<Self, AppError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, AppError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn tooltip_text_enabled(&self) -> bool {
        self.tooltip && self.tooltip_include_field
    }

    pub fn tooltip_date_enabled(&self) -> bool {
        self.tooltip && self.tooltip_include_date
    }

    /// Which columns the current options ask for.
    pub fn roles(&self) -> RoleConfig {
        let gated = |enabled: bool, field: &str| enabled.then(|| field.to_string());
        RoleConfig {
            icon: self.icon_field.clone(),
            alt: self.alt_field.clone(),
            tooltip_text: gated(self.tooltip_text_enabled(), &self.tooltip_field),
            tooltip_time: gated(self.tooltip_date_enabled(), &self.tooltip_time_field),
            overlay_binding: gated(self.show_overlay, &self.overlay.field),
            underline_binding: gated(self.show_underline, &self.underline.field),
            link: gated(self.show_link, &self.link.field),
        }
    }

    /// Whether the editor shows the option at `path` for the current values.
    pub fn is_visible(&self, path: &str) -> bool {
        match path {
            "tooltip_include_field" | "tooltip_include_date" => self.tooltip,
            "tooltip_field" => self.tooltip_text_enabled(),
            "tooltip_date_elapsed" | "tooltip_time_field" | "time_zone" => {
                self.tooltip_date_enabled()
            }
            "overlay.bindings" => self.show_overlay && !self.overlay.field.is_empty(),
            "underline.bindings" => self.show_underline && !self.underline.field.is_empty(),
            "link.bindings" => self.show_link && !self.link.field.is_empty(),
            p if p.starts_with("overlay.") => self.show_overlay,
            p if p.starts_with("underline.") => self.show_underline,
            p if p.starts_with("link.") => self.show_link,
            "slideshow.enable" => true,
            p if p.starts_with("slideshow.") => self.slideshow.enable,
            _ => true,
        }
    }
}
