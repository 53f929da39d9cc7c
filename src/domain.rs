use std::fmt;
use std::io::Error;
use std::path::PathBuf;

use polars::error::PolarsError;
use serde::Serialize;

pub const HELP_TEXT: &str = "dynimg preview

Navigation
  j / Down        next image
  k / Up          previous image
  PgDown / PgUp   jump 10 images
  g / G           first / last image

Actions
  y               copy image url to clipboard
  o               copy link url to clipboard
  ?               show this help
  Esc             close popup
  q               quit";

/// A visual purpose a column can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Icon,
    Alt,
    TooltipText,
    TooltipTime,
    OverlayBinding,
    UnderlineBinding,
    Link,
}

impl Role {
    pub const ALL: [Role; 7] = [
        Role::Icon,
        Role::Alt,
        Role::TooltipText,
        Role::TooltipTime,
        Role::OverlayBinding,
        Role::UnderlineBinding,
        Role::Link,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Icon => "icon",
            Role::Alt => "alt",
            Role::TooltipText => "tooltip_text",
            Role::TooltipTime => "tooltip_time",
            Role::OverlayBinding => "overlay_binding",
            Role::UnderlineBinding => "underline_binding",
            Role::Link => "link",
        }
    }

    /// Required roles abort the render pass when they can't be resolved,
    /// optional ones only switch their feature off.
    pub fn is_required(&self) -> bool {
        matches!(
            self,
            Role::Icon | Role::Alt | Role::TooltipText | Role::TooltipTime
        )
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    MissingDefaultField,
    FieldNotFound { role: Role, name: String },
}

impl fmt::Display for ResolutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionError::MissingDefaultField => write!(f, "no non time field in data"),
            ResolutionError::FieldNotFound { role, name } if name.is_empty() => {
                write!(f, "no matching field for {role}")
            }
            ResolutionError::FieldNotFound { role, name } => {
                write!(f, "field '{name}' for {role} not found in data")
            }
        }
    }
}

impl std::error::Error for ResolutionError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderKind {
    NoData,
    Error,
}

/// Everything that makes a render pass show a placeholder instead of images.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderError {
    EmptyData,
    QueryError(String),
    MultipleSeries(usize),
    MissingDefaultField,
    FieldNotFound { role: Role, name: String },
    EmptyResult,
}

impl RenderError {
    pub fn kind(&self) -> PlaceholderKind {
        match self {
            RenderError::EmptyData | RenderError::EmptyResult => PlaceholderKind::NoData,
            _ => PlaceholderKind::Error,
        }
    }

    /// Short text shown in place of the panel. Details go to the log only.
    pub fn placeholder(&self) -> &'static str {
        match self {
            RenderError::EmptyData | RenderError::EmptyResult => "No data found in response.",
            RenderError::QueryError(_) => "Error. See the log for more precision.",
            RenderError::MultipleSeries(_) => {
                "There's multiple time series. Use the outer join transform."
            }
            RenderError::MissingDefaultField => "Can't find a non time field for image.",
            RenderError::FieldNotFound { role, .. } => match role {
                Role::Icon => "Can't find field for image.",
                Role::Alt => "Can't find field for alt.",
                Role::TooltipText => "Can't find field for tooltip.",
                Role::TooltipTime => "Can't find time field for tooltip.",
                Role::OverlayBinding => "Can't find field for overlay.",
                Role::UnderlineBinding => "Can't find field for underline.",
                Role::Link => "Can't find field for link.",
            },
        }
    }
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::EmptyData => write!(f, "data is empty"),
            RenderError::QueryError(msg) => write!(f, "query failed: {msg}"),
            RenderError::MultipleSeries(n) => write!(f, "{n} series in data, expected one"),
            RenderError::MissingDefaultField => write!(f, "no non time field in data"),
            RenderError::FieldNotFound { role, name } => {
                write!(f, "field '{name}' for {role} not found in data")
            }
            RenderError::EmptyResult => write!(f, "series contains no values"),
        }
    }
}

impl std::error::Error for RenderError {}

impl From<ResolutionError> for RenderError {
    fn from(err: ResolutionError) -> Self {
        match err {
            ResolutionError::MissingDefaultField => RenderError::MissingDefaultField,
            ResolutionError::FieldNotFound { role, name } => {
                RenderError::FieldNotFound { role, name }
            }
        }
    }
}

#[derive(Debug)]
pub enum AppError {
    IoError(Error),
    PolarsError(PolarsError),
    ConfigError(serde_json::Error),
    LoadingFailed(String),
    FileNotFound(PathBuf),
    PermissionDenied(PathBuf),
    UnknownFileType(PathBuf),
    Render(RenderError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::IoError(e) => write!(f, "io error: {e}"),
            AppError::PolarsError(e) => write!(f, "failed to read data: {e}"),
            AppError::ConfigError(e) => write!(f, "invalid panel options: {e}"),
            AppError::LoadingFailed(msg) => write!(f, "loading failed: {msg}"),
            AppError::FileNotFound(p) => write!(f, "file not found: {}", p.display()),
            AppError::PermissionDenied(p) => write!(f, "permission denied: {}", p.display()),
            AppError::UnknownFileType(p) => write!(f, "unknown file type: {}", p.display()),
            AppError::Render(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<Error> for AppError {
    fn from(err: Error) -> Self {
        AppError::IoError(err)
    }
}

impl From<PolarsError> for AppError {
    fn from(err: PolarsError) -> Self {
        AppError::PolarsError(err)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::ConfigError(err)
    }
}

impl From<RenderError> for AppError {
    fn from(err: RenderError) -> Self {
        AppError::Render(err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Message {
    Quit,
    MoveUp,
    MoveDown,
    MovePageUp,
    MovePageDown,
    MoveBeginning,
    MoveEnd,
    CopyUrl,
    CopyLink,
    Help,
    Exit,
    Tick,
    Resize(usize, usize),
}

#[derive(Debug, Clone)]
pub struct PreviewConfig {
    pub event_poll_time: u64,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            event_poll_time: 100,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_hides_field_names() {
        let err = RenderError::FieldNotFound {
            role: Role::Alt,
            name: "secret_column".into(),
        };
        assert_eq!(err.placeholder(), "Can't find field for alt.");
        assert!(err.to_string().contains("secret_column"));
    }

    #[test]
    fn no_data_errors_are_not_error_placeholders() {
        assert_eq!(RenderError::EmptyData.kind(), PlaceholderKind::NoData);
        assert_eq!(RenderError::EmptyResult.kind(), PlaceholderKind::NoData);
        assert_eq!(RenderError::MultipleSeries(2).kind(), PlaceholderKind::Error);
        assert_eq!(RenderError::MissingDefaultField.kind(), PlaceholderKind::Error);
    }

    #[test]
    fn resolution_error_converts() {
        let err: RenderError = ResolutionError::FieldNotFound {
            role: Role::Icon,
            name: "x".into(),
        }
        .into();
        assert_eq!(
            err,
            RenderError::FieldNotFound {
                role: Role::Icon,
                name: "x".into()
            }
        );
        assert_eq!(
            RenderError::from(ResolutionError::MissingDefaultField),
            RenderError::MissingDefaultField
        );
    }

    #[test]
    fn required_roles() {
        let required: Vec<Role> = Role::ALL.into_iter().filter(Role::is_required).collect();
        assert_eq!(
            required,
            vec![Role::Icon, Role::Alt, Role::TooltipText, Role::TooltipTime]
        );
    }
}
