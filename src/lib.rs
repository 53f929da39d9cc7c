//! Maps a tabular result set to a sequence of image descriptors for a
//! dashboard panel: resolve which column feeds which role, then project the
//! rows into icon urls, alt texts, tooltips and decorations.

pub mod binding;
pub mod config;
pub mod domain;
pub mod fields;
pub mod html;
pub mod loader;
pub mod logging;
pub mod projector;
pub mod render;
pub mod resolver;
pub mod table;
pub mod timefmt;

pub use binding::{BindingEvaluator, ThresholdEvaluator};
pub use config::{BindingRules, PanelOptions, RoleConfig};
pub use domain::{AppError, PlaceholderKind, RenderError, ResolutionError, Role};
pub use projector::{Formatting, ImageDescriptor, project};
pub use render::{Layout, Panel, Placeholder, render};
pub use resolver::{FieldIndex, ResolutionOutcome, ResolvedRoles, resolve};
pub use table::{CellValue, Column, ColumnType, DataSet, Table};
pub use timefmt::{TimeFormatter, TimeZoneMode};
