use std::collections::HashMap;

use tracing::{debug, error, warn};

use crate::config::RoleConfig;
use crate::domain::{ResolutionError, Role};
use crate::table::Table;

/// Column lookup built once per table. Names, `name` labels and display
/// names share one map; the lowest column index wins on duplicates.
#[derive(Debug, Clone, Default)]
pub struct FieldIndex {
    by_name: HashMap<String, usize>,
    first_non_time: Option<usize>,
    first_time: Option<usize>,
}

impl FieldIndex {
    pub fn build(table: &Table) -> Self {
        let mut index = FieldIndex::default();
        for (idx, column) in table.columns.iter().enumerate() {
            index.by_name.entry(column.name.clone()).or_insert(idx);
            if let Some(label) = column.labels.get("name") {
                index.by_name.entry(label.clone()).or_insert(idx);
            }
            index
                .by_name
                .entry(column.display_name().to_string())
                .or_insert(idx);
            if column.is_time() {
                index.first_time.get_or_insert(idx);
            } else {
                index.first_non_time.get_or_insert(idx);
            }
        }
        index
    }

    pub fn lookup(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    pub fn first_non_time(&self) -> Option<usize> {
        self.first_non_time
    }

    pub fn first_time(&self) -> Option<usize> {
        self.first_time
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionOutcome {
    Resolved(usize),
    Disabled,
    Failed(ResolutionError),
}

impl ResolutionOutcome {
    pub fn index(&self) -> Option<usize> {
        match self {
            ResolutionOutcome::Resolved(idx) => Some(*idx),
            _ => None,
        }
    }
}

/// One way of finding a column for a role.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Strategy {
    Named(String),
    FirstNonTime,
    FirstTime,
    SameAs(usize),
    Disable,
}

impl Strategy {
    fn apply(&self, role: Role, index: &FieldIndex) -> ResolutionOutcome {
        let found = match self {
            Strategy::Named(name) => index.lookup(name).ok_or_else(|| {
                ResolutionError::FieldNotFound {
                    role,
                    name: name.clone(),
                }
            }),
            Strategy::FirstNonTime => index
                .first_non_time()
                .ok_or(ResolutionError::MissingDefaultField),
            Strategy::FirstTime => index.first_time().ok_or(ResolutionError::FieldNotFound {
                role,
                name: String::new(),
            }),
            Strategy::SameAs(idx) => Ok(*idx),
            Strategy::Disable => return ResolutionOutcome::Disabled,
        };
        match found {
            Ok(idx) => ResolutionOutcome::Resolved(idx),
            Err(e) => ResolutionOutcome::Failed(e),
        }
    }
}

/// Ordered strategies for a role. `fallback` is the icon column for roles
/// that only need some value.
fn strategies(role: Role, reference: Option<&str>, fallback: Option<usize>) -> Vec<Strategy> {
    let Some(reference) = reference else {
        return vec![Strategy::Disable];
    };
    let named = (!reference.is_empty()).then(|| Strategy::Named(reference.to_string()));

    match role {
        Role::Icon => vec![named.unwrap_or(Strategy::FirstNonTime)],
        Role::TooltipTime => vec![named.unwrap_or(Strategy::FirstTime)],
        Role::Alt | Role::TooltipText => match (named, fallback) {
            (Some(n), _) => vec![n],
            (None, Some(idx)) => vec![Strategy::SameAs(idx)],
            (None, None) => vec![Strategy::FirstNonTime],
        },
        Role::OverlayBinding | Role::UnderlineBinding | Role::Link => match named {
            Some(n) => vec![n, Strategy::Disable],
            None => vec![Strategy::Disable],
        },
    }
}

fn run(role: Role, chain: &[Strategy], index: &FieldIndex) -> ResolutionOutcome {
    let mut last_failure = None;
    for strategy in chain {
        match strategy.apply(role, index) {
            ResolutionOutcome::Failed(e) => {
                if !role.is_required() {
                    warn!(role = %role, reason = %e, "optional field not found, feature disabled");
                }
                last_failure = Some(e);
            }
            outcome => return outcome,
        }
    }
    match last_failure {
        Some(e) => ResolutionOutcome::Failed(e),
        None => ResolutionOutcome::Disabled,
    }
}

/// Role to column mapping for one render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoles {
    pub icon: usize,
    pub alt: usize,
    pub tooltip_text: Option<usize>,
    pub tooltip_time: Option<usize>,
    pub overlay_binding: Option<usize>,
    pub underline_binding: Option<usize>,
    pub link: Option<usize>,
}

impl ResolvedRoles {
    pub fn get(&self, role: Role) -> Option<usize> {
        match role {
            Role::Icon => Some(self.icon),
            Role::Alt => Some(self.alt),
            Role::TooltipText => self.tooltip_text,
            Role::TooltipTime => self.tooltip_time,
            Role::OverlayBinding => self.overlay_binding,
            Role::UnderlineBinding => self.underline_binding,
            Role::Link => self.link,
        }
    }

    pub fn outcome(&self, role: Role) -> ResolutionOutcome {
        match self.get(role) {
            Some(idx) => ResolutionOutcome::Resolved(idx),
            None => ResolutionOutcome::Disabled,
        }
    }
}

pub fn resolve(table: &Table, roles: &RoleConfig) -> Result<ResolvedRoles, ResolutionError> {
    let index = FieldIndex::build(table);

    let required = |role: Role, reference: Option<&str>, fallback: Option<usize>| {
        match run(role, &strategies(role, reference, fallback), &index) {
            ResolutionOutcome::Resolved(idx) => Ok(Some(idx)),
            ResolutionOutcome::Disabled => Ok(None),
            ResolutionOutcome::Failed(e) => {
                error!(role = %role, reason = %e, reference = reference.unwrap_or(""), "can't resolve field");
                Err(e)
            }
        }
    };
    let optional = |role: Role, reference: Option<&str>| {
        run(role, &strategies(role, reference, None), &index).index()
    };

    let icon = required(Role::Icon, Some(roles.icon.as_str()), None)?
        .ok_or(ResolutionError::MissingDefaultField)?;
    let alt = required(Role::Alt, Some(roles.alt.as_str()), Some(icon))?.unwrap_or(icon);
    let tooltip_text = required(Role::TooltipText, roles.tooltip_text.as_deref(), Some(icon))?;
    let tooltip_time = required(Role::TooltipTime, roles.tooltip_time.as_deref(), None)?;

    let resolved = ResolvedRoles {
        icon,
        alt,
        tooltip_text,
        tooltip_time,
        overlay_binding: optional(Role::OverlayBinding, roles.overlay_binding.as_deref()),
        underline_binding: optional(Role::UnderlineBinding, roles.underline_binding.as_deref()),
        link: optional(Role::Link, roles.link.as_deref()),
    };
    for role in Role::ALL {
        if let Some(idx) = resolved.get(role) {
            debug!(role = %role, column = %table.columns[idx].name, "resolved field");
        }
    }
    Ok(resolved)
}
