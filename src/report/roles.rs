//! Column-role detection by column-name heuristics
//!
//! Each rule pairs a role with a matcher. Columns are scanned in order and
//! every column is offered to the rules in priority order; the first rule
//! that matches claims the column. A later column matching the same role
//! replaces an earlier one.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::types::Table;

/// Semantic meaning assigned to a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnRole {
    Period,
    Export,
    Import,
    Balance,
    Country,
    Value,
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnRole::Period => "period",
            ColumnRole::Export => "export",
            ColumnRole::Import => "import",
            ColumnRole::Balance => "balance",
            ColumnRole::Country => "country",
            ColumnRole::Value => "value",
        };
        f.write_str(name)
    }
}

/// How a column name is tested against a role
#[derive(Debug, Clone, PartialEq)]
pub enum Matcher {
    /// Case-insensitive: any candidate is a substring of the column name
    AnyOf(Vec<String>),
    /// Case-sensitive literal substring, e.g. a year marker
    Contains(String),
}

impl Matcher {
    pub fn any_of<I, S>(candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Matcher::AnyOf(
            candidates
                .into_iter()
                .map(|c| c.as_ref().to_lowercase())
                .collect(),
        )
    }

    pub fn matches(&self, column: &str) -> bool {
        match self {
            Matcher::AnyOf(candidates) => {
                let lower = column.to_lowercase();
                candidates.iter().any(|c| lower.contains(c.as_str()))
            }
            Matcher::Contains(marker) => column.contains(marker.as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoleRule {
    pub role: ColumnRole,
    pub matcher: Matcher,
}

impl RoleRule {
    pub fn new(role: ColumnRole, matcher: Matcher) -> Self {
        Self { role, matcher }
    }
}

/// Resolved role → column name mapping for one table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RoleAssignment {
    roles: BTreeMap<ColumnRole, String>,
}

impl RoleAssignment {
    pub fn get(&self, role: ColumnRole) -> Option<&str> {
        self.roles.get(&role).map(String::as_str)
    }

    pub fn has(&self, role: ColumnRole) -> bool {
        self.roles.contains_key(&role)
    }

    pub fn set(&mut self, role: ColumnRole, column: impl Into<String>) {
        self.roles.insert(role, column.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (ColumnRole, &str)> {
        self.roles.iter().map(|(role, col)| (*role, col.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}

/// Assign columns of `table` to roles.
///
/// Overrides naming an existing column win outright and take that column
/// out of the heuristic pass. Overrides naming a missing column are logged
/// and the heuristic result is used instead.
pub fn detect_column_roles(
    table: &Table,
    rules: &[RoleRule],
    overrides: &BTreeMap<ColumnRole, String>,
) -> RoleAssignment {
    let mut assignment = RoleAssignment::default();

    let pinned: Vec<(ColumnRole, &str)> = overrides
        .iter()
        .filter_map(|(role, column)| {
            if table.column(column).is_some() {
                Some((*role, column.as_str()))
            } else {
                warn!(
                    table = %table.name,
                    role = %role,
                    column = %column,
                    "column override not found, falling back to name matching"
                );
                None
            }
        })
        .collect();

    for column in table.column_names() {
        if pinned.iter().any(|(_, pinned_col)| *pinned_col == column) {
            continue;
        }
        if let Some(rule) = rules.iter().find(|rule| rule.matcher.matches(column)) {
            assignment.set(rule.role, column);
        }
    }

    for (role, column) in pinned {
        assignment.set(role, column);
    }

    assignment
}
