//! View settings model.

use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{AsRefStr, Display, EnumString};

/// Direction applied to the sort comparison.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Field the visible list is ordered by.
///
/// Known fields resolve through typed accessors; anything else is looked up
/// by name among the task's untyped fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum SortField {
    Id,
    Title,
    Description,
    Status,
    CreatedAt,
    DueDate,
    Custom(String),
}

impl SortField {
    /// Parses a persisted field name. An empty name means "no sort".
    pub fn parse(name: &str) -> Option<Self> {
        if name.is_empty() {
            return None;
        }
        Some(Self::from(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        match self {
            SortField::Id => "id",
            SortField::Title => "title",
            SortField::Description => "description",
            SortField::Status => "status",
            SortField::CreatedAt => "created_at",
            SortField::DueDate => "due_date",
            SortField::Custom(name) => name,
        }
    }
}

impl From<String> for SortField {
    fn from(name: String) -> Self {
        match name.as_str() {
            "id" => SortField::Id,
            "title" => SortField::Title,
            "description" => SortField::Description,
            "status" => SortField::Status,
            "created_at" => SortField::CreatedAt,
            "due_date" => SortField::DueDate,
            _ => SortField::Custom(name),
        }
    }
}

impl From<SortField> for String {
    fn from(field: SortField) -> Self {
        field.as_str().to_string()
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The three settings that shape the visible task list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewSettings {
    pub show_completed: bool,
    pub sort_field: Option<SortField>,
    pub sort_direction: SortDirection,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            show_completed: true,
            sort_field: None,
            sort_direction: SortDirection::Asc,
        }
    }
}
