//! Category model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default, with = "super::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
}

impl Category {
    pub fn from_request(id: i64, created_at: DateTime<Utc>, request: CreateCategoryRequest) -> Self {
        Self {
            id,
            name: request.name,
            description: request.description,
            icon: request.icon,
            created_at: Some(created_at),
        }
    }

    pub fn apply(&mut self, update: UpdateCategoryRequest) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(icon) = update.icon {
            self.icon = icon;
        }
    }

    /// Icon and name as shown on menu buttons, with a box for missing icons
    pub fn display_label(&self) -> String {
        let icon = if self.icon.is_empty() { "📦" } else { self.icon.as_str() };
        format!("{} {}", icon, self.name)
    }
}
