use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const TITLE_MAX_CHARS: usize = 255;
pub const DESCRIPTION_MAX_CHARS: usize = 1000;

/// A todo item belonging to exactly one user.
///
/// `user_id` is stamped from the authenticated identity at creation time
/// and is immutable afterwards; no update path writes it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Task {
    pub id: i64,
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a task.
///
/// Deliberately has no owner field: unknown fields in the request body
/// (including any client-supplied owner) are dropped at deserialization,
/// and the owner is always the authenticated subject.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskCreate {
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

/// Payload for updating a task; absent fields are left untouched.
/// As with creation, the owner cannot be supplied or changed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
}

impl TaskCreate {
    pub fn validate(&self) -> Result<(), HashMap<String, String>> {
        let mut field_errors = HashMap::new();
        validate_title(&self.title, &mut field_errors);
        validate_description(self.description.as_deref(), &mut field_errors);

        if field_errors.is_empty() {
            Ok(())
        } else {
            Err(field_errors)
        }
    }
}

impl TaskUpdate {
    pub fn validate(&self) -> Result<(), HashMap<String, String>> {
        let mut field_errors = HashMap::new();
        if let Some(title) = &self.title {
            validate_title(title, &mut field_errors);
        }
        validate_description(self.description.as_deref(), &mut field_errors);

        if field_errors.is_empty() {
            Ok(())
        } else {
            Err(field_errors)
        }
    }
}

fn validate_title(title: &str, field_errors: &mut HashMap<String, String>) {
    if title.trim().is_empty() {
        field_errors.insert("title".to_string(), "Title is required".to_string());
    } else if title.chars().count() > TITLE_MAX_CHARS {
        field_errors.insert(
            "title".to_string(),
            format!("Title must be {} characters or less", TITLE_MAX_CHARS),
        );
    }
}

fn validate_description(description: Option<&str>, field_errors: &mut HashMap<String, String>) {
    if let Some(description) = description {
        if description.chars().count() > DESCRIPTION_MAX_CHARS {
            field_errors.insert(
                "description".to_string(),
                format!("Description must be {} characters or less", DESCRIPTION_MAX_CHARS),
            );
        }
    }
}
