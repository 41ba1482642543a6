use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

/// Maximum title length in characters, counted after trimming.
pub const MAX_TITLE_CHARS: usize = 200;

/// A todo item as stored and returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Todo {
    pub id: i32,
    /// Owner of the todo. Set at creation and never changed.
    pub user_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating a todo.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TodoInput {
    /// Required; 1 to 200 characters once surrounding whitespace is removed.
    #[validate(custom = "validate_title")]
    pub title: String,
    pub description: Option<String>,
    /// Defaults to `false`.
    #[serde(default)]
    pub completed: bool,
}

/// Request body for a partial update.
///
/// Only fields present in the body are applied. `description` distinguishes an
/// absent field (left unchanged) from an explicit `null` (cleared).
#[derive(Debug, Default, Deserialize, Validate)]
pub struct TodoUpdate {
    #[validate(custom = "validate_title")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    pub completed: Option<bool>,
}

/// Request body for setting the completion flag.
#[derive(Debug, Serialize, Deserialize)]
pub struct CompletionInput {
    pub completed: bool,
}

/// A validated todo ready to be stored for an owner.
#[derive(Debug, Clone)]
pub struct NewTodo {
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
}

/// A validated set of field changes.
#[derive(Debug, Clone, Default)]
pub struct TodoChanges {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub completed: Option<bool>,
}

fn validate_title(title: &str) -> Result<(), ValidationError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        let mut err = ValidationError::new("title_required");
        err.message = Some("Title is required".into());
        return Err(err);
    }
    if trimmed.chars().count() > MAX_TITLE_CHARS {
        let mut err = ValidationError::new("title_length");
        err.message = Some("Title must not exceed 200 characters".into());
        return Err(err);
    }
    Ok(())
}

/// Wraps any value that is present in the body, including `null`, in `Some`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl From<TodoInput> for NewTodo {
    fn from(input: TodoInput) -> Self {
        Self {
            title: input.title.trim().to_string(),
            description: input.description,
            completed: input.completed,
        }
    }
}

impl From<TodoUpdate> for TodoChanges {
    fn from(update: TodoUpdate) -> Self {
        Self {
            title: update.title.map(|title| title.trim().to_string()),
            description: update.description,
            completed: update.completed,
        }
    }
}

impl Todo {
    /// Applies the present fields of `changes` and refreshes `updated_at`.
    pub fn apply(&mut self, changes: TodoChanges) {
        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(description) = changes.description {
            self.description = description;
        }
        if let Some(completed) = changes.completed {
            self.completed = completed;
        }
        self.updated_at = Utc::now();
    }
}
