//! Persistence seam for users and todos.
//!
//! Every todo operation takes the id of the resolved caller and uses it as part
//! of the lookup predicate. A todo owned by someone else is therefore reported
//! exactly like a todo that does not exist (`None` / `false`).

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use crate::error::AppError;
use crate::models::{NewTodo, Todo, TodoChanges, User};
use async_trait::async_trait;

/// Message used when an email is already taken.
pub const EMAIL_TAKEN_MESSAGE: &str = "Email already registered";

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Creates a user. Fails with `BadRequest` if the email is already registered.
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, AppError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn find_user_by_id(&self, id: i32) -> Result<Option<User>, AppError>;
}

#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Stores a new todo owned by `owner`.
    async fn create_todo(&self, owner: i32, todo: NewTodo) -> Result<Todo, AppError>;

    /// All todos owned by `owner`, in creation order.
    async fn list_todos(&self, owner: i32) -> Result<Vec<Todo>, AppError>;

    async fn get_todo(&self, owner: i32, id: i32) -> Result<Option<Todo>, AppError>;

    /// Applies `changes` to an owned todo in one atomic step.
    async fn update_todo(
        &self,
        owner: i32,
        id: i32,
        changes: TodoChanges,
    ) -> Result<Option<Todo>, AppError>;

    /// Sets the completion flag to `completed`, whatever its current value.
    async fn set_completed(
        &self,
        owner: i32,
        id: i32,
        completed: bool,
    ) -> Result<Option<Todo>, AppError> {
        self.update_todo(
            owner,
            id,
            TodoChanges {
                completed: Some(completed),
                ..Default::default()
            },
        )
        .await
    }

    /// Removes an owned todo. Returns `false` when nothing matched.
    async fn delete_todo(&self, owner: i32, id: i32) -> Result<bool, AppError>;
}
