use super::{TodoStore, UserStore, EMAIL_TAKEN_MESSAGE};
use crate::error::AppError;
use crate::models::{NewTodo, Todo, TodoChanges, User};
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    todos: Vec<Todo>,
    next_user_id: i32,
    next_todo_id: i32,
}

/// Process-local store used when no database is configured, and by tests.
///
/// Each mutation runs under a single write lock, so the ownership check and the
/// change it guards cannot interleave with another request.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, AppError> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|user| user.email == email) {
            return Err(AppError::BadRequest(EMAIL_TAKEN_MESSAGE.into()));
        }

        tables.next_user_id += 1;
        let now = Utc::now();
        let user = User {
            id: tables.next_user_id,
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: now,
            updated_at: now,
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|user| user.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: i32) -> Result<Option<User>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|user| user.id == id).cloned())
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn create_todo(&self, owner: i32, todo: NewTodo) -> Result<Todo, AppError> {
        let mut tables = self.tables.write().await;
        tables.next_todo_id += 1;
        let now = Utc::now();
        let todo = Todo {
            id: tables.next_todo_id,
            user_id: owner,
            title: todo.title,
            description: todo.description,
            completed: todo.completed,
            created_at: now,
            updated_at: now,
        };
        tables.todos.push(todo.clone());
        Ok(todo)
    }

    async fn list_todos(&self, owner: i32) -> Result<Vec<Todo>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .todos
            .iter()
            .filter(|todo| todo.user_id == owner)
            .cloned()
            .collect())
    }

    async fn get_todo(&self, owner: i32, id: i32) -> Result<Option<Todo>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .todos
            .iter()
            .find(|todo| todo.id == id && todo.user_id == owner)
            .cloned())
    }

    async fn update_todo(
        &self,
        owner: i32,
        id: i32,
        changes: TodoChanges,
    ) -> Result<Option<Todo>, AppError> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .todos
            .iter_mut()
            .find(|todo| todo.id == id && todo.user_id == owner)
            .map(|todo| {
                todo.apply(changes);
                todo.clone()
            }))
    }

    async fn delete_todo(&self, owner: i32, id: i32) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        let before = tables.todos.len();
        tables
            .todos
            .retain(|todo| !(todo.id == id && todo.user_id == owner));
        Ok(tables.todos.len() < before)
    }
}
