use super::{TodoStore, UserStore, EMAIL_TAKEN_MESSAGE};
use crate::error::AppError;
use crate::models::{NewTodo, Todo, TodoChanges, User};
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

const USER_COLUMNS: &str = "id, email, password_hash, created_at, updated_at";
const TODO_COLUMNS: &str = "id, user_id, title, description, completed, created_at, updated_at";

/// Postgres-backed store. Owns the connection pool built at startup.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects a pool of at most `max_connections` connections.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Applies pending schema migrations.
    pub async fn migrate(&self) -> Result<(), AppError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, AppError> {
        let result = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (email, password_hash) VALUES ($1, $2) RETURNING {}",
            USER_COLUMNS
        ))
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(user) => Ok(user),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(AppError::BadRequest(EMAIL_TAKEN_MESSAGE.into()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE email = $1",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_user_by_id(&self, id: i32) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }
}

#[async_trait]
impl TodoStore for PgStore {
    async fn create_todo(&self, owner: i32, todo: NewTodo) -> Result<Todo, AppError> {
        let created = sqlx::query_as::<_, Todo>(&format!(
            "INSERT INTO todos (user_id, title, description, completed)
             VALUES ($1, $2, $3, $4)
             RETURNING {}",
            TODO_COLUMNS
        ))
        .bind(owner)
        .bind(todo.title)
        .bind(todo.description)
        .bind(todo.completed)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn list_todos(&self, owner: i32) -> Result<Vec<Todo>, AppError> {
        let todos = sqlx::query_as::<_, Todo>(&format!(
            "SELECT {} FROM todos WHERE user_id = $1 ORDER BY id",
            TODO_COLUMNS
        ))
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;
        Ok(todos)
    }

    async fn get_todo(&self, owner: i32, id: i32) -> Result<Option<Todo>, AppError> {
        let todo = sqlx::query_as::<_, Todo>(&format!(
            "SELECT {} FROM todos WHERE id = $1 AND user_id = $2",
            TODO_COLUMNS
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;
        Ok(todo)
    }

    async fn update_todo(
        &self,
        owner: i32,
        id: i32,
        changes: TodoChanges,
    ) -> Result<Option<Todo>, AppError> {
        let mut tx = self.pool.begin().await?;

        // Lock the owned row so a concurrent delete cannot slip between the check and the write.
        let existing = sqlx::query_as::<_, Todo>(&format!(
            "SELECT {} FROM todos WHERE id = $1 AND user_id = $2 FOR UPDATE",
            TODO_COLUMNS
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(mut todo) = existing else {
            return Ok(None);
        };
        todo.apply(changes);

        let updated = sqlx::query_as::<_, Todo>(&format!(
            "UPDATE todos
             SET title = $1, description = $2, completed = $3, updated_at = $4
             WHERE id = $5 AND user_id = $6
             RETURNING {}",
            TODO_COLUMNS
        ))
        .bind(&todo.title)
        .bind(&todo.description)
        .bind(todo.completed)
        .bind(todo.updated_at)
        .bind(id)
        .bind(owner)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(updated))
    }

    async fn delete_todo(&self, owner: i32, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM todos WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
