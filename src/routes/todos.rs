use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{CompletionInput, NewTodo, TodoChanges, TodoInput, TodoUpdate},
    state::AppState,
};
use actix_web::{delete, get, patch, post, put, web, HttpResponse, Responder};
use serde_json::json;
use validator::Validate;

/// Body of every 404 for a todo, whether it is missing or owned by someone else.
pub const TODO_NOT_FOUND_MESSAGE: &str = "Todo not found";

pub(crate) fn todo_not_found() -> AppError {
    AppError::NotFound(TODO_NOT_FOUND_MESSAGE.into())
}

/// Lists the caller's todos in creation order.
///
/// ## Responses:
/// - `200 OK`: JSON array of `Todo` objects owned by the caller.
/// - `401 Unauthorized`: missing, invalid or expired token.
#[get("")]
pub async fn list_todos(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let todos = state.todos.list_todos(user.id).await?;
    Ok(HttpResponse::Ok().json(todos))
}

/// Creates a todo owned by the caller.
///
/// ## Request Body:
/// - `title`: required, 1 to 200 characters after trimming.
/// - `description` (optional).
/// - `completed` (optional): defaults to `false`.
///
/// ## Responses:
/// - `200 OK`: the created `Todo`.
/// - `400 Bad Request`: validation failure.
/// - `401 Unauthorized`: missing, invalid or expired token.
#[post("")]
pub async fn create_todo(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    todo_data: web::Json<TodoInput>,
) -> Result<impl Responder, AppError> {
    todo_data.validate()?;

    let todo = state
        .todos
        .create_todo(user.id, NewTodo::from(todo_data.into_inner()))
        .await?;
    Ok(HttpResponse::Ok().json(todo))
}

/// Retrieves one of the caller's todos.
///
/// ## Responses:
/// - `200 OK`: the `Todo`.
/// - `401 Unauthorized`: missing, invalid or expired token.
/// - `404 Not Found`: no todo with this id belongs to the caller.
#[get("/{id}")]
pub async fn get_todo(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    todo_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let todo = state
        .todos
        .get_todo(user.id, todo_id.into_inner())
        .await?
        .ok_or_else(todo_not_found)?;
    Ok(HttpResponse::Ok().json(todo))
}

/// Applies a partial update to one of the caller's todos.
///
/// Fields missing from the body are left unchanged; `"description": null`
/// clears the description.
///
/// ## Responses:
/// - `200 OK`: the updated `Todo`.
/// - `400 Bad Request`: validation failure.
/// - `401 Unauthorized`: missing, invalid or expired token.
/// - `404 Not Found`: no todo with this id belongs to the caller.
#[put("/{id}")]
pub async fn update_todo(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    todo_id: web::Path<i32>,
    todo_data: web::Json<TodoUpdate>,
) -> Result<impl Responder, AppError> {
    todo_data.validate()?;

    let todo = state
        .todos
        .update_todo(
            user.id,
            todo_id.into_inner(),
            TodoChanges::from(todo_data.into_inner()),
        )
        .await?
        .ok_or_else(todo_not_found)?;
    Ok(HttpResponse::Ok().json(todo))
}

/// Sets the completion flag of one of the caller's todos to the given value.
///
/// ## Request Body:
/// - `completed`: the new value of the flag.
///
/// ## Responses:
/// - `200 OK`: the updated `Todo`.
/// - `401 Unauthorized`: missing, invalid or expired token.
/// - `404 Not Found`: no todo with this id belongs to the caller.
#[patch("/{id}/complete")]
pub async fn complete_todo(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    todo_id: web::Path<i32>,
    completion: web::Json<CompletionInput>,
) -> Result<impl Responder, AppError> {
    let todo = state
        .todos
        .set_completed(user.id, todo_id.into_inner(), completion.completed)
        .await?
        .ok_or_else(todo_not_found)?;
    Ok(HttpResponse::Ok().json(todo))
}

/// Deletes one of the caller's todos.
///
/// ## Responses:
/// - `200 OK`: confirmation message.
/// - `401 Unauthorized`: missing, invalid or expired token.
/// - `404 Not Found`: no todo with this id belongs to the caller.
#[delete("/{id}")]
pub async fn delete_todo(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    todo_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    if !state.todos.delete_todo(user.id, todo_id.into_inner()).await? {
        return Err(todo_not_found());
    }
    Ok(HttpResponse::Ok().json(json!({ "message": "Todo deleted successfully" })))
}
