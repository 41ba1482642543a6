pub mod todo;
pub mod user;

pub use todo::{CompletionInput, NewTodo, Todo, TodoChanges, TodoInput, TodoUpdate};
pub use user::{normalize_email, User};
