pub mod auth;
pub mod health;
pub mod todos;

use crate::auth::AuthMiddleware;
use crate::error::AppError;
use actix_web::{middleware::DefaultHeaders, web};

/// Registers every route, plus the extractor configs that turn body and path
/// errors into `AppError` responses.
///
/// Expects a `web::Data<AppState>` to be registered on the `App`.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(path_config())
        .service(health::index)
        .service(health::health)
        .service(
            web::scope("/api")
                .service(
                    web::scope("/auth")
                        .service(auth::login)
                        .service(auth::register),
                )
                .service(
                    web::scope("/todos")
                        .wrap(AuthMiddleware)
                        .service(todos::list_todos)
                        .service(todos::create_todo)
                        .service(todos::get_todo)
                        .service(todos::update_todo)
                        .service(todos::complete_todo)
                        .service(todos::delete_todo),
                ),
        );
}

/// Security headers added to every response.
pub fn security_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("X-Content-Type-Options", "nosniff"))
        .add(("X-Frame-Options", "DENY"))
        .add(("Referrer-Policy", "no-referrer"))
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
}

// Only todo routes take path parameters; an unparseable id is just another missing todo.
fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|_err, _req| todos::todo_not_found().into())
}
