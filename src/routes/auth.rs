use crate::{
    auth::{hash_password, verify_password, AuthResponse, LoginRequest, RegisterRequest},
    error::AppError,
    models::normalize_email,
    state::AppState,
    store::EMAIL_TAKEN_MESSAGE,
};
use actix_web::{post, web, HttpResponse, Responder};
use validator::Validate;

const INVALID_LOGIN_MESSAGE: &str = "Incorrect email or password";

/// Register a new user
///
/// Creates a new account and returns it. The response never contains the
/// password or its hash.
#[post("/register")]
pub async fn register(
    state: web::Data<AppState>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    register_data.validate()?;
    let RegisterRequest { email, password } = register_data.into_inner();
    let email = normalize_email(&email);

    if state.users.find_user_by_email(&email).await?.is_some() {
        return Err(AppError::BadRequest(EMAIL_TAKEN_MESSAGE.into()));
    }

    // Hashing runs on the blocking thread pool.
    let cost = state.bcrypt_cost;
    let password_hash = web::block(move || hash_password(&password, cost)).await??;

    // Concurrent registrations can both pass the lookup; the store enforces uniqueness too.
    let user = state.users.create_user(&email, &password_hash).await?;
    log::info!("registered user {}", user.id);

    Ok(HttpResponse::Ok().json(user))
}

/// Login user
///
/// Checks the credentials and returns a bearer token.
#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    login_data.validate()?;
    let LoginRequest { email, password } = login_data.into_inner();
    let email = normalize_email(&email);

    let user = match state.users.find_user_by_email(&email).await? {
        Some(user) => user,
        None => {
            // Unknown emails cost the same bcrypt work as a wrong password.
            let cost = state.bcrypt_cost;
            let _ = web::block(move || hash_password(&password, cost)).await;
            return Err(AppError::Unauthorized(INVALID_LOGIN_MESSAGE.into()));
        }
    };

    let password_hash = user.password_hash.clone();
    let valid = web::block(move || verify_password(&password, &password_hash)).await?;
    if !valid {
        return Err(AppError::Unauthorized(INVALID_LOGIN_MESSAGE.into()));
    }

    let token = state
        .tokens
        .issue(user.id, &user.email, Some(state.access_token_ttl))?;
    Ok(HttpResponse::Ok().json(AuthResponse::bearer(token)))
}
