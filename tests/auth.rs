use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use jsonwebtoken::Algorithm;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use todo_vault::auth::{AuthResponse, TokenService};
use todo_vault::store::MemoryStore;
use todo_vault::{routes, AppState};

const SECRET: &[u8] = b"auth-integration-secret";

fn test_state() -> AppState {
    state_with_cost(4)
}

fn state_with_cost(bcrypt_cost: u32) -> AppState {
    AppState::new(
        Arc::new(MemoryStore::new()),
        TokenService::new(SECRET, Algorithm::HS256),
        chrono::Duration::minutes(30),
        bcrypt_cost,
    )
}

async fn post_json<S, B>(app: &S, uri: &str, payload: &Value) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri(uri)
        .set_json(payload)
        .to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

#[actix_rt::test]
async fn test_register_and_login_flow() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_state()))
            .configure(routes::config),
    )
    .await;

    let (status, user) = post_json(
        &app,
        "/api/auth/register",
        &json!({ "email": "alice@example.com", "password": "Secret123!" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "Registration failed: {}", user);
    assert!(user["id"].is_i64());
    assert_eq!(user["email"], "alice@example.com");
    assert!(user["created_at"].is_string());
    assert!(user["updated_at"].is_string());
    assert!(user.get("password").is_none());
    assert!(user.get("password_hash").is_none());
    assert!(!user.to_string().contains("Secret123!"));

    let (status, body) = post_json(
        &app,
        "/api/auth/login",
        &json!({ "email": "alice@example.com", "password": "Secret123!" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "Login failed: {}", body);

    let login: AuthResponse = serde_json::from_value(body).unwrap();
    assert_eq!(login.token_type, "bearer");
    assert_eq!(login.access_token.split('.').count(), 3);

    let claims = TokenService::new(SECRET, Algorithm::HS256)
        .verify(&login.access_token)
        .expect("login token should verify");
    assert_eq!(i64::from(claims.sub), user["id"].as_i64().unwrap());
    assert_eq!(claims.email, "alice@example.com");
    assert_eq!(claims.exp - claims.iat, 30 * 60);
}

#[actix_rt::test]
async fn test_duplicate_registration_is_rejected() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_state()))
            .configure(routes::config),
    )
    .await;

    let payload = json!({ "email": "dup@example.com", "password": "Secret123!" });
    let (status, _) = post_json(&app, "/api/auth/register", &payload).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = post_json(&app, "/api/auth/register", &payload).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Email already registered");

    // Emails are compared case-insensitively.
    let (status, _) = post_json(
        &app,
        "/api/auth/register",
        &json!({ "email": "DUP@Example.com", "password": "Another123!" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn test_invalid_registration_inputs() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_state()))
            .configure(routes::config),
    )
    .await;

    let test_cases = vec![
        (json!({ "password": "Secret123!" }), "missing email"),
        (json!({ "email": "test@example.com" }), "missing password"),
        (
            json!({ "email": "invalid-email", "password": "Secret123!" }),
            "invalid email format",
        ),
        (
            json!({ "email": "test@example.com", "password": "1234567" }),
            "password too short",
        ),
        (
            json!({ "email": "test@example.com", "password": "x".repeat(73) }),
            "password longer than 72 bytes",
        ),
        (
            json!({ "email": "test@example.com", "password": "é".repeat(40) }),
            "multibyte password longer than 72 bytes",
        ),
    ];

    for (payload, description) in test_cases {
        let (status, body) = post_json(&app, "/api/auth/register", &payload).await;
        assert_eq!(
            status,
            StatusCode::BAD_REQUEST,
            "Test case failed: {}. Body: {}",
            description,
            body
        );
        assert!(body["error"].is_string(), "{}: {}", description, body);
    }
}

#[actix_rt::test]
async fn test_invalid_login_inputs() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_state()))
            .configure(routes::config),
    )
    .await;

    let (status, _) = post_json(
        &app,
        "/api/auth/register",
        &json!({ "email": "login@example.com", "password": "Secret123!" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = post_json(&app, "/api/auth/login", &json!({ "password": "Secret123!" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post_json(
        &app,
        "/api/auth/login",
        &json!({ "email": "not-an-email", "password": "Secret123!" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (wrong_status, wrong_body) = post_json(
        &app,
        "/api/auth/login",
        &json!({ "email": "login@example.com", "password": "Wrong123!" }),
    )
    .await;
    let (unknown_status, unknown_body) = post_json(
        &app,
        "/api/auth/login",
        &json!({ "email": "nobody@example.com", "password": "Secret123!" }),
    )
    .await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body, unknown_body);
}

#[actix_rt::test]
async fn test_unknown_email_costs_as_much_as_wrong_password() {
    // A cost high enough that bcrypt dominates the request time.
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state_with_cost(10)))
            .configure(routes::config),
    )
    .await;

    let (status, _) = post_json(
        &app,
        "/api/auth/register",
        &json!({ "email": "timing@example.com", "password": "Secret123!" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let started = Instant::now();
    let (wrong_status, _) = post_json(
        &app,
        "/api/auth/login",
        &json!({ "email": "timing@example.com", "password": "Wrong123!" }),
    )
    .await;
    let wrong_password = started.elapsed();

    let started = Instant::now();
    let (unknown_status, _) = post_json(
        &app,
        "/api/auth/login",
        &json!({ "email": "nobody@example.com", "password": "Wrong123!" }),
    )
    .await;
    let unknown_email = started.elapsed();

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert!(
        unknown_email * 4 >= wrong_password,
        "unknown email took {:?}, wrong password took {:?}",
        unknown_email,
        wrong_password
    );
}

#[actix_rt::test]
async fn test_login_normalizes_email() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_state()))
            .configure(routes::config),
    )
    .await;

    let (status, _) = post_json(
        &app,
        "/api/auth/register",
        &json!({ "email": "Mixed@Example.com", "password": "Secret123!" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = post_json(
        &app,
        "/api/auth/login",
        &json!({ "email": "mixed@example.COM", "password": "Secret123!" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[actix_rt::test]
async fn test_login_ignores_bytes_past_72() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_state()))
            .configure(routes::config),
    )
    .await;

    let password = "k".repeat(72);
    let (status, _) = post_json(
        &app,
        "/api/auth/register",
        &json!({ "email": "long@example.com", "password": password }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Only the first 72 bytes take part in verification.
    let (status, _) = post_json(
        &app,
        "/api/auth/login",
        &json!({ "email": "long@example.com", "password": format!("{}extra", password) }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = post_json(
        &app,
        "/api/auth/login",
        &json!({ "email": "long@example.com", "password": "k".repeat(71) }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn test_malformed_json_body() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_state()))
            .configure(routes::config),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].is_string());
}
