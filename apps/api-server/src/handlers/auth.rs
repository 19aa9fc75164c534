//! Authentication handlers.

use actix_web::{HttpResponse, web};
use std::sync::Arc;

use quill_core::DomainError;
use quill_core::domain::User;
use quill_core::ports::{PasswordService, TokenService};
use quill_shared::dto::{AuthResponse, LoginRequest, RegisterRequest, UserResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn user_response(user: &User) -> UserResponse {
    UserResponse {
        id: user.id,
        username: user.username.clone(),
        email: user.email.clone(),
        created_at: user.created_at,
    }
}

/// POST /api/auth/register
pub async fn register(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    password_service: web::Data<Arc<dyn PasswordService>>,
    body: web::Json<RegisterRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    // Validate input
    if req.username.is_empty() {
        return Err(AppError::BadRequest("Username is required".to_string()));
    }
    if req.email.is_empty() || !req.email.contains('@') {
        return Err(AppError::BadRequest("Invalid email address".to_string()));
    }
    if req.password.len() < 8 {
        return Err(AppError::BadRequest(
            "Password must be at least 8 characters".to_string(),
        ));
    }

    // Check if user already exists
    if state.users.find_by_email(&req.email).await?.is_some() {
        return Err(DomainError::Duplicate("Email already registered".to_string()).into());
    }
    if state.users.find_by_username(&req.username).await?.is_some() {
        return Err(DomainError::Duplicate("Username already taken".to_string()).into());
    }

    // Hash password
    let password_hash = password_service
        .hash(&req.password)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    // Create user
    let user = User::new(req.username, req.email, password_hash);
    let saved = state.users.insert(user).await?;

    // Generate token
    let token = token_service
        .generate_token(saved.id, &saved.username)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(HttpResponse::Created().json(AuthResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: token_service.expiration_seconds() as u64,
        user: user_response(&saved),
    }))
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    password_service: web::Data<Arc<dyn PasswordService>>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    // Find user by email
    let user = state
        .users
        .find_by_email(&req.email)
        .await?
        .ok_or(AppError::Unauthorized)?;

    // Verify password
    let valid = password_service
        .verify(&req.password, &user.password_hash)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    if !valid {
        return Err(AppError::Unauthorized);
    }

    // Generate token
    let token = token_service
        .generate_token(user.id, &user.username)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: token_service.expiration_seconds() as u64,
        user: user_response(&user),
    }))
}

/// GET /api/auth/me - Protected route
pub async fn me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let user = state
        .users
        .find_by_id(identity.user_id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    Ok(HttpResponse::Ok().json(user_response(&user)))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{App, test, web};
    use quill_shared::dto::{AuthResponse, UserResponse};
    use serde_json::json;

    use crate::handlers::test_support::{password_service, token_service};
    use crate::state::AppState;

    macro_rules! init_app {
        ($state:expr, $tokens:expr, $passwords:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($state.clone()))
                    .app_data(web::Data::new($tokens.clone()))
                    .app_data(web::Data::new($passwords.clone()))
                    .configure(crate::handlers::configure_routes),
            )
            .await
        };
    }

    #[actix_rt::test]
    async fn register_then_login() {
        let state = AppState::in_memory();
        let tokens = token_service();
        let passwords = password_service();
        let app = init_app!(state, tokens, passwords);

        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({
                "username": "alice",
                "email": "alice@example.com",
                "password": "password123"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let registered: AuthResponse = test::read_body_json(resp).await;
        assert!(!registered.access_token.is_empty());
        assert_eq!(registered.user.username, "alice");

        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({
                "email": "alice@example.com",
                "password": "password123"
            }))
            .to_request();
        let logged_in: AuthResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(logged_in.user.id, registered.user.id);
    }

    #[actix_rt::test]
    async fn login_rejects_wrong_password() {
        let state = AppState::in_memory();
        let tokens = token_service();
        let passwords = password_service();
        let app = init_app!(state, tokens, passwords);

        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({
                "username": "alice",
                "email": "alice@example.com",
                "password": "password123"
            }))
            .to_request();
        test::call_service(&app, req).await;

        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({
                "email": "alice@example.com",
                "password": "wrong-password"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_rt::test]
    async fn register_rejects_duplicate_email() {
        let state = AppState::in_memory();
        let tokens = token_service();
        let passwords = password_service();
        let app = init_app!(state, tokens, passwords);

        let body = json!({
            "username": "alice",
            "email": "alice@example.com",
            "password": "password123"
        });

        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(&body)
            .to_request();
        test::call_service(&app, req).await;

        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(&body)
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[actix_rt::test]
    async fn register_rejects_duplicate_username() {
        let state = AppState::in_memory();
        let tokens = token_service();
        let passwords = password_service();
        let app = init_app!(state, tokens, passwords);

        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({
                "username": "alice",
                "email": "alice@example.com",
                "password": "password123"
            }))
            .to_request();
        test::call_service(&app, req).await;

        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({
                "username": "alice",
                "email": "alice2@example.com",
                "password": "password123"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::CONFLICT);
    }

    #[actix_rt::test]
    async fn register_rejects_short_password() {
        let state = AppState::in_memory();
        let tokens = token_service();
        let passwords = password_service();
        let app = init_app!(state, tokens, passwords);

        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({
                "username": "alice",
                "email": "alice@example.com",
                "password": "short"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_rt::test]
    async fn me_returns_the_caller() {
        let state = AppState::in_memory();
        let tokens = token_service();
        let passwords = password_service();
        let app = init_app!(state, tokens, passwords);

        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({
                "username": "alice",
                "email": "alice@example.com",
                "password": "password123"
            }))
            .to_request();
        let registered: AuthResponse = test::call_and_read_body_json(&app, req).await;

        let req = test::TestRequest::get()
            .uri("/api/auth/me")
            .insert_header((
                "Authorization",
                format!("Bearer {}", registered.access_token),
            ))
            .to_request();
        let me: UserResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(me.id, registered.user.id);
        assert_eq!(me.username, "alice");
    }

    #[actix_rt::test]
    async fn me_requires_token() {
        let state = AppState::in_memory();
        let tokens = token_service();
        let passwords = password_service();
        let app = init_app!(state, tokens, passwords);

        let req = test::TestRequest::get().uri("/api/auth/me").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
