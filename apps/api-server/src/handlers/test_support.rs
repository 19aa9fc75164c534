//! Shared fixtures for handler tests.

use std::sync::Arc;

use quill_core::domain::{Post, User};
use quill_core::ports::{PasswordService, TokenService};
use quill_infra::auth::{Argon2PasswordService, JwtConfig, JwtTokenService};

use crate::state::AppState;

pub(crate) fn token_service() -> Arc<dyn TokenService> {
    Arc::new(JwtTokenService::new(JwtConfig {
        secret: "handler-test-secret".to_string(),
        expiration_hours: 1,
        issuer: "quill-test".to_string(),
    }))
}

pub(crate) fn password_service() -> Arc<dyn PasswordService> {
    Arc::new(Argon2PasswordService::new())
}

pub(crate) async fn seed_user(state: &AppState, username: &str) -> User {
    let user = User::new(
        username.to_string(),
        format!("{username}@example.com"),
        "not-a-real-hash".to_string(),
    );
    state.users.insert(user).await.unwrap()
}

pub(crate) async fn seed_post(
    state: &AppState,
    author: &User,
    title: &str,
    published: bool,
) -> Post {
    let post = Post::new(
        author.id,
        title.to_string(),
        "Some content".to_string(),
        published,
    );
    state.posts.insert(post).await.unwrap()
}

pub(crate) fn bearer(tokens: &Arc<dyn TokenService>, user: &User) -> (&'static str, String) {
    let token = tokens.generate_token(user.id, &user.username).unwrap();
    ("Authorization", format!("Bearer {token}"))
}
