//! Post handlers - the CRUD surface plus ownership enforcement.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_core::access::{self, Access, PostDraft, PostPatch};
use quill_core::domain::Post;
use quill_shared::dto::{
    CreatePostRequest, MessageResponse, PostAuthor, PostEnvelope, PostResponse, UpdatePostRequest,
};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Embed the author's public info; `None` when the account is gone.
async fn to_response(state: &AppState, post: Post) -> AppResult<PostResponse> {
    let author = state
        .users
        .find_by_id(post.author_id)
        .await?
        .map(|u| PostAuthor {
            id: u.id,
            username: u.username,
        });

    Ok(PostResponse {
        id: post.id,
        title: post.title,
        content: post.content,
        author,
        published: post.published,
        created_at: post.created_at,
        updated_at: post.updated_at,
    })
}

/// GET /api/posts - all published posts, newest first.
pub async fn list_published(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state.posts.find_published().await?;

    let mut body = Vec::with_capacity(posts.len());
    for post in posts {
        body.push(to_response(&state, post).await?);
    }

    Ok(HttpResponse::Ok().json(body))
}

/// GET /api/posts/{id}
pub async fn get_post(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let post = state
        .posts
        .find_by_id(path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

    Ok(HttpResponse::Ok().json(to_response(&state, post).await?))
}

/// GET /api/posts/user/my-posts - the caller's posts, drafts included.
pub async fn my_posts(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let posts = state.posts.find_by_author(identity.user_id).await?;

    let mut body = Vec::with_capacity(posts.len());
    for post in posts {
        body.push(to_response(&state, post).await?);
    }

    Ok(HttpResponse::Ok().json(body))
}

/// POST /api/posts
pub async fn create_post(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let validated = access::validate_create(PostDraft {
        title: req.title.unwrap_or_default(),
        content: req.content.unwrap_or_default(),
        published: req.published,
    })?;

    let post = Post::new(
        identity.user_id,
        validated.title,
        validated.content,
        validated.published,
    );
    let saved = state.posts.insert(post).await?;

    tracing::debug!(post_id = %saved.id, author = %identity.username, "Post created");

    Ok(HttpResponse::Created().json(PostEnvelope {
        message: "Post created successfully".to_string(),
        post: to_response(&state, saved).await?,
    }))
}

/// PUT /api/posts/{id} - partial update, owner only.
pub async fn update_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let mut post = state
        .posts
        .find_by_id(path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

    if access::authorize_mutation(identity.user_id, &post) == Access::Deny {
        return Err(AppError::Forbidden(
            "Not authorized to update this post".to_string(),
        ));
    }

    access::apply_update(
        &mut post,
        PostPatch {
            title: req.title,
            content: req.content,
            published: req.published,
        },
    );
    let saved = state.posts.update(post).await?;

    Ok(HttpResponse::Ok().json(PostEnvelope {
        message: "Post updated successfully".to_string(),
        post: to_response(&state, saved).await?,
    }))
}

/// DELETE /api/posts/{id} - permanent removal, owner only.
pub async fn delete_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    let post = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

    if access::authorize_mutation(identity.user_id, &post) == Access::Deny {
        return Err(AppError::Forbidden(
            "Not authorized to delete this post".to_string(),
        ));
    }

    state.posts.delete(id).await?;

    tracing::debug!(post_id = %id, author = %identity.username, "Post deleted");

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Post deleted successfully".to_string(),
    }))
}
