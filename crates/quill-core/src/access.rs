//! Post access control: creation validation, ownership checks, and
//! partial-update application.
//!
//! Pure decisions over `(principal, post)` - no transport or storage
//! dependencies, so the same logic backs every mutation endpoint.

use chrono::Utc;
use uuid::Uuid;

use crate::domain::Post;
use crate::error::DomainError;

/// Raw input for creating a post, before validation.
#[derive(Debug, Clone, Default)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
    pub published: Option<bool>,
}

/// A draft that passed validation, ready to be attached to an author.
#[derive(Debug, Clone)]
pub struct ValidatedPost {
    pub title: String,
    pub content: String,
    pub published: bool,
}

/// Partial update. Only fields present here overwrite the stored post;
/// there is no way to express an author change.
#[derive(Debug, Clone, Default)]
pub struct PostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub published: Option<bool>,
}

/// Outcome of an ownership check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    Deny,
}

/// Validate input for post creation.
///
/// Title and content must both be present and non-empty; `published`
/// defaults to `false` when omitted.
pub fn validate_create(draft: PostDraft) -> Result<ValidatedPost, DomainError> {
    if draft.title.is_empty() || draft.content.is_empty() {
        return Err(DomainError::Validation(
            "Title and content are required".to_string(),
        ));
    }

    Ok(ValidatedPost {
        title: draft.title,
        content: draft.content,
        published: draft.published.unwrap_or(false),
    })
}

/// Decide whether `principal` may mutate (update or delete) `post`.
///
/// `Allow` iff the principal is the stored author. A single equality
/// check: no roles, no delegation, no shared ownership.
pub fn authorize_mutation(principal: Uuid, post: &Post) -> Access {
    if principal == post.author_id {
        Access::Allow
    } else {
        Access::Deny
    }
}

/// Apply a partial update to `post`. Fields absent from the patch keep
/// their prior values; `updated_at` is refreshed.
///
/// Patched fields are not re-validated: an update that sets the title to
/// an empty string is accepted.
pub fn apply_update(post: &mut Post, patch: PostPatch) {
    if let Some(title) = patch.title {
        post.title = title;
    }
    if let Some(content) = patch.content {
        post.content = content;
    }
    if let Some(published) = patch.published {
        post.published = published;
    }
    post.updated_at = Utc::now();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(title: &str, content: &str) -> PostDraft {
        PostDraft {
            title: title.to_string(),
            content: content.to_string(),
            published: None,
        }
    }

    fn sample_post(author_id: Uuid) -> Post {
        Post::new(
            author_id,
            "Hello".to_string(),
            "World".to_string(),
            false,
        )
    }

    #[test]
    fn validate_create_accepts_and_defaults_unpublished() {
        let validated = validate_create(draft("Title", "Body")).unwrap();

        assert_eq!(validated.title, "Title");
        assert_eq!(validated.content, "Body");
        assert!(!validated.published);
    }

    #[test]
    fn validate_create_keeps_explicit_published() {
        let validated = validate_create(PostDraft {
            title: "Title".to_string(),
            content: "Body".to_string(),
            published: Some(true),
        })
        .unwrap();

        assert!(validated.published);
    }

    #[test]
    fn validate_create_accepts_whitespace_only_fields() {
        // Presence check only; whitespace is not trimmed.
        let validated = validate_create(draft(" ", " ")).unwrap();

        assert_eq!(validated.title, " ");
        assert_eq!(validated.content, " ");
    }

    #[test]
    fn validate_create_rejects_empty_title() {
        let result = validate_create(draft("", "Body"));
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn validate_create_rejects_empty_content() {
        let result = validate_create(draft("Title", ""));
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn owner_may_mutate() {
        let owner = Uuid::new_v4();
        let post = sample_post(owner);

        assert_eq!(authorize_mutation(owner, &post), Access::Allow);
    }

    #[test]
    fn non_owner_is_denied() {
        let post = sample_post(Uuid::new_v4());

        assert_eq!(authorize_mutation(Uuid::new_v4(), &post), Access::Deny);
    }

    #[test]
    fn apply_update_changes_only_patched_fields() {
        let mut post = Post::new(
            Uuid::new_v4(),
            "A".to_string(),
            "B".to_string(),
            false,
        );

        apply_update(
            &mut post,
            PostPatch {
                published: Some(true),
                ..Default::default()
            },
        );

        assert_eq!(post.title, "A");
        assert_eq!(post.content, "B");
        assert!(post.published);
    }

    #[test]
    fn apply_update_never_touches_the_author() {
        let author = Uuid::new_v4();
        let mut post = sample_post(author);

        apply_update(
            &mut post,
            PostPatch {
                title: Some("New title".to_string()),
                content: Some("New body".to_string()),
                published: Some(true),
            },
        );

        assert_eq!(post.author_id, author);
    }

    #[test]
    fn apply_update_accepts_empty_title() {
        // Faithful quirk: updates are not re-validated, only creation is.
        let mut post = sample_post(Uuid::new_v4());

        apply_update(
            &mut post,
            PostPatch {
                title: Some(String::new()),
                ..Default::default()
            },
        );

        assert_eq!(post.title, "");
    }

    #[test]
    fn apply_update_refreshes_updated_at() {
        let mut post = sample_post(Uuid::new_v4());
        let before = post.updated_at;

        apply_update(
            &mut post,
            PostPatch {
                content: Some("edited".to_string()),
                ..Default::default()
            },
        );

        assert!(post.updated_at >= before);
        assert_eq!(post.created_at, before);
    }
}
