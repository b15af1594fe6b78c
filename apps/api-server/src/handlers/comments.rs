//! Comment sub-resource handlers, nested under a post's slug.

use actix_web::{HttpResponse, web};

use atelier_core::domain::{Comment, Post};
use atelier_shared::dto::{CommentResponse, CreateCommentRequest};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const MAX_AUTHOR_LEN: usize = 100;

fn comment_response(comment: Comment) -> CommentResponse {
    CommentResponse {
        id: comment.id,
        post: comment.post_id,
        author: comment.author,
        content: comment.content,
        created_at: comment.created_at,
    }
}

/// Comments hang off the published post surface; an unpublished parent is a
/// 404 exactly like a missing one.
async fn parent_post(state: &AppState, slug: &str) -> AppResult<Post> {
    state
        .posts
        .find_published_by_slug(slug)
        .await?
        .map(|(post, _)| post)
        .ok_or_else(|| AppError::NotFound(format!("No post found with slug '{slug}'")))
}

/// GET /api/posts/{slug}/comments
pub async fn list(state: web::Data<AppState>, path: web::Path<String>) -> AppResult<HttpResponse> {
    let post = parent_post(&state, &path).await?;
    let comments = state.comments.list_for_post(post.id).await?;

    Ok(HttpResponse::Ok().json(
        comments
            .into_iter()
            .map(comment_response)
            .collect::<Vec<_>>(),
    ))
}

/// POST /api/posts/{slug}/comments
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
    body: web::Json<CreateCommentRequest>,
) -> AppResult<HttpResponse> {
    let post = parent_post(&state, &path).await?;
    let req = body.into_inner();

    let content = match req.content.as_deref().map(str::trim) {
        Some(c) if !c.is_empty() => c.to_owned(),
        _ => return Err(AppError::invalid("content", "This field is required.")),
    };

    // The display name stays free text; the authenticated username is only
    // a fallback when the caller leaves it out.
    let author = match req.author.map(|a| a.trim().to_owned()) {
        Some(a) if !a.is_empty() => a,
        _ => identity.username.clone(),
    };
    if author.len() > MAX_AUTHOR_LEN {
        return Err(AppError::invalid(
            "author",
            format!("Ensure this field has no more than {MAX_AUTHOR_LEN} characters."),
        ));
    }

    let comment = state
        .comments
        .insert(Comment::new(post.id, author, content))
        .await?;

    tracing::info!(slug = %post.slug, comment_id = %comment.id, "Comment created");

    Ok(HttpResponse::Created().json(comment_response(comment)))
}

#[cfg(test)]
mod tests {
    use actix_web::test;
    use serde_json::json;

    use super::super::test_helpers::{self, get, post_json};

    async fn seed_post<S, B>(app: &S, token: &str) -> String
    where
        S: actix_web::dev::Service<
                actix_http::Request,
                Response = actix_web::dev::ServiceResponse<B>,
                Error = actix_web::Error,
            >,
        B: actix_web::body::MessageBody,
    {
        let req = post_json(
            "/api/posts",
            Some(token),
            json!({"title": "Test Post", "content": "This is a test post"}),
        );
        let body: serde_json::Value = test::call_and_read_body_json(app, req).await;
        body["slug"].as_str().expect("slug").to_owned()
    }

    #[actix_web::test]
    async fn test_create_and_list_comments() {
        let app = test_helpers::init_app().await;
        let token = test_helpers::register_user(&app, "testuser", "test@example.com").await;
        let slug = seed_post(&app, &token).await;

        for (author, content) in [("User One", "First comment"), ("User Two", "Second comment")] {
            let req = post_json(
                &format!("/api/posts/{slug}/comments"),
                Some(&token),
                json!({"author": author, "content": content}),
            );
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), 201);
        }

        let comments: serde_json::Value =
            test::call_and_read_body_json(&app, get(&format!("/api/posts/{slug}/comments"))).await;
        let comments = comments.as_array().unwrap();
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0]["content"], "First comment");
        assert_eq!(comments[0]["author"], "User One");
    }

    #[actix_web::test]
    async fn test_missing_content_names_the_field() {
        let app = test_helpers::init_app().await;
        let token = test_helpers::register_user(&app, "testuser", "test@example.com").await;
        let slug = seed_post(&app, &token).await;

        let req = post_json(
            &format!("/api/posts/{slug}/comments"),
            Some(&token),
            json!({"author": "Test Commenter"}),
        );
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert!(body["errors"]["content"].is_array());
    }

    #[actix_web::test]
    async fn test_create_requires_authentication() {
        let app = test_helpers::init_app().await;
        let token = test_helpers::register_user(&app, "testuser", "test@example.com").await;
        let slug = seed_post(&app, &token).await;

        let req = post_json(
            &format!("/api/posts/{slug}/comments"),
            None,
            json!({"author": "Anon", "content": "hello"}),
        );
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);
    }

    #[actix_web::test]
    async fn test_unknown_post_is_404() {
        let app = test_helpers::init_app().await;

        let resp = test::call_service(&app, get("/api/posts/no-such-post/comments")).await;
        assert_eq!(resp.status(), 404);
    }

    #[actix_web::test]
    async fn test_author_defaults_to_username() {
        let app = test_helpers::init_app().await;
        let token = test_helpers::register_user(&app, "testuser", "test@example.com").await;
        let slug = seed_post(&app, &token).await;

        let req = post_json(
            &format!("/api/posts/{slug}/comments"),
            Some(&token),
            json!({"content": "no author given"}),
        );
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["author"], "testuser");
    }
}
