//! Post collection handlers.
//!
//! The public read surface only ever sees published posts; slug collisions
//! and missing fields surface as field-keyed validation errors, matching
//! the write contract of the serializer this API replaces.

use actix_web::{HttpResponse, web};

use atelier_core::domain::{Post, User};
use atelier_core::error::RepoError;
use atelier_core::slug::slugify;
use atelier_shared::Paginated;
use atelier_shared::dto::{
    CreatePostRequest, PageQuery, PostResponse, UpdatePostRequest, UserResponse,
};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const MAX_TITLE_LEN: usize = 200;
const MAX_SLUG_LEN: usize = 200;

pub(crate) fn post_response(post: Post, author: User) -> PostResponse {
    PostResponse {
        id: post.id,
        title: post.title,
        slug: post.slug,
        content: post.content,
        is_published: post.is_published,
        published_at: post.published_at,
        updated_at: post.updated_at,
        created_at: post.created_at,
        author: UserResponse {
            id: author.id,
            username: author.username,
            email: author.email,
        },
    }
}

/// Resolve a published post or 404. Unpublished posts are indistinguishable
/// from missing ones for every caller.
async fn published_or_404(state: &AppState, slug: &str) -> AppResult<(Post, User)> {
    state
        .posts
        .find_published_by_slug(slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No post found with slug '{slug}'")))
}

/// GET /api/posts
pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = super::page_request(&query);
    let result = state.posts.list_published(page).await?;

    Ok(HttpResponse::Ok().json(Paginated {
        count: result.total,
        page: page.page,
        page_size: page.per_page,
        results: result
            .items
            .into_iter()
            .map(|(post, author)| post_response(post, author))
            .collect::<Vec<_>>(),
    }))
}

/// GET /api/posts/{slug}
pub async fn retrieve(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let (post, author) = published_or_404(&state, &path).await?;
    Ok(HttpResponse::Ok().json(post_response(post, author)))
}

/// POST /api/posts
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let mut errors = Vec::new();
    let title = match req.title.as_deref().map(str::trim) {
        Some(t) if !t.is_empty() => {
            if t.len() > MAX_TITLE_LEN {
                errors.push((
                    "title".to_string(),
                    format!("Ensure this field has no more than {MAX_TITLE_LEN} characters."),
                ));
            }
            Some(t.to_owned())
        }
        _ => {
            errors.push(("title".to_string(), "This field is required.".to_string()));
            None
        }
    };
    let content = match req.content {
        Some(c) if !c.trim().is_empty() => Some(c),
        _ => {
            errors.push(("content".to_string(), "This field is required.".to_string()));
            None
        }
    };
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let title = title.unwrap_or_default();
    let content = content.unwrap_or_default();

    let slug = match req.slug {
        Some(slug) => slug,
        None => slugify(&title),
    };
    if slug.is_empty() || slug.len() > MAX_SLUG_LEN {
        return Err(AppError::invalid("slug", "Enter a valid slug."));
    }

    if state.posts.find_by_slug(&slug).await?.is_some() {
        return Err(AppError::invalid("slug", "post with this slug already exists."));
    }

    let author = state
        .users
        .find_by_id(identity.user_id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let post = Post::new(
        author.id,
        title,
        Some(slug),
        content,
        // Posts created through the API go live immediately unless the
        // caller opts out; drafts stay invisible to every read path.
        req.is_published.unwrap_or(true),
        req.published_at,
    );

    let post = match state.posts.insert(post).await {
        Ok(post) => post,
        // Creation race on the slug's unique index.
        Err(RepoError::Constraint(_)) => {
            return Err(AppError::invalid("slug", "post with this slug already exists."));
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(slug = %post.slug, author = %author.username, "Post created");

    Ok(HttpResponse::Created().json(post_response(post, author)))
}

/// PUT /api/posts/{slug} - author only, partial update.
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let (mut post, author) = published_or_404(&state, &path).await?;
    if post.author_id != identity.user_id {
        return Err(AppError::Forbidden);
    }

    let req = body.into_inner();

    if let Some(title) = req.title {
        let title = title.trim().to_owned();
        if title.is_empty() {
            return Err(AppError::invalid("title", "This field may not be blank."));
        }
        if title.len() > MAX_TITLE_LEN {
            return Err(AppError::invalid(
                "title",
                format!("Ensure this field has no more than {MAX_TITLE_LEN} characters."),
            ));
        }
        post.title = title;
    }
    if let Some(content) = req.content {
        if content.trim().is_empty() {
            return Err(AppError::invalid("content", "This field may not be blank."));
        }
        post.content = content;
    }
    if let Some(is_published) = req.is_published {
        post.is_published = is_published;
    }
    if let Some(published_at) = req.published_at {
        post.published_at = published_at;
    }
    post.touch();

    let post = state.posts.update(post).await?;

    Ok(HttpResponse::Ok().json(post_response(post, author)))
}

/// DELETE /api/posts/{slug} - author only. Comments go with the post.
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let (post, _) = published_or_404(&state, &path).await?;
    if post.author_id != identity.user_id {
        return Err(AppError::Forbidden);
    }

    state.posts.delete(post.id).await?;
    tracing::info!(slug = %post.slug, "Post deleted");

    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use actix_web::test;
    use serde_json::json;

    use super::super::test_helpers::{self, delete, get, post_json, put_json};

    #[actix_web::test]
    async fn test_create_and_fetch_by_generated_slug() {
        let app = test_helpers::init_app().await;
        let token = test_helpers::register_user(&app, "testuser", "test@example.com").await;

        let req = post_json(
            "/api/posts",
            Some(&token),
            json!({
                "title": "This is a Test Post With Spaces",
                "content": "Content here",
            }),
        );
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 201);

        let created: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(created["slug"], "this-is-a-test-post-with-spaces");
        assert_eq!(created["author"]["username"], "testuser");

        let fetched: serde_json::Value =
            test::call_and_read_body_json(&app, get("/api/posts/this-is-a-test-post-with-spaces"))
                .await;
        assert_eq!(fetched["title"], "This is a Test Post With Spaces");
        assert_eq!(fetched["content"], "Content here");
        assert_eq!(fetched["author"]["username"], "testuser");
    }

    #[actix_web::test]
    async fn test_unpublished_posts_are_invisible() {
        let app = test_helpers::init_app().await;
        let token = test_helpers::register_user(&app, "testuser", "test@example.com").await;

        for (title, published) in [("Published Post", true), ("Unpublished Post", false)] {
            let req = post_json(
                "/api/posts",
                Some(&token),
                json!({"title": title, "content": "body", "is_published": published}),
            );
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), 201);
        }

        let listing: serde_json::Value =
            test::call_and_read_body_json(&app, get("/api/posts")).await;
        assert_eq!(listing["count"], 1);
        assert_eq!(listing["results"][0]["slug"], "published-post");

        let resp = test::call_service(&app, get("/api/posts/unpublished-post")).await;
        assert_eq!(resp.status(), 404);

        // Invisible to the author as well.
        let req = test::TestRequest::get()
            .uri("/api/posts/unpublished-post")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 404);
    }

    #[actix_web::test]
    async fn test_list_ordered_by_published_at_desc() {
        let app = test_helpers::init_app().await;
        let token = test_helpers::register_user(&app, "testuser", "test@example.com").await;

        for (title, published_at) in [
            ("Old Post", "2024-01-01T00:00:00Z"),
            ("New Post", "2024-06-01T00:00:00Z"),
        ] {
            let req = post_json(
                "/api/posts",
                Some(&token),
                json!({"title": title, "content": "body", "published_at": published_at}),
            );
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), 201);
        }

        let listing: serde_json::Value =
            test::call_and_read_body_json(&app, get("/api/posts")).await;
        assert_eq!(listing["count"], 2);
        assert_eq!(listing["results"][0]["slug"], "new-post");
        assert_eq!(listing["results"][1]["slug"], "old-post");
    }

    #[actix_web::test]
    async fn test_create_requires_authentication() {
        let app = test_helpers::init_app().await;

        let req = post_json(
            "/api/posts",
            None,
            json!({"title": "Unauthorized Post", "content": "nope"}),
        );
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);
    }

    #[actix_web::test]
    async fn test_create_without_title_is_field_keyed_400() {
        let app = test_helpers::init_app().await;
        let token = test_helpers::register_user(&app, "testuser", "test@example.com").await;

        let req = post_json("/api/posts", Some(&token), json!({"content": "body only"}));
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert!(body["errors"]["title"].is_array());
    }

    #[actix_web::test]
    async fn test_duplicate_slug_is_rejected() {
        let app = test_helpers::init_app().await;
        let token = test_helpers::register_user(&app, "testuser", "test@example.com").await;

        let first = post_json(
            "/api/posts",
            Some(&token),
            json!({"title": "Same Title", "content": "one"}),
        );
        assert_eq!(test::call_service(&app, first).await.status(), 201);

        let second = post_json(
            "/api/posts",
            Some(&token),
            json!({"title": "Same Title", "content": "two"}),
        );
        let resp = test::call_service(&app, second).await;
        assert_eq!(resp.status(), 400);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert!(body["errors"]["slug"].is_array());
    }

    #[actix_web::test]
    async fn test_update_is_author_scoped() {
        let app = test_helpers::init_app().await;
        let author = test_helpers::register_user(&app, "author", "author@example.com").await;
        let intruder = test_helpers::register_user(&app, "intruder", "intruder@example.com").await;

        let req = post_json(
            "/api/posts",
            Some(&author),
            json!({"title": "Guarded Post", "content": "original"}),
        );
        assert_eq!(test::call_service(&app, req).await.status(), 201);

        let req = put_json(
            "/api/posts/guarded-post",
            &intruder,
            json!({"content": "overwritten"}),
        );
        assert_eq!(test::call_service(&app, req).await.status(), 403);

        let req = put_json(
            "/api/posts/guarded-post",
            &author,
            json!({"content": "revised"}),
        );
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["content"], "revised");
    }

    #[actix_web::test]
    async fn test_delete_then_404() {
        let app = test_helpers::init_app().await;
        let token = test_helpers::register_user(&app, "testuser", "test@example.com").await;

        let req = post_json(
            "/api/posts",
            Some(&token),
            json!({"title": "Short Lived", "content": "bye"}),
        );
        assert_eq!(test::call_service(&app, req).await.status(), 201);

        let resp = test::call_service(&app, delete("/api/posts/short-lived", &token)).await;
        assert_eq!(resp.status(), 204);

        let resp = test::call_service(&app, get("/api/posts/short-lived")).await;
        assert_eq!(resp.status(), 404);
    }
}
