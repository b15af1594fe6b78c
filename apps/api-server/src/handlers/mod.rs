//! HTTP handlers and route configuration.

mod auth;
mod comments;
mod gallery;
mod health;
mod posts;
mod songs;

use actix_web::web;

use atelier_core::ports::PageRequest;
use atelier_shared::dto::PageQuery;

const DEFAULT_PAGE_SIZE: u64 = 10;
const MAX_PAGE_SIZE: u64 = 100;

/// Clamp raw query parameters into a page request.
pub(crate) fn page_request(query: &PageQuery) -> PageRequest {
    PageRequest {
        page: query.page.unwrap_or(1).max(1),
        per_page: query
            .page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE),
    }
}

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            // Auth routes
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login))
                    .route("/me", web::get().to(auth::me)),
            )
            // Posts and their nested comments
            .service(
                web::scope("/posts")
                    .route("", web::get().to(posts::list))
                    .route("", web::post().to(posts::create))
                    .route("/{slug}", web::get().to(posts::retrieve))
                    .route("/{slug}", web::put().to(posts::update))
                    .route("/{slug}", web::delete().to(posts::delete))
                    .route("/{slug}/comments", web::get().to(comments::list))
                    .route("/{slug}/comments", web::post().to(comments::create)),
            )
            // Song catalog
            .service(
                web::scope("/songs")
                    .route("", web::get().to(songs::list))
                    .route("", web::post().to(songs::create))
                    .route("/{id}", web::get().to(songs::retrieve))
                    .route("/{id}", web::put().to(songs::update))
                    .route("/{id}", web::delete().to(songs::delete)),
            )
            // Image gallery
            .service(
                web::scope("/galleries")
                    .route("", web::get().to(gallery::list))
                    .route("", web::post().to(gallery::create))
                    .route("/{id}", web::get().to(gallery::retrieve))
                    .route("/{id}", web::put().to(gallery::update))
                    .route("/{id}", web::delete().to(gallery::delete)),
            ),
    );
}

#[cfg(test)]
pub(crate) mod test_helpers {
    //! Shared scaffolding for handler tests: an app wired against the
    //! in-memory repositories and a few request shorthands.

    use std::sync::Arc;

    use actix_http::Request;
    use actix_web::body::MessageBody;
    use actix_web::dev::{Service, ServiceResponse};
    use actix_web::{App, test, web};
    use serde_json::Value;

    use atelier_core::ports::{PasswordService, TokenService};
    use atelier_infra::auth::{Argon2PasswordService, JwtConfig, JwtTokenService};

    use crate::state::AppState;

    pub(crate) async fn init_app()
    -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>
    {
        let token_service: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(JwtConfig {
            secret: "test-secret-key".to_string(),
            expiration_hours: 1,
            issuer: "test-issuer".to_string(),
        }));
        let password_service: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());

        test::init_service(
            App::new()
                .app_data(web::Data::new(AppState::in_memory()))
                .app_data(web::Data::new(token_service))
                .app_data(web::Data::new(password_service))
                .configure(super::configure_routes),
        )
        .await
    }

    pub(crate) fn get(uri: &str) -> Request {
        test::TestRequest::get().uri(uri).to_request()
    }

    pub(crate) fn post_json(uri: &str, token: Option<&str>, body: Value) -> Request {
        let mut req = test::TestRequest::post().uri(uri).set_json(body);
        if let Some(token) = token {
            req = req.insert_header(("Authorization", format!("Bearer {token}")));
        }
        req.to_request()
    }

    pub(crate) fn put_json(uri: &str, token: &str, body: Value) -> Request {
        test::TestRequest::put()
            .uri(uri)
            .insert_header(("Authorization", format!("Bearer {token}")))
            .set_json(body)
            .to_request()
    }

    pub(crate) fn delete(uri: &str, token: &str) -> Request {
        test::TestRequest::delete()
            .uri(uri)
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request()
    }

    /// Register a user and return their access token.
    pub(crate) async fn register_user<S, B>(app: &S, username: &str, email: &str) -> String
    where
        S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
        B: MessageBody,
    {
        let req = post_json(
            "/api/auth/register",
            None,
            serde_json::json!({
                "username": username,
                "email": email,
                "password": "testpass123",
            }),
        );
        let body: Value = test::call_and_read_body_json(app, req).await;
        body["access_token"]
            .as_str()
            .expect("registration should return a token")
            .to_owned()
    }
}
