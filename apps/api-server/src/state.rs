//! Application state - shared across all handlers.

use std::sync::Arc;

use atelier_core::ports::{
    CommentRepository, GalleryRepository, PostRepository, SongRepository, UserRepository,
};
use atelier_infra::database::{
    DatabaseConfig, InMemoryCommentRepository, InMemoryGalleryRepository, InMemoryPostRepository,
    InMemorySongRepository, InMemoryStore, InMemoryUserRepository, PostgresCommentRepository,
    PostgresGalleryRepository, PostgresPostRepository, PostgresSongRepository,
    PostgresUserRepository,
};

/// Shared application state - one repository handle per collection.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub songs: Arc<dyn SongRepository>,
    pub galleries: Arc<dyn GalleryRepository>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(db_config: Option<&DatabaseConfig>) -> Self {
        if let Some(config) = db_config {
            match atelier_infra::database::connect(config).await {
                Ok(db) => {
                    let state = Self {
                        users: Arc::new(PostgresUserRepository::new(db.clone())),
                        posts: Arc::new(PostgresPostRepository::new(db.clone())),
                        comments: Arc::new(PostgresCommentRepository::new(db.clone())),
                        songs: Arc::new(PostgresSongRepository::new(db.clone())),
                        galleries: Arc::new(PostgresGalleryRepository::new(db)),
                    };
                    tracing::info!("Application state initialized (postgres)");
                    return state;
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                }
            }
        } else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
        }

        let state = Self::in_memory();
        tracing::info!("Application state initialized (in-memory)");
        state
    }

    /// State backed entirely by the in-memory store.
    pub fn in_memory() -> Self {
        let store = InMemoryStore::new();
        Self {
            users: Arc::new(InMemoryUserRepository::new(store.clone())),
            posts: Arc::new(InMemoryPostRepository::new(store.clone())),
            comments: Arc::new(InMemoryCommentRepository::new(store.clone())),
            songs: Arc::new(InMemorySongRepository::new(store.clone())),
            galleries: Arc::new(InMemoryGalleryRepository::new(store)),
        }
    }
}
