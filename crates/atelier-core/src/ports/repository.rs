use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Comment, GalleryImage, Post, Song, User};
use crate::error::RepoError;

/// A 1-based page request. `per_page` is clamped by the API layer.
#[derive(Debug, Clone, Copy)]
pub struct PageRequest {
    pub page: u64,
    pub per_page: u64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 10,
        }
    }
}

impl PageRequest {
    /// Zero-based page index for offset arithmetic.
    pub fn index(&self) -> u64 {
        self.page.saturating_sub(1)
    }
}

/// One page of results together with the total row count.
#[derive(Debug, Clone)]
pub struct PageOf<T> {
    pub items: Vec<T>,
    pub total: u64,
}

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity. Uniqueness violations surface as
    /// [`RepoError::Constraint`].
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Update an existing entity, failing with [`RepoError::NotFound`] when
    /// no row matches.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific lookups.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    /// Find a user by their username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;
}

/// Post repository.
///
/// Read paths that serve the public API only ever see published rows; the
/// unfiltered `find_by_slug` exists for slug-collision checks and
/// author-scoped writes.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// Find a post by slug regardless of publication state.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError>;

    /// Find a published post by slug, joined with its author.
    async fn find_published_by_slug(&self, slug: &str)
    -> Result<Option<(Post, User)>, RepoError>;

    /// List published posts ordered by `published_at` descending, each with
    /// its author.
    async fn list_published(&self, page: PageRequest)
    -> Result<PageOf<(Post, User)>, RepoError>;
}

/// Comment repository. Comments are immutable, so there is no update path
/// beyond the base trait.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, Uuid> {
    /// All comments for a post, oldest first. Unpaginated.
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError>;
}

/// Song repository.
#[async_trait]
pub trait SongRepository: BaseRepository<Song, Uuid> {
    /// List songs ordered by `release_date` descending.
    async fn list(&self, page: PageRequest) -> Result<PageOf<Song>, RepoError>;
}

/// Gallery image repository.
#[async_trait]
pub trait GalleryRepository: BaseRepository<GalleryImage, Uuid> {
    /// List images ordered by `upload_date` descending.
    async fn list(&self, page: PageRequest) -> Result<PageOf<GalleryImage>, RepoError>;
}
