//! In-memory repository implementations - used as fallback when no database
//! is configured. Data is lost on process restart.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use atelier_core::domain::{Comment, GalleryImage, Post, Song, User};
use atelier_core::error::RepoError;
use atelier_core::ports::{
    BaseRepository, CommentRepository, GalleryRepository, PageOf, PageRequest, PostRepository,
    SongRepository, UserRepository,
};

/// Shared backing store for all in-memory repositories.
///
/// One store instance is shared between the repositories so that cross-table
/// behavior (author joins, comment cascade on post deletion) works the same
/// way it does against the relational schema.
#[derive(Default)]
pub struct InMemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    posts: RwLock<HashMap<Uuid, Post>>,
    comments: RwLock<HashMap<Uuid, Comment>>,
    songs: RwLock<HashMap<Uuid, Song>>,
    galleries: RwLock<HashMap<Uuid, GalleryImage>>,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

fn paginate<T>(items: Vec<T>, page: PageRequest) -> PageOf<T> {
    let total = items.len() as u64;
    let start = (page.index() * page.per_page) as usize;
    let items = items
        .into_iter()
        .skip(start)
        .take(page.per_page as usize)
        .collect();
    PageOf { items, total }
}

/// In-memory user repository.
pub struct InMemoryUserRepository {
    store: Arc<InMemoryStore>,
}

impl InMemoryUserRepository {
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.store.users.read().await.get(&id).cloned())
    }

    async fn insert(&self, user: User) -> Result<User, RepoError> {
        let mut users = self.store.users.write().await;
        let taken = users
            .values()
            .any(|u| u.username == user.username || u.email == user.email);
        if taken {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        let mut users = self.store.users.write().await;
        if !users.contains_key(&user.id) {
            return Err(RepoError::NotFound);
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.store
            .users
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let users = self.store.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let users = self.store.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }
}

/// In-memory post repository.
pub struct InMemoryPostRepository {
    store: Arc<InMemoryStore>,
}

impl InMemoryPostRepository {
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self { store }
    }

    async fn author_of(&self, post: &Post) -> Result<User, RepoError> {
        self.store
            .users
            .read()
            .await
            .get(&post.author_id)
            .cloned()
            .ok_or_else(|| RepoError::Query(format!("post {} has no author row", post.id)))
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.store.posts.read().await.get(&id).cloned())
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        let mut posts = self.store.posts.write().await;
        if posts.values().any(|p| p.slug == post.slug) {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }
        posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let mut posts = self.store.posts.write().await;
        if !posts.contains_key(&post.id) {
            return Err(RepoError::NotFound);
        }
        posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut posts = self.store.posts.write().await;
        if posts.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        // Cascade, mirroring the FK on the comments table.
        let mut comments = self.store.comments.write().await;
        comments.retain(|_, c| c.post_id != id);
        Ok(())
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let posts = self.store.posts.read().await;
        Ok(posts.values().find(|p| p.slug == slug).cloned())
    }

    async fn find_published_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<(Post, User)>, RepoError> {
        let post = {
            let posts = self.store.posts.read().await;
            posts
                .values()
                .find(|p| p.slug == slug && p.is_published)
                .cloned()
        };

        match post {
            Some(post) => {
                let author = self.author_of(&post).await?;
                Ok(Some((post, author)))
            }
            None => Ok(None),
        }
    }

    async fn list_published(
        &self,
        page: PageRequest,
    ) -> Result<PageOf<(Post, User)>, RepoError> {
        let mut published: Vec<Post> = {
            let posts = self.store.posts.read().await;
            posts.values().filter(|p| p.is_published).cloned().collect()
        };
        published.sort_by(|a, b| b.published_at.cmp(&a.published_at));

        let mut items = Vec::with_capacity(published.len());
        for post in published {
            let author = self.author_of(&post).await?;
            items.push((post, author));
        }

        Ok(paginate(items, page))
    }
}

/// In-memory comment repository.
pub struct InMemoryCommentRepository {
    store: Arc<InMemoryStore>,
}

impl InMemoryCommentRepository {
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl BaseRepository<Comment, Uuid> for InMemoryCommentRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        Ok(self.store.comments.read().await.get(&id).cloned())
    }

    async fn insert(&self, comment: Comment) -> Result<Comment, RepoError> {
        let mut comments = self.store.comments.write().await;
        comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn update(&self, comment: Comment) -> Result<Comment, RepoError> {
        let mut comments = self.store.comments.write().await;
        if !comments.contains_key(&comment.id) {
            return Err(RepoError::NotFound);
        }
        comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.store
            .comments
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let comments = self.store.comments.read().await;
        let mut found: Vec<Comment> = comments
            .values()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(found)
    }
}

/// In-memory song repository.
pub struct InMemorySongRepository {
    store: Arc<InMemoryStore>,
}

impl InMemorySongRepository {
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl BaseRepository<Song, Uuid> for InMemorySongRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Song>, RepoError> {
        Ok(self.store.songs.read().await.get(&id).cloned())
    }

    async fn insert(&self, song: Song) -> Result<Song, RepoError> {
        let mut songs = self.store.songs.write().await;
        songs.insert(song.id, song.clone());
        Ok(song)
    }

    async fn update(&self, song: Song) -> Result<Song, RepoError> {
        let mut songs = self.store.songs.write().await;
        if !songs.contains_key(&song.id) {
            return Err(RepoError::NotFound);
        }
        songs.insert(song.id, song.clone());
        Ok(song)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.store
            .songs
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl SongRepository for InMemorySongRepository {
    async fn list(&self, page: PageRequest) -> Result<PageOf<Song>, RepoError> {
        let mut songs: Vec<Song> = self.store.songs.read().await.values().cloned().collect();
        songs.sort_by(|a, b| b.release_date.cmp(&a.release_date));
        Ok(paginate(songs, page))
    }
}

/// In-memory gallery repository.
pub struct InMemoryGalleryRepository {
    store: Arc<InMemoryStore>,
}

impl InMemoryGalleryRepository {
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl BaseRepository<GalleryImage, Uuid> for InMemoryGalleryRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<GalleryImage>, RepoError> {
        Ok(self.store.galleries.read().await.get(&id).cloned())
    }

    async fn insert(&self, image: GalleryImage) -> Result<GalleryImage, RepoError> {
        let mut galleries = self.store.galleries.write().await;
        galleries.insert(image.id, image.clone());
        Ok(image)
    }

    async fn update(&self, image: GalleryImage) -> Result<GalleryImage, RepoError> {
        let mut galleries = self.store.galleries.write().await;
        if !galleries.contains_key(&image.id) {
            return Err(RepoError::NotFound);
        }
        galleries.insert(image.id, image.clone());
        Ok(image)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.store
            .galleries
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl GalleryRepository for InMemoryGalleryRepository {
    async fn list(&self, page: PageRequest) -> Result<PageOf<GalleryImage>, RepoError> {
        let mut images: Vec<GalleryImage> =
            self.store.galleries.read().await.values().cloned().collect();
        images.sort_by(|a, b| b.upload_date.cmp(&a.upload_date));
        Ok(paginate(images, page))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, Utc};

    fn seed_user(username: &str) -> User {
        User::new(
            username.to_owned(),
            format!("{username}@example.com"),
            "hash".to_owned(),
        )
    }

    fn seed_post(author_id: Uuid, title: &str, published: bool) -> Post {
        Post::new(
            author_id,
            title.to_owned(),
            None,
            "content".to_owned(),
            published,
            None,
        )
    }

    #[tokio::test]
    async fn test_unpublished_posts_invisible() {
        let store = InMemoryStore::new();
        let users = InMemoryUserRepository::new(store.clone());
        let posts = InMemoryPostRepository::new(store);

        let author = users.insert(seed_user("writer")).await.unwrap();
        posts
            .insert(seed_post(author.id, "Visible Post", true))
            .await
            .unwrap();
        posts
            .insert(seed_post(author.id, "Hidden Post", false))
            .await
            .unwrap();

        let page = posts.list_published(PageRequest::default()).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].0.slug, "visible-post");

        assert!(
            posts
                .find_published_by_slug("hidden-post")
                .await
                .unwrap()
                .is_none()
        );
        // Still reachable through the unfiltered lookup.
        assert!(posts.find_by_slug("hidden-post").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_list_published_ordering() {
        let store = InMemoryStore::new();
        let users = InMemoryUserRepository::new(store.clone());
        let posts = InMemoryPostRepository::new(store);

        let author = users.insert(seed_user("writer")).await.unwrap();
        let now = Utc::now();

        let mut old = seed_post(author.id, "Old Post", true);
        old.published_at = now - TimeDelta::days(1);
        let mut new = seed_post(author.id, "New Post", true);
        new.published_at = now;

        posts.insert(old).await.unwrap();
        posts.insert(new).await.unwrap();

        let page = posts.list_published(PageRequest::default()).await.unwrap();
        assert_eq!(page.items[0].0.slug, "new-post");
        assert_eq!(page.items[1].0.slug, "old-post");
    }

    #[tokio::test]
    async fn test_duplicate_slug_rejected() {
        let store = InMemoryStore::new();
        let users = InMemoryUserRepository::new(store.clone());
        let posts = InMemoryPostRepository::new(store);

        let author = users.insert(seed_user("writer")).await.unwrap();
        posts
            .insert(seed_post(author.id, "Same Title", true))
            .await
            .unwrap();

        let result = posts.insert(seed_post(author.id, "Same Title", true)).await;
        assert!(matches!(result, Err(RepoError::Constraint(_))));
    }

    #[tokio::test]
    async fn test_post_delete_cascades_comments() {
        let store = InMemoryStore::new();
        let users = InMemoryUserRepository::new(store.clone());
        let posts = InMemoryPostRepository::new(store.clone());
        let comments = InMemoryCommentRepository::new(store);

        let author = users.insert(seed_user("writer")).await.unwrap();
        let post = posts
            .insert(seed_post(author.id, "Commented Post", true))
            .await
            .unwrap();
        comments
            .insert(Comment::new(post.id, "Someone".to_owned(), "Hi".to_owned()))
            .await
            .unwrap();

        posts.delete(post.id).await.unwrap();
        assert!(comments.list_for_post(post.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_missing_row() {
        let store = InMemoryStore::new();
        let songs = InMemorySongRepository::new(store);

        let song = Song::new(
            "Ghost".to_owned(),
            "Nobody".to_owned(),
            "songs/ghost.mp3".to_owned(),
            None,
            Utc::now().date_naive(),
        );
        let result = songs.update(song).await;
        assert!(matches!(result, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_song_list_ordering() {
        let store = InMemoryStore::new();
        let songs = InMemorySongRepository::new(store);

        let older = Song::new(
            "First".to_owned(),
            "Artist".to_owned(),
            "songs/first.mp3".to_owned(),
            None,
            chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        );
        let newer = Song::new(
            "Second".to_owned(),
            "Artist".to_owned(),
            "songs/second.mp3".to_owned(),
            Some("la la".to_owned()),
            chrono::NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        );
        songs.insert(older).await.unwrap();
        songs.insert(newer).await.unwrap();

        let page = songs.list(PageRequest::default()).await.unwrap();
        assert_eq!(page.total, 2);
        assert_eq!(page.items[0].title, "Second");
    }
}
