//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use atelier_core::domain::{Comment, GalleryImage, Post, Song, User};
use atelier_core::error::RepoError;
use atelier_core::ports::{
    CommentRepository, GalleryRepository, PageOf, PageRequest, PostRepository, SongRepository,
    UserRepository,
};

use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::gallery_image::{self, Entity as GalleryImageEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::song::{self, Entity as SongEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::PostgresBaseRepository;

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity, user::ActiveModel>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity, post::ActiveModel>;

/// PostgreSQL comment repository.
pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity, comment::ActiveModel>;

/// PostgreSQL song repository.
pub type PostgresSongRepository = PostgresBaseRepository<SongEntity, song::ActiveModel>;

/// PostgreSQL gallery repository.
pub type PostgresGalleryRepository =
    PostgresBaseRepository<GalleryImageEntity, gallery_image::ActiveModel>;

fn query_err(e: sea_orm::DbErr) -> RepoError {
    RepoError::Query(e.to_string())
}

/// A published post row must always carry its author; a missing join side
/// means the data violates the FK and is reported as a query failure.
fn with_author(pair: (post::Model, Option<user::Model>)) -> Result<(Post, User), RepoError> {
    let (post, author) = pair;
    let author = author.ok_or_else(|| {
        RepoError::Query(format!("post {} has no author row", post.id))
    })?;
    Ok((post.into(), author.into()))
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        // Mask email for logging to avoid PII in logs
        let masked = if let Some(at_pos) = email.find('@') {
            let (local, domain) = email.split_at(at_pos);
            let masked_local = if local.len() > 1 {
                format!("{}***", &local[..1])
            } else {
                "***".to_string()
            };
            format!("{}{}", masked_local, domain)
        } else {
            "***".to_string()
        };
        tracing::debug!(user_email = %masked, "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_published_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<(Post, User)>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::Slug.eq(slug))
            .filter(post::Column::IsPublished.eq(true))
            .find_also_related(UserEntity)
            .one(&self.db)
            .await
            .map_err(query_err)?;

        result.map(with_author).transpose()
    }

    async fn list_published(
        &self,
        page: PageRequest,
    ) -> Result<PageOf<(Post, User)>, RepoError> {
        let paginator = PostEntity::find()
            .filter(post::Column::IsPublished.eq(true))
            .order_by_desc(post::Column::PublishedAt)
            .find_also_related(UserEntity)
            .paginate(&self.db, page.per_page);

        let total = paginator.num_items().await.map_err(query_err)?;
        let rows = paginator.fetch_page(page.index()).await.map_err(query_err)?;

        let items = rows
            .into_iter()
            .map(with_author)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PageOf { items, total })
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let result = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .order_by_asc(comment::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl SongRepository for PostgresSongRepository {
    async fn list(&self, page: PageRequest) -> Result<PageOf<Song>, RepoError> {
        let paginator = SongEntity::find()
            .order_by_desc(song::Column::ReleaseDate)
            .paginate(&self.db, page.per_page);

        let total = paginator.num_items().await.map_err(query_err)?;
        let rows = paginator.fetch_page(page.index()).await.map_err(query_err)?;

        Ok(PageOf {
            items: rows.into_iter().map(Into::into).collect(),
            total,
        })
    }
}

#[async_trait]
impl GalleryRepository for PostgresGalleryRepository {
    async fn list(&self, page: PageRequest) -> Result<PageOf<GalleryImage>, RepoError> {
        let paginator = GalleryImageEntity::find()
            .order_by_desc(gallery_image::Column::UploadDate)
            .paginate(&self.db, page.per_page);

        let total = paginator.num_items().await.map_err(query_err)?;
        let rows = paginator.fetch_page(page.index()).await.map_err(query_err)?;

        Ok(PageOf {
            items: rows.into_iter().map(Into::into).collect(),
            total,
        })
    }
}
