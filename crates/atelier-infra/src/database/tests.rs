use chrono::Utc;
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
use uuid::Uuid;

use atelier_core::domain::{Post, Song};
use atelier_core::error::RepoError;
use atelier_core::ports::{BaseRepository, CommentRepository, PostRepository};

use super::entity::{comment, post, user};
use super::postgres_repo::{
    PostgresCommentRepository, PostgresPostRepository, PostgresSongRepository,
};

fn post_model(author_id: Uuid, slug: &str, published: bool) -> post::Model {
    let now = Utc::now();
    post::Model {
        id: Uuid::new_v4(),
        author_id,
        title: "Test Post".to_owned(),
        slug: slug.to_owned(),
        content: "Content".to_owned(),
        is_published: published,
        published_at: now.into(),
        created_at: now.into(),
        updated_at: now.into(),
    }
}

fn user_model(id: Uuid) -> user::Model {
    let now = Utc::now();
    user::Model {
        id,
        username: "testuser".to_owned(),
        email: "test@example.com".to_owned(),
        password_hash: "hash".to_owned(),
        created_at: now.into(),
        updated_at: now.into(),
    }
}

#[tokio::test]
async fn test_find_post_by_id() {
    let author_id = Uuid::new_v4();
    let model = post_model(author_id, "test-post", true);
    let post_id = model.id;

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![model]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let result: Option<Post> = repo.find_by_id(post_id).await.unwrap();

    assert!(result.is_some());
    let post = result.unwrap();
    assert_eq!(post.title, "Test Post");
    assert_eq!(post.id, post_id);
}

#[tokio::test]
async fn test_find_published_by_slug_joins_author() {
    let author_id = Uuid::new_v4();
    let row = (post_model(author_id, "joined-post", true), user_model(author_id));

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![row]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let result = repo.find_published_by_slug("joined-post").await.unwrap();

    let (post, author) = result.unwrap();
    assert_eq!(post.slug, "joined-post");
    assert_eq!(author.id, author_id);
    assert_eq!(author.username, "testuser");
}

#[tokio::test]
async fn test_delete_missing_row_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results(vec![MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();

    let repo = PostgresSongRepository::new(db);

    let result = BaseRepository::<Song, Uuid>::delete(&repo, Uuid::new_v4()).await;
    assert!(matches!(result, Err(RepoError::NotFound)));
}

#[tokio::test]
async fn test_list_comments_for_post() {
    let post_id = Uuid::new_v4();
    let now = Utc::now();
    let rows = vec![
        comment::Model {
            id: Uuid::new_v4(),
            post_id,
            author: "User One".to_owned(),
            content: "First comment".to_owned(),
            created_at: now.into(),
        },
        comment::Model {
            id: Uuid::new_v4(),
            post_id,
            author: "User Two".to_owned(),
            content: "Second comment".to_owned(),
            created_at: now.into(),
        },
    ];

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![rows])
        .into_connection();

    let repo = PostgresCommentRepository::new(db);

    let comments = repo.list_for_post(post_id).await.unwrap();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0].content, "First comment");
    assert!(comments.iter().all(|c| c.post_id == post_id));
}
