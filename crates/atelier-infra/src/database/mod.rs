//! Database access - SeaORM entities, PostgreSQL repositories, and the
//! in-memory fallback.

mod connections;
pub mod entity;
pub mod memory;
mod postgres_base;
pub mod postgres_repo;

pub use connections::{DatabaseConfig, connect};
pub use memory::{
    InMemoryCommentRepository, InMemoryGalleryRepository, InMemoryPostRepository,
    InMemorySongRepository, InMemoryStore, InMemoryUserRepository,
};
pub use postgres_repo::{
    PostgresCommentRepository, PostgresGalleryRepository, PostgresPostRepository,
    PostgresSongRepository, PostgresUserRepository,
};

#[cfg(test)]
mod tests;
