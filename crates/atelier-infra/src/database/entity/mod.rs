//! SeaORM entities - one module per table.

pub mod comment;
pub mod gallery_image;
pub mod post;
pub mod song;
pub mod user;
