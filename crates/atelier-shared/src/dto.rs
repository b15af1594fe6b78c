//! Data Transfer Objects - request/response types for the API.
//!
//! Create/update bodies use `Option` fields so that missing input reaches
//! the handlers, which turn it into field-keyed validation errors instead
//! of a deserialization failure.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Query parameters accepted by every paginated list endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

// ---------------------------------------------------------------------------
// Auth

/// Request to register a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response containing an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// A user's public information; also embedded as the post author.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

// ---------------------------------------------------------------------------
// Posts

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub is_published: bool,
    pub published_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub author: UserResponse,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub slug: Option<String>,
    pub is_published: Option<bool>,
    pub published_at: Option<DateTime<Utc>>,
}

/// Partial update; absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub is_published: Option<bool>,
    pub published_at: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Comments

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: Uuid,
    /// Parent post id.
    pub post: Uuid,
    pub author: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateCommentRequest {
    pub author: Option<String>,
    pub content: Option<String>,
}

// ---------------------------------------------------------------------------
// Songs

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SongResponse {
    pub id: Uuid,
    pub title: String,
    pub artist: String,
    pub audio_file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lyrics: Option<String>,
    pub release_date: NaiveDate,
    pub upload_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateSongRequest {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub audio_file: Option<String>,
    pub lyrics: Option<String>,
    pub release_date: Option<NaiveDate>,
}

/// Partial update; absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSongRequest {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub audio_file: Option<String>,
    pub lyrics: Option<String>,
    pub release_date: Option<NaiveDate>,
}

// ---------------------------------------------------------------------------
// Gallery

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryImageResponse {
    pub id: Uuid,
    pub image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    pub upload_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateGalleryImageRequest {
    pub image: Option<String>,
    pub caption: Option<String>,
}

/// Partial update; absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateGalleryImageRequest {
    pub image: Option<String>,
    pub caption: Option<String>,
}
