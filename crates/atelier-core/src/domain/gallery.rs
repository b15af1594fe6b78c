use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Gallery image entity - standalone row pointing at an uploaded image blob.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryImage {
    pub id: Uuid,
    pub image: String,
    pub caption: Option<String>,
    pub upload_date: DateTime<Utc>,
}

impl GalleryImage {
    /// Create a new gallery image. `upload_date` is set once, here.
    pub fn new(image: String, caption: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            image,
            caption,
            upload_date: Utc::now(),
        }
    }
}
