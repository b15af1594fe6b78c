use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Song entity - a catalog row pointing at an uploaded audio blob.
///
/// `audio_file` is an opaque storage key; upload handling lives elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Song {
    pub id: Uuid,
    pub title: String,
    pub artist: String,
    pub audio_file: String,
    pub lyrics: Option<String>,
    pub release_date: NaiveDate,
    pub upload_date: DateTime<Utc>,
}

impl Song {
    /// Create a new song. `upload_date` is set once, here.
    pub fn new(
        title: String,
        artist: String,
        audio_file: String,
        lyrics: Option<String>,
        release_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            artist,
            audio_file,
            lyrics,
            release_date,
            upload_date: Utc::now(),
        }
    }
}
