//! Song catalog handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use atelier_core::domain::Song;
use atelier_shared::Paginated;
use atelier_shared::dto::{CreateSongRequest, PageQuery, SongResponse, UpdateSongRequest};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const MAX_TITLE_LEN: usize = 200;
const MAX_ARTIST_LEN: usize = 100;

fn song_response(song: Song) -> SongResponse {
    SongResponse {
        id: song.id,
        title: song.title,
        artist: song.artist,
        audio_file: song.audio_file,
        lyrics: song.lyrics,
        release_date: song.release_date,
        upload_date: song.upload_date,
    }
}

async fn song_or_404(state: &AppState, id: Uuid) -> AppResult<Song> {
    state
        .songs
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No song found with id {id}")))
}

/// GET /api/songs
pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = super::page_request(&query);
    let result = state.songs.list(page).await?;

    Ok(HttpResponse::Ok().json(Paginated {
        count: result.total,
        page: page.page,
        page_size: page.per_page,
        results: result
            .items
            .into_iter()
            .map(song_response)
            .collect::<Vec<_>>(),
    }))
}

/// GET /api/songs/{id}
pub async fn retrieve(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let song = song_or_404(&state, *path).await?;
    Ok(HttpResponse::Ok().json(song_response(song)))
}

/// POST /api/songs
pub async fn create(
    state: web::Data<AppState>,
    _identity: Identity,
    body: web::Json<CreateSongRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let mut errors = Vec::new();
    let title = match req.title.as_deref().map(str::trim) {
        Some(t) if !t.is_empty() => {
            if t.len() > MAX_TITLE_LEN {
                errors.push((
                    "title".to_string(),
                    format!("Ensure this field has no more than {MAX_TITLE_LEN} characters."),
                ));
            }
            Some(t.to_owned())
        }
        _ => {
            errors.push(("title".to_string(), "This field is required.".to_string()));
            None
        }
    };
    let artist = match req.artist.as_deref().map(str::trim) {
        Some(a) if !a.is_empty() => {
            if a.len() > MAX_ARTIST_LEN {
                errors.push((
                    "artist".to_string(),
                    format!("Ensure this field has no more than {MAX_ARTIST_LEN} characters."),
                ));
            }
            Some(a.to_owned())
        }
        _ => {
            errors.push(("artist".to_string(), "This field is required.".to_string()));
            None
        }
    };
    let audio_file = match req.audio_file.as_deref().map(str::trim) {
        Some(f) if !f.is_empty() => Some(f.to_owned()),
        _ => {
            errors.push((
                "audio_file".to_string(),
                "This field is required.".to_string(),
            ));
            None
        }
    };
    if req.release_date.is_none() {
        errors.push((
            "release_date".to_string(),
            "This field is required.".to_string(),
        ));
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let song = Song::new(
        title.unwrap_or_default(),
        artist.unwrap_or_default(),
        audio_file.unwrap_or_default(),
        req.lyrics,
        req.release_date.unwrap_or_default(),
    );
    let song = state.songs.insert(song).await?;

    tracing::info!(song_id = %song.id, "Song created");

    Ok(HttpResponse::Created().json(song_response(song)))
}

/// PUT /api/songs/{id} - partial update; `upload_date` never changes.
pub async fn update(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<UpdateSongRequest>,
) -> AppResult<HttpResponse> {
    let mut song = song_or_404(&state, *path).await?;
    let req = body.into_inner();

    if let Some(title) = req.title {
        let title = title.trim().to_owned();
        if title.is_empty() || title.len() > MAX_TITLE_LEN {
            return Err(AppError::invalid("title", "Enter a valid title."));
        }
        song.title = title;
    }
    if let Some(artist) = req.artist {
        let artist = artist.trim().to_owned();
        if artist.is_empty() || artist.len() > MAX_ARTIST_LEN {
            return Err(AppError::invalid("artist", "Enter a valid artist."));
        }
        song.artist = artist;
    }
    if let Some(audio_file) = req.audio_file {
        song.audio_file = audio_file;
    }
    if let Some(lyrics) = req.lyrics {
        song.lyrics = Some(lyrics);
    }
    if let Some(release_date) = req.release_date {
        song.release_date = release_date;
    }

    let song = state.songs.update(song).await?;

    Ok(HttpResponse::Ok().json(song_response(song)))
}

/// DELETE /api/songs/{id}
pub async fn delete(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let song = song_or_404(&state, *path).await?;
    state.songs.delete(song.id).await?;

    tracing::info!(song_id = %song.id, "Song deleted");

    Ok(HttpResponse::NoContent().finish())
}
