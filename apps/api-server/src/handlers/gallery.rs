//! Gallery collection handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use atelier_core::domain::GalleryImage;
use atelier_shared::Paginated;
use atelier_shared::dto::{
    CreateGalleryImageRequest, GalleryImageResponse, PageQuery, UpdateGalleryImageRequest,
};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const MAX_CAPTION_LEN: usize = 255;

fn image_response(image: GalleryImage) -> GalleryImageResponse {
    GalleryImageResponse {
        id: image.id,
        image: image.image,
        caption: image.caption,
        upload_date: image.upload_date,
    }
}

async fn image_or_404(state: &AppState, id: Uuid) -> AppResult<GalleryImage> {
    state
        .galleries
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No gallery image found with id {id}")))
}

fn validate_caption(caption: Option<String>) -> AppResult<Option<String>> {
    match caption {
        Some(c) if c.len() > MAX_CAPTION_LEN => Err(AppError::invalid(
            "caption",
            format!("Ensure this field has no more than {MAX_CAPTION_LEN} characters."),
        )),
        other => Ok(other),
    }
}

/// GET /api/galleries
pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = super::page_request(&query);
    let result = state.galleries.list(page).await?;

    Ok(HttpResponse::Ok().json(Paginated {
        count: result.total,
        page: page.page,
        page_size: page.per_page,
        results: result
            .items
            .into_iter()
            .map(image_response)
            .collect::<Vec<_>>(),
    }))
}

/// GET /api/galleries/{id}
pub async fn retrieve(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let image = image_or_404(&state, *path).await?;
    Ok(HttpResponse::Ok().json(image_response(image)))
}

/// POST /api/galleries
pub async fn create(
    state: web::Data<AppState>,
    _identity: Identity,
    body: web::Json<CreateGalleryImageRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let image = match req.image.as_deref().map(str::trim) {
        Some(i) if !i.is_empty() => i.to_owned(),
        _ => return Err(AppError::invalid("image", "This field is required.")),
    };
    let caption = validate_caption(req.caption)?;

    let image = state
        .galleries
        .insert(GalleryImage::new(image, caption))
        .await?;

    tracing::info!(image_id = %image.id, "Gallery image created");

    Ok(HttpResponse::Created().json(image_response(image)))
}

/// PUT /api/galleries/{id} - partial update; `upload_date` never changes.
pub async fn update(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<UpdateGalleryImageRequest>,
) -> AppResult<HttpResponse> {
    let mut image = image_or_404(&state, *path).await?;
    let req = body.into_inner();

    if let Some(reference) = req.image {
        let reference = reference.trim().to_owned();
        if reference.is_empty() {
            return Err(AppError::invalid("image", "This field may not be blank."));
        }
        image.image = reference;
    }
    if req.caption.is_some() {
        image.caption = validate_caption(req.caption)?;
    }

    let image = state.galleries.update(image).await?;

    Ok(HttpResponse::Ok().json(image_response(image)))
}

/// DELETE /api/galleries/{id}
pub async fn delete(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let image = image_or_404(&state, *path).await?;
    state.galleries.delete(image.id).await?;

    tracing::info!(image_id = %image.id, "Gallery image deleted");

    Ok(HttpResponse::NoContent().finish())
}
