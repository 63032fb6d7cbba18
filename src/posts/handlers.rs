use std::path::PathBuf;

use axum::{
    extract::{multipart::Field, DefaultBodyLimit, Multipart, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use tracing::{debug, info, instrument, warn};

use super::{
    dto::{
        ClearResponse, FeedQuery, PostsResponse, SeedResponse, UploadAssets, UploadFields,
        UploadResponse, UploadedPost, MAX_PER_PAGE,
    },
    feed::feed_window,
    services,
};
use crate::{
    auth::extractors::CatalogWriter,
    error::{AppError, AppResult},
    images::canvas,
    state::AppState,
    storage::{classify, MediaKind},
};

// Multipart framing and the text fields ride on top of the per-file cap.
const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/posts", get(list_posts))
        .route("/posts/feed", get(feed))
}

pub fn write_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route(
            "/upload",
            post(upload_post).layer(DefaultBodyLimit::max(
                max_upload_bytes.saturating_mul(3).saturating_add(FORM_OVERHEAD_BYTES),
            )),
        )
        .route("/posts/clear", delete(clear_posts))
        .route("/posts/sample", post(seed_posts))
}

#[instrument(skip(state))]
pub async fn list_posts(State(state): State<AppState>) -> AppResult<Json<PostsResponse>> {
    let posts = services::list_posts(&state).await?;
    Ok(Json(PostsResponse {
        message: "Posts fetched successfully",
        posts,
    }))
}

/// One page of the endless grid, wrapping around the full list.
#[instrument(skip(state))]
pub async fn feed(
    State(state): State<AppState>,
    Query(q): Query<FeedQuery>,
) -> AppResult<Json<PostsResponse>> {
    if q.per_page == 0 || q.per_page > MAX_PER_PAGE {
        return Err(AppError::Validation(format!(
            "perPage must be between 1 and {MAX_PER_PAGE}"
        )));
    }
    let all = services::list_posts(&state).await?;
    let posts = feed_window(all.len(), q.page, q.per_page)
        .map(|i| all[i].clone())
        .collect();
    Ok(Json(PostsResponse {
        message: "Posts fetched successfully",
        posts,
    }))
}

/// Upload form after reception: text fields plus files staged on disk.
#[derive(Debug, Default)]
struct UploadForm {
    fields: UploadFields,
    email: Option<String>,
    assets: UploadAssets,
}

impl UploadForm {
    /// Raw staged files and the renditions normalization may have produced.
    fn disk_footprint(&self) -> Vec<PathBuf> {
        self.assets
            .staged()
            .flat_map(|s| [s.path.clone(), canvas::normalized_path(&s.path)])
            .collect()
    }
}

/// POST /api/upload (multipart)
///
/// Text: title, cast, quality, description, downloadLink, photoLink, email.
/// Files: thumbnail (required), photo, video.
#[instrument(skip(state, writer, mp))]
pub async fn upload_post(
    State(state): State<AppState>,
    writer: CatalogWriter,
    mut mp: Multipart,
) -> AppResult<(StatusCode, Json<UploadResponse>)> {
    let mut form = UploadForm::default();
    if let Err(e) = receive_form(&state, &mut mp, &mut form).await {
        discard(&form.disk_footprint()).await;
        return Err(e);
    }

    let footprint = form.disk_footprint();
    let uploader_email = match writer.0 {
        Some(admin) => admin.email,
        None => match form.email.as_deref().map(str::trim).filter(|e| !e.is_empty()) {
            Some(email) => email.to_string(),
            None => {
                discard(&footprint).await;
                return Err(AppError::Validation("Email is required".into()));
            }
        },
    };

    match services::create_post_from_upload(&state, form.fields, form.assets, &uploader_email).await {
        Ok(post) => Ok((
            StatusCode::OK,
            Json(UploadResponse {
                message: "Post uploaded successfully",
                post: UploadedPost {
                    id: post.id,
                    thumbnail: post.thumbnail.as_ref().map(|t| t.public_url()),
                    title: post.title,
                },
            }),
        )),
        Err(e) => {
            discard(&footprint).await;
            Err(e)
        }
    }
}

async fn receive_form(state: &AppState, mp: &mut Multipart, form: &mut UploadForm) -> AppResult<()> {
    while let Some(field) = mp
        .next_field()
        .await
        .map_err(|e| AppError::Validation(e.body_text()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "thumbnail" | "photo" | "video" => {
                let (slot, expected) = match name.as_str() {
                    "thumbnail" => (&mut form.assets.thumbnail, MediaKind::Image),
                    "photo" => (&mut form.assets.photo, MediaKind::Image),
                    _ => (&mut form.assets.video, MediaKind::Video),
                };
                if slot.is_some() {
                    debug!(field = %name, "duplicate file field ignored");
                    continue;
                }
                *slot = Some(stage_file(state, &name, expected, field).await?);
            }
            "title" => form.fields.title = Some(text(field).await?),
            "cast" => form.fields.cast = Some(text(field).await?),
            "quality" => form.fields.quality = Some(text(field).await?),
            "description" => form.fields.description = Some(text(field).await?),
            "downloadLink" => form.fields.download_link = Some(text(field).await?),
            "photoLink" => form.fields.photo_link = Some(text(field).await?),
            "email" => form.email = Some(text(field).await?),
            _ => {} // ignore unknown fields
        }
    }
    Ok(())
}

async fn text(field: Field<'_>) -> AppResult<String> {
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(e.body_text()))
}

async fn stage_file(
    state: &AppState,
    name: &str,
    expected: MediaKind,
    field: Field<'_>,
) -> AppResult<crate::storage::StagedFile> {
    let original_name = field.file_name().unwrap_or("").to_string();
    let content_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();

    match classify(&content_type, &original_name) {
        None => {
            warn!(field = name, %content_type, file = %original_name, "file type rejected");
            return Err(AppError::Validation("Only video and image files are allowed!".into()));
        }
        // Thumbnails and photos go through the canvas; only `video` takes a video.
        Some(kind) if kind != expected => {
            warn!(field = name, ?kind, file = %original_name, "file kind does not fit field");
            let wanted = match expected {
                MediaKind::Image => "an image",
                MediaKind::Video => "a video",
            };
            return Err(AppError::Validation(format!("{name} must be {wanted} file")));
        }
        Some(_) => {}
    }

    let limit = state.config.max_upload_bytes;
    let body = field.bytes().await.map_err(|e| {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge { limit }
        } else {
            AppError::Validation(e.body_text())
        }
    })?;
    if body.len() > limit {
        return Err(AppError::PayloadTooLarge { limit });
    }

    Ok(state.uploads.stage(name, &original_name, body).await?)
}

async fn discard(paths: &[PathBuf]) {
    for path in paths {
        match tokio::fs::remove_file(path).await {
            Ok(()) => debug!(file = %path.display(), "discarded upload leftover"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(error = %e, file = %path.display(), "upload leftover not removed"),
        }
    }
}

#[instrument(skip(state, _writer))]
pub async fn clear_posts(
    State(state): State<AppState>,
    _writer: CatalogWriter,
) -> AppResult<Json<ClearResponse>> {
    let deleted_count = services::clear_all_posts(&state).await?;
    Ok(Json(ClearResponse {
        message: "All posts cleared successfully",
        deleted_count,
    }))
}

#[instrument(skip(state, _writer))]
pub async fn seed_posts(
    State(state): State<AppState>,
    _writer: CatalogWriter,
) -> AppResult<Json<SeedResponse>> {
    let count = services::seed_sample_posts(&state).await?;
    info!(count, "sample catalog seeded");
    Ok(Json(SeedResponse {
        message: "Sample posts created successfully",
        count,
    }))
}
