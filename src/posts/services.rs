use std::path::Path;

use anyhow::Context;
use tracing::{error, info, instrument, warn};

use super::{
    dto::{PostView, UploadAssets, UploadFields},
    repo_types::{NewPost, Post},
    seed,
};
use crate::{
    auth::services::ensure_admin,
    error::{AppError, AppResult},
    images::canvas,
    state::AppState,
    storage::{AssetDescriptor, StagedFile, UploadStore},
};

fn tidy(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

/// Normalizes a staged image onto the canvas and drops the raw upload.
async fn normalize_asset(uploads: &UploadStore, staged: &StagedFile) -> anyhow::Result<AssetDescriptor> {
    let output = canvas::normalized_path(&staged.path);
    canvas::normalize_blocking(staged.path.clone(), output.clone()).await?;

    if let Err(e) = uploads.remove(&staged.path).await {
        warn!(error = %format!("{e:#}"), field = %staged.field, file = %staged.filename, "raw upload not removed");
    }

    let size_bytes = uploads.size_of(&output).await?;
    let filename = output
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .context("normalized path has no file name")?;
    Ok(AssetDescriptor {
        filename,
        original_name: staged.original_name.clone(),
        size_bytes,
        storage_path: output.to_string_lossy().into_owned(),
    })
}

/// Creates a post from an upload whose files are already staged on disk.
///
/// The thumbnail must normalize; a photo that fails to normalize is kept as
/// uploaded. Videos are stored untouched.
#[instrument(skip(st, fields, assets))]
pub async fn create_post_from_upload(
    st: &AppState,
    fields: UploadFields,
    assets: UploadAssets,
    uploader_email: &str,
) -> AppResult<Post> {
    let title = tidy(fields.title);
    if title.is_empty() {
        return Err(AppError::Validation("Title is required".into()));
    }
    let Some(staged_thumbnail) = assets.thumbnail.as_ref() else {
        return Err(AppError::Validation("Thumbnail file is required".into()));
    };

    let uploader = ensure_admin(st.users.as_ref(), uploader_email).await?;

    let thumbnail = normalize_asset(&st.uploads, staged_thumbnail).await.map_err(|e| {
        error!(error = %format!("{e:#}"), file = %staged_thumbnail.filename, "thumbnail normalization failed");
        AppError::Processing("thumbnail")
    })?;

    let photo = match assets.photo.as_ref() {
        Some(staged) => Some(match normalize_asset(&st.uploads, staged).await {
            Ok(normalized) => normalized,
            Err(e) => {
                warn!(error = %format!("{e:#}"), file = %staged.filename, "photo kept as uploaded");
                staged.descriptor()
            }
        }),
        None => None,
    };

    let new = NewPost {
        title,
        cast: tidy(fields.cast),
        quality: tidy(fields.quality),
        description: tidy(fields.description),
        download_link: tidy(fields.download_link),
        photo_link: tidy(fields.photo_link),
        thumbnail: Some(thumbnail),
        photo,
        video: assets.video.as_ref().map(StagedFile::descriptor),
        uploaded_by: uploader.id,
    };

    let post = st.posts.insert(&new).await?;
    info!(post_id = %post.id, uploader_id = %uploader.id, "post uploaded");
    Ok(post)
}

pub async fn list_posts(st: &AppState) -> AppResult<Vec<PostView>> {
    let posts = st.posts.list_with_uploader().await?;
    Ok(posts.into_iter().map(PostView::from).collect())
}

/// Deletes every post and its files. Returns how many posts existed.
///
/// Each file removal is independent; failures are logged and skipped.
#[instrument(skip(st))]
pub async fn clear_all_posts(st: &AppState) -> AppResult<u64> {
    let posts = st.posts.list_all().await?;

    for post in &posts {
        for asset in post.assets() {
            if let Err(e) = st.uploads.remove(Path::new(&asset.storage_path)).await {
                warn!(error = %format!("{e:#}"), post_id = %post.id, file = %asset.filename, "asset not deleted");
            }
        }
    }

    let removed = st.posts.delete_all().await?;
    info!(found = posts.len(), removed, "posts cleared");
    Ok(posts.len() as u64)
}

/// Bulk-inserts the sample catalog under the seed admin. Not idempotent.
#[instrument(skip(st))]
pub async fn seed_sample_posts(st: &AppState) -> AppResult<u64> {
    let admin = ensure_admin(st.users.as_ref(), &st.config.seed_admin_email).await?;
    let count = st.posts.insert_many(&seed::sample_posts(admin.id)).await?;
    info!(count, admin_id = %admin.id, "sample posts created");
    Ok(count)
}
