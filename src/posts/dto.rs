use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    posts::repo_types::{PostWithUploader, Uploader},
    storage::{AssetDescriptor, StagedFile},
};

/// Text fields of an upload form, as received.
#[derive(Debug, Default, Clone)]
pub struct UploadFields {
    pub title: Option<String>,
    pub cast: Option<String>,
    pub quality: Option<String>,
    pub description: Option<String>,
    pub download_link: Option<String>,
    pub photo_link: Option<String>,
}

/// Files of an upload form, already staged in the upload directory.
#[derive(Debug, Default, Clone)]
pub struct UploadAssets {
    pub thumbnail: Option<StagedFile>,
    pub photo: Option<StagedFile>,
    pub video: Option<StagedFile>,
}

impl UploadAssets {
    pub fn staged(&self) -> impl Iterator<Item = &StagedFile> {
        [&self.thumbnail, &self.photo, &self.video]
            .into_iter()
            .flatten()
    }
}

/// A post as served to the catalog grid.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    pub id: Uuid,
    pub title: String,
    pub cast: String,
    pub quality: String,
    pub description: String,
    pub download_link: String,
    pub photo_link: String,
    pub thumbnail: Option<String>,
    pub photo: Option<String>,
    pub video: Option<String>,
    pub uploaded_by: Option<Uploader>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<PostWithUploader> for PostView {
    fn from(p: PostWithUploader) -> Self {
        let url = |a: &Option<AssetDescriptor>| a.as_ref().map(AssetDescriptor::public_url);
        Self {
            thumbnail: url(&p.post.thumbnail),
            photo: url(&p.post.photo),
            video: url(&p.post.video),
            id: p.post.id,
            title: p.post.title,
            cast: p.post.cast,
            quality: p.post.quality,
            description: p.post.description,
            download_link: p.post.download_link,
            photo_link: p.post.photo_link,
            uploaded_by: p.uploader,
            created_at: p.post.created_at,
            updated_at: p.post.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PostsResponse {
    pub message: &'static str,
    pub posts: Vec<PostView>,
}

#[derive(Debug, Serialize)]
pub struct UploadedPost {
    pub id: Uuid,
    pub title: String,
    pub thumbnail: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: &'static str,
    pub post: UploadedPost,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearResponse {
    pub message: &'static str,
    pub deleted_count: u64,
}

#[derive(Debug, Serialize)]
pub struct SeedResponse {
    pub message: &'static str,
    pub count: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedQuery {
    #[serde(default)]
    pub page: usize,
    #[serde(default = "default_per_page")]
    pub per_page: usize,
}

fn default_per_page() -> usize {
    12
}

pub const MAX_PER_PAGE: usize = 100;
