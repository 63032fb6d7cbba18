use serde::Serialize;
use sqlx::{types::Json, FromRow};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::storage::AssetDescriptor;

#[derive(Debug, Clone, FromRow)]
pub struct PostRow {
    pub id: Uuid,
    pub title: String,
    pub cast_list: String,
    pub quality: String,
    pub description: String,
    pub download_link: String,
    pub photo_link: String,
    pub thumbnail: Option<Json<AssetDescriptor>>,
    pub photo: Option<Json<AssetDescriptor>>,
    pub video: Option<Json<AssetDescriptor>>,
    pub uploaded_by: Uuid,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Post joined with the display fields of its uploader.
#[derive(Debug, Clone, FromRow)]
pub struct PostListRow {
    #[sqlx(flatten)]
    pub post: PostRow,
    pub uploader_name: Option<String>,
    pub uploader_email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub cast: String,
    pub quality: String,
    pub description: String,
    pub download_link: String,
    pub photo_link: String,
    pub thumbnail: Option<AssetDescriptor>,
    pub photo: Option<AssetDescriptor>,
    pub video: Option<AssetDescriptor>,
    pub uploaded_by: Uuid,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl Post {
    /// Every file backing this post, in thumbnail/photo/video order.
    pub fn assets(&self) -> impl Iterator<Item = &AssetDescriptor> {
        [&self.thumbnail, &self.photo, &self.video]
            .into_iter()
            .flatten()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Uploader {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone)]
pub struct PostWithUploader {
    pub post: Post,
    /// `None` when the referenced user no longer exists.
    pub uploader: Option<Uploader>,
}

/// Insert payload for a post row.
#[derive(Debug, Clone, Default)]
pub struct NewPost {
    pub title: String,
    pub cast: String,
    pub quality: String,
    pub description: String,
    pub download_link: String,
    pub photo_link: String,
    pub thumbnail: Option<AssetDescriptor>,
    pub photo: Option<AssetDescriptor>,
    pub video: Option<AssetDescriptor>,
    pub uploaded_by: uuid::Uuid,
}

impl From<PostRow> for Post {
    fn from(r: PostRow) -> Self {
        Self {
            id: r.id,
            title: r.title,
            cast: r.cast_list,
            quality: r.quality,
            description: r.description,
            download_link: r.download_link,
            photo_link: r.photo_link,
            thumbnail: r.thumbnail.map(|j| j.0),
            photo: r.photo.map(|j| j.0),
            video: r.video.map(|j| j.0),
            uploaded_by: r.uploaded_by,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

impl From<PostListRow> for PostWithUploader {
    fn from(r: PostListRow) -> Self {
        let uploader = match (r.uploader_name, r.uploader_email) {
            (Some(name), Some(email)) => Some(Uploader { name, email }),
            _ => None,
        };
        Self {
            post: r.post.into(),
            uploader,
        }
    }
}
