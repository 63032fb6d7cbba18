use std::path::{Path, PathBuf};

use anyhow::Context;
use bytes::Bytes;
use rand::Rng;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::debug;

/// URL prefix under which the upload directory is served.
pub const PUBLIC_PREFIX: &str = "/uploads";

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mov", "wmv", "flv", "webm", "mkv"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

/// Accepts a file only when both its declared MIME type and its extension agree
/// on being an image or a video.
pub fn classify(content_type: &str, original_name: &str) -> Option<MediaKind> {
    let ext = extension_of(original_name)?;
    if content_type.starts_with("image/") && IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        Some(MediaKind::Image)
    } else if content_type.starts_with("video/") && VIDEO_EXTENSIONS.contains(&ext.as_str()) {
        Some(MediaKind::Video)
    } else {
        None
    }
}

fn extension_of(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
}

/// Stored-file record attached to a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetDescriptor {
    pub filename: String,
    pub original_name: String,
    pub size_bytes: i64,
    pub storage_path: String,
}

impl AssetDescriptor {
    pub fn public_url(&self) -> String {
        format!("{}/{}", PUBLIC_PREFIX, self.filename)
    }
}

/// An upload written to disk before any catalog operation runs.
#[derive(Debug, Clone)]
pub struct StagedFile {
    pub field: String,
    pub filename: String,
    pub original_name: String,
    pub size_bytes: i64,
    pub path: PathBuf,
}

impl StagedFile {
    pub fn descriptor(&self) -> AssetDescriptor {
        AssetDescriptor {
            filename: self.filename.clone(),
            original_name: self.original_name.clone(),
            size_bytes: self.size_bytes,
            storage_path: self.path.to_string_lossy().into_owned(),
        }
    }
}

/// Local directory holding every asset file of the catalog.
#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    pub async fn open(root: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root)
            .await
            .with_context(|| format!("create upload dir {}", root.display()))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<field>-<unix millis>-<random>.<ext>`
    pub fn staged_name(field: &str, original_name: &str) -> String {
        let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
        let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000_000);
        match extension_of(original_name) {
            Some(ext) => format!("{field}-{millis}-{suffix}.{ext}"),
            None => format!("{field}-{millis}-{suffix}"),
        }
    }

    pub async fn stage(
        &self,
        field: &str,
        original_name: &str,
        body: Bytes,
    ) -> anyhow::Result<StagedFile> {
        let filename = Self::staged_name(field, original_name);
        let path = self.root.join(&filename);
        tokio::fs::write(&path, &body)
            .await
            .with_context(|| format!("write {}", path.display()))?;
        debug!(field, file = %filename, size = body.len(), "upload staged");
        Ok(StagedFile {
            field: field.to_string(),
            filename,
            original_name: original_name.to_string(),
            size_bytes: body.len() as i64,
            path,
        })
    }

    pub async fn remove(&self, path: &Path) -> anyhow::Result<()> {
        tokio::fs::remove_file(path)
            .await
            .with_context(|| format!("remove {}", path.display()))
    }

    pub async fn size_of(&self, path: &Path) -> anyhow::Result<i64> {
        let meta = tokio::fs::metadata(path)
            .await
            .with_context(|| format!("stat {}", path.display()))?;
        Ok(meta.len() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_requires_matching_mime_and_extension() {
        assert_eq!(classify("image/png", "poster.PNG"), Some(MediaKind::Image));
        assert_eq!(classify("image/jpeg", "a.jpeg"), Some(MediaKind::Image));
        assert_eq!(classify("video/mp4", "trailer.mp4"), Some(MediaKind::Video));
        assert_eq!(classify("video/mp4", "poster.png"), None);
        assert_eq!(classify("image/png", "trailer.mkv"), None);
        assert_eq!(classify("application/pdf", "doc.pdf"), None);
        assert_eq!(classify("image/png", "no-extension"), None);
    }

    #[test]
    fn staged_names_carry_field_and_extension() {
        let name = UploadStore::staged_name("thumbnail", "My Poster.JPG");
        assert!(name.starts_with("thumbnail-"));
        assert!(name.ends_with(".jpg"));
        assert_eq!(name.split('-').count(), 3);
        assert_ne!(name, UploadStore::staged_name("thumbnail", "My Poster.JPG"));
    }

    #[tokio::test]
    async fn stage_and_remove_round_trip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::open(dir.path().join("uploads")).await.unwrap();
        let staged = store
            .stage("video", "clip.mp4", Bytes::from_static(b"0123456789"))
            .await
            .unwrap();

        assert_eq!(staged.size_bytes, 10);
        assert!(staged.path.starts_with(store.root()));
        assert_eq!(store.size_of(&staged.path).await.unwrap(), 10);
        assert_eq!(staged.descriptor().public_url(), format!("/uploads/{}", staged.filename));

        store.remove(&staged.path).await.unwrap();
        assert!(store.remove(&staged.path).await.is_err());
    }
}
