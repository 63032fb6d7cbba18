use anyhow::Context;
use async_trait::async_trait;
use sqlx::{types::Json, Executor, PgPool, Postgres};

use crate::posts::repo_types::{NewPost, Post, PostListRow, PostRow, PostWithUploader};

#[async_trait]
pub trait PostRepo: Send + Sync {
    async fn insert(&self, new: &NewPost) -> anyhow::Result<Post>;

    /// Inserts all rows in one transaction; returns how many were written.
    async fn insert_many(&self, new: &[NewPost]) -> anyhow::Result<u64>;

    /// Newest first, with uploader display fields.
    async fn list_with_uploader(&self) -> anyhow::Result<Vec<PostWithUploader>>;

    async fn list_all(&self) -> anyhow::Result<Vec<Post>>;

    async fn delete_all(&self) -> anyhow::Result<u64>;
}

#[derive(Clone)]
pub struct PgPostRepo {
    db: PgPool,
}

impl PgPostRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

async fn insert_row<'e, E>(executor: E, new: &NewPost) -> anyhow::Result<PostRow>
where
    E: Executor<'e, Database = Postgres>,
{
    let row = sqlx::query_as::<_, PostRow>(
        r#"
        INSERT INTO posts (title, cast_list, quality, description, download_link, photo_link,
                           thumbnail, photo, video, uploaded_by)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING id, title, cast_list, quality, description, download_link, photo_link,
                  thumbnail, photo, video, uploaded_by, created_at, updated_at
        "#,
    )
    .bind(&new.title)
    .bind(&new.cast)
    .bind(&new.quality)
    .bind(&new.description)
    .bind(&new.download_link)
    .bind(&new.photo_link)
    .bind(new.thumbnail.as_ref().map(Json))
    .bind(new.photo.as_ref().map(Json))
    .bind(new.video.as_ref().map(Json))
    .bind(new.uploaded_by) // weak reference; no cascade
    .fetch_one(executor)
    .await
    .context("insert post")?;
    Ok(row)
}

#[async_trait]
impl PostRepo for PgPostRepo {
    async fn insert(&self, new: &NewPost) -> anyhow::Result<Post> {
        Ok(insert_row(&self.db, new).await?.into())
    }

    async fn insert_many(&self, new: &[NewPost]) -> anyhow::Result<u64> {
        let mut tx = self.db.begin().await.context("begin tx")?;
        for post in new {
            insert_row(&mut *tx, post).await?;
        }
        tx.commit().await.context("commit tx")?;
        Ok(new.len() as u64)
    }

    async fn list_with_uploader(&self) -> anyhow::Result<Vec<PostWithUploader>> {
        let rows = sqlx::query_as::<_, PostListRow>(
            r#"
            SELECT p.id, p.title, p.cast_list, p.quality, p.description, p.download_link,
                   p.photo_link, p.thumbnail, p.photo, p.video, p.uploaded_by,
                   p.created_at, p.updated_at,
                   u.name AS uploader_name, u.email AS uploader_email
              FROM posts p
              LEFT JOIN users u ON u.id = p.uploaded_by
             ORDER BY p.created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await
        .context("list posts with uploader")?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_all(&self) -> anyhow::Result<Vec<Post>> {
        let rows = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT id, title, cast_list, quality, description, download_link, photo_link,
                   thumbnail, photo, video, uploaded_by, created_at, updated_at
              FROM posts
            "#,
        )
        .fetch_all(&self.db)
        .await
        .context("list posts")?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn delete_all(&self) -> anyhow::Result<u64> {
        let done = sqlx::query("DELETE FROM posts")
            .execute(&self.db)
            .await
            .context("delete posts")?;
        Ok(done.rows_affected())
    }
}
