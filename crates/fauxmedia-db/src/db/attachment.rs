use async_trait::async_trait;
use fauxmedia_core::{AppError, AttachmentRecord, AttachmentStore};
use sqlx::{PgPool, Postgres};

/// Repository for attachment metadata
#[derive(Clone)]
pub struct AttachmentRepository {
    pool: PgPool,
}

impl AttachmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get attachment by its stored relative filename
    #[tracing::instrument(skip(self), fields(db.table = "attachments", db.operation = "select"))]
    pub async fn get_by_filename(
        &self,
        filename: &str,
    ) -> Result<Option<AttachmentRecord>, AppError> {
        let attachment = sqlx::query_as::<Postgres, AttachmentRecord>(
            "SELECT id, filename, content_type, width, height FROM attachments WHERE filename = $1 ORDER BY id ASC LIMIT 1",
        )
        .bind(filename)
        .fetch_optional(&self.pool)
        .await?;

        Ok(attachment)
    }

    /// List every image attachment
    #[tracing::instrument(skip(self), fields(db.table = "attachments", db.operation = "select"))]
    pub async fn list_images(&self) -> Result<Vec<AttachmentRecord>, AppError> {
        let attachments = sqlx::query_as::<Postgres, AttachmentRecord>(
            r#"
            SELECT id, filename, content_type, width, height
            FROM attachments
            WHERE content_type ILIKE 'image/%'
            ORDER BY filename ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        tracing::debug!(count = attachments.len(), "Listed image attachments");

        Ok(attachments)
    }

    #[tracing::instrument(skip(self), fields(db.operation = "ping"))]
    pub async fn ping(&self) -> Result<(), AppError> {
        sqlx::query_scalar::<Postgres, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl AttachmentStore for AttachmentRepository {
    async fn find_by_filename(
        &self,
        filename: &str,
    ) -> Result<Option<AttachmentRecord>, AppError> {
        self.get_by_filename(filename).await
    }

    async fn list_images(&self) -> Result<Vec<AttachmentRecord>, AppError> {
        AttachmentRepository::list_images(self).await
    }

    async fn ping(&self) -> Result<(), AppError> {
        AttachmentRepository::ping(self).await
    }
}
