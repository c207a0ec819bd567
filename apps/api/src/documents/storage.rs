use anyhow::{anyhow, Result};
use bytes::Bytes;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::document::DocumentRow;

/// Looks up a document owned by `user_id`.
pub async fn get_document(
    pool: &PgPool,
    document_id: Uuid,
    user_id: Uuid,
) -> Result<Option<DocumentRow>, sqlx::Error> {
    sqlx::query_as::<_, DocumentRow>("SELECT * FROM documents WHERE id = $1 AND user_id = $2")
        .bind(document_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

/// Fetches the stored HTML body of a document.
pub async fn fetch_html(s3: &aws_sdk_s3::Client, bucket: &str, key: &str) -> Result<Bytes> {
    let object = s3
        .get_object()
        .bucket(bucket)
        .key(key)
        .send()
        .await
        .map_err(|e| anyhow!("S3 get_object failed for s3://{bucket}/{key}: {e}"))?;

    let data = object
        .body
        .collect()
        .await
        .map_err(|e| anyhow!("S3 body read failed for s3://{bucket}/{key}: {e}"))?;

    let bytes = data.into_bytes();
    info!("Fetched {} bytes from s3://{}/{}", bytes.len(), bucket, key);
    Ok(bytes)
}
