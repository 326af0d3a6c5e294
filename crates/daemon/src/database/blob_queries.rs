use sqlx::Row;
use time::OffsetDateTime;

use crate::database::{types::DUuid, Database};
use common::prelude::StorageRef;

/// An upload ticket as recorded when it was issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobTicket {
    pub storage_ref: StorageRef,
    /// Byte length of the uploaded content, once there is any.
    pub size: Option<u64>,
    pub uploaded: bool,
    pub created_at: OffsetDateTime,
}

impl Database {
    /// Record a freshly issued storage ref.
    pub async fn insert_blob_ticket(&self, storage_ref: StorageRef) -> Result<(), sqlx::Error> {
        let now = OffsetDateTime::now_utc();
        sqlx::query(
            r#"
            INSERT INTO blobs (storage_ref, size, uploaded, created_at, updated_at)
            VALUES (?, NULL, 0, ?, ?)
            "#,
        )
        .bind(DUuid::of(storage_ref))
        .bind(now)
        .bind(now)
        .execute(&**self)
        .await?;
        Ok(())
    }

    pub async fn get_blob_ticket(
        &self,
        storage_ref: StorageRef,
    ) -> Result<Option<BlobTicket>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT storage_ref, size, uploaded, created_at
            FROM blobs
            WHERE storage_ref = ?
            "#,
        )
        .bind(DUuid::of(storage_ref))
        .fetch_optional(&**self)
        .await?;

        row.map(|r| -> Result<BlobTicket, sqlx::Error> {
            let size: Option<i64> = r.try_get("size")?;
            Ok(BlobTicket {
                storage_ref: r.try_get::<DUuid, _>("storage_ref")?.into_id(),
                size: size.and_then(|s| u64::try_from(s).ok()),
                uploaded: r.try_get("uploaded")?,
                created_at: r.try_get("created_at")?,
            })
        })
        .transpose()
    }

    /// Claim an issued, still empty ticket for `size` bytes of content.
    ///  Returns `false` when the ref is unknown or already holds content.
    pub async fn claim_blob_upload(
        &self,
        storage_ref: StorageRef,
        size: u64,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE blobs
            SET size = ?, uploaded = 1, updated_at = ?
            WHERE storage_ref = ? AND uploaded = 0
            "#,
        )
        .bind(i64::try_from(size).unwrap_or(i64::MAX))
        .bind(OffsetDateTime::now_utc())
        .bind(DUuid::of(storage_ref))
        .execute(&**self)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Return a claimed ticket to the empty state after a failed write.
    pub async fn release_blob_claim(&self, storage_ref: StorageRef) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE blobs
            SET size = NULL, uploaded = 0, updated_at = ?
            WHERE storage_ref = ?
            "#,
        )
        .bind(OffsetDateTime::now_utc())
        .bind(DUuid::of(storage_ref))
        .execute(&**self)
        .await?;
        Ok(())
    }

    pub async fn delete_blob_ticket(&self, storage_ref: StorageRef) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM blobs WHERE storage_ref = ?")
            .bind(DUuid::of(storage_ref))
            .execute(&**self)
            .await?;
        Ok(())
    }
}
