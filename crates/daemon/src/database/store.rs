//! SQLite-backed [`Store`].
//!
//! Listings come back in insertion order (`ORDER BY rowid`). Nullable
//! parent and folder columns are matched with `IS ?` so a `None` filter
//! means "at the dataroom root" and still hits the composite indexes.

use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use time::OffsetDateTime;

use common::prelude::{
    AccessGrant, Dataroom, DataroomId, FileId, FileRecord, Folder, FolderId, GrantId, Role,
    StorageRef, Store, User, UserId,
};

use super::types::{DRole, DUuid};
use super::Database;

const USER_COLUMNS: &str = "id, full_name, email, password, created_at, updated_at";
const DATAROOM_COLUMNS: &str = "id, name, created_at, updated_at";
const GRANT_COLUMNS: &str = "id, dataroom_id, user_email, role, invited_at, invited_by";
const FOLDER_COLUMNS: &str = "id, name, dataroom_id, parent_folder_id, created_at, updated_at";
const FILE_COLUMNS: &str =
    "id, name, dataroom_id, folder_id, storage_ref, mime_type, size, created_at, updated_at";

fn user_from_row(row: &SqliteRow) -> Result<User, sqlx::Error> {
    Ok(User {
        id: row.try_get::<DUuid, _>("id")?.into_id(),
        full_name: row.try_get("full_name")?,
        email: row.try_get("email")?,
        password: row.try_get("password")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn dataroom_from_row(row: &SqliteRow) -> Result<Dataroom, sqlx::Error> {
    Ok(Dataroom {
        id: row.try_get::<DUuid, _>("id")?.into_id(),
        name: row.try_get("name")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn grant_from_row(row: &SqliteRow) -> Result<AccessGrant, sqlx::Error> {
    Ok(AccessGrant {
        id: row.try_get::<DUuid, _>("id")?.into_id(),
        dataroom_id: row.try_get::<DUuid, _>("dataroom_id")?.into_id(),
        user_email: row.try_get("user_email")?,
        role: row.try_get::<DRole, _>("role")?.into(),
        invited_at: row.try_get("invited_at")?,
        invited_by: row
            .try_get::<Option<DUuid>, _>("invited_by")?
            .map(DUuid::into_id),
    })
}

fn folder_from_row(row: &SqliteRow) -> Result<Folder, sqlx::Error> {
    Ok(Folder {
        id: row.try_get::<DUuid, _>("id")?.into_id(),
        name: row.try_get("name")?,
        dataroom_id: row.try_get::<DUuid, _>("dataroom_id")?.into_id(),
        parent_folder_id: row
            .try_get::<Option<DUuid>, _>("parent_folder_id")?
            .map(DUuid::into_id),
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn file_from_row(row: &SqliteRow) -> Result<FileRecord, sqlx::Error> {
    let size: i64 = row.try_get("size")?;
    Ok(FileRecord {
        id: row.try_get::<DUuid, _>("id")?.into_id(),
        name: row.try_get("name")?,
        dataroom_id: row.try_get::<DUuid, _>("dataroom_id")?.into_id(),
        folder_id: row
            .try_get::<Option<DUuid>, _>("folder_id")?
            .map(DUuid::into_id),
        storage_ref: row.try_get::<DUuid, _>("storage_ref")?.into_id(),
        mime_type: row.try_get("mime_type")?,
        size: u64::try_from(size).unwrap_or_default(),
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn collect<T>(
    rows: Vec<SqliteRow>,
    map: fn(&SqliteRow) -> Result<T, sqlx::Error>,
) -> Result<Vec<T>, sqlx::Error> {
    rows.iter().map(map).collect()
}

#[async_trait]
impl Store for Database {
    type Error = sqlx::Error;

    async fn insert_user(&self, user: User) -> Result<(), Self::Error> {
        sqlx::query(
            r#"
            INSERT INTO users (id, full_name, email, password, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(DUuid::of(user.id))
        .bind(&user.full_name)
        .bind(&user.email)
        .bind(&user.password)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&**self)
        .await?;
        Ok(())
    }

    async fn get_user(&self, id: UserId) -> Result<Option<User>, Self::Error> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS))
            .bind(DUuid::of(id))
            .fetch_optional(&**self)
            .await?;
        row.as_ref().map(user_from_row).transpose()
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, Self::Error> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM users WHERE email = ? ORDER BY rowid LIMIT 1",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&**self)
        .await?;
        row.as_ref().map(user_from_row).transpose()
    }

    async fn insert_dataroom_with_owner(
        &self,
        dataroom: Dataroom,
        owner: AccessGrant,
    ) -> Result<(), Self::Error> {
        let mut tx = self.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO datarooms (id, name, created_at, updated_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(DUuid::of(dataroom.id))
        .bind(&dataroom.name)
        .bind(dataroom.created_at)
        .bind(dataroom.updated_at)
        .execute(&mut *tx)
        .await?;

        insert_grant_query(&owner).execute(&mut *tx).await?;

        tx.commit().await?;
        Ok(())
    }

    async fn get_dataroom(&self, id: DataroomId) -> Result<Option<Dataroom>, Self::Error> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM datarooms WHERE id = ?",
            DATAROOM_COLUMNS
        ))
        .bind(DUuid::of(id))
        .fetch_optional(&**self)
        .await?;
        row.as_ref().map(dataroom_from_row).transpose()
    }

    async fn rename_dataroom(
        &self,
        id: DataroomId,
        name: &str,
        updated_at: OffsetDateTime,
    ) -> Result<(), Self::Error> {
        sqlx::query("UPDATE datarooms SET name = ?, updated_at = ? WHERE id = ?")
            .bind(name)
            .bind(updated_at)
            .bind(DUuid::of(id))
            .execute(&**self)
            .await?;
        Ok(())
    }

    async fn delete_dataroom(&self, id: DataroomId) -> Result<(), Self::Error> {
        sqlx::query("DELETE FROM datarooms WHERE id = ?")
            .bind(DUuid::of(id))
            .execute(&**self)
            .await?;
        Ok(())
    }

    async fn insert_grant(&self, grant: AccessGrant) -> Result<(), Self::Error> {
        insert_grant_query(&grant).execute(&**self).await?;
        Ok(())
    }

    async fn get_grant(&self, id: GrantId) -> Result<Option<AccessGrant>, Self::Error> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM dataroom_access WHERE id = ?",
            GRANT_COLUMNS
        ))
        .bind(DUuid::of(id))
        .fetch_optional(&**self)
        .await?;
        row.as_ref().map(grant_from_row).transpose()
    }

    async fn find_grant(
        &self,
        dataroom: DataroomId,
        email: &str,
    ) -> Result<Option<AccessGrant>, Self::Error> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM dataroom_access WHERE dataroom_id = ? AND user_email = ? ORDER BY rowid LIMIT 1",
            GRANT_COLUMNS
        ))
        .bind(DUuid::of(dataroom))
        .bind(email)
        .fetch_optional(&**self)
        .await?;
        row.as_ref().map(grant_from_row).transpose()
    }

    async fn list_grants_for_user(&self, email: &str) -> Result<Vec<AccessGrant>, Self::Error> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM dataroom_access WHERE user_email = ? ORDER BY rowid",
            GRANT_COLUMNS
        ))
        .bind(email)
        .fetch_all(&**self)
        .await?;
        collect(rows, grant_from_row)
    }

    async fn list_grants_for_dataroom(
        &self,
        dataroom: DataroomId,
    ) -> Result<Vec<AccessGrant>, Self::Error> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM dataroom_access WHERE dataroom_id = ? ORDER BY rowid",
            GRANT_COLUMNS
        ))
        .bind(DUuid::of(dataroom))
        .fetch_all(&**self)
        .await?;
        collect(rows, grant_from_row)
    }

    async fn set_grant_role(&self, id: GrantId, role: Role) -> Result<(), Self::Error> {
        sqlx::query("UPDATE dataroom_access SET role = ? WHERE id = ?")
            .bind(DRole(role))
            .bind(DUuid::of(id))
            .execute(&**self)
            .await?;
        Ok(())
    }

    async fn delete_grant(&self, id: GrantId) -> Result<(), Self::Error> {
        sqlx::query("DELETE FROM dataroom_access WHERE id = ?")
            .bind(DUuid::of(id))
            .execute(&**self)
            .await?;
        Ok(())
    }

    async fn insert_folder(&self, folder: Folder) -> Result<(), Self::Error> {
        sqlx::query(
            r#"
            INSERT INTO folders (id, name, dataroom_id, parent_folder_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(DUuid::of(folder.id))
        .bind(&folder.name)
        .bind(DUuid::of(folder.dataroom_id))
        .bind(folder.parent_folder_id.map(DUuid::of))
        .bind(folder.created_at)
        .bind(folder.updated_at)
        .execute(&**self)
        .await?;
        Ok(())
    }

    async fn get_folder(&self, id: FolderId) -> Result<Option<Folder>, Self::Error> {
        let row = sqlx::query(&format!("SELECT {} FROM folders WHERE id = ?", FOLDER_COLUMNS))
            .bind(DUuid::of(id))
            .fetch_optional(&**self)
            .await?;
        row.as_ref().map(folder_from_row).transpose()
    }

    async fn rename_folder(
        &self,
        id: FolderId,
        name: &str,
        updated_at: OffsetDateTime,
    ) -> Result<(), Self::Error> {
        sqlx::query("UPDATE folders SET name = ?, updated_at = ? WHERE id = ?")
            .bind(name)
            .bind(updated_at)
            .bind(DUuid::of(id))
            .execute(&**self)
            .await?;
        Ok(())
    }

    async fn delete_folder(&self, id: FolderId) -> Result<(), Self::Error> {
        sqlx::query("DELETE FROM folders WHERE id = ?")
            .bind(DUuid::of(id))
            .execute(&**self)
            .await?;
        Ok(())
    }

    async fn list_folders(
        &self,
        dataroom: DataroomId,
        parent: Option<FolderId>,
    ) -> Result<Vec<Folder>, Self::Error> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM folders WHERE dataroom_id = ? AND parent_folder_id IS ? ORDER BY rowid",
            FOLDER_COLUMNS
        ))
        .bind(DUuid::of(dataroom))
        .bind(parent.map(DUuid::of))
        .fetch_all(&**self)
        .await?;
        collect(rows, folder_from_row)
    }

    async fn list_child_folders(&self, parent: FolderId) -> Result<Vec<Folder>, Self::Error> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM folders WHERE parent_folder_id = ? ORDER BY rowid",
            FOLDER_COLUMNS
        ))
        .bind(DUuid::of(parent))
        .fetch_all(&**self)
        .await?;
        collect(rows, folder_from_row)
    }

    async fn list_folders_in_dataroom(
        &self,
        dataroom: DataroomId,
    ) -> Result<Vec<Folder>, Self::Error> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM folders WHERE dataroom_id = ? ORDER BY rowid",
            FOLDER_COLUMNS
        ))
        .bind(DUuid::of(dataroom))
        .fetch_all(&**self)
        .await?;
        collect(rows, folder_from_row)
    }

    async fn insert_file(&self, file: FileRecord) -> Result<(), Self::Error> {
        sqlx::query(
            r#"
            INSERT INTO files (id, name, dataroom_id, folder_id, storage_ref, mime_type, size, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(DUuid::of(file.id))
        .bind(&file.name)
        .bind(DUuid::of(file.dataroom_id))
        .bind(file.folder_id.map(DUuid::of))
        .bind(DUuid::of(file.storage_ref))
        .bind(&file.mime_type)
        .bind(i64::try_from(file.size).unwrap_or(i64::MAX))
        .bind(file.created_at)
        .bind(file.updated_at)
        .execute(&**self)
        .await?;
        Ok(())
    }

    async fn get_file(&self, id: FileId) -> Result<Option<FileRecord>, Self::Error> {
        let row = sqlx::query(&format!("SELECT {} FROM files WHERE id = ?", FILE_COLUMNS))
            .bind(DUuid::of(id))
            .fetch_optional(&**self)
            .await?;
        row.as_ref().map(file_from_row).transpose()
    }

    async fn find_file_by_storage_ref(
        &self,
        storage_ref: StorageRef,
    ) -> Result<Option<FileRecord>, Self::Error> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM files WHERE storage_ref = ? LIMIT 1",
            FILE_COLUMNS
        ))
        .bind(DUuid::of(storage_ref))
        .fetch_optional(&**self)
        .await?;
        row.as_ref().map(file_from_row).transpose()
    }

    async fn rename_file(
        &self,
        id: FileId,
        name: &str,
        updated_at: OffsetDateTime,
    ) -> Result<(), Self::Error> {
        sqlx::query("UPDATE files SET name = ?, updated_at = ? WHERE id = ?")
            .bind(name)
            .bind(updated_at)
            .bind(DUuid::of(id))
            .execute(&**self)
            .await?;
        Ok(())
    }

    async fn delete_file(&self, id: FileId) -> Result<(), Self::Error> {
        sqlx::query("DELETE FROM files WHERE id = ?")
            .bind(DUuid::of(id))
            .execute(&**self)
            .await?;
        Ok(())
    }

    async fn list_files(
        &self,
        dataroom: DataroomId,
        folder: Option<FolderId>,
    ) -> Result<Vec<FileRecord>, Self::Error> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM files WHERE dataroom_id = ? AND folder_id IS ? ORDER BY rowid",
            FILE_COLUMNS
        ))
        .bind(DUuid::of(dataroom))
        .bind(folder.map(DUuid::of))
        .fetch_all(&**self)
        .await?;
        collect(rows, file_from_row)
    }

    async fn list_files_in_folder(&self, folder: FolderId) -> Result<Vec<FileRecord>, Self::Error> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM files WHERE folder_id = ? ORDER BY rowid",
            FILE_COLUMNS
        ))
        .bind(DUuid::of(folder))
        .fetch_all(&**self)
        .await?;
        collect(rows, file_from_row)
    }

    async fn list_files_in_dataroom(
        &self,
        dataroom: DataroomId,
    ) -> Result<Vec<FileRecord>, Self::Error> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM files WHERE dataroom_id = ? ORDER BY rowid",
            FILE_COLUMNS
        ))
        .bind(DUuid::of(dataroom))
        .fetch_all(&**self)
        .await?;
        collect(rows, file_from_row)
    }
}

fn insert_grant_query(
    grant: &AccessGrant,
) -> sqlx::query::Query<'_, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'_>> {
    sqlx::query(
        r#"
        INSERT INTO dataroom_access (id, dataroom_id, user_email, role, invited_at, invited_by)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(DUuid::of(grant.id))
    .bind(DUuid::of(grant.dataroom_id))
    .bind(&grant.user_email)
    .bind(DRole(grant.role))
    .bind(grant.invited_at)
    .bind(grant.invited_by.map(DUuid::of))
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::model::timestamp;

    async fn db() -> Database {
        Database::in_memory().await.unwrap()
    }

    fn folder(dataroom: DataroomId, parent: Option<FolderId>, name: &str) -> Folder {
        let now = timestamp();
        Folder {
            id: FolderId::new(),
            name: name.to_string(),
            dataroom_id: dataroom,
            parent_folder_id: parent,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_root_filter_is_null_safe() {
        let db = db().await;
        let room = DataroomId::new();
        let a = folder(room, None, "A");
        let b = folder(room, Some(a.id), "B");
        db.insert_folder(a.clone()).await.unwrap();
        db.insert_folder(b.clone()).await.unwrap();

        assert_eq!(db.list_folders(room, None).await.unwrap(), vec![a.clone()]);
        assert_eq!(db.list_folders(room, Some(a.id)).await.unwrap(), vec![b.clone()]);
        assert_eq!(db.list_child_folders(a.id).await.unwrap(), vec![b]);
        assert_eq!(db.get_folder(a.id).await.unwrap(), Some(a));
    }

    #[tokio::test]
    async fn test_grant_round_trip() {
        let db = db().await;
        let grant = AccessGrant {
            id: GrantId::new(),
            dataroom_id: DataroomId::new(),
            user_email: "a@x.com".to_string(),
            role: Role::Editor,
            invited_at: timestamp(),
            invited_by: Some(UserId::new()),
        };
        db.insert_grant(grant.clone()).await.unwrap();
        assert_eq!(db.get_grant(grant.id).await.unwrap(), Some(grant.clone()));

        db.set_grant_role(grant.id, Role::Viewer).await.unwrap();
        let found = db
            .find_grant(grant.dataroom_id, "a@x.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.role, Role::Viewer);

        db.delete_grant(grant.id).await.unwrap();
        db.delete_grant(grant.id).await.unwrap();
        assert!(db.get_grant(grant.id).await.unwrap().is_none());
    }
}
