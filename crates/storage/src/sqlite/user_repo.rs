use prep_core::model::{User, UserId};

use super::SqliteRepository;
use super::mapping::{conn, map_user_row};
use crate::repository::{StorageError, UserRepository};

#[async_trait::async_trait]
impl UserRepository for SqliteRepository {
    async fn upsert_user(&self, user: &User) -> Result<(), StorageError> {
        sqlx::query(
            r"
                INSERT INTO users (id, name, email)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(id) DO UPDATE SET
                    name = excluded.name,
                    email = excluded.email
            ",
        )
        .bind(user.id().as_str())
        .bind(user.name())
        .bind(user.email())
        .execute(&self.pool)
        .await
        .map_err(conn)?;
        Ok(())
    }

    async fn get_user(&self, id: &UserId) -> Result<Option<User>, StorageError> {
        let row = sqlx::query("SELECT id, name, email FROM users WHERE id = ?1")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(conn)?;

        row.as_ref().map(map_user_row).transpose()
    }
}
