//! Genre domain methods on Repository

use uuid::Uuid;

use super::Repository;
use crate::{
    error::AppResult,
    models::{Genre, GenreFields},
};

impl Repository {
    pub async fn genres_list_by_name(&self) -> AppResult<Vec<Genre>> {
        let rows = sqlx::query_as::<_, Genre>("SELECT * FROM genres ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn genres_get_by_id(&self, id: Uuid) -> AppResult<Option<Genre>> {
        let row = sqlx::query_as::<_, Genre>("SELECT * FROM genres WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Find a genre whose name matches ignoring case (and Unicode normal form)
    pub async fn genres_get_by_name(&self, name: &str) -> AppResult<Option<Genre>> {
        let row = sqlx::query_as::<_, Genre>(
            r#"
            SELECT * FROM genres
            WHERE lower(normalize(name, NFC)) = lower(normalize($1, NFC))
            LIMIT 1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn genres_get_many(&self, ids: &[Uuid]) -> AppResult<Vec<Genre>> {
        let rows = sqlx::query_as::<_, Genre>("SELECT * FROM genres WHERE id = ANY($1) ORDER BY name")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn genres_create(&self, data: &GenreFields) -> AppResult<Genre> {
        let row = sqlx::query_as::<_, Genre>(
            "INSERT INTO genres (id, name) VALUES ($1, $2) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(&data.name)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn genres_replace(&self, id: Uuid, data: &GenreFields) -> AppResult<Option<Genre>> {
        let row = sqlx::query_as::<_, Genre>(
            "UPDATE genres SET name = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&data.name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn genres_delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM genres WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
