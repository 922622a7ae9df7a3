//! Author domain methods on Repository

use uuid::Uuid;

use super::Repository;
use crate::{
    error::AppResult,
    models::{Author, AuthorFields},
};

impl Repository {
    /// List all authors in storage order
    pub async fn authors_list_all(&self) -> AppResult<Vec<Author>> {
        let rows = sqlx::query_as::<_, Author>("SELECT * FROM authors")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn authors_get_by_id(&self, id: Uuid) -> AppResult<Option<Author>> {
        let row = sqlx::query_as::<_, Author>("SELECT * FROM authors WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn authors_get_many(&self, ids: &[Uuid]) -> AppResult<Vec<Author>> {
        let rows = sqlx::query_as::<_, Author>("SELECT * FROM authors WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn authors_create(&self, data: &AuthorFields) -> AppResult<Author> {
        let row = sqlx::query_as::<_, Author>(
            r#"
            INSERT INTO authors (id, first_name, family_name, date_of_birth, date_of_death)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&data.first_name)
        .bind(&data.family_name)
        .bind(data.date_of_birth)
        .bind(data.date_of_death)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Replace every stored field of an author
    pub async fn authors_replace(&self, id: Uuid, data: &AuthorFields) -> AppResult<Option<Author>> {
        let row = sqlx::query_as::<_, Author>(
            r#"
            UPDATE authors
            SET first_name = $2, family_name = $3, date_of_birth = $4, date_of_death = $5
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&data.first_name)
        .bind(&data.family_name)
        .bind(data.date_of_birth)
        .bind(data.date_of_death)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn authors_delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM authors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
