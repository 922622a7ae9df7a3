//! Book instance domain methods on Repository

use uuid::Uuid;

use super::Repository;
use crate::{
    error::AppResult,
    models::{BookInstance, BookInstanceFields, BookInstanceStatus},
};

impl Repository {
    pub async fn book_instances_list_all(&self) -> AppResult<Vec<BookInstance>> {
        let rows = sqlx::query_as::<_, BookInstance>("SELECT * FROM book_instances")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn book_instances_get_by_id(&self, id: Uuid) -> AppResult<Option<BookInstance>> {
        let row = sqlx::query_as::<_, BookInstance>("SELECT * FROM book_instances WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn book_instances_get_by_book(&self, book: Uuid) -> AppResult<Vec<BookInstance>> {
        let rows = sqlx::query_as::<_, BookInstance>("SELECT * FROM book_instances WHERE book = $1")
            .bind(book)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn book_instances_count_with_status(&self, status: BookInstanceStatus) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM book_instances WHERE status = $1")
            .bind(status.as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn book_instances_create(&self, data: &BookInstanceFields) -> AppResult<BookInstance> {
        let row = sqlx::query_as::<_, BookInstance>(
            r#"
            INSERT INTO book_instances (id, book, imprint, status, due_back)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.book)
        .bind(&data.imprint)
        .bind(data.status.as_str())
        .bind(data.due_back)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn book_instances_replace(
        &self,
        id: Uuid,
        data: &BookInstanceFields,
    ) -> AppResult<Option<BookInstance>> {
        let row = sqlx::query_as::<_, BookInstance>(
            r#"
            UPDATE book_instances
            SET book = $2, imprint = $3, status = $4, due_back = $5
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(data.book)
        .bind(&data.imprint)
        .bind(data.status.as_str())
        .bind(data.due_back)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn book_instances_delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM book_instances WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
