//! Book domain methods on Repository

use uuid::Uuid;

use super::Repository;
use crate::{
    error::AppResult,
    models::{Book, BookFields},
};

impl Repository {
    pub async fn books_list_all(&self) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, Book>("SELECT * FROM books")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Books ordered by title, as offered in the copy form
    pub async fn books_list_sorted_by_title(&self) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, Book>("SELECT * FROM books ORDER BY title")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn books_get_by_id(&self, id: Uuid) -> AppResult<Option<Book>> {
        let row = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn books_get_by_author(&self, author: Uuid) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE author = $1")
            .bind(author)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn books_get_by_genre(&self, genre: Uuid) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE $1 = ANY(genre)")
            .bind(genre)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn books_get_many(&self, ids: &[Uuid]) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn books_create(&self, data: &BookFields) -> AppResult<Book> {
        let row = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (id, title, author, summary, isbn, genre)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&data.title)
        .bind(data.author)
        .bind(&data.summary)
        .bind(&data.isbn)
        .bind(&data.genre)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Replace every stored field of a book, including its genre set
    pub async fn books_replace(&self, id: Uuid, data: &BookFields) -> AppResult<Option<Book>> {
        let row = sqlx::query_as::<_, Book>(
            r#"
            UPDATE books
            SET title = $2, author = $3, summary = $4, isbn = $5, genre = $6
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&data.title)
        .bind(data.author)
        .bind(&data.summary)
        .bind(&data.isbn)
        .bind(&data.genre)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Delete a book. Its copies are left in place.
    pub async fn books_delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
