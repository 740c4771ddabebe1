//! Postgres store implementation.
//!
//! Nested author/review joins are fetched as JSON documents (`row_to_json` +
//! `json_agg` subqueries) and deserialized into the raw row types, so the
//! projection shape matches what the aggregate mapper expects regardless of
//! join multiplicity.

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Row};

use crate::models::{
    author::RawAuthorRow,
    book::{RawBookRow, RawReviewRow},
    review::NewReview,
};

use super::{Store, StoreError};

/// Tables the probe is allowed to touch. The table name is interpolated into
/// the statement, so it must come from this list.
const PROBE_TABLES: &[&str] = &["book", "author", "books_read", "customer"];

const BOOK_DETAIL_QUERY: &str = r#"
SELECT row_to_json(t) AS row
FROM (
    SELECT b.isbn, b.name, b.summary, b.rating, b.genre, b.image_url,
           COALESCE((
               SELECT json_agg(json_build_object('author', a))
               FROM author_book ab
               LEFT JOIN author a ON a.id = ab.author_id
               WHERE ab.book_isbn = b.isbn
           ), '[]'::json) AS author_book,
           COALESCE((
               SELECT json_agg(json_build_object(
                   'rating', r.rating,
                   'comment', r.comment,
                   'user_id', r.user_id
               ))
               FROM books_read r
               WHERE r.book_isbn = b.isbn
           ), '[]'::json) AS books_read
    FROM book b
) t
"#;

const AUTHOR_DETAIL_QUERY: &str = r#"
SELECT row_to_json(t) AS row
FROM (
    SELECT a.id, a.name, a.contact_details,
           COALESCE((
               SELECT json_agg(json_build_object('book', b))
               FROM author_book ab
               LEFT JOIN book b ON b.isbn = ab.book_isbn
               WHERE ab.author_id = a.id
           ), '[]'::json) AS author_book
    FROM author a
) t
"#;

#[derive(Clone)]
pub struct PgStore {
    pool: Pool<Postgres>,
}

impl PgStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    async fn fetch_json_rows<T>(&self, query: &str) -> Result<Vec<T>, StoreError>
    where
        T: serde::de::DeserializeOwned,
    {
        let values: Vec<serde_json::Value> =
            sqlx::query_scalar(query).fetch_all(&self.pool).await?;

        values
            .into_iter()
            .map(|value| serde_json::from_value(value).map_err(StoreError::from))
            .collect()
    }
}

#[async_trait]
impl Store for PgStore {
    async fn probe(&self, table: &str) -> Result<i64, StoreError> {
        if !PROBE_TABLES.contains(&table) {
            return Err(StoreError::UnknownTable(table.to_string()));
        }

        let row = sqlx::query(&format!("SELECT COUNT(*) AS count FROM {}", table))
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("count"))
    }

    async fn fetch_book_rows(&self) -> Result<Vec<RawBookRow>, StoreError> {
        self.fetch_json_rows(BOOK_DETAIL_QUERY).await
    }

    async fn fetch_author_rows(&self) -> Result<Vec<RawAuthorRow>, StoreError> {
        self.fetch_json_rows(AUTHOR_DETAIL_QUERY).await
    }

    async fn fetch_reviews(&self, isbn: &str) -> Result<Vec<RawReviewRow>, StoreError> {
        let rows = sqlx::query(
            "SELECT rating, comment, user_id FROM books_read WHERE book_isbn = $1",
        )
        .bind(isbn)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| RawReviewRow {
                rating: row.get("rating"),
                comment: row.get("comment"),
                user_id: row.get("user_id"),
            })
            .collect())
    }

    async fn book_exists(&self, isbn: &str) -> Result<bool, StoreError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM book WHERE isbn = $1)")
                .bind(isbn)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn insert_placeholder_book(&self, isbn: &str) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO book (isbn, name) VALUES ($1, $2) ON CONFLICT (isbn) DO NOTHING")
            .bind(isbn)
            .bind("Unknown Title")
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn upsert_review(&self, review: &NewReview) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO books_read (book_isbn, user_id, rating, comment)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (book_isbn, user_id)
            DO UPDATE SET rating = EXCLUDED.rating,
                          comment = COALESCE(EXCLUDED.comment, books_read.comment)
            "#,
        )
        .bind(&review.book_isbn)
        .bind(&review.user_id)
        .bind(review.rating)
        .bind(&review.comment)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn customer_ids(&self) -> Result<Vec<String>, StoreError> {
        let ids: Vec<String> = sqlx::query_scalar("SELECT id::text FROM customer")
            .fetch_all(&self.pool)
            .await?;
        Ok(ids)
    }
}
