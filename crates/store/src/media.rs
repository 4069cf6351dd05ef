//! Media catalog persistence.

use async_trait::async_trait;
use sqlx::FromRow;

use mediarate_core::{MediaDraft, MediaItem, MediaSort, MediaStore, Result, SortDirection};

use crate::client::PgClient;
use crate::db_err;

#[derive(FromRow)]
struct MediaRow {
    id: i64,
    title: String,
    description: Option<String>,
    media_type: Option<String>,
    release_year: Option<i32>,
    genre: Option<String>,
    age_restriction: Option<i32>,
    created_by: i64,
}

impl From<MediaRow> for MediaItem {
    fn from(row: MediaRow) -> Self {
        MediaItem {
            id: row.id,
            title: row.title,
            description: row.description,
            media_type: row.media_type,
            release_year: row.release_year,
            genre: row.genre,
            age_restriction: row.age_restriction,
            created_by: row.created_by,
        }
    }
}

const MEDIA_COLUMNS: &str =
    "m.id, m.title, m.description, m.media_type, m.release_year, m.genre, m.age_restriction, m.created_by";

/// ORDER BY fragment for a whitelisted sort key. Client input never reaches
/// the SQL text; only these fragments do.
fn order_clause(sort: MediaSort, direction: SortDirection) -> String {
    let dir = match direction {
        SortDirection::Asc => "ASC",
        SortDirection::Desc => "DESC",
    };
    match sort {
        MediaSort::Id => format!("m.id {dir}"),
        MediaSort::Title => format!("LOWER(m.title) {dir}, m.id ASC"),
        MediaSort::Year => format!("m.release_year {dir} NULLS LAST, m.id ASC"),
        MediaSort::Score => format!("s.avg_score {dir} NULLS LAST, m.id ASC"),
    }
}

pub struct PgMediaStore {
    client: PgClient,
}

impl PgMediaStore {
    pub fn new(client: PgClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MediaStore for PgMediaStore {
    async fn create(&self, draft: MediaDraft, created_by: i64) -> Result<MediaItem> {
        let row: MediaRow = sqlx::query_as(
            "INSERT INTO media (title, description, media_type, release_year, genre, age_restriction, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING id, title, description, media_type, release_year, genre, age_restriction, created_by",
        )
        .bind(&draft.title)
        .bind(&draft.description)
        .bind(&draft.media_type)
        .bind(draft.release_year)
        .bind(&draft.genre)
        .bind(draft.age_restriction)
        .bind(created_by)
        .fetch_one(self.client.pool())
        .await
        .map_err(|e| db_err("create_media", e))?;

        Ok(row.into())
    }

    async fn list(&self, sort: MediaSort, direction: SortDirection) -> Result<Vec<MediaItem>> {
        let sql = format!(
            "SELECT {MEDIA_COLUMNS} FROM media m \
             LEFT JOIN (SELECT media_id, AVG(stars)::float8 AS avg_score FROM ratings GROUP BY media_id) s \
             ON s.media_id = m.id \
             ORDER BY {}",
            order_clause(sort, direction)
        );

        let rows: Vec<MediaRow> = sqlx::query_as(&sql)
            .fetch_all(self.client.pool())
            .await
            .map_err(|e| db_err("list_media", e))?;

        Ok(rows.into_iter().map(MediaItem::from).collect())
    }

    async fn get(&self, id: i64) -> Result<Option<MediaItem>> {
        let row: Option<MediaRow> =
            sqlx::query_as(&format!("SELECT {MEDIA_COLUMNS} FROM media m WHERE m.id = $1"))
                .bind(id)
                .fetch_optional(self.client.pool())
                .await
                .map_err(|e| db_err("get_media", e))?;

        Ok(row.map(MediaItem::from))
    }

    async fn update(&self, id: i64, draft: MediaDraft, owner_id: i64) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE media SET title = $3, description = $4, media_type = $5, \
             release_year = $6, genre = $7, age_restriction = $8 \
             WHERE id = $1 AND created_by = $2",
        )
        .bind(id)
        .bind(owner_id)
        .bind(&draft.title)
        .bind(&draft.description)
        .bind(&draft.media_type)
        .bind(draft.release_year)
        .bind(&draft.genre)
        .bind(draft.age_restriction)
        .execute(self.client.pool())
        .await
        .map_err(|e| db_err("update_media", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: i64, owner_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM media WHERE id = $1 AND created_by = $2")
            .bind(id)
            .bind(owner_id)
            .execute(self.client.pool())
            .await
            .map_err(|e| db_err("delete_media", e))?;

        Ok(result.rows_affected() > 0)
    }
}
