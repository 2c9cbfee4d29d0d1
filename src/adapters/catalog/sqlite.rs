use crate::adapters::database::{packaging_id_column, to_sql_id, SqliteDatabase};
use crate::domain::model::PackagingBox;
use crate::domain::ports::BoxCatalog;
use crate::utils::error::Result;
use async_trait::async_trait;
use rusqlite::{params, OptionalExtension, Row};

/// Catalog read from the `packagings` table.
#[derive(Clone)]
pub struct SqliteBoxCatalog {
    db: SqliteDatabase,
}

impl SqliteBoxCatalog {
    pub fn new(db: SqliteDatabase) -> Self {
        Self { db }
    }

    pub fn insert(&self, packaging: &PackagingBox) -> Result<()> {
        let conn = self.db.lock()?;
        conn.execute(
            "INSERT INTO packagings (id, width, height, length, max_weight)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                to_sql_id(packaging.id)?,
                packaging.width,
                packaging.height,
                packaging.length,
                packaging.max_weight
            ],
        )?;
        Ok(())
    }
}

fn row_to_box(row: &Row<'_>) -> rusqlite::Result<PackagingBox> {
    Ok(PackagingBox {
        id: packaging_id_column(row, 0)?,
        width: row.get(1)?,
        height: row.get(2)?,
        length: row.get(3)?,
        max_weight: row.get(4)?,
    })
}

#[async_trait]
impl BoxCatalog for SqliteBoxCatalog {
    async fn list_boxes(&self) -> Result<Vec<PackagingBox>> {
        let boxes = self
            .db
            .call(|conn| {
                // One row per distinct geometry; MAX(id) keeps the choice reproducible.
                let mut stmt = conn.prepare(
                    "SELECT MAX(id) AS id, width, height, length, max_weight
                     FROM packagings
                     GROUP BY width, height, length, max_weight
                     ORDER BY id",
                )?;
                let boxes = stmt
                    .query_map([], row_to_box)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(boxes)
            })
            .await?;

        tracing::debug!("Loaded {} distinct packagings from database", boxes.len());
        Ok(boxes)
    }

    async fn find_by_id(&self, id: u64) -> Result<Option<PackagingBox>> {
        let sql_id = to_sql_id(id)?;
        self.db
            .call(move |conn| {
                let packaging = conn
                    .query_row(
                        "SELECT id, width, height, length, max_weight FROM packagings WHERE id = ?1",
                        params![sql_id],
                        row_to_box,
                    )
                    .optional()?;
                Ok(packaging)
            })
            .await
    }
}
