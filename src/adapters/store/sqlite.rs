use crate::adapters::database::{packaging_id_column, to_sql_id, SqliteDatabase};
use crate::domain::model::{PackagingBox, PackingRecord};
use crate::domain::ports::PackingResultStore;
use crate::utils::error::{PackingError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};

#[derive(Clone)]
pub struct SqlitePackingResultStore {
    db: SqliteDatabase,
}

impl SqlitePackingResultStore {
    pub fn new(db: SqliteDatabase) -> Self {
        Self { db }
    }
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    err.sqlite_error()
        .map(|e| e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE)
        .unwrap_or(false)
}

#[async_trait]
impl PackingResultStore for SqlitePackingResultStore {
    async fn find_by_fingerprint(&self, fingerprint: &str) -> Result<Option<PackingRecord>> {
        let key = fingerprint.to_string();
        let row = self
            .db
            .call(move |conn| {
                let row = conn
                    .query_row(
                        "SELECT fingerprint, packaging_id, width, height, length, max_weight, created_at
                         FROM packing_results WHERE fingerprint = ?1",
                        params![key],
                        |row| {
                            Ok((
                                row.get::<_, String>(0)?,
                                PackagingBox {
                                    id: packaging_id_column(row, 1)?,
                                    width: row.get(2)?,
                                    height: row.get(3)?,
                                    length: row.get(4)?,
                                    max_weight: row.get(5)?,
                                },
                                row.get::<_, String>(6)?,
                            ))
                        },
                    )
                    .optional()?;
                Ok(row)
            })
            .await?;

        let Some((fingerprint, packaging, created_at)) = row else {
            return Ok(None);
        };
        let created_at = DateTime::parse_from_rfc3339(&created_at)
            .map_err(|e| PackingError::data_source(format!("invalid created_at: {}", e)))?
            .with_timezone(&Utc);

        Ok(Some(PackingRecord {
            fingerprint,
            packaging,
            created_at,
        }))
    }

    async fn save(&self, record: &PackingRecord) -> Result<()> {
        let packaging_id = to_sql_id(record.packaging.id)?;
        let record = record.clone();

        self.db
            .call(move |conn| {
                let tx = conn.transaction()?;
                let inserted = tx.execute(
                    "INSERT INTO packing_results
                        (fingerprint, packaging_id, width, height, length, max_weight, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                    params![
                        record.fingerprint,
                        packaging_id,
                        record.packaging.width,
                        record.packaging.height,
                        record.packaging.length,
                        record.packaging.max_weight,
                        record.created_at.to_rfc3339()
                    ],
                );

                match inserted {
                    Ok(_) => {
                        tx.commit()?;
                        Ok(())
                    }
                    Err(e) if is_unique_violation(&e) => {
                        // Dropping the transaction rolls it back.
                        drop(tx);
                        Err(PackingError::DuplicateFingerprint {
                            fingerprint: record.fingerprint,
                        })
                    }
                    Err(e) => Err(e.into()),
                }
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(fingerprint: &str, box_id: u64) -> PackingRecord {
        PackingRecord::new(
            fingerprint.to_string(),
            PackagingBox::new(box_id, 20.0, 20.0, 20.0, 100.0),
        )
    }

    #[tokio::test]
    async fn test_save_then_find() {
        let store = SqlitePackingResultStore::new(SqliteDatabase::in_memory().unwrap());
        let saved = record("packing_abc", 3);

        store.save(&saved).await.unwrap();
        let found = store.find_by_fingerprint("packing_abc").await.unwrap().unwrap();

        assert_eq!(found.packaging, saved.packaging);
        assert_eq!(found.created_at.timestamp(), saved.created_at.timestamp());
        assert!(store.find_by_fingerprint("packing_other").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_second_insert_reports_duplicate_and_keeps_first() {
        let store = SqlitePackingResultStore::new(SqliteDatabase::in_memory().unwrap());
        store.save(&record("packing_abc", 3)).await.unwrap();

        let err = store.save(&record("packing_abc", 4)).await.unwrap_err();

        assert!(matches!(err, PackingError::DuplicateFingerprint { .. }));
        let found = store.find_by_fingerprint("packing_abc").await.unwrap().unwrap();
        assert_eq!(found.packaging.id, 3);

        // The connection is usable again after the rolled back insert.
        store.save(&record("packing_def", 4)).await.unwrap();
    }

    #[tokio::test]
    async fn test_records_survive_reopen() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("packing.sqlite");

        {
            let store = SqlitePackingResultStore::new(SqliteDatabase::open(&path).unwrap());
            store.save(&record("packing_abc", 3)).await.unwrap();
        }

        let store = SqlitePackingResultStore::new(SqliteDatabase::open(&path).unwrap());
        assert!(store.find_by_fingerprint("packing_abc").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_negative_packaging_id_is_rejected_not_wrapped() {
        let db = SqliteDatabase::in_memory().unwrap();
        db.lock()
            .unwrap()
            .execute(
                "INSERT INTO packing_results
                    (fingerprint, packaging_id, width, height, length, max_weight, created_at)
                 VALUES ('packing_neg', -1, 1.0, 1.0, 1.0, 1.0, '2024-01-01T00:00:00+00:00')",
                [],
            )
            .unwrap();
        let store = SqlitePackingResultStore::new(db);

        let err = store.find_by_fingerprint("packing_neg").await.unwrap_err();

        assert!(matches!(
            err,
            PackingError::Database(rusqlite::Error::FromSqlConversionFailure(1, _, _))
        ));
    }
}
