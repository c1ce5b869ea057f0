//! Blob CRUD on the SQLite cache database.

use async_trait::async_trait;
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

use super::connection::CacheDb;
use super::store::BlobStore;
use crate::Error;

#[async_trait]
impl BlobStore for CacheDb {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, Error> {
        let key = key.to_string();
        self.conn
            .call(move |conn| -> Result<Option<Vec<u8>>, Error> {
                let mut stmt = conn.prepare("SELECT value FROM entries WHERE key = ?1")?;

                match stmt.query_row(params![key], |row| row.get(0)) {
                    Ok(value) => Ok(Some(value)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// UPSERT: a single statement, so the row is replaced atomically.
    async fn put(&self, key: &str, value: Vec<u8>) -> Result<(), Error> {
        let key = key.to_string();
        let updated_at = chrono::Utc::now().to_rfc3339();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO entries (key, value, updated_at) VALUES (?1, ?2, ?3)
                    ON CONFLICT(key) DO UPDATE SET
                        value = excluded.value,
                        updated_at = excluded.updated_at",
                    params![key, value, updated_at],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    async fn delete(&self, key: &str) -> Result<bool, Error> {
        let key = key.to_string();
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let count = conn.execute("DELETE FROM entries WHERE key = ?1", params![key])?;
                Ok(count > 0)
            })
            .await
            .map_err(Error::from)
    }

    async fn keys(&self) -> Result<Vec<String>, Error> {
        self.conn
            .call(move |conn| -> Result<Vec<String>, Error> {
                let mut stmt = conn.prepare("SELECT key FROM entries")?;
                let keys = stmt
                    .query_map([], |row| row.get::<_, String>(0))?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(keys)
            })
            .await
            .map_err(Error::from)
    }

    async fn clear(&self) -> Result<u64, Error> {
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count = conn.execute("DELETE FROM entries", [])?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_and_get() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.put("abc", b"payload".to_vec()).await.unwrap();

        let value = db.get("abc").await.unwrap().unwrap();
        assert_eq!(value, b"payload");
    }

    #[tokio::test]
    async fn test_get_missing() {
        let db = CacheDb::open_in_memory().await.unwrap();
        assert!(db.get("nonexistent").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_upsert_overwrites() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.put("k", b"old".to_vec()).await.unwrap();
        db.put("k", b"new".to_vec()).await.unwrap();

        assert_eq!(db.get("k").await.unwrap().unwrap(), b"new");
        assert_eq!(db.keys().await.unwrap(), vec!["k".to_string()]);
    }

    #[tokio::test]
    async fn test_delete() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.put("k", vec![1, 2, 3]).await.unwrap();

        assert!(db.delete("k").await.unwrap());
        assert!(!db.delete("k").await.unwrap());
        assert!(db.get("k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_clear() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.put("a", vec![1]).await.unwrap();
        db.put("b", vec![2]).await.unwrap();

        assert_eq!(db.clear().await.unwrap(), 2);
        assert!(db.keys().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.sqlite");

        let db = CacheDb::open(&path).await.unwrap();
        db.put("k", b"kept".to_vec()).await.unwrap();
        drop(db);

        let db = CacheDb::open(&path).await.unwrap();
        assert_eq!(db.get("k").await.unwrap().unwrap(), b"kept");
    }
}
