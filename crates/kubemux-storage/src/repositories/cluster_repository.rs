//! SQLite implementation of ClusterRepository.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use kubemux_core::{
    Cluster, ClusterCredentials, ClusterId, ClusterInput, ClusterRepository, DuplicateName,
};
use rusqlite::{ffi, params, Connection, OptionalExtension, Row};
use tokio::sync::Mutex;

use crate::Database;

const SELECT_COLUMNS: &str = "SELECT id, name, description, server_url, token, config_path, \
config_content, status, created_at, updated_at FROM clusters";

/// SQLite-backed implementation of ClusterRepository.
pub struct SqliteClusterRepository {
    db: Arc<Mutex<Database>>,
}

impl SqliteClusterRepository {
    pub fn new(db: Arc<Mutex<Database>>) -> Self {
        Self { db }
    }

    /// Parse RFC3339, falling back to SQLite's `datetime('now')` format.
    fn parse_datetime(s: &str) -> DateTime<Utc> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return dt.with_timezone(&Utc);
        }
        if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
            return dt.and_utc();
        }
        tracing::warn!("[ClusterRepository] Unparseable timestamp '{}'", s);
        Utc::now()
    }

    fn row_to_cluster(row: &Row<'_>) -> rusqlite::Result<Cluster> {
        let status: String = row.get(7)?;
        Ok(Cluster {
            id: ClusterId(row.get(0)?),
            name: row.get(1)?,
            description: row.get(2)?,
            credentials: ClusterCredentials {
                server_url: row.get(3)?,
                token: row.get(4)?,
                config_path: row.get(5)?,
                config_content: row.get(6)?,
            },
            status: status.parse().unwrap_or_else(|e| {
                tracing::warn!("[ClusterRepository] {}, treating as active", e);
                Default::default()
            }),
            created_at: Self::parse_datetime(&row.get::<_, String>(8)?),
            updated_at: Self::parse_datetime(&row.get::<_, String>(9)?),
        })
    }

    /// A UNIQUE violation can only come from `clusters.name`.
    fn write_error(err: rusqlite::Error, name: &str, action: &str) -> anyhow::Error {
        match &err {
            rusqlite::Error::SqliteFailure(e, _)
                if e.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                anyhow::Error::new(DuplicateName(name.to_string()))
            }
            _ => anyhow::Error::new(err).context(format!("Failed to {} cluster '{}'", action, name)),
        }
    }

    fn fetch(conn: &Connection, id: ClusterId) -> Result<Option<Cluster>> {
        let sql = format!("{} WHERE id = ?1", SELECT_COLUMNS);
        let cluster = conn
            .query_row(&sql, params![id.get()], Self::row_to_cluster)
            .optional()?;
        Ok(cluster)
    }
}

#[async_trait]
impl ClusterRepository for SqliteClusterRepository {
    async fn list(&self) -> Result<Vec<Cluster>> {
        let db = self.db.lock().await;
        let conn = db.connection();

        let sql = format!("{} ORDER BY id ASC", SELECT_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let clusters = stmt
            .query_map([], Self::row_to_cluster)?
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!("[ClusterRepository::list] Returning {} clusters", clusters.len());
        Ok(clusters)
    }

    async fn get(&self, id: ClusterId) -> Result<Option<Cluster>> {
        let db = self.db.lock().await;
        Self::fetch(db.connection(), id)
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<Cluster>> {
        let db = self.db.lock().await;
        let sql = format!("{} WHERE name = ?1", SELECT_COLUMNS);
        let cluster = db
            .connection()
            .query_row(&sql, params![name], Self::row_to_cluster)
            .optional()?;
        Ok(cluster)
    }

    async fn create(&self, input: &ClusterInput) -> Result<Cluster> {
        let db = self.db.lock().await;
        let conn = db.connection();
        let now = Utc::now().to_rfc3339();
        let creds = &input.credentials;

        conn.execute(
            "INSERT INTO clusters (name, description, server_url, token, config_path, config_content, status, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
            params![
                input.name.trim(),
                input.description,
                creds.server_url,
                creds.token,
                creds.config_path,
                creds.config_content,
                input.status.unwrap_or_default().as_str(),
                now,
            ],
        )
        .map_err(|e| Self::write_error(e, input.name.trim(), "insert"))?;

        let id = u32::try_from(conn.last_insert_rowid()).context("Cluster id out of range")?;
        Self::fetch(conn, ClusterId(id))?
            .ok_or_else(|| anyhow::anyhow!("Cluster {} vanished after insert", id))
    }

    async fn update(&self, cluster: &Cluster) -> Result<()> {
        let db = self.db.lock().await;
        let creds = &cluster.credentials;

        let rows_affected = db
            .connection()
            .execute(
                "UPDATE clusters
                 SET name = ?2, description = ?3, server_url = ?4, token = ?5, config_path = ?6,
                     config_content = ?7, status = ?8, updated_at = ?9
                 WHERE id = ?1",
                params![
                    cluster.id.get(),
                    cluster.name,
                    cluster.description,
                    creds.server_url,
                    creds.token,
                    creds.config_path,
                    creds.config_content,
                    cluster.status.as_str(),
                    cluster.updated_at.to_rfc3339(),
                ],
            )
            .map_err(|e| Self::write_error(e, &cluster.name, "update"))?;

        if rows_affected == 0 {
            anyhow::bail!("Cluster not found: {}", cluster.id);
        }
        Ok(())
    }

    async fn delete(&self, id: ClusterId) -> Result<bool> {
        let db = self.db.lock().await;
        let rows = db
            .connection()
            .execute("DELETE FROM clusters WHERE id = ?1", params![id.get()])?;
        Ok(rows > 0)
    }
}
