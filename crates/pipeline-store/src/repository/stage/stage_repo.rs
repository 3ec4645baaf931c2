//! Stage Repository - Core CRUD Operations
//!
//! SQLite-backed implementation for Stage CRUD operations.
//! Order management lives in stage_positioning.

use async_trait::async_trait;
use rusqlite::{Connection, OptionalExtension, params};

use crate::domain::{Stage, DomainError, DomainResult};
use super::super::db::SharedConnection;
use super::super::traits::Repository;
use super::stage_positioning::{next_display_order_in, reindex_stages_in};

pub(super) const STAGE_COLUMNS: &str =
    "key, label, color, display_order, is_active, is_system, created_at, updated_at";

/// SQLite implementation of Stage repository
pub struct StageRepository {
    pub(super) conn: SharedConnection,
}

impl StageRepository {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    /// Seed the default system stages when the table is empty.
    /// Returns how many stages were inserted.
    pub async fn ensure_defaults(&self) -> DomainResult<usize> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or(DomainError::Internal("Database not initialized".to_string()))?;

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM stages", [], |row| row.get(0))
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        if count > 0 {
            return Ok(0);
        }

        let tx = conn.unchecked_transaction()
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        let defaults = Stage::defaults();
        for stage in &defaults {
            insert_stage(&tx, stage)?;
        }
        tx.commit().map_err(|e| DomainError::Internal(e.to_string()))?;

        log::info!("seeded {} default stages", defaults.len());
        Ok(defaults.len())
    }

    /// Active stages in board order
    pub async fn list_active(&self) -> DomainResult<Vec<Stage>> {
        let stages = self.list().await?;
        Ok(stages.into_iter().filter(|s| s.is_active).collect())
    }

    /// Toggle whether a stage shows on the board
    pub async fn set_active(&self, key: &str, is_active: bool) -> DomainResult<Stage> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or(DomainError::Internal("Database not initialized".to_string()))?;

        let changed = conn.execute(
            "UPDATE stages SET is_active = ?, updated_at = ? WHERE key = ?",
            params![is_active, chrono::Utc::now().timestamp_millis(), key],
        )
        .map_err(|e| DomainError::Internal(e.to_string()))?;
        if changed == 0 {
            return Err(DomainError::NotFound(format!("Stage {} not found", key)));
        }

        find_stage(conn, key)?
            .ok_or_else(|| DomainError::NotFound(format!("Stage {} not found", key)))
    }
}

#[async_trait]
impl Repository<Stage> for StageRepository {
    async fn create(&self, entity: &Stage) -> DomainResult<Stage> {
        Stage::validate_key(&entity.key)?;
        if entity.label.trim().is_empty() {
            return Err(DomainError::InvalidInput("Stage label is empty".to_string()));
        }

        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or(DomainError::Internal("Database not initialized".to_string()))?;

        if find_stage(conn, &entity.key)?.is_some() {
            return Err(DomainError::Conflict(format!("Stage {} already exists", entity.key)));
        }

        let now = chrono::Utc::now().timestamp_millis();
        let stage = Stage {
            display_order: next_display_order_in(conn)?,
            is_system: false,
            created_at: Some(now),
            updated_at: Some(now),
            ..entity.clone()
        };
        insert_stage(conn, &stage)?;

        log::debug!("created stage {} at order {}", stage.key, stage.display_order);
        Ok(stage)
    }

    async fn find_by_id(&self, key: String) -> DomainResult<Option<Stage>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or(DomainError::Internal("Database not initialized".to_string()))?;
        find_stage(conn, &key)
    }

    async fn list(&self) -> DomainResult<Vec<Stage>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or(DomainError::Internal("Database not initialized".to_string()))?;
        list_stages_in(conn)
    }

    /// Updates label, color and active state. Order and the system flag
    /// are not touched here.
    async fn update(&self, entity: &Stage) -> DomainResult<Stage> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or(DomainError::Internal("Database not initialized".to_string()))?;

        let changed = conn.execute(
            "UPDATE stages SET label = ?, color = ?, is_active = ?, updated_at = ? WHERE key = ?",
            params![
                entity.label.clone(),
                entity.color.clone(),
                entity.is_active,
                chrono::Utc::now().timestamp_millis(),
                entity.key.clone()
            ],
        )
        .map_err(|e| DomainError::Internal(e.to_string()))?;
        if changed == 0 {
            return Err(DomainError::NotFound(format!("Stage {} not found", entity.key)));
        }

        find_stage(conn, &entity.key)?
            .ok_or_else(|| DomainError::NotFound(format!("Stage {} not found", entity.key)))
    }

    async fn delete(&self, key: String) -> DomainResult<()> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or(DomainError::Internal("Database not initialized".to_string()))?;

        let stage = find_stage(conn, &key)?
            .ok_or_else(|| DomainError::NotFound(format!("Stage {} not found", key)))?;
        if stage.is_system {
            return Err(DomainError::InvalidInput(format!(
                "Cannot delete system stage {}; deactivate it instead",
                key
            )));
        }

        let deals: i64 = conn
            .query_row("SELECT COUNT(*) FROM deals WHERE stage = ?", params![key], |row| row.get(0))
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        if deals > 0 {
            return Err(DomainError::Conflict(format!("Stage {} still holds {} deals", key, deals)));
        }

        let tx = conn.unchecked_transaction()
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        tx.execute("DELETE FROM stages WHERE key = ?", params![key])
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        // Close the gap left behind
        reindex_stages_in(&tx)?;
        tx.commit().map_err(|e| DomainError::Internal(e.to_string()))?;

        Ok(())
    }
}

fn insert_stage(conn: &Connection, stage: &Stage) -> DomainResult<()> {
    let now = chrono::Utc::now().timestamp_millis();
    conn.execute(
        "INSERT INTO stages (key, label, color, display_order, is_active, is_system, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        params![
            stage.key.clone(),
            stage.label.clone(),
            stage.color.clone(),
            stage.display_order,
            stage.is_active,
            stage.is_system,
            stage.created_at.unwrap_or(now),
            stage.updated_at.unwrap_or(now)
        ],
    )
    .map_err(|e| DomainError::Internal(e.to_string()))?;
    Ok(())
}

pub(super) fn find_stage(conn: &Connection, key: &str) -> DomainResult<Option<Stage>> {
    let query = format!("SELECT {} FROM stages WHERE key = ?", STAGE_COLUMNS);
    conn.query_row(&query, params![key], row_to_stage)
        .optional()
        .map_err(|e| DomainError::Internal(e.to_string()))
}

pub(super) fn list_stages_in(conn: &Connection) -> DomainResult<Vec<Stage>> {
    let query = format!("SELECT {} FROM stages ORDER BY display_order, key", STAGE_COLUMNS);
    let mut stmt = conn.prepare(&query)
        .map_err(|e| DomainError::Internal(e.to_string()))?;

    let stages = stmt.query_map([], row_to_stage)
        .map_err(|e| DomainError::Internal(e.to_string()))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| DomainError::Internal(e.to_string()))?;
    Ok(stages)
}

/// Convert a database row to Stage
fn row_to_stage(row: &rusqlite::Row) -> rusqlite::Result<Stage> {
    Ok(Stage {
        key: row.get(0)?,
        label: row.get(1)?,
        color: row.get::<_, Option<String>>(2)?,
        display_order: row.get(3)?,
        is_active: row.get(4)?,
        is_system: row.get(5)?,
        created_at: row.get::<_, Option<i64>>(6)?,
        updated_at: row.get::<_, Option<i64>>(7)?,
    })
}
