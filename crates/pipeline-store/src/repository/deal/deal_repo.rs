//! Deal Repository - Core CRUD Operations
//!
//! SQLite-backed implementation for Deal CRUD operations.
//! Stage membership operations are in deal_moves.

use async_trait::async_trait;
use rusqlite::{Connection, OptionalExtension, params};

use crate::domain::{Deal, DomainError, DomainResult};
use super::super::db::SharedConnection;
use super::super::traits::Repository;

pub(super) const DEAL_COLUMNS: &str =
    "id, title, value_cents, contact, stage, notes, created_at, updated_at";

/// SQLite implementation of Deal repository
pub struct DealRepository {
    pub(super) conn: SharedConnection,
}

impl DealRepository {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl Repository<Deal> for DealRepository {
    async fn create(&self, entity: &Deal) -> DomainResult<Deal> {
        if entity.title.trim().is_empty() {
            return Err(DomainError::InvalidInput("Deal title is empty".to_string()));
        }

        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or(DomainError::Internal("Database not initialized".to_string()))?;

        ensure_stage_exists(conn, &entity.stage).map_err(|e| match e {
            DomainError::NotFound(_) => {
                DomainError::InvalidInput(format!("Stage {} does not exist", entity.stage))
            }
            other => other,
        })?;

        let id = if entity.id.is_empty() {
            next_deal_id(conn)?
        } else {
            if find_deal(conn, &entity.id)?.is_some() {
                return Err(DomainError::Conflict(format!("Deal {} already exists", entity.id)));
            }
            // A card named like a column would be classified as the column on drop
            if ensure_stage_exists(conn, &entity.id).is_ok() {
                return Err(DomainError::Conflict(format!("Deal id {} is a stage key", entity.id)));
            }
            entity.id.clone()
        };

        let now = chrono::Utc::now().timestamp_millis();
        conn.execute(
            "INSERT INTO deals (id, title, value_cents, contact, stage, notes, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                id,
                entity.title.clone(),
                entity.value_cents,
                entity.contact.clone(),
                entity.stage.clone(),
                entity.notes.clone(),
                now,
                now
            ],
        )
        .map_err(|e| DomainError::Internal(e.to_string()))?;

        log::debug!("created deal {} in stage {}", id, entity.stage);
        Ok(Deal {
            id,
            created_at: Some(now),
            updated_at: Some(now),
            ..entity.clone()
        })
    }

    async fn find_by_id(&self, id: String) -> DomainResult<Option<Deal>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or(DomainError::Internal("Database not initialized".to_string()))?;
        find_deal(conn, &id)
    }

    /// All deals in creation order
    async fn list(&self) -> DomainResult<Vec<Deal>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or(DomainError::Internal("Database not initialized".to_string()))?;

        let query = format!("SELECT {} FROM deals ORDER BY seq", DEAL_COLUMNS);
        query_deals(conn, &query, [])
    }

    async fn update(&self, entity: &Deal) -> DomainResult<Deal> {
        if entity.title.trim().is_empty() {
            return Err(DomainError::InvalidInput("Deal title is empty".to_string()));
        }

        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or(DomainError::Internal("Database not initialized".to_string()))?;

        ensure_stage_exists(conn, &entity.stage)?;

        let changed = conn.execute(
            "UPDATE deals SET title = ?, value_cents = ?, contact = ?, stage = ?, notes = ?, updated_at = ? WHERE id = ?",
            params![
                entity.title.clone(),
                entity.value_cents,
                entity.contact.clone(),
                entity.stage.clone(),
                entity.notes.clone(),
                chrono::Utc::now().timestamp_millis(),
                entity.id.clone()
            ],
        )
        .map_err(|e| DomainError::Internal(e.to_string()))?;
        if changed == 0 {
            return Err(DomainError::NotFound(format!("Deal {} not found", entity.id)));
        }

        find_deal(conn, &entity.id)?
            .ok_or_else(|| DomainError::NotFound(format!("Deal {} not found", entity.id)))
    }

    async fn delete(&self, id: String) -> DomainResult<()> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or(DomainError::Internal("Database not initialized".to_string()))?;

        let changed = conn.execute("DELETE FROM deals WHERE id = ?", params![id])
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        if changed == 0 {
            return Err(DomainError::NotFound(format!("Deal {} not found", id)));
        }
        Ok(())
    }
}

/// Next generated id, `deal-<n>`.
///
/// Numbers come from the AUTOINCREMENT sequence so ids of deleted deals are
/// never handed out again; caller-chosen ids that happen to match are skipped.
fn next_deal_id(conn: &Connection) -> DomainResult<String> {
    let mut next: i64 = conn
        .query_row(
            "SELECT COALESCE((SELECT seq FROM sqlite_sequence WHERE name = 'deals'), 0) + 1",
            [],
            |row| row.get(0),
        )
        .map_err(|e| DomainError::Internal(e.to_string()))?;
    while find_deal(conn, &Deal::generated_id(next))?.is_some() {
        next += 1;
    }
    Ok(Deal::generated_id(next))
}

pub(super) fn ensure_stage_exists(conn: &Connection, key: &str) -> DomainResult<()> {
    let found = conn
        .query_row("SELECT 1 FROM stages WHERE key = ?", params![key], |_| Ok(()))
        .optional()
        .map_err(|e| DomainError::Internal(e.to_string()))?;
    match found {
        Some(()) => Ok(()),
        None => Err(DomainError::NotFound(format!("Stage {} not found", key))),
    }
}

pub(super) fn find_deal(conn: &Connection, id: &str) -> DomainResult<Option<Deal>> {
    let query = format!("SELECT {} FROM deals WHERE id = ?", DEAL_COLUMNS);
    conn.query_row(&query, params![id], row_to_deal)
        .optional()
        .map_err(|e| DomainError::Internal(e.to_string()))
}

pub(super) fn query_deals<P: rusqlite::Params>(
    conn: &Connection,
    query: &str,
    params: P,
) -> DomainResult<Vec<Deal>> {
    let mut stmt = conn.prepare(query)
        .map_err(|e| DomainError::Internal(e.to_string()))?;

    let deals = stmt.query_map(params, row_to_deal)
        .map_err(|e| DomainError::Internal(e.to_string()))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| DomainError::Internal(e.to_string()))?;
    Ok(deals)
}

/// Convert a database row to Deal
fn row_to_deal(row: &rusqlite::Row) -> rusqlite::Result<Deal> {
    Ok(Deal {
        id: row.get(0)?,
        title: row.get(1)?,
        value_cents: row.get(2)?,
        contact: row.get::<_, Option<String>>(3)?,
        stage: row.get(4)?,
        notes: row.get::<_, Option<String>>(5)?,
        created_at: row.get::<_, Option<i64>>(6)?,
        updated_at: row.get::<_, Option<i64>>(7)?,
    })
}
