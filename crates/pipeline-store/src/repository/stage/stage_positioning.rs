//! Stage Positioning Operations
//!
//! Operations for managing stage display order. Every write leaves the
//! stages numbered 1..N with no gaps or ties.

use async_trait::async_trait;
use board_dragdrop::{renumber, reorder_patches, Patch};
use rusqlite::{Connection, params};
use std::collections::{HashMap, HashSet};

use crate::domain::{Stage, DomainError, DomainResult};
use super::super::traits::PatchSink;
use super::stage_repo::{list_stages_in, StageRepository};

/// Trait for stage positioning operations
#[async_trait]
pub trait StagePositioningOperations {
    /// Order a newly created stage would get
    async fn next_display_order(&self) -> DomainResult<i32>;

    /// Renumber stages to be sequential (1, 2, 3, ...) keeping current order
    async fn reindex_stages(&self) -> DomainResult<()>;

    /// Apply a complete new order; `ordered_keys` must name every stage once
    async fn reorder(&self, ordered_keys: &[String]) -> DomainResult<Vec<Stage>>;

    /// Move one stage to `new_index` (0-based) and renumber the rest
    async fn move_stage(&self, key: &str, new_index: usize) -> DomainResult<Vec<Stage>>;
}

#[async_trait]
impl StagePositioningOperations for StageRepository {
    async fn next_display_order(&self) -> DomainResult<i32> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or(DomainError::Internal("Database not initialized".to_string()))?;
        next_display_order_in(conn)
    }

    async fn reindex_stages(&self) -> DomainResult<()> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or(DomainError::Internal("Database not initialized".to_string()))?;
        reindex_stages_in(conn)
    }

    async fn reorder(&self, ordered_keys: &[String]) -> DomainResult<Vec<Stage>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or(DomainError::Internal("Database not initialized".to_string()))?;

        let current: HashSet<String> = list_stages_in(conn)?.into_iter().map(|s| s.key).collect();
        let requested: HashSet<String> = ordered_keys.iter().cloned().collect();
        if requested.len() != ordered_keys.len() || requested != current {
            return Err(DomainError::InvalidInput(
                "Stage order must list every stage exactly once".to_string(),
            ));
        }

        apply_order_patches_in(conn, &renumber(ordered_keys))?;
        list_stages_in(conn)
    }

    async fn move_stage(&self, key: &str, new_index: usize) -> DomainResult<Vec<Stage>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or(DomainError::Internal("Database not initialized".to_string()))?;

        let keys: Vec<String> = list_stages_in(conn)?.into_iter().map(|s| s.key).collect();
        let source = keys
            .iter()
            .position(|k| k == key)
            .ok_or_else(|| DomainError::NotFound(format!("Stage {} not found", key)))?;

        let patches = reorder_patches(&keys, source, new_index);
        if !patches.is_empty() {
            apply_order_patches_in(conn, &patches)?;
        }
        list_stages_in(conn)
    }
}

#[async_trait]
impl PatchSink for StageRepository {
    async fn apply_patches(&self, patches: &[Patch]) -> DomainResult<()> {
        if patches.is_empty() {
            return Ok(());
        }
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or(DomainError::Internal("Database not initialized".to_string()))?;
        apply_order_patches_in(conn, patches)
    }
}

pub(super) fn next_display_order_in(conn: &Connection) -> DomainResult<i32> {
    conn.query_row(
        "SELECT COALESCE(MAX(display_order), 0) + 1 FROM stages",
        [],
        |row| row.get(0),
    )
    .map_err(|e| DomainError::Internal(e.to_string()))
}

pub(super) fn reindex_stages_in(conn: &Connection) -> DomainResult<()> {
    reindex_with_requests_in(conn, &HashMap::new())
}

/// Renumber 1..N. Stages in `requested` are placed at the slot they asked
/// for (clamped to the end); the rest keep their relative order around them.
fn reindex_with_requests_in(conn: &Connection, requested: &HashMap<&str, i32>) -> DomainResult<()> {
    let mut rows: Vec<(String, i32)> = Vec::new();
    {
        let mut stmt = conn.prepare("SELECT key, display_order FROM stages ORDER BY display_order, key")
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        let mut query = stmt.query([])
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        while let Some(row) = query.next().map_err(|e| DomainError::Internal(e.to_string()))? {
            let key: String = row.get(0).map_err(|e| DomainError::Internal(e.to_string()))?;
            let order: i32 = row.get(1).map_err(|e| DomainError::Internal(e.to_string()))?;
            rows.push((key, order));
        }
    }

    let (mut placed, rest): (Vec<_>, Vec<_>) =
        rows.into_iter().partition(|(key, _)| requested.contains_key(key.as_str()));
    placed.sort_by(|(a_key, a_order), (b_key, b_order)| a_order.cmp(b_order).then_with(|| a_key.cmp(b_key)));

    let mut ordered: Vec<String> = rest.into_iter().map(|(key, _)| key).collect();
    for (key, order) in placed {
        let slot = usize::try_from(order.max(1) - 1).unwrap_or(0).min(ordered.len());
        ordered.insert(slot, key);
    }

    let now = chrono::Utc::now().timestamp_millis();
    for (index, key) in ordered.iter().enumerate() {
        conn.execute(
            "UPDATE stages SET display_order = ?, updated_at = ? WHERE key = ? AND display_order != ?",
            params![index as i32 + 1, now, key, index as i32 + 1],
        )
        .map_err(|e| DomainError::Internal(e.to_string()))?;
    }
    Ok(())
}

/// Write order patches in one transaction, then renumber so the result is
/// dense even when the batch only covered part of the stages. A patched
/// stage keeps the slot it asked for; unpatched stages shift around it.
pub(super) fn apply_order_patches_in(conn: &Connection, patches: &[Patch]) -> DomainResult<()> {
    let tx = conn.unchecked_transaction()
        .map_err(|e| DomainError::Internal(e.to_string()))?;
    let now = chrono::Utc::now().timestamp_millis();

    for patch in patches {
        let order = patch.new_order.ok_or_else(|| {
            DomainError::InvalidInput(format!("Patch for stage {} carries no order", patch.id))
        })?;
        let changed = tx.execute(
            "UPDATE stages SET display_order = ?, updated_at = ? WHERE key = ?",
            params![order, now, patch.id],
        )
        .map_err(|e| DomainError::Internal(e.to_string()))?;
        if changed == 0 {
            // tx rolls back on drop
            return Err(DomainError::NotFound(format!("Stage {} not found", patch.id)));
        }
    }

    let requested: HashMap<&str, i32> = patches
        .iter()
        .filter_map(|p| p.new_order.map(|order| (p.id.as_str(), order)))
        .collect();
    reindex_with_requests_in(&tx, &requested)?;
    tx.commit().map_err(|e| DomainError::Internal(e.to_string()))?;
    log::debug!("applied {} stage order patches", patches.len());
    Ok(())
}
