//! Deal Move Operations
//!
//! Operations for a deal's stage membership, including the group patches
//! produced by dragging a card to another column.

use async_trait::async_trait;
use board_dragdrop::Patch;
use rusqlite::{Connection, params};

use crate::domain::{Deal, DomainError, DomainResult};
use super::super::traits::PatchSink;
use super::deal_repo::{ensure_stage_exists, find_deal, query_deals, DealRepository, DEAL_COLUMNS};

/// Trait for deal stage-membership operations
#[async_trait]
pub trait DealMoveOperations {
    /// Deals in one stage, in creation order
    async fn list_by_stage(&self, stage: &str) -> DomainResult<Vec<Deal>>;

    /// Reassign a deal to another stage
    async fn move_to_stage(&self, id: &str, stage: &str) -> DomainResult<Deal>;

    /// Number of deals per stage key
    async fn count_by_stage(&self) -> DomainResult<Vec<(String, i64)>>;
}

#[async_trait]
impl DealMoveOperations for DealRepository {
    async fn list_by_stage(&self, stage: &str) -> DomainResult<Vec<Deal>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or(DomainError::Internal("Database not initialized".to_string()))?;

        let query = format!("SELECT {} FROM deals WHERE stage = ? ORDER BY seq", DEAL_COLUMNS);
        query_deals(conn, &query, params![stage])
    }

    async fn move_to_stage(&self, id: &str, stage: &str) -> DomainResult<Deal> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or(DomainError::Internal("Database not initialized".to_string()))?;

        set_stage_in(conn, id, stage)?;
        find_deal(conn, id)?
            .ok_or_else(|| DomainError::NotFound(format!("Deal {} not found", id)))
    }

    async fn count_by_stage(&self) -> DomainResult<Vec<(String, i64)>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or(DomainError::Internal("Database not initialized".to_string()))?;

        let mut stmt = conn.prepare("SELECT stage, COUNT(*) FROM deals GROUP BY stage ORDER BY stage")
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        let counts = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
            .map_err(|e| DomainError::Internal(e.to_string()))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        Ok(counts)
    }
}

#[async_trait]
impl PatchSink for DealRepository {
    async fn apply_patches(&self, patches: &[Patch]) -> DomainResult<()> {
        if patches.is_empty() {
            return Ok(());
        }
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or(DomainError::Internal("Database not initialized".to_string()))?;

        let tx = conn.unchecked_transaction()
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        for patch in patches {
            let stage = patch.new_group_key.as_deref().ok_or_else(|| {
                DomainError::InvalidInput(format!("Patch for deal {} carries no stage", patch.id))
            })?;
            set_stage_in(&tx, &patch.id, stage)?;
        }
        tx.commit().map_err(|e| DomainError::Internal(e.to_string()))?;

        log::debug!("applied {} deal stage patches", patches.len());
        Ok(())
    }
}

fn set_stage_in(conn: &Connection, id: &str, stage: &str) -> DomainResult<()> {
    ensure_stage_exists(conn, stage)?;
    let changed = conn.execute(
        "UPDATE deals SET stage = ?, updated_at = ? WHERE id = ?",
        params![stage, chrono::Utc::now().timestamp_millis(), id],
    )
    .map_err(|e| DomainError::Internal(e.to_string()))?;
    if changed == 0 {
        return Err(DomainError::NotFound(format!("Deal {} not found", id)));
    }
    Ok(())
}
