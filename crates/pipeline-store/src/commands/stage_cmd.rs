//! Commands for Stage operations
//!
//! Stage CRUD, activation and board ordering.

use board_dragdrop::Patch;
use crate::domain::Stage;
use crate::repository::{PatchSink, Repository, StagePositioningOperations};
use crate::AppState;

/// List all stages in board order
pub async fn list_stages(state: &AppState) -> Result<Vec<Stage>, String> {
    state.stage_repo.list().await.map_err(|e| e.to_string())
}

/// List stages shown on the board
pub async fn list_active_stages(state: &AppState) -> Result<Vec<Stage>, String> {
    state.stage_repo.list_active().await.map_err(|e| e.to_string())
}

/// Create a user stage at the end of the board
pub async fn create_stage(
    state: &AppState,
    key: String,
    label: String,
    color: Option<String>,
) -> Result<Stage, String> {
    let stage = match color {
        Some(c) => Stage::with_color(key, label, c),
        None => Stage::new(key, label),
    };
    state.stage_repo.create(&stage).await.map_err(|e| e.to_string())
}

/// Update label and/or color; `color: Some(None)` clears it
pub async fn update_stage(
    state: &AppState,
    key: String,
    label: Option<String>,
    color: Option<Option<String>>,
) -> Result<Stage, String> {
    let existing = state.stage_repo.find_by_id(key.clone()).await.map_err(|e| e.to_string())?
        .ok_or_else(|| format!("Stage {} not found", key))?;

    let updated = Stage {
        label: label.unwrap_or(existing.label.clone()),
        color: color.unwrap_or_else(|| existing.color.clone()),
        ..existing
    };

    state.stage_repo.update(&updated).await.map_err(|e| e.to_string())
}

/// Show or hide a stage
pub async fn set_stage_active(state: &AppState, key: String, is_active: bool) -> Result<Stage, String> {
    state.stage_repo.set_active(&key, is_active).await.map_err(|e| e.to_string())
}

/// Delete a user stage
pub async fn delete_stage(state: &AppState, key: String) -> Result<(), String> {
    state.stage_repo.delete(key).await.map_err(|e| e.to_string())
}

/// Replace the whole board order
pub async fn reorder_stages(state: &AppState, ordered_keys: Vec<String>) -> Result<Vec<Stage>, String> {
    state.stage_repo.reorder(&ordered_keys).await.map_err(|e| e.to_string())
}

/// Move one stage to a new 0-based position
pub async fn move_stage(state: &AppState, key: String, new_index: usize) -> Result<Vec<Stage>, String> {
    state.stage_repo.move_stage(&key, new_index).await.map_err(|e| e.to_string())
}

/// Persist order patches produced by a stage drag
pub async fn apply_stage_patches(state: &AppState, patches: Vec<Patch>) -> Result<(), String> {
    state.stage_repo.apply_patches(&patches).await.map_err(|e| e.to_string())
}
