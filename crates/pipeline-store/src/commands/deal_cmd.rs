//! Commands for Deal operations
//!
//! Deal CRUD and stage moves.

use board_dragdrop::Patch;
use crate::domain::Deal;
use crate::repository::{DealMoveOperations, PatchSink, Repository};
use crate::AppState;

/// List all deals
pub async fn list_deals(state: &AppState) -> Result<Vec<Deal>, String> {
    state.deal_repo.list().await.map_err(|e| e.to_string())
}

/// List deals in one stage
pub async fn list_deals_by_stage(state: &AppState, stage: String) -> Result<Vec<Deal>, String> {
    state.deal_repo.list_by_stage(&stage).await.map_err(|e| e.to_string())
}

/// Get deal by ID
pub async fn get_deal(state: &AppState, id: String) -> Result<Option<Deal>, String> {
    state.deal_repo.find_by_id(id).await.map_err(|e| e.to_string())
}

/// Create a new deal
pub async fn create_deal(
    state: &AppState,
    title: String,
    stage: String,
    value_cents: Option<i64>,
    contact: Option<String>,
) -> Result<Deal, String> {
    let mut deal = Deal::with_value(title, stage, value_cents.unwrap_or(0));
    deal.contact = contact;
    state.deal_repo.create(&deal).await.map_err(|e| e.to_string())
}

/// Update deal fields; `None` keeps the current value.
/// `contact` and `notes` take `Some(None)` to clear.
pub async fn update_deal(
    state: &AppState,
    id: String,
    title: Option<String>,
    value_cents: Option<i64>,
    contact: Option<Option<String>>,
    notes: Option<Option<String>>,
) -> Result<Deal, String> {
    let existing = state.deal_repo.find_by_id(id.clone()).await.map_err(|e| e.to_string())?
        .ok_or_else(|| format!("Deal {} not found", id))?;

    let updated = Deal {
        title: title.unwrap_or(existing.title.clone()),
        value_cents: value_cents.unwrap_or(existing.value_cents),
        contact: contact.unwrap_or_else(|| existing.contact.clone()),
        notes: notes.unwrap_or_else(|| existing.notes.clone()),
        ..existing
    };

    state.deal_repo.update(&updated).await.map_err(|e| e.to_string())
}

/// Move a deal to another stage
pub async fn move_deal(state: &AppState, id: String, stage: String) -> Result<Deal, String> {
    state.deal_repo.move_to_stage(&id, &stage).await.map_err(|e| e.to_string())
}

/// Delete deal
pub async fn delete_deal(state: &AppState, id: String) -> Result<(), String> {
    state.deal_repo.delete(id).await.map_err(|e| e.to_string())
}

/// Persist stage patches produced by a card drag
pub async fn apply_deal_patches(state: &AppState, patches: Vec<Patch>) -> Result<(), String> {
    state.deal_repo.apply_patches(&patches).await.map_err(|e| e.to_string())
}
