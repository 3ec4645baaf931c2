//! Column drops: reordering stages.

use board_dragdrop::reorder_patches;
use pipeline_store::repository::PatchSink;

use super::{settle, PendingDrop};
use crate::models::DropOutcome;
use crate::store::BoardStore;

/// Reorder the stage list (inactive stages included, as on the settings
/// page) and show the dense renumbering.
pub fn begin_stage_drop(
    store: &mut BoardStore,
    source_index: usize,
    destination_index: usize,
) -> Option<PendingDrop> {
    let keys: Vec<String> = store.view_stages().into_iter().map(|s| s.key).collect();
    let patches = reorder_patches(&keys, source_index, destination_index);
    PendingDrop::start(store, patches)
}

/// Resolve, show, persist and settle a stage reorder
pub async fn handle_stage_drop<S: PatchSink + ?Sized>(
    store: &mut BoardStore,
    sink: &S,
    source_index: usize,
    destination_index: usize,
) -> Result<DropOutcome, String> {
    let Some(pending) = begin_stage_drop(store, source_index, destination_index) else {
        return Ok(DropOutcome::NoChange);
    };
    log::debug!("stage drop {} -> {}", source_index, destination_index);

    let result = sink.apply_patches(&pending.patches).await;
    settle(store, pending, result)
}
