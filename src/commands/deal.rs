//! Card drops: moving deals between stage columns.

use board_dragdrop::resolve_cross_group_move;
use pipeline_store::repository::PatchSink;

use super::{settle, PendingDrop};
use crate::models::{DropEvent, DropOutcome, Stage};
use crate::store::BoardStore;

/// Resolve a card drop against what is on screen and show it.
///
/// Only active stages are drop targets. `None` means nothing changes.
pub fn begin_deal_drop(store: &mut BoardStore, event: &DropEvent) -> Option<PendingDrop> {
    let deals = store.view_deals();
    let stages: Vec<Stage> = store.view_stages().into_iter().filter(|s| s.is_active).collect();

    let patches = resolve_cross_group_move(
        &event.dragged_id,
        event.destination_id.as_deref(),
        &deals,
        &stages,
    );
    PendingDrop::start(store, patches)
}

/// Resolve, show, persist and settle a card drop
pub async fn handle_deal_drop<S: PatchSink + ?Sized>(
    store: &mut BoardStore,
    sink: &S,
    event: &DropEvent,
) -> Result<DropOutcome, String> {
    let Some(pending) = begin_deal_drop(store, event) else {
        return Ok(DropOutcome::NoChange);
    };
    log::debug!("deal drop {:?} -> {:?}", event.dragged_id, event.destination_id);

    let result = sink.apply_patches(&pending.patches).await;
    settle(store, pending, result)
}
