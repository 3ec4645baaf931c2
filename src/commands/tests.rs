//! Drop handler tests against an in-memory store and a failing sink.

use async_trait::async_trait;
use pipeline_store::domain::{DomainError, DomainResult};
use pipeline_store::repository::PatchSink;
use pipeline_store::{commands as store_commands, init_app, AppState, StoreConfig};

use super::*;
use crate::context::BoardContext;
use crate::models::DropEvent;

/// Storage that is always down
struct OfflineSink;

#[async_trait]
impl PatchSink for OfflineSink {
    async fn apply_patches(&self, _patches: &[Patch]) -> DomainResult<()> {
        Err(DomainError::Internal("network unreachable".to_string()))
    }
}

async fn setup() -> (AppState, BoardContext) {
    let state = init_app(&StoreConfig::in_memory()).await.expect("init failed");
    store_commands::create_deal(&state, "Acme".into(), "lead".into(), Some(1_000), None)
        .await
        .unwrap();
    store_commands::create_deal(&state, "Globex".into(), "won".into(), Some(4_000), None)
        .await
        .unwrap();
    let ctx = BoardContext::load(&state).await.unwrap();
    (state, ctx)
}

fn drop_on(dragged: &str, destination: Option<&str>) -> DropEvent {
    DropEvent {
        dragged_id: dragged.to_string(),
        destination_id: destination.map(str::to_string),
    }
}

fn stage_keys(store: &BoardStore) -> Vec<String> {
    store.view_stages().into_iter().map(|s| s.key).collect()
}

#[tokio::test]
async fn test_drop_on_column_persists() {
    let (state, mut ctx) = setup().await;

    let outcome = handle_deal_drop(&mut ctx.store, &state.deal_repo, &drop_on("deal-1", Some("proposal")))
        .await
        .unwrap();
    assert_eq!(outcome, DropOutcome::Persisted(vec![Patch::group("deal-1", "proposal")]));

    let stored = store_commands::get_deal(&state, "deal-1".into()).await.unwrap().unwrap();
    assert_eq!(stored.stage, "proposal");
    assert!(!ctx.store.has_pending());
    assert_eq!(ctx.store.confirmed_deals()[0].stage, "proposal");
}

#[tokio::test]
async fn test_drop_on_card_joins_its_column() {
    let (state, mut ctx) = setup().await;

    handle_deal_drop(&mut ctx.store, &state.deal_repo, &drop_on("deal-1", Some("deal-2")))
        .await
        .unwrap();

    let won = store_commands::list_deals_by_stage(&state, "won".into()).await.unwrap();
    assert_eq!(won.len(), 2);
    let columns = ctx.columns();
    let won_column = columns.iter().find(|c| c.stage.key == "won").unwrap();
    assert_eq!(won_column.total_value_cents, 5_000);
}

#[tokio::test]
async fn test_card_id_cannot_be_shadowed_by_a_stage() {
    let (state, mut ctx) = setup().await;
    assert!(store_commands::create_stage(&state, "deal-2".into(), "Deal 2".into(), None).await.is_err());
    ctx.reload(&state).await.unwrap();

    let outcome = handle_deal_drop(&mut ctx.store, &state.deal_repo, &drop_on("deal-1", Some("deal-2")))
        .await
        .unwrap();
    assert_eq!(outcome, DropOutcome::Persisted(vec![Patch::group("deal-1", "won")]));
}

#[tokio::test]
async fn test_noop_drops_skip_storage() {
    let (_state, mut ctx) = setup().await;

    // The offline sink would fail if it were called
    for event in [
        drop_on("deal-1", Some("lead")),
        drop_on("deal-1", None),
        drop_on("deal-404", Some("won")),
    ] {
        let outcome = handle_deal_drop(&mut ctx.store, &OfflineSink, &event).await.unwrap();
        assert_eq!(outcome, DropOutcome::NoChange);
    }
}

#[tokio::test]
async fn test_inactive_stage_is_not_a_target() {
    let (state, mut ctx) = setup().await;
    store_commands::set_stage_active(&state, "lost".into(), false).await.unwrap();
    ctx.reload(&state).await.unwrap();

    let outcome = handle_deal_drop(&mut ctx.store, &state.deal_repo, &drop_on("deal-1", Some("lost")))
        .await
        .unwrap();
    assert_eq!(outcome, DropOutcome::NoChange);
}

#[tokio::test]
async fn test_failed_write_rolls_back() {
    let (_state, mut ctx) = setup().await;

    let err = handle_deal_drop(&mut ctx.store, &OfflineSink, &drop_on("deal-1", Some("won")))
        .await
        .unwrap_err();
    assert!(err.contains("network unreachable"));
    assert!(!ctx.store.has_pending());
    assert_eq!(ctx.store.view_deals()[0].stage, "lead");
}

#[tokio::test]
async fn test_optimistic_view_while_in_flight() {
    let (state, mut ctx) = setup().await;

    let pending = begin_deal_drop(&mut ctx.store, &drop_on("deal-1", Some("won"))).unwrap();
    assert_eq!(ctx.store.view_deals()[0].stage, "won");
    assert_eq!(ctx.store.confirmed_deals()[0].stage, "lead");

    let result = state.deal_repo.apply_patches(&pending.patches).await;
    settle(&mut ctx.store, pending, result).unwrap();
    assert_eq!(ctx.store.confirmed_deals()[0].stage, "won");
}

#[tokio::test]
async fn test_stage_drop_renumbers() {
    let (state, mut ctx) = setup().await;

    let outcome = handle_stage_drop(&mut ctx.store, &state.stage_repo, 1, 0).await.unwrap();
    let DropOutcome::Persisted(patches) = outcome else {
        panic!("expected patches");
    };
    let orders: Vec<i32> = patches.iter().filter_map(|p| p.new_order).collect();
    assert_eq!(orders, vec![1, 2, 3, 4, 5, 6]);
    assert_eq!(patches[0], Patch::order("contact", 1));

    let stored: Vec<String> = store_commands::list_stages(&state)
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.key)
        .collect();
    assert_eq!(stored, stage_keys(&ctx.store));
    assert_eq!(stored[..3], ["contact", "lead", "proposal"]);
}

#[tokio::test]
async fn test_stage_drop_same_index_is_noop() {
    let (_state, mut ctx) = setup().await;
    let outcome = handle_stage_drop(&mut ctx.store, &OfflineSink, 2, 2).await.unwrap();
    assert_eq!(outcome, DropOutcome::NoChange);
}

#[tokio::test]
async fn test_stage_drop_failure_restores_order() {
    let (_state, mut ctx) = setup().await;
    let before = stage_keys(&ctx.store);

    assert!(handle_stage_drop(&mut ctx.store, &OfflineSink, 0, 5).await.is_err());
    assert_eq!(stage_keys(&ctx.store), before);
}

#[tokio::test]
async fn test_gesture_release_drives_drop() {
    let (state, mut ctx) = setup().await;

    ctx.gesture.press("deal-1", 0, 0);
    ctx.gesture.pointer_move(0, 50);
    ctx.gesture.enter("negotiation");
    let outcome = ctx.release_card(&state.deal_repo).await.unwrap();
    assert_eq!(outcome, DropOutcome::Persisted(vec![Patch::group("deal-1", "negotiation")]));

    // A click is not a drop
    ctx.gesture.press("deal-2", 0, 0);
    assert_eq!(ctx.release_card(&OfflineSink).await.unwrap(), DropOutcome::NoChange);

    ctx.reload(&state).await.unwrap();
    assert_eq!(ctx.reload_count(), 2);
    assert_eq!(ctx.store.confirmed_deals()[0].stage, "negotiation");
}
